use alloc::{collections::BTreeMap, string::String, vec::Vec};
use model::{Question, Quiz};

/// Large HTML bodies remembered by question id so the server may omit them
/// on subsequent polls.
#[derive(Debug, Default)]
pub struct RenderCache {
    content: BTreeMap<u64, String>,
    answers: BTreeMap<u64, String>,
}

impl RenderCache {
    pub fn absorb(&mut self, question: &Question) {
        if let Some(content) = question.content.as_deref().filter(|text| !text.is_empty()) {
            self.content.insert(question.id, content.into());
        }
        if let Some(content) = question.answer_content.as_deref().filter(|text| !text.is_empty()) {
            self.answers.insert(question.id, content.into());
        }
    }

    pub fn absorb_quiz(&mut self, quiz: &Quiz) {
        for question in quiz.questions() {
            self.absorb(question);
        }
    }

    pub fn content(&self, id: u64) -> Option<&str> {
        self.content.get(&id).map(String::as_str)
    }

    pub fn answer_content(&self, id: u64) -> Option<&str> {
        self.answers.get(&id).map(String::as_str)
    }

    /// Comma-joined ids of cached question bodies, in ascending order.
    pub fn content_ids(&self) -> String {
        join_ids(self.content.keys())
    }

    /// Comma-joined ids of cached answer reveals, in ascending order.
    pub fn answer_ids(&self) -> String {
        join_ids(self.answers.keys())
    }
}

fn join_ids<'a>(ids: impl Iterator<Item = &'a u64>) -> String {
    use alloc::string::ToString;
    ids.map(ToString::to_string).collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::RenderCache;
    use crate::fixture;
    use serde_json::json;

    #[test]
    fn remembers_bodies_by_id() {
        let mut cache = RenderCache::default();
        cache.absorb(&fixture::question(json!({ "id": 9, "order_number": 1, "content": "<b>nine</b>" })));
        cache.absorb(&fixture::question(json!({ "id": 3, "order_number": 2, "content": "three", "answer_content": "3" })));
        cache.absorb(&fixture::question(json!({ "id": 5, "order_number": 3, "content": "" })));

        assert_eq!(cache.content_ids(), "3,9");
        assert_eq!(cache.answer_ids(), "3");
        assert_eq!(cache.content(9), Some("<b>nine</b>"));
        assert_eq!(cache.content(5), None);
    }

    #[test]
    fn omitted_bodies_keep_cached_copy() {
        let mut cache = RenderCache::default();
        cache.absorb(&fixture::question(json!({ "id": 1, "order_number": 1, "content": "first" })));
        cache.absorb(&fixture::question(json!({ "id": 1, "order_number": 1, "content": null })));
        assert_eq!(cache.content(1), Some("first"));
    }

    #[test]
    fn empty_cache_joins_to_nothing() {
        let cache = RenderCache::default();
        assert_eq!(cache.content_ids(), "");
        assert_eq!(cache.answer_ids(), "");
    }
}
