use crate::Answers;
use alloc::{string::String, vec::Vec};
use serde::Deserialize;

/// Snapshot of a quiz as seen by the current viewer.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Quiz {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub sections: Vec<Section>,
    /// Leaderboard. Older servers omit it entirely.
    #[serde(default)]
    pub rankings: Vec<Ranking>,
    /// Points the viewer has earned across all closed sections.
    #[serde(default)]
    pub points: Option<f64>,
    /// Identifies the viewer's own row in the leaderboard.
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

impl Quiz {
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.sections.iter().flat_map(|section| section.questions.iter())
    }

    pub fn question(&self, id: u64) -> Option<&Question> {
        self.questions().find(|question| question.id == id)
    }

    pub fn question_mut(&mut self, id: u64) -> Option<&mut Question> {
        self.sections
            .iter_mut()
            .flat_map(|section| section.questions.iter_mut())
            .find(|question| question.id == id)
    }

    /// Running total of the points of every section that reports some.
    pub fn total_points(&self) -> f64 {
        self.sections.iter().filter_map(|section| section.points).sum()
    }
}

/// A graded group of questions owned by a single grader.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Section {
    pub id: u64,
    pub name: String,
    pub order_number: u32,
    #[serde(default)]
    pub open: bool,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub points: Option<f64>,
    #[serde(default)]
    pub average: Option<f64>,
    /// Name of the grader.
    #[serde(default)]
    pub user: String,
    /// Whether the viewer grades this section.
    #[serde(default)]
    pub host: bool,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Question {
    pub id: u64,
    pub order_number: u32,
    #[serde(default)]
    pub text: Option<String>,
    /// HTML body. Omitted when the client reports it as cached.
    #[serde(default)]
    pub content: Option<String>,
    /// HTML revealed after grading. Omitted when cached.
    #[serde(default)]
    pub answer_content: Option<String>,
    #[serde(default = "one")]
    pub max_answers: usize,
    #[serde(default)]
    pub base_points: i64,
    #[serde(default)]
    pub answers: Answers,
    /// Correct answers, empty until the section is graded.
    #[serde(default)]
    pub correct: Vec<String>,
    #[serde(default, alias = "bonnus")]
    pub bonus: bool,
    #[serde(default)]
    pub open: bool,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub liked: bool,
    /// Fixed choices. Present only for multiple-choice questions.
    #[serde(default)]
    pub values: Option<Vec<String>>,
    #[serde(default)]
    pub points: Option<f64>,
    #[serde(default)]
    pub average: Option<f64>,
    #[serde(default)]
    pub host: bool,
}

const fn one() -> usize {
    1
}

impl Question {
    pub fn is_multiple_choice(&self) -> bool {
        self.values.is_some()
    }

    /// The section has been graded once any correct answer is revealed.
    pub fn is_graded(&self) -> bool {
        !self.correct.is_empty()
    }

    /// No further input is accepted once graded or closed.
    pub fn is_effectively_closed(&self) -> bool {
        self.is_graded() || self.closed
    }

    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct.iter().any(|correct| correct == answer)
    }
}

/// A single leaderboard row.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Ranking {
    pub id: u64,
    pub username: String,
    pub rank: u32,
    #[serde(default)]
    pub points: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn question(value: serde_json::Value) -> Question {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn decodes_server_question() {
        let q = question(json!({
            "id": 4,
            "order_number": 2,
            "content": "<p>Who?</p>",
            "answer_content": null,
            "max_answers": 3,
            "base_points": 1,
            "open": true,
            "closed": false,
            "likes": 5,
            "liked": true,
            "values": null,
            "answers": { "Ada": false },
            "points": null,
            "average": null,
            "correct": [],
            "host": false,
            "bonus": true,
        }));
        assert!(!q.is_multiple_choice());
        assert!(!q.is_effectively_closed());
        assert!(q.bonus);
        assert_eq!(q.max_answers, 3);
        assert_eq!(q.answers.get("Ada"), Some(0.0));
    }

    #[test]
    fn accepts_misspelled_bonus() {
        let q = question(json!({ "id": 1, "order_number": 1, "bonnus": true }));
        assert!(q.bonus);
        assert_eq!(q.max_answers, 1);
    }

    #[test]
    fn values_select_multiple_choice() {
        let q = question(json!({ "id": 1, "order_number": 1, "values": ["A", "B"] }));
        assert!(q.is_multiple_choice());
    }

    #[test]
    fn grading_closes_question() {
        let q = question(json!({ "id": 1, "order_number": 1, "closed": false, "correct": ["A"] }));
        assert!(q.is_graded());
        assert!(q.is_effectively_closed());
        assert!(q.is_correct("A"));
        assert!(!q.is_correct("B"));

        let q = question(json!({ "id": 1, "order_number": 1, "closed": true }));
        assert!(!q.is_graded());
        assert!(q.is_effectively_closed());
    }

    #[test]
    fn sums_section_points() {
        let quiz: Quiz = serde_json::from_value(json!({
            "id": 1,
            "name": "Pub quiz",
            "sections": [
                { "id": 1, "name": "Music", "order_number": 1, "points": 3.5, "questions": [
                    { "id": 10, "order_number": 1 },
                ] },
                { "id": 2, "name": "Film", "order_number": 2, "points": null, "questions": [
                    { "id": 20, "order_number": 1 },
                ] },
                { "id": 3, "name": "Art", "order_number": 3, "points": 2 },
            ],
            "points": 0,
        }))
        .unwrap();
        assert_eq!(quiz.total_points(), 5.5);
        assert!(quiz.rankings.is_empty());
        assert_eq!(quiz.question(20).map(|q| q.order_number), Some(1));
        assert!(quiz.question(30).is_none());
    }
}
