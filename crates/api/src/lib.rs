mod client;
pub mod error;

pub use client::Client;
pub use model::{Question, Quiz};

use core::future::Future;
use error::Result;

/// Query parameters of the quiz poll.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuizQuery {
    /// Comma-joined ids of question bodies the client already holds.
    pub cached_content: String,
    /// Comma-joined ids of answer reveals the client already holds.
    pub cached_answers: String,
    /// Asks the server to answer even when nothing changed since the last poll.
    pub force: bool,
}

impl QuizQuery {
    pub fn to_query(&self) -> String {
        let mut query = format!("cached_content={}&cached_answers={}", self.cached_content, self.cached_answers);
        if self.force {
            query.push_str("&force=true");
        }
        query
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestionAction {
    Like,
    Open,
    Close,
    Clear,
}

impl QuestionAction {
    pub const fn path(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Open => "open",
            Self::Close => "close",
            Self::Clear => "clear",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionAction {
    Open,
    Close,
}

impl SectionAction {
    pub const fn path(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
        }
    }
}

/// Operations the quiz server exposes. Every question endpoint may answer
/// with a fresh snapshot of that question, or with nothing.
pub trait Backend {
    /// `GET /api/quiz/{id}/`. `None` means the quiz has not changed.
    fn quiz(&self, quiz: u64, query: &QuizQuery) -> impl Future<Output = Result<Option<Quiz>>>;

    /// `GET /api/questions/{id}`
    fn question(&self, question: u64) -> impl Future<Output = Result<Option<Question>>>;

    /// `POST /api/questions/{id}/{like,open,close,clear}`
    fn question_action(
        &self,
        question: u64,
        action: QuestionAction,
    ) -> impl Future<Output = Result<Option<Question>>>;

    /// `POST /api/questions/{id}/answer`
    fn answer(&self, question: u64, value: &str) -> impl Future<Output = Result<Option<Question>>>;

    /// `POST /api/sections/{id}/{open,close}`
    fn section_action(&self, section: u64, action: SectionAction) -> impl Future<Output = Result<()>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_query_carries_cache_and_force() {
        let query = QuizQuery { cached_content: "1,2".into(), cached_answers: "".into(), force: false };
        assert_eq!(query.to_query(), "cached_content=1,2&cached_answers=");

        let query = QuizQuery { force: true, ..query };
        assert_eq!(query.to_query(), "cached_content=1,2&cached_answers=&force=true");
    }

    #[test]
    fn action_paths() {
        assert_eq!(QuestionAction::Like.path(), "like");
        assert_eq!(QuestionAction::Clear.path(), "clear");
        assert_eq!(SectionAction::Close.path(), "close");
    }
}
