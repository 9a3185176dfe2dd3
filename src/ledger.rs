use model::{Question, Quiz};
use std::collections::BTreeMap;

/// Issue order of a request. Later requests carry larger tickets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Correlates responses with the order in which their requests were issued,
/// so that a late response never overwrites a newer render.
#[derive(Debug, Default)]
pub struct Ledger {
    issued: u64,
    /// Ticket of the newest quiz snapshot applied.
    quiz: u64,
    /// Question snapshots applied on top of the newest quiz snapshot.
    patches: BTreeMap<u64, (u64, Question)>,
}

impl Ledger {
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// Accepts a question snapshot unless something newer already covers it.
    pub fn accept_question(&mut self, Ticket(ticket): Ticket, question: &Question) -> bool {
        if ticket <= self.quiz {
            return false;
        }
        if let Some(&(applied, _)) = self.patches.get(&question.id) {
            if ticket <= applied {
                return false;
            }
        }
        self.patches.insert(question.id, (ticket, question.clone()));
        true
    }

    /// Accepts a quiz snapshot unless a newer one was already applied. Question
    /// snapshots issued after this quiz request are spliced back into it.
    pub fn accept_quiz(&mut self, Ticket(ticket): Ticket, quiz: &mut Quiz) -> bool {
        if ticket <= self.quiz {
            return false;
        }
        self.quiz = ticket;
        self.patches.retain(|_, (applied, _)| *applied > ticket);
        for (id, (_, question)) in &self.patches {
            if let Some(slot) = quiz.question_mut(*id) {
                *slot = question.clone();
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::Ledger;
    use model::{Question, Quiz};
    use serde_json::json;

    fn question(id: u64, likes: u64) -> Question {
        serde_json::from_value(json!({ "id": id, "order_number": 1, "likes": likes })).unwrap()
    }

    fn quiz(likes: u64) -> Quiz {
        serde_json::from_value(json!({
            "id": 1, "name": "q",
            "sections": [{ "id": 1, "name": "s", "order_number": 1, "questions": [
                { "id": 5, "order_number": 1, "likes": likes },
            ] }],
        }))
        .unwrap()
    }

    #[test]
    fn tickets_increase() {
        let mut ledger = Ledger::default();
        let first = ledger.issue();
        let second = ledger.issue();
        assert!(first < second);
    }

    #[test]
    fn older_quiz_snapshot_is_discarded() {
        let mut ledger = Ledger::default();
        let old = ledger.issue();
        let new = ledger.issue();
        assert!(ledger.accept_quiz(new, &mut quiz(1)));
        assert!(!ledger.accept_quiz(old, &mut quiz(0)));
    }

    #[test]
    fn older_question_snapshot_is_discarded() {
        let mut ledger = Ledger::default();
        let old = ledger.issue();
        let new = ledger.issue();
        assert!(ledger.accept_question(new, &question(5, 2)));
        assert!(!ledger.accept_question(old, &question(5, 1)));
        assert!(ledger.accept_question(old, &question(6, 1)));
    }

    #[test]
    fn question_older_than_quiz_is_discarded() {
        let mut ledger = Ledger::default();
        let patch = ledger.issue();
        let poll = ledger.issue();
        assert!(ledger.accept_quiz(poll, &mut quiz(3)));
        assert!(!ledger.accept_question(patch, &question(5, 9)));
    }

    #[test]
    fn late_quiz_keeps_newer_question() {
        let mut ledger = Ledger::default();
        let poll = ledger.issue();
        let patch = ledger.issue();
        assert!(ledger.accept_question(patch, &question(5, 4)));

        let mut snapshot = quiz(3);
        assert!(ledger.accept_quiz(poll, &mut snapshot));
        assert_eq!(snapshot.question(5).map(|q| q.likes), Some(4));

        // A poll issued after the patch supersedes it.
        let next = ledger.issue();
        let mut snapshot = quiz(7);
        assert!(ledger.accept_quiz(next, &mut snapshot));
        assert_eq!(snapshot.question(5).map(|q| q.likes), Some(7));
    }
}
