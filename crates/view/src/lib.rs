#![cfg_attr(not(test), no_std)]
extern crate alloc;

mod cache;
mod node;
mod question;
mod quiz;
mod section;

pub use cache::RenderCache;
pub use node::{Action, Element, Event, Node};
pub use question::{question_anchor, render_question};
pub use quiz::render_quiz;
pub use section::{render_section, section_anchor};

use alloc::collections::BTreeSet;

/// Entities whose controls are locked while an action is in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Target {
    Question(u64),
    Section(u64),
}

/// Everything besides the snapshot itself that the renderers read.
pub struct ViewState<'a> {
    pub cache: &'a RenderCache,
    pub pending: &'a BTreeSet<Target>,
    pub auto_refresh: bool,
    /// Consecutive failed fetches. Anything above zero means the markup is stale.
    pub failures: u32,
}

impl ViewState<'_> {
    pub fn is_pending(&self, target: Target) -> bool {
        self.pending.contains(&target)
    }
}

#[cfg(test)]
pub(crate) mod fixture {
    use super::{RenderCache, Target};
    use alloc::collections::BTreeSet;
    use model::{Question, Quiz};

    pub fn question(value: serde_json::Value) -> Question {
        serde_json::from_value(value).unwrap()
    }

    /// Parses raw JSON so that object keys keep their source order.
    pub fn question_str(text: &str) -> Question {
        serde_json::from_str(text).unwrap()
    }

    pub fn quiz(value: serde_json::Value) -> Quiz {
        serde_json::from_value(value).unwrap()
    }

    pub struct Env {
        pub cache: RenderCache,
        pub pending: BTreeSet<Target>,
    }

    impl Env {
        pub fn new() -> Self {
            Self { cache: RenderCache::default(), pending: BTreeSet::new() }
        }

        pub fn view(&self) -> super::ViewState<'_> {
            super::ViewState { cache: &self.cache, pending: &self.pending, auto_refresh: true, failures: 0 }
        }
    }
}
