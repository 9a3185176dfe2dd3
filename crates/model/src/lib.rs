#![cfg_attr(not(test), no_std)]
extern crate alloc;

pub mod answers;
pub mod quiz;

pub use answers::Answers;
pub use quiz::{Question, Quiz, Ranking, Section};
