use alloc::{string::String, vec::Vec};
use core::fmt::{self, Formatter};
use serde::{
    de::{MapAccess, Visitor},
    Deserialize, Deserializer,
};

/// Answers submitted by the viewer, keyed by answer text. The server reports
/// either the awarded vote count or `false` while the question is ungraded.
/// Entries keep the order in which the server listed them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Answers(Vec<(String, f64)>);

impl Answers {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, answer: &str) -> Option<f64> {
        self.0.iter().find(|(text, _)| text == answer).map(|&(_, count)| count)
    }

    pub fn contains(&self, answer: &str) -> bool {
        self.get(answer).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(text, _)| text.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(text, count)| (text.as_str(), *count))
    }

    fn insert(&mut self, answer: String, count: f64) {
        match self.0.iter_mut().find(|(text, _)| *text == answer) {
            Some(entry) => entry.1 = count,
            None => self.0.push((answer, count)),
        }
    }
}

/// Vote count of a single answer. Booleans and nulls collapse into numbers.
struct Count(f64);

struct CountVisitor;

impl<'de> Visitor<'de> for CountVisitor {
    type Value = Count;

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str("a vote count or a boolean")
    }

    fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
        Ok(Count(if value { 1.0 } else { 0.0 }))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
        Ok(Count(value as f64))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
        Ok(Count(value as f64))
    }

    fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
        Ok(Count(value))
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(Count(0.0))
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(Count(0.0))
    }
}

impl<'de> Deserialize<'de> for Count {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(CountVisitor)
    }
}

struct AnswersVisitor;

impl<'de> Visitor<'de> for AnswersVisitor {
    type Value = Answers;

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str("a map of answers to vote counts")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut answers = Answers::default();
        while let Some((text, Count(count))) = map.next_entry::<String, Count>()? {
            answers.insert(text, count);
        }
        Ok(answers)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(Answers::default())
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(Answers::default())
    }
}

impl<'de> Deserialize<'de> for Answers {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AnswersVisitor)
    }
}
