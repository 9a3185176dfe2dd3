use anyhow::Context;
use std::{env, path::PathBuf, time::Duration};

/// Poll cadence when `POLL_INTERVAL_MS` is unset.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(2000);

pub struct Config {
    /// Authority of the quiz server, e.g. `127.0.0.1:5000`.
    pub server: String,
    pub quiz: u64,
    /// Value of the server's session cookie.
    pub session: Option<String>,
    pub interval: Duration,
    /// Where each rendered document is written.
    pub output: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server = lookup("QUIZ_SERVER").context("QUIZ_SERVER is not set")?;
        let quiz = lookup("QUIZ_ID").context("QUIZ_ID is not set")?.parse().context("QUIZ_ID is not a number")?;
        let session = lookup("QUIZ_SESSION").filter(|session| !session.is_empty());

        let interval = match lookup("POLL_INTERVAL_MS") {
            Some(ms) => Duration::from_millis(ms.parse().context("POLL_INTERVAL_MS is not a number")?),
            None => DEFAULT_INTERVAL,
        };
        anyhow::ensure!(!interval.is_zero(), "POLL_INTERVAL_MS must be positive");

        let output = lookup("OUTPUT").map_or_else(|| PathBuf::from("quiz.html"), PathBuf::from);
        Ok(Self { server, quiz, session, interval, output })
    }
}
