mod command;
mod config;
mod ledger;
mod sync;

pub use command::{Command, ParseError};
pub use config::Config;
pub use sync::ViewSync;

use api::Backend;
use tokio::{
    sync::mpsc,
    time::{self, Instant},
};
use view::Node;

/// Drives the view-sync loop: one forced refresh, then repeating polls on the
/// timer interleaved with user commands. Every new revision of the document
/// is handed to `publish`. Runs until polling is paused and the command
/// channel has closed.
pub async fn run<B, F>(mut sync: ViewSync<B>, mut commands: mpsc::Receiver<Command>, mut publish: F)
where
    B: Backend,
    F: FnMut(&Node),
{
    let mut seen = sync.revision();
    sync.refresh(false).await;

    let timer = time::sleep(sync.next_delay());
    tokio::pin!(timer);
    let mut armed = sync.auto_refresh();
    let mut listening = true;

    loop {
        if sync.revision() != seen {
            seen = sync.revision();
            if let Some(document) = sync.document() {
                publish(document);
            }
        }

        if !armed && !listening {
            break;
        }

        tokio::select! {
            biased;
            maybe = commands.recv(), if listening => {
                let Some(command) = maybe else {
                    log::debug!("command channel closed");
                    listening = false;
                    continue;
                };
                if sync.execute(command).await {
                    armed = true;
                    timer.as_mut().reset(Instant::now());
                }
            }
            _ = &mut timer, if armed => {
                armed = sync.refresh(true).await;
                if armed {
                    timer.as_mut().reset(Instant::now() + sync.next_delay());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{run, Command, ViewSync};
    use api::{error::Result, Backend, QuestionAction, QuizQuery, SectionAction};
    use model::{Question, Quiz};
    use std::{cell::Cell, time::Duration};
    use tokio::sync::mpsc;
    use view::Action;

    /// Serves the same quiz, counting how often it was polled.
    struct Counter {
        polls: Cell<u32>,
    }

    impl Backend for Counter {
        async fn quiz(&self, _: u64, _: &QuizQuery) -> Result<Option<Quiz>> {
            self.polls.set(self.polls.get() + 1);
            let quiz = serde_json::json!({ "id": 1, "name": format!("poll {}", self.polls.get()) });
            Ok(Some(serde_json::from_value(quiz).unwrap()))
        }

        async fn question(&self, _: u64) -> Result<Option<Question>> {
            Ok(None)
        }

        async fn question_action(&self, _: u64, _: QuestionAction) -> Result<Option<Question>> {
            Ok(None)
        }

        async fn answer(&self, _: u64, _: &str) -> Result<Option<Question>> {
            Ok(None)
        }

        async fn section_action(&self, _: u64, _: SectionAction) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn polls_until_paused_and_closed() {
        let sync = ViewSync::new(Counter { polls: Cell::new(0) }, 1, Duration::from_millis(2000));
        let (tx, rx) = mpsc::channel(4);
        let mut published = Vec::new();

        let driver = async {
            tokio::time::sleep(Duration::from_millis(5000)).await;
            tx.send(Command::Dispatch(Action::ToggleAutoRefresh, Vec::new())).await.unwrap();
            drop(tx);
        };
        let looper = run(sync, rx, |document| published.push(document.to_string()));
        tokio::join!(driver, looper);

        // The forced refresh plus the polls at 2 s and 4 s, then the pause.
        assert_eq!(published.len(), 4);
        assert!(published[0].contains("poll 1"));
        assert!(published[2].contains("poll 3"));
        assert!(published[3].contains("glyphicon-play"));
    }
}
