use crate::{
    ledger::{Ledger, Ticket},
    Command,
};
use api::{Backend, QuestionAction, QuizQuery, SectionAction};
use log::{debug, info, warn};
use model::{Question, Quiz};
use std::{collections::BTreeSet, time::Duration};
use view::{Action, Node, RenderCache, Target, ViewState};

/// Upper bound on the delay between polls while the server is unreachable.
const MAX_BACKOFF: Duration = Duration::from_secs(60);
/// Failures beyond this count no longer lengthen the delay.
const MAX_BACKOFF_STEPS: u32 = 5;

/// Keeps a rendered quiz document in sync with the server. The server owns
/// all quiz state: this only mirrors snapshots and caches large bodies.
pub struct ViewSync<B> {
    backend: B,
    quiz_id: u64,
    interval: Duration,
    cache: RenderCache,
    pending: BTreeSet<Target>,
    ledger: Ledger,
    snapshot: Option<Quiz>,
    document: Option<Node>,
    /// Bumped on every change to `document`.
    revision: u64,
    auto_refresh: bool,
    failures: u32,
}

impl<B: Backend> ViewSync<B> {
    pub fn new(backend: B, quiz_id: u64, interval: Duration) -> Self {
        Self {
            backend,
            quiz_id,
            interval,
            cache: RenderCache::default(),
            pending: BTreeSet::new(),
            ledger: Ledger::default(),
            snapshot: None,
            document: None,
            revision: 0,
            auto_refresh: true,
            failures: 0,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn document(&self) -> Option<&Node> {
        self.document.as_ref()
    }

    pub fn snapshot(&self) -> Option<&Quiz> {
        self.snapshot.as_ref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn auto_refresh(&self) -> bool {
        self.auto_refresh
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Delay before the next repeating poll, doubled for every consecutive
    /// failure.
    pub fn next_delay(&self) -> Duration {
        let factor = 1u32 << self.failures.min(MAX_BACKOFF_STEPS);
        self.interval.saturating_mul(factor).min(MAX_BACKOFF)
    }

    /// Polls the quiz. Manual calls (`repeating == false`) force the server to
    /// answer. Returns whether another repeating poll should be scheduled.
    pub async fn refresh(&mut self, repeating: bool) -> bool {
        if repeating && !self.auto_refresh {
            debug!("skipping poll while auto-refresh is paused");
            return false;
        }

        let query = QuizQuery {
            cached_content: self.cache.content_ids(),
            cached_answers: self.cache.answer_ids(),
            force: !repeating,
        };
        let ticket = self.ledger.issue();
        let stale = self.failures > 0;

        match self.backend.quiz(self.quiz_id, &query).await {
            Ok(Some(quiz)) => {
                self.failures = 0;
                self.accept_quiz(ticket, quiz);
            }
            Ok(None) => {
                debug!("quiz {} unchanged", self.quiz_id);
                self.failures = 0;
                // Manual refreshes follow actions whose controls were locked.
                if stale || !repeating {
                    self.redraw();
                }
            }
            Err(err) => {
                self.failures = self.failures.saturating_add(1);
                warn!("failed to fetch quiz {} ({} in a row): {err}", self.quiz_id, self.failures);
                self.redraw();
            }
        }

        repeating && self.auto_refresh
    }

    /// Returns `true` when polling has just resumed and must be re-armed now.
    pub fn set_auto_refresh(&mut self, enabled: bool) -> bool {
        if self.auto_refresh == enabled {
            return false;
        }
        info!("auto-refresh {}", if enabled { "resumed" } else { "paused" });
        self.auto_refresh = enabled;
        self.redraw();
        enabled
    }

    /// Runs a user command. Returns `true` when the poll timer must fire now.
    pub async fn execute(&mut self, command: Command) -> bool {
        match command {
            Command::Refresh => {
                self.refresh(false).await;
                false
            }
            Command::Pause => self.set_auto_refresh(false),
            Command::Resume => self.set_auto_refresh(true),
            Command::Dispatch(action, values) => self.dispatch(action, &values).await,
        }
    }

    /// Runs the action bound to a rendered control. `values` holds the
    /// contents of the question's inputs for [`Action::SetAnswer`].
    pub async fn dispatch(&mut self, action: Action, values: &[String]) -> bool {
        match action {
            Action::Like(id) => self.like(id).await,
            Action::OpenQuestion(id) => self.toggle_question(id, QuestionAction::Open).await,
            Action::CloseQuestion(id) => self.toggle_question(id, QuestionAction::Close).await,
            Action::OpenSection(id) => self.toggle_section(id, SectionAction::Open).await,
            Action::CloseSection(id) => self.toggle_section(id, SectionAction::Close).await,
            Action::SetAnswer(id) => self.set_answer(id, values).await,
            Action::RefreshQuestion(id) => self.refresh_question(id).await,
            Action::ToggleAutoRefresh => return self.set_auto_refresh(!self.auto_refresh),
        }
        false
    }

    pub async fn like(&mut self, id: u64) {
        self.lock(Target::Question(id));
        let ticket = self.ledger.issue();
        let result = self.backend.question_action(id, QuestionAction::Like).await;
        self.unlock(Target::Question(id));
        self.settle_question(ticket, id, result).await;
    }

    pub async fn refresh_question(&mut self, id: u64) {
        self.lock(Target::Question(id));
        let ticket = self.ledger.issue();
        let result = self.backend.question(id).await;
        self.unlock(Target::Question(id));
        self.settle_question(ticket, id, result).await;
    }

    async fn toggle_question(&mut self, id: u64, action: QuestionAction) {
        self.lock(Target::Question(id));
        if let Err(err) = self.backend.question_action(id, action).await {
            warn!("failed to {} question {id}: {err}", action.path());
        }
        self.unlock(Target::Question(id));
        self.refresh(false).await;
    }

    async fn toggle_section(&mut self, id: u64, action: SectionAction) {
        self.lock(Target::Section(id));
        if let Err(err) = self.backend.section_action(id, action).await {
            warn!("failed to {} section {id}: {err}", action.path());
        }
        self.unlock(Target::Section(id));
        self.refresh(false).await;
    }

    /// Replaces the viewer's answers: one `clear`, then one `answer` per
    /// non-empty value issued concurrently, then a forced refresh once every
    /// answer has settled.
    pub async fn set_answer(&mut self, id: u64, values: &[String]) {
        self.lock(Target::Question(id));
        if let Err(err) = self.backend.question_action(id, QuestionAction::Clear).await {
            warn!("failed to clear answers of question {id}: {err}");
        }

        let filled: Vec<_> = values.iter().filter(|value| !value.trim().is_empty()).collect();
        let tickets: Vec<_> = filled.iter().map(|_| self.ledger.issue()).collect();
        let backend = &self.backend;
        let results = futures_util::future::join_all(
            filled.iter().zip(tickets).map(|(value, ticket)| async move { (ticket, backend.answer(id, value).await) }),
        )
        .await;

        self.unlock(Target::Question(id));
        for (ticket, result) in results {
            match result {
                Ok(Some(question)) => {
                    self.accept_question(ticket, question);
                }
                Ok(None) => {}
                Err(err) => warn!("failed to submit an answer to question {id}: {err}"),
            }
        }
        self.refresh(false).await;
    }

    /// Patches the question when the server returned it, otherwise falls back
    /// to a full refresh.
    async fn settle_question(&mut self, ticket: Ticket, id: u64, result: api::error::Result<Option<Question>>) {
        match result {
            Ok(Some(question)) => {
                if !self.accept_question(ticket, question) {
                    self.redraw();
                }
            }
            Ok(None) => {
                self.refresh(false).await;
            }
            Err(err) => {
                warn!("request for question {id} failed: {err}");
                self.redraw();
            }
        }
    }

    fn lock(&mut self, target: Target) {
        self.pending.insert(target);
        self.redraw();
    }

    fn unlock(&mut self, target: Target) {
        self.pending.remove(&target);
    }

    fn accept_quiz(&mut self, ticket: Ticket, mut quiz: Quiz) {
        if !self.ledger.accept_quiz(ticket, &mut quiz) {
            debug!("discarding stale snapshot of quiz {}", quiz.id);
            return;
        }
        self.cache.absorb_quiz(&quiz);
        self.snapshot = Some(quiz);
        self.redraw();
    }

    /// Applies a question snapshot and re-renders only its fragment. Returns
    /// `false` when the document was left untouched.
    fn accept_question(&mut self, ticket: Ticket, question: Question) -> bool {
        if !self.ledger.accept_question(ticket, &question) {
            debug!("discarding stale snapshot of question {}", question.id);
            return false;
        }
        self.cache.absorb(&question);

        let id = question.id;
        let Some(slot) = self.snapshot.as_mut().and_then(|quiz| quiz.question_mut(id)) else {
            return false;
        };
        *slot = question;

        let Self { snapshot, document, cache, pending, auto_refresh, failures, revision, .. } = self;
        let (Some(quiz), Some(document)) = (snapshot.as_ref(), document.as_mut()) else {
            return false;
        };
        let Some(question) = quiz.question(id) else {
            return false;
        };
        let state = ViewState { cache, pending, auto_refresh: *auto_refresh, failures: *failures };
        let patched = document.replace(&view::question_anchor(id), view::render_question(question, &state));
        if patched {
            *revision += 1;
        }
        patched
    }

    fn redraw(&mut self) {
        let Some(quiz) = &self.snapshot else {
            return;
        };
        let state =
            ViewState { cache: &self.cache, pending: &self.pending, auto_refresh: self.auto_refresh, failures: self.failures };
        self.document = Some(view::render_quiz(quiz, &state));
        self.revision += 1;
    }
}
