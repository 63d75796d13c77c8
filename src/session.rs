use std::collections::BTreeSet;

use log::{debug, info, warn};
use rand::{rngs::StdRng, SeedableRng};

use crate::error::QuizError;
use crate::provider::{QuestionProvider, RawQuestion};
use crate::question::{build_questions, Question};

pub const DEFAULT_AMOUNT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Loading,
    Ready,
    Failed,
}

/// Identifies one load request. Only the ticket from the most recent
/// `begin_load` is accepted by `complete_load`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub score: usize,
    pub total: usize,
}

/// One attempt at a quiz, from load to submit.
#[derive(Debug)]
pub struct QuizSession {
    amount: usize,
    state: SessionState,
    questions: Vec<Question>,
    current_index: usize,
    marked_for_review: BTreeSet<usize>,
    generation: u64,
    failure: Option<QuizError>,
    rng: StdRng,
}

impl QuizSession {
    pub fn new(amount: usize) -> Self {
        Self::with_rng(amount, StdRng::from_entropy())
    }

    pub fn with_rng(amount: usize, rng: StdRng) -> Self {
        Self {
            amount,
            state: SessionState::Empty,
            questions: Vec::new(),
            current_index: 0,
            marked_for_review: BTreeSet::new(),
            generation: 0,
            failure: None,
            rng,
        }
    }

    /// Fetch from `provider` and populate the session.
    pub async fn load<P: QuestionProvider>(&mut self, provider: &P) -> SessionState {
        let ticket = self.begin_load();
        let result = provider.fetch(self.amount).await;
        self.complete_load(ticket, result);
        self.state
    }

    /// Enter `Loading` and hand out the ticket the eventual result must carry.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.clear();
        self.state = SessionState::Loading;
        debug!("load {} started for {} questions", self.generation, self.amount);
        LoadTicket(self.generation)
    }

    /// Apply a fetch result. Returns false when the ticket was superseded
    /// by a later load, in which case the result is dropped.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<RawQuestion>, QuizError>,
    ) -> bool {
        if ticket.0 != self.generation || self.state != SessionState::Loading {
            debug!(
                "discarding stale load {} (current {})",
                ticket.0, self.generation
            );
            return false;
        }

        match result.and_then(|raw| build_questions(raw, &mut self.rng)) {
            Ok(questions) => {
                info!("loaded {} questions", questions.len());
                self.questions = questions;
                self.current_index = 0;
                self.marked_for_review.clear();
                self.state = SessionState::Ready;
            }
            Err(err) => {
                warn!("failed to load questions: {err}");
                self.clear();
                self.failure = Some(err);
                self.state = SessionState::Failed;
            }
        }
        true
    }

    /// Throw away the current attempt and start a fresh load.
    pub fn restart(&mut self) -> LoadTicket {
        self.begin_load()
    }

    pub fn select_answer(&mut self, option: &str) {
        if !self.is_ready() {
            return;
        }
        let question = &mut self.questions[self.current_index];
        if question.options.iter().any(|o| o == option) {
            question.selected_option = Some(option.to_string());
        }
    }

    /// Select the option at `index` in the current question's display order.
    pub fn select_option_at(&mut self, index: usize) {
        let option = self
            .current_question()
            .and_then(|q| q.options.get(index))
            .cloned();
        if let Some(option) = option {
            self.select_answer(&option);
        }
    }

    pub fn next(&mut self) {
        if self.has_next() {
            self.current_index += 1;
        }
    }

    pub fn previous(&mut self) {
        if self.has_previous() {
            self.current_index -= 1;
        }
    }

    pub fn toggle_review(&mut self) {
        if !self.is_ready() {
            return;
        }
        if !self.marked_for_review.remove(&self.current_index) {
            self.marked_for_review.insert(self.current_index);
        }
    }

    /// Score the attempt. Review marks have no effect; unanswered counts as wrong.
    pub fn submit(&self) -> Option<Score> {
        if !self.is_ready() {
            return None;
        }
        Some(Score {
            score: self.questions.iter().filter(|q| q.is_correct()).count(),
            total: self.questions.len(),
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == SessionState::Ready && !self.questions.is_empty()
    }

    pub fn amount(&self) -> usize {
        self.amount
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        if self.is_ready() {
            self.questions.get(self.current_index)
        } else {
            None
        }
    }

    pub fn has_next(&self) -> bool {
        self.is_ready() && self.current_index + 1 < self.questions.len()
    }

    pub fn has_previous(&self) -> bool {
        self.is_ready() && self.current_index > 0
    }

    pub fn is_marked(&self, index: usize) -> bool {
        self.marked_for_review.contains(&index)
    }

    pub fn is_current_marked(&self) -> bool {
        self.is_ready() && self.is_marked(self.current_index)
    }

    pub fn marked_count(&self) -> usize {
        self.marked_for_review.len()
    }

    pub fn answered_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_answered()).count()
    }

    /// Fraction of the quiz reached, counting the current question.
    pub fn progress(&self) -> f64 {
        if self.is_ready() {
            (self.current_index + 1) as f64 / self.questions.len() as f64
        } else {
            0.0
        }
    }

    pub fn failure(&self) -> Option<&QuizError> {
        self.failure.as_ref()
    }

    fn clear(&mut self) {
        self.questions.clear();
        self.current_index = 0;
        self.marked_for_review.clear();
        self.failure = None;
    }
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new(DEFAULT_AMOUNT)
    }
}
