//! Attempt session state machine.
//!
//! Owns one candidate's run through one assessment: intake, countdown,
//! navigation, answer capture, autosave, and submission. The machine runs on
//! a single logical thread of control - clock ticks, candidate input, and
//! network completions interleave through its methods, never in parallel.
//!
//! ## State Transitions
//!
//! ```text
//! Intake -> InProgress -> Submitting -> Completed
//! ```
//!
//! Clock expiry and a candidate submit request both drive the same
//! `InProgress -> Submitting` edge. The two race in normal operation, so the
//! edge carries an explicit guard: whichever trigger arrives first wins, and
//! the second is a no-op. Once submitting, the machine never returns to an
//! editable state - a failed completion call leaves it in `Submitting` with
//! a retry path.

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::answers::{AnswerDraft, AnswerStore};
use crate::api::AttemptApi;
use crate::assessment::{Assessment, AssessmentQuestion};
use crate::attempt::{Attempt, AttemptCreate, AttemptStatus};
use crate::autosave::AutosaveCoordinator;
use crate::clock::Countdown;
use crate::error::{CoreError, IntakeError};
use crate::events::{Event, SubmitTrigger};
use crate::navigator::Navigator;

/// Client-side lifecycle phase of one attempt session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Intake,
    InProgress,
    Submitting,
    Completed,
}

/// Read model the presentation layer renders. Derived, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub attempt_id: Option<i64>,
    pub remaining_secs: u64,
    pub cursor: usize,
    pub question_count: usize,
    /// Answered flag per question position; drives the progress indicator.
    pub answered: Vec<bool>,
    pub last_submit_error: Option<String>,
}

/// One attempt session. Exclusive owner of the answer store, the cursor,
/// and the attempt status; the candidate is the only mutator.
pub struct AttemptSession<A: AttemptApi> {
    api: A,
    assessment: Assessment,
    attempt: Option<Attempt>,
    phase: SessionPhase,
    clock: Countdown,
    answers: AnswerStore,
    navigator: Navigator,
    autosave: AutosaveCoordinator,
    /// Question ids in assessment order, fixed at construction. Flush order
    /// derives from this, not from mutation time.
    question_order: Vec<i64>,
    last_submit_error: Option<String>,
    /// Correlates log lines across one session.
    session_id: Uuid,
}

impl<A: AttemptApi> AttemptSession<A> {
    /// Build a session for a fetched assessment. Validates the question
    /// ordering invariant and sorts questions into assessment order.
    pub fn new(api: A, mut assessment: Assessment) -> Result<Self, CoreError> {
        assessment.validate()?;
        assessment.sort_questions();
        let question_order = assessment.ordered_question_ids();
        let count = assessment.question_count();
        Ok(Self {
            api,
            assessment,
            attempt: None,
            phase: SessionPhase::Intake,
            clock: Countdown::new(),
            answers: AnswerStore::new(),
            navigator: Navigator::new(count),
            autosave: AutosaveCoordinator::new(),
            question_order,
            last_submit_error: None,
            session_id: Uuid::new_v4(),
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn assessment(&self) -> &Assessment {
        &self.assessment
    }

    pub fn attempt(&self) -> Option<&Attempt> {
        self.attempt.as_ref()
    }

    pub fn attempt_id(&self) -> Option<i64> {
        self.attempt.as_ref().map(|a| a.id)
    }

    pub fn current_question(&self) -> &AssessmentQuestion {
        &self.assessment.questions[self.navigator.cursor()]
    }

    pub fn cursor(&self) -> usize {
        self.navigator.cursor()
    }

    pub fn remaining_secs(&self) -> u64 {
        self.clock.remaining_secs()
    }

    pub fn draft_for_current(&self) -> Option<&AnswerDraft> {
        self.answers.draft(self.current_question().question_id)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            attempt_id: self.attempt_id(),
            remaining_secs: self.clock.remaining_secs(),
            cursor: self.navigator.cursor(),
            question_count: self.navigator.count(),
            answered: self
                .assessment
                .questions
                .iter()
                .map(|q| self.answers.is_answered(q.question_id))
                .collect(),
            last_submit_error: self.last_submit_error.clone(),
        }
    }

    // ── Intake -> InProgress ─────────────────────────────────────────

    /// Create the attempt and start the countdown.
    ///
    /// The email must be non-empty; it is checked before any network call,
    /// so a rejected intake leaves no server-side trace. Format validation
    /// is a presentation concern and is not enforced here.
    pub async fn start(&mut self, email: &str, name: Option<&str>) -> Result<Event, CoreError> {
        if self.phase != SessionPhase::Intake {
            return Err(IntakeError::AlreadyStarted.into());
        }
        let email = email.trim();
        if email.is_empty() {
            return Err(IntakeError::MissingEmail.into());
        }

        let req = AttemptCreate {
            candidate_email: email.to_string(),
            candidate_name: name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(String::from),
        };
        let attempt = self.api.create_attempt(self.assessment.id, &req).await?;
        let attempt_id = attempt.id;
        let total_secs = self.assessment.total_duration_secs();

        self.attempt = Some(attempt);
        self.phase = SessionPhase::InProgress;
        self.clock.start(total_secs);
        info!(session = %self.session_id, attempt_id, total_secs, "attempt started");

        Ok(Event::AttemptStarted {
            attempt_id,
            total_secs,
            at: Utc::now(),
        })
    }

    // ── InProgress self-loop ─────────────────────────────────────────

    /// Replace the draft for `question_id`. Ignored outside `InProgress`.
    pub fn set_answer(&mut self, question_id: i64, text: &str) {
        if self.phase != SessionPhase::InProgress {
            return;
        }
        self.answers.set_answer(question_id, text);
        self.autosave.note_mutation(question_id);
    }

    /// Set the explanation for `question_id`. Ignored outside `InProgress`.
    pub fn set_explanation(&mut self, question_id: i64, text: &str) {
        if self.phase != SessionPhase::InProgress {
            return;
        }
        self.answers.set_explanation(question_id, text);
        self.autosave.note_mutation(question_id);
    }

    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    /// Move the cursor, opportunistically flushing the question being left
    /// if it has unsaved edits. The flush is best-effort and never blocks
    /// navigation; out-of-range targets are ignored.
    pub async fn go_to(&mut self, index: usize) -> Vec<Event> {
        if self.phase != SessionPhase::InProgress {
            return Vec::new();
        }
        let leaving = self.current_question().question_id;
        if !self.navigator.go_to(index) {
            return Vec::new();
        }
        let mut events = Vec::new();
        if self.autosave.is_dirty(leaving) {
            if let Some(attempt_id) = self.attempt_id() {
                if let Some(event) = self
                    .autosave
                    .flush_one(&self.api, attempt_id, &self.answers, leaving)
                    .await
                {
                    events.push(event);
                }
            }
        }
        events
    }

    pub async fn next(&mut self) -> Vec<Event> {
        let target = self.navigator.cursor().saturating_add(1);
        self.go_to(target).await
    }

    pub async fn previous(&mut self) -> Vec<Event> {
        match self.navigator.cursor().checked_sub(1) {
            Some(target) => self.go_to(target).await,
            None => Vec::new(),
        }
    }

    /// Explicit save of the current question's draft. Best-effort: a failure
    /// surfaces as a non-fatal event and the draft stays eligible for a
    /// later flush.
    pub async fn save_current(&mut self) -> Vec<Event> {
        if self.phase != SessionPhase::InProgress {
            return Vec::new();
        }
        let question_id = self.current_question().question_id;
        let Some(attempt_id) = self.attempt_id() else {
            return Vec::new();
        };
        self.autosave
            .flush_one(&self.api, attempt_id, &self.answers, question_id)
            .await
            .into_iter()
            .collect()
    }

    // ── Clock and submission ─────────────────────────────────────────

    /// Advance the countdown by one second. The driver calls this once per
    /// second while the attempt is in progress; expiry forces the submission
    /// path exactly as a candidate submit request would.
    pub async fn tick(&mut self) -> Vec<Event> {
        if self.phase != SessionPhase::InProgress {
            return Vec::new();
        }
        let mut events = self.clock.tick();
        let expired = events.iter().any(|e| matches!(e, Event::Expired { .. }));
        if expired {
            events.extend(self.submit(SubmitTrigger::TimerExpired).await);
        }
        events
    }

    /// Candidate-initiated submission. The presentation layer gates this
    /// behind its confirmation step; the machine itself treats it exactly
    /// like timer expiry.
    pub async fn request_submit(&mut self) -> Vec<Event> {
        self.submit(SubmitTrigger::Candidate).await
    }

    /// Re-run the flush-then-complete sequence after a submission failure.
    /// Safe because flushes are upserts. No-op outside `Submitting`.
    pub async fn retry_submit(&mut self) -> Vec<Event> {
        if self.phase != SessionPhase::Submitting {
            return Vec::new();
        }
        self.run_submission().await
    }

    // The guarded edge. Whichever trigger arrives first drives the
    // transition; a second trigger while already submitting or completed is
    // a no-op. The guard is the phase check, not timing.
    async fn submit(&mut self, trigger: SubmitTrigger) -> Vec<Event> {
        if self.phase != SessionPhase::InProgress {
            return Vec::new();
        }
        self.phase = SessionPhase::Submitting;
        self.clock.stop();
        if let Some(attempt) = self.attempt.as_mut() {
            attempt.status = AttemptStatus::Submitting;
        }
        info!(session = %self.session_id, ?trigger, "submission started");

        let mut events = vec![Event::SubmissionStarted {
            trigger,
            at: Utc::now(),
        }];
        events.extend(self.run_submission().await);
        events
    }

    // Flush all answers, then request completion. Strictly ordered: grading
    // reads answers at completion time, so the flush must finish first.
    async fn run_submission(&mut self) -> Vec<Event> {
        let Some(attempt_id) = self.attempt_id() else {
            return Vec::new();
        };

        let flushed = self
            .autosave
            .flush_all(&self.api, attempt_id, &self.question_order, &self.answers)
            .await;
        let outcome = match flushed {
            Ok(_) => self.api.complete_attempt(attempt_id).await,
            Err(err) => Err(err),
        };

        match outcome {
            Ok(()) => {
                self.phase = SessionPhase::Completed;
                self.last_submit_error = None;
                if let Some(attempt) = self.attempt.as_mut() {
                    attempt.status = AttemptStatus::Completed;
                }
                info!(session = %self.session_id, attempt_id, "attempt completed");
                vec![Event::AttemptCompleted {
                    attempt_id,
                    at: Utc::now(),
                }]
            }
            Err(err) => {
                let message = err.to_string();
                self.last_submit_error = Some(message.clone());
                warn!(session = %self.session_id, attempt_id, error = %message,
                    "submission failed; attempt stays in submitting");
                vec![Event::SubmissionFailed {
                    message,
                    at: Utc::now(),
                }]
            }
        }
    }
}
