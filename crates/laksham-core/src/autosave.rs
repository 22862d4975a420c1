//! Autosave coordination: decouples "the candidate typed something" from
//! "the server has it".
//!
//! The coordinator tracks which drafts have unsaved edits and pushes them to
//! the portal's per-answer endpoint. Single-answer flushes are best-effort
//! and never block the candidate; the full flush at submission time is the
//! one place a failure matters, and the session awaits it.

use std::collections::BTreeSet;

use chrono::Utc;
use tracing::{debug, warn};

use crate::answers::AnswerStore;
use crate::api::AttemptApi;
use crate::attempt::AnswerUpsert;
use crate::error::ApiError;
use crate::events::Event;

#[derive(Debug, Default)]
pub struct AutosaveCoordinator {
    /// Question ids mutated since their last successful flush.
    dirty: BTreeSet<i64>,
}

impl AutosaveCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observation hook: called for every answer-store mutation.
    pub fn note_mutation(&mut self, question_id: i64) {
        self.dirty.insert(question_id);
    }

    pub fn is_dirty(&self, question_id: i64) -> bool {
        self.dirty.contains(&question_id)
    }

    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    /// Best-effort flush of one draft. On failure the error is logged, the
    /// draft stays dirty for a later flush, and the candidate is not blocked.
    /// Returns `None` when there is no draft to send.
    pub async fn flush_one<A: AttemptApi>(
        &mut self,
        api: &A,
        attempt_id: i64,
        store: &AnswerStore,
        question_id: i64,
    ) -> Option<Event> {
        let draft = store.draft(question_id)?;
        let req = AnswerUpsert::from_draft(question_id, draft);
        match api.upsert_answer(attempt_id, &req).await {
            Ok(()) => {
                self.dirty.remove(&question_id);
                debug!(attempt_id, question_id, "answer autosaved");
                Some(Event::AnswerSaved {
                    question_id,
                    at: Utc::now(),
                })
            }
            Err(err) => {
                warn!(attempt_id, question_id, error = %err, "autosave failed; draft retained");
                Some(Event::AutosaveFailed {
                    question_id,
                    message: err.to_string(),
                    at: Utc::now(),
                })
            }
        }
    }

    /// Flush every answered draft, sequentially, in assessment question
    /// order - not mutation order - so retried submissions are reproducible.
    /// Blank drafts are skipped. The first failure aborts and is fatal to
    /// the submission attempt that requested the flush; everything already
    /// sent is safe to repeat because the endpoint upserts.
    pub async fn flush_all<A: AttemptApi>(
        &mut self,
        api: &A,
        attempt_id: i64,
        question_order: &[i64],
        store: &AnswerStore,
    ) -> Result<usize, ApiError> {
        let mut flushed = 0;
        for &question_id in question_order {
            if !store.is_answered(question_id) {
                continue;
            }
            let Some(draft) = store.draft(question_id) else {
                continue;
            };
            let req = AnswerUpsert::from_draft(question_id, draft);
            api.upsert_answer(attempt_id, &req).await?;
            self.dirty.remove(&question_id);
            flushed += 1;
        }
        debug!(attempt_id, flushed, "flushed all answered drafts");
        Ok(flushed)
    }
}
