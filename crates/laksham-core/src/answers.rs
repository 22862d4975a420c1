//! In-memory answer drafts for one attempt.
//!
//! The original portal kept answers in a string-keyed bag with a
//! convention-suffixed key for explanations; here each question id maps to
//! one typed draft carrying both fields, so the two can never collide.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One candidate answer, mutable for the lifetime of the attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerDraft {
    pub answer_text: String,
    /// Only meaningful for questions that carry a programming language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Drafts for one attempt, keyed by question id. At most one draft exists
/// per question; iteration order is stable.
///
/// The store performs no I/O. Whoever mutates it is responsible for
/// reporting the touched question id to the autosave coordinator.
#[derive(Debug, Default)]
pub struct AnswerStore {
    drafts: BTreeMap<i64, AnswerDraft>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace (or create) the draft text for `question_id`. No validation:
    /// an empty string is stored as-is and simply reads as unanswered.
    pub fn set_answer(&mut self, question_id: i64, text: impl Into<String>) {
        self.drafts.entry(question_id).or_default().answer_text = text.into();
    }

    /// Set the auxiliary explanation. Independent of the answer text; setting
    /// one never clobbers the other.
    pub fn set_explanation(&mut self, question_id: i64, text: impl Into<String>) {
        self.drafts.entry(question_id).or_default().explanation = Some(text.into());
    }

    pub fn answer(&self, question_id: i64) -> Option<&str> {
        self.drafts
            .get(&question_id)
            .map(|d| d.answer_text.as_str())
    }

    pub fn draft(&self, question_id: i64) -> Option<&AnswerDraft> {
        self.drafts.get(&question_id)
    }

    /// True iff a draft exists and its trimmed text is non-empty. "Saved but
    /// blank" counts as unanswered; the progress indicator relies on this.
    pub fn is_answered(&self, question_id: i64) -> bool {
        self.drafts
            .get(&question_id)
            .is_some_and(|d| !d.answer_text.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }
}
