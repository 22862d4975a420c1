//! Attempt records and the request/response payloads exchanged with the
//! portal API. The attempt id is assigned server-side on creation; the
//! server remains the source of truth for attempts abandoned mid-flight.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::answers::AnswerDraft;

/// Lifecycle status of an attempt as the portal reports it.
///
/// The client only ever writes `in_progress`, `submitting`, and `completed`;
/// `expired` is applied server-side to attempts that outlived their duration
/// without a submission trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    NotStarted,
    InProgress,
    Submitting,
    Completed,
    Expired,
}

impl AttemptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptStatus::NotStarted => "not_started",
            AttemptStatus::InProgress => "in_progress",
            AttemptStatus::Submitting => "submitting",
            AttemptStatus::Completed => "completed",
            AttemptStatus::Expired => "expired",
        }
    }
}

impl std::fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One candidate's run through one assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attempt {
    pub id: i64,
    pub assessment_id: i64,
    pub candidate_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_name: Option<String>,
    pub started_at: DateTime<Utc>,
    pub status: AttemptStatus,
    pub max_score: u32,
}

/// Body of the attempt-creation call.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptCreate {
    pub candidate_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_name: Option<String>,
}

/// Body of the per-answer upsert call. Upsert semantics: repeating the same
/// payload is safe, which is what makes submission retries reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerUpsert {
    pub question_id: i64,
    pub answer_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl AnswerUpsert {
    /// Build the wire payload for one draft. A blank explanation is omitted
    /// rather than sent as an empty field.
    pub fn from_draft(question_id: i64, draft: &AnswerDraft) -> Self {
        Self {
            question_id,
            answer_text: draft.answer_text.clone(),
            explanation: draft
                .explanation
                .as_ref()
                .filter(|e| !e.trim().is_empty())
                .cloned(),
        }
    }
}

/// Post-completion view of an attempt, including the score once grading ran.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptResult {
    pub id: i64,
    pub assessment_id: i64,
    pub candidate_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_name: Option<String>,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_score: Option<f64>,
    pub max_score: u32,
    pub status: AttemptStatus,
}

impl AttemptResult {
    /// Score as a rounded percentage, once grading has produced one.
    pub fn percentage(&self) -> Option<u32> {
        let max = f64::from(self.max_score.max(1));
        self.total_score
            .map(|score| ((score / max) * 100.0).round() as u32)
    }
}
