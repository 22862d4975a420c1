use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every observable state change in an attempt session produces an Event.
/// The presentation layer renders them; tests assert on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    AttemptStarted {
        attempt_id: i64,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    /// One second elapsed; `remaining_secs` counts down to zero.
    Tick {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Terminal clock event. Emitted exactly once; no tick follows it.
    Expired {
        at: DateTime<Utc>,
    },
    /// A single draft reached the server.
    AnswerSaved {
        question_id: i64,
        at: DateTime<Utc>,
    },
    /// Non-fatal: the draft stays local and eligible for a later flush.
    AutosaveFailed {
        question_id: i64,
        message: String,
        at: DateTime<Utc>,
    },
    SubmissionStarted {
        trigger: SubmitTrigger,
        at: DateTime<Utc>,
    },
    /// Fatal to this submission attempt only; the session stays in
    /// `Submitting` and the same flush-then-complete sequence can be retried.
    SubmissionFailed {
        message: String,
        at: DateTime<Utc>,
    },
    AttemptCompleted {
        attempt_id: i64,
        at: DateTime<Utc>,
    },
}

/// What drove the `InProgress -> Submitting` edge. The machine treats both
/// identically past that point; only the presentation layer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitTrigger {
    Candidate,
    TimerExpired,
}
