//! External portal API.
//!
//! The portal is a black-box REST service; this module defines the five
//! operations the session core requires of it and the reqwest-backed
//! production client. Everything durable lives behind these calls - the
//! core's only persistence is in-memory for the lifetime of one attempt.

mod client;

#[cfg(test)]
mod client_tests;

pub use client::PortalClient;

use crate::assessment::Assessment;
use crate::attempt::{AnswerUpsert, Attempt, AttemptCreate, AttemptResult};
use crate::error::ApiError;

/// The contract the session core requires of the portal API.
///
/// `PortalClient` is the production implementation; session tests substitute
/// an in-memory double. Every call is a suspension point - the caller's
/// event loop keeps running (and the clock keeps ticking) while a call is in
/// flight.
#[allow(async_fn_in_trait)]
pub trait AttemptApi {
    /// Fetch an assessment, with its ordered question list, by share token.
    async fn fetch_shared_assessment(&self, share_token: &str) -> Result<Assessment, ApiError>;

    /// Create an attempt for the assessment. The server assigns the id.
    async fn create_attempt(
        &self,
        assessment_id: i64,
        req: &AttemptCreate,
    ) -> Result<Attempt, ApiError>;

    /// Upsert one answer. Idempotent: repeating a payload is safe.
    async fn upsert_answer(&self, attempt_id: i64, req: &AnswerUpsert) -> Result<(), ApiError>;

    /// Mark the attempt complete. Grading reads answers at this point, so
    /// every flush must have finished before this is called.
    async fn complete_attempt(&self, attempt_id: i64) -> Result<(), ApiError>;

    /// Fetch the post-completion result for an attempt.
    async fn fetch_attempt(&self, attempt_id: i64) -> Result<AttemptResult, ApiError>;
}
