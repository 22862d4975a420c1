//! # Laksham Core Library
//!
//! Core engine for the Laksham assessment portal's candidate flow: one
//! candidate's timed run through one assessment, from intake through
//! countdown, question navigation, answer capture, autosave, and submission
//! (including forced submission on timeout).
//!
//! All durable state lives behind the portal's REST API; this crate owns
//! only the in-memory session for the duration of one attempt. The CLI
//! binary is a thin presentation layer over this library.
//!
//! ## Architecture
//!
//! - **Session machine**: a guarded state machine over
//!   `Intake -> InProgress -> Submitting -> Completed`; manual submission
//!   and timer expiry race in normal operation and converge on one edge
//! - **Clock**: caller-driven one-second countdown, no internal threads -
//!   the driver invokes `tick()` periodically
//! - **Autosave**: opportunistic per-answer persistence, decoupled from the
//!   submission path's ordered flush
//!
//! ## Key Components
//!
//! - [`AttemptSession`]: orchestrating state machine
//! - [`Countdown`]: restartable countdown clock
//! - [`AnswerStore`]: typed per-question drafts
//! - [`Navigator`]: bounded question cursor
//! - [`AutosaveCoordinator`]: dirty tracking and flushes
//! - [`PortalClient`]: reqwest implementation of the portal API
//! - [`Config`]: application configuration management

pub mod answers;
pub mod api;
pub mod assessment;
pub mod attempt;
pub mod autosave;
pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod navigator;
pub mod session;


pub use answers::{AnswerDraft, AnswerStore};
pub use api::{AttemptApi, PortalClient};
pub use assessment::{Assessment, AssessmentQuestion, Question};
pub use attempt::{AnswerUpsert, Attempt, AttemptCreate, AttemptResult, AttemptStatus};
pub use autosave::AutosaveCoordinator;
pub use clock::{ClockPhase, Countdown};
pub use config::{ApiConfig, CandidateConfig, Config};
pub use error::{ApiError, ConfigError, CoreError, IntakeError, ValidationError};
pub use events::{Event, SubmitTrigger};
pub use navigator::Navigator;
pub use session::{AttemptSession, SessionPhase, SessionSnapshot};
