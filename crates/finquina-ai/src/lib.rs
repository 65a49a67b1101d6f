//! Inference layer for La Finquina.
//!
//! Wraps the Gemini `generateContent` API behind a resilient client that
//! fails over across API keys and models, and exposes the agronomic
//! questions the service asks: photo and note analysis, daily advice,
//! bed rotation, and plant-name translation.
//!
//! # Modules
//!
//! - [`config`] -- Keys, models and endpoint from the environment
//! - [`gemini`] -- One (key, model) handle and the HTTP call
//! - [`resilience`] -- Candidate list, failure classification, failover
//! - [`prompt`] -- Embedded `minijinja` templates and prompt contexts
//! - [`parse`] -- Lenient JSON extraction from model text
//! - [`analysis`] -- Structured answers and their journal formatting
//! - [`advisor`] -- The operations the action layer calls
//! - [`error`] -- [`AiError`]

pub mod advisor;
pub mod analysis;
pub mod config;
pub mod error;
pub mod gemini;
pub mod parse;
pub mod prompt;
pub mod resilience;

// Re-export primary types at crate root.
pub use advisor::{Advisor, DailyContext, ImageSource, RotationRequest};
pub use analysis::{ANALYSIS_FAILED, CropAnalysis, RotationAdvice, journal_error_summary};
pub use config::AiConfig;
pub use error::AiError;
pub use gemini::{ModelHandle, Part};
pub use prompt::{CropContext, FarmProfile, PromptEngine};
pub use resilience::{Candidate, FailureKind, ResilientClient, RetryPolicy, classify_by_status};
