//! Error types for the action layer.
//!
//! Database failures never reach callers: reads degrade to neutral
//! values and writes report that nothing was stored. What remains are
//! input errors the caller can fix, upload failures, and problems while
//! assembling the [`Farm`](crate::Farm) at start-up.

use finquina_ai::AiError;
use finquina_integrations::IntegrationError;
use validator::ValidationErrors;

use crate::config::ConfigError;

/// Errors returned by farm actions.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// The request payload is invalid.
    #[error("{0}")]
    Invalid(String),

    /// The blob store rejected an upload or delete.
    #[error("storage error: {0}")]
    Storage(#[from] IntegrationError),
}

impl ActionError {
    /// Build an [`ActionError::Invalid`] from validator output, keeping
    /// the first human-readable message.
    pub fn from_validation(errors: &ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .find_map(|e| e.message.as_ref().map(ToString::to_string))
            .unwrap_or_else(|| errors.to_string());
        Self::Invalid(message)
    }
}

/// Errors raised while assembling the farm context.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// The farm configuration file is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Inference settings are invalid.
    #[error("inference setup failed: {0}")]
    Ai(#[from] AiError),

    /// The blob store could not be opened.
    #[error("blob store setup failed: {0}")]
    Storage(#[from] IntegrationError),
}

#[cfg(test)]
mod tests {
    use finquina_types::NewExpense;
    use validator::Validate;

    use super::*;

    #[test]
    fn validation_message_is_kept() {
        let Err(errors) = NewExpense::default().validate() else {
            return;
        };
        let err = ActionError::from_validation(&errors);
        assert_eq!(err.to_string(), "Item y cantidad son requeridos");
    }
}
