//! Error types for the inference layer.
//!
//! Every failure along the path (configuration, HTTP transport, model
//! status codes, prompt rendering, response parsing) surfaces as an
//! [`AiError`]. The resilient client inspects these to decide whether to
//! move on to the next candidate.

/// Errors that can occur while talking to the inference API.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// Configuration is invalid.
    #[error("config error: {0}")]
    Config(String),

    /// The request never produced a response (DNS, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The API answered with a non-success status.
    #[error("model {model} returned {status}: {body}")]
    Http {
        /// Model that was called.
        model: String,
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Response(String),

    /// The model's text could not be parsed into the requested structure.
    #[error("response parse error: {0}")]
    Parse(String),

    /// Failed to render a prompt template.
    #[error("template render error: {0}")]
    Template(String),

    /// The image to analyse could not be loaded.
    #[error("image error: {0}")]
    Image(String),

    /// No API key is configured.
    #[error("no hay proveedores de IA configurados")]
    NoProviders,

    /// Every (credential, model) candidate failed.
    #[error("todos los modelos y llaves de IA han fallado tras {attempts} intentos: {last}")]
    AllProvidersExhausted {
        /// Number of candidates tried.
        attempts: usize,
        /// The last error observed.
        last: Box<AiError>,
    },
}

impl AiError {
    /// HTTP status of the underlying failure, if any.
    ///
    /// Looks through [`AiError::AllProvidersExhausted`] to the last error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::AllProvidersExhausted { last, .. } => last.status(),
            _ => None,
        }
    }

    /// Whether the failure was a rate limit or exhausted free quota.
    pub fn is_quota(&self) -> bool {
        match self {
            Self::Http { status, body, .. } => {
                *status == 429 || body.to_lowercase().contains("quota")
            }
            Self::AllProvidersExhausted { last, .. } => last.is_quota(),
            _ => false,
        }
    }
}

impl From<minijinja::Error> for AiError {
    fn from(err: minijinja::Error) -> Self {
        Self::Template(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16, body: &str) -> AiError {
        AiError::Http {
            model: "gemini-1.5-flash".to_owned(),
            status,
            body: body.to_owned(),
        }
    }

    #[test]
    fn quota_detected_by_status_or_body() {
        assert!(http(429, "").is_quota());
        assert!(http(403, "Quota exceeded for project").is_quota());
        assert!(!http(500, "internal").is_quota());
        assert!(!AiError::NoProviders.is_quota());
    }

    #[test]
    fn exhausted_reports_last_error() {
        let err = AiError::AllProvidersExhausted {
            attempts: 4,
            last: Box::new(http(429, "")),
        };
        assert!(err.is_quota());
        assert_eq!(err.status(), Some(429));
        assert!(err.to_string().contains("4 intentos"));
    }
}
