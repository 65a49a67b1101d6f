//! Error types for the external service clients.

/// Errors raised by the weather, plant, and blob clients.
#[derive(Debug, thiserror::Error)]
pub enum IntegrationError {
    /// Configuration is invalid.
    #[error("config error: {0}")]
    Config(String),

    /// The request never produced a response.
    #[error("{service} request failed: {message}")]
    Transport {
        /// Which service was called.
        service: &'static str,
        /// Underlying error text.
        message: String,
    },

    /// The service answered with a non-success status.
    #[error("{service} returned {status}: {body}")]
    Http {
        /// Which service was called.
        service: &'static str,
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("{service} response parse failed: {message}")]
    Response {
        /// Which service was called.
        service: &'static str,
        /// Parse error text.
        message: String,
    },

    /// A blob URL does not belong to this store or names an unsafe path.
    #[error("invalid blob reference: {0}")]
    InvalidBlob(String),

    /// Filesystem error in the blob store.
    #[error("blob storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// Check a response status and decode its JSON body.
pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    service: &'static str,
    response: reqwest::Response,
) -> Result<T, IntegrationError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unable to read error body".to_owned());
        return Err(IntegrationError::Http {
            service,
            status: status.as_u16(),
            body,
        });
    }
    response
        .json()
        .await
        .map_err(|e| IntegrationError::Response {
            service,
            message: e.to_string(),
        })
}
