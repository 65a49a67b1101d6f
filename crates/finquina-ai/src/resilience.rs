//! Resilient execution across keys and models.
//!
//! Free-tier inference quotas are per key and per model, so a call that
//! hits a rate limit can usually succeed elsewhere. [`ResilientClient`]
//! walks an ordered candidate list (keys outer, models inner) and returns
//! the first success.
//!
//! ```text
//! key 1: flash -> flash-8b -> 2.0-flash-exp -> pro
//! key 2: flash -> flash-8b -> ...
//! key 3: ...
//! ```

use core::future::Future;

use crate::config::AiConfig;
use crate::error::AiError;
use crate::gemini::ModelHandle;

/// How a failed attempt is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Rate limit or exhausted quota on this key/model.
    QuotaExceeded,
    /// The model does not exist or is not enabled for this key.
    ModelNotFound,
    /// Anything else.
    Other,
}

/// Default classification: by HTTP status, then by error text.
pub fn classify_by_status(err: &AiError) -> FailureKind {
    match err.status() {
        Some(429) => return FailureKind::QuotaExceeded,
        Some(404) => return FailureKind::ModelNotFound,
        _ => {}
    }
    let text = err.to_string().to_lowercase();
    if text.contains("quota") {
        FailureKind::QuotaExceeded
    } else if text.contains("not found") || text.contains("not supported") {
        FailureKind::ModelNotFound
    } else {
        FailureKind::Other
    }
}

/// Decides what happens after a failed attempt.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    classify: fn(&AiError) -> FailureKind,
    continue_on_other: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            classify: classify_by_status,
            continue_on_other: true,
        }
    }
}

impl RetryPolicy {
    /// Replace the classifier.
    #[must_use]
    pub const fn with_classifier(mut self, classify: fn(&AiError) -> FailureKind) -> Self {
        self.classify = classify;
        self
    }

    /// Stop at the first unclassified error instead of moving on.
    #[must_use]
    pub const fn stop_on_other(mut self) -> Self {
        self.continue_on_other = false;
        self
    }

    /// Classify an error.
    pub fn classify(&self, err: &AiError) -> FailureKind {
        (self.classify)(err)
    }

    /// Whether to try the next candidate after this failure.
    pub fn should_continue(&self, kind: FailureKind) -> bool {
        match kind {
            FailureKind::QuotaExceeded | FailureKind::ModelNotFound => true,
            FailureKind::Other => self.continue_on_other,
        }
    }
}

/// One (credential, model) pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Candidate {
    /// 1-based position of the key, for logs.
    pub key_number: usize,
    /// The API key.
    pub api_key: String,
    /// The model name.
    pub model: String,
}

impl core::fmt::Debug for Candidate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Candidate")
            .field("key_number", &self.key_number)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

/// Build the ordered candidate list: every model for key 1, then key 2...
pub fn build_candidates(api_keys: &[String], models: &[String]) -> Vec<Candidate> {
    api_keys
        .iter()
        .enumerate()
        .flat_map(|(index, key)| {
            models.iter().map(move |model| Candidate {
                key_number: index.saturating_add(1),
                api_key: key.clone(),
                model: model.clone(),
            })
        })
        .collect()
}

/// Inference client that fails over across candidates.
#[derive(Debug, Clone)]
pub struct ResilientClient {
    client: reqwest::Client,
    api_url: String,
    candidates: Vec<Candidate>,
    policy: RetryPolicy,
}

impl ResilientClient {
    /// Build a client from configuration.
    pub fn new(config: &AiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_url: config.api_url.clone(),
            candidates: build_candidates(&config.api_keys, &config.models),
            policy: RetryPolicy::default(),
        }
    }

    /// Replace the retry policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The candidate list, in the order it is tried.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Whether any candidate exists.
    pub fn is_configured(&self) -> bool {
        !self.candidates.is_empty()
    }

    /// Run `action` against each candidate until one succeeds.
    ///
    /// # Errors
    ///
    /// [`AiError::NoProviders`] when no key is configured;
    /// [`AiError::AllProvidersExhausted`] carrying the last error when
    /// every candidate failed or the policy stopped early.
    pub async fn run_with_resilience<F, Fut, T>(&self, action: F) -> Result<T, AiError>
    where
        F: Fn(ModelHandle) -> Fut,
        Fut: Future<Output = Result<T, AiError>>,
    {
        if self.candidates.is_empty() {
            tracing::error!("AI call requested but no API key is configured");
            return Err(AiError::NoProviders);
        }

        let mut attempts: usize = 0;
        let mut last_error: Option<AiError> = None;

        for candidate in &self.candidates {
            attempts = attempts.saturating_add(1);
            let handle = ModelHandle::new(
                self.client.clone(),
                self.api_url.clone(),
                candidate.api_key.clone(),
                candidate.model.clone(),
            );

            match action(handle).await {
                Ok(value) => {
                    if attempts > 1 {
                        tracing::info!(
                            key = candidate.key_number,
                            model = %candidate.model,
                            attempts,
                            "AI call succeeded after failover"
                        );
                    }
                    return Ok(value);
                }
                Err(err) => {
                    let kind = self.policy.classify(&err);
                    match kind {
                        FailureKind::QuotaExceeded => tracing::warn!(
                            key = candidate.key_number,
                            model = %candidate.model,
                            "Quota exceeded, trying next candidate"
                        ),
                        FailureKind::ModelNotFound => tracing::warn!(
                            key = candidate.key_number,
                            model = %candidate.model,
                            "Model not available for this key, skipping"
                        ),
                        FailureKind::Other => tracing::warn!(
                            key = candidate.key_number,
                            model = %candidate.model,
                            error = %err,
                            "AI call failed"
                        ),
                    }
                    let stop = !self.policy.should_continue(kind);
                    last_error = Some(err);
                    if stop {
                        break;
                    }
                }
            }
        }

        let last = last_error.unwrap_or(AiError::NoProviders);
        Err(AiError::AllProvidersExhausted {
            attempts,
            last: Box::new(last),
        })
    }
}
