//! Inference configuration loaded from the environment.
//!
//! Up to three API keys are read (`GOOGLE_API_KEY`, `GOOGLE_API_KEY_2`,
//! `GOOGLE_API_KEY_3`); together with the model list they define the
//! candidates the resilient client walks through.

use std::time::Duration;

use finquina_types::unquote;

use crate::error::AiError;

/// Environment variables holding API keys, in priority order.
pub const KEY_VARS: [&str; 3] = ["GOOGLE_API_KEY", "GOOGLE_API_KEY_2", "GOOGLE_API_KEY_3"];

/// Models tried for each key, in order of preference.
pub const DEFAULT_MODELS: [&str; 4] = [
    "gemini-1.5-flash",
    "gemini-1.5-flash-8b",
    "gemini-2.0-flash-exp",
    "gemini-1.5-pro",
];

/// Base URL of the `generateContent` API.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Inference configuration.
#[derive(Clone)]
pub struct AiConfig {
    /// Base API URL.
    pub api_url: String,
    /// Sanitised API keys, in priority order.
    pub api_keys: Vec<String>,
    /// Model names, in priority order.
    pub models: Vec<String>,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Directory with prompt template overrides.
    pub templates_dir: Option<String>,
}

impl core::fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AiConfig")
            .field("api_url", &self.api_url)
            .field("api_keys", &format_args!("[{} redacted]", self.api_keys.len()))
            .field("models", &self.models)
            .field("request_timeout", &self.request_timeout)
            .field("templates_dir", &self.templates_dir)
            .finish()
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            api_keys: Vec::new(),
            models: DEFAULT_MODELS.iter().map(|m| (*m).to_owned()).collect(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            templates_dir: None,
        }
    }
}

impl AiConfig {
    /// Load configuration from the process environment.
    ///
    /// Optional variables:
    /// - `GOOGLE_API_KEY`, `GOOGLE_API_KEY_2`, `GOOGLE_API_KEY_3` -- API keys
    /// - `GEMINI_MODELS` -- comma-separated model list
    /// - `GEMINI_API_URL` -- base URL (default: Google's `v1beta`)
    /// - `GEMINI_TIMEOUT_SECS` -- request timeout (default 30)
    /// - `GEMINI_TEMPLATES_DIR` -- prompt template overrides
    pub fn from_env() -> Result<Self, AiError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_keys: Vec<String> = KEY_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .map(|raw| unquote(&raw).to_owned())
            .filter(|key| !key.is_empty())
            .collect();

        if api_keys.is_empty() {
            tracing::warn!("No GOOGLE_API_KEY found in environment; AI features disabled");
        }

        let models = lookup("GEMINI_MODELS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(ToOwned::to_owned)
                    .collect::<Vec<_>>()
            })
            .filter(|list| !list.is_empty())
            .unwrap_or_else(|| DEFAULT_MODELS.iter().map(|m| (*m).to_owned()).collect());

        let api_url = lookup("GEMINI_API_URL")
            .map(|raw| unquote(&raw).trim_end_matches('/').to_owned())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned());

        let timeout_secs: u64 = lookup("GEMINI_TIMEOUT_SECS")
            .map_or_else(|| Ok(DEFAULT_TIMEOUT_SECS), |raw| raw.trim().parse())
            .map_err(|e| AiError::Config(format!("invalid GEMINI_TIMEOUT_SECS: {e}")))?;

        let templates_dir = lookup("GEMINI_TEMPLATES_DIR").filter(|d| !d.trim().is_empty());

        Ok(Self {
            api_url,
            api_keys,
            models,
            request_timeout: Duration::from_secs(timeout_secs),
            templates_dir,
        })
    }

    /// Whether at least one API key is configured.
    pub fn has_providers(&self) -> bool {
        !self.api_keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn keys_are_unquoted_and_blank_keys_dropped() {
        let config = AiConfig::from_lookup(lookup(&[
            ("GOOGLE_API_KEY", " \"abc\" "),
            ("GOOGLE_API_KEY_2", "   "),
            ("GOOGLE_API_KEY_3", "'xyz'"),
        ]));
        let config = config.unwrap_or_default();
        assert_eq!(config.api_keys, vec!["abc".to_owned(), "xyz".to_owned()]);
        assert!(config.has_providers());
    }

    #[test]
    fn defaults_apply_without_variables() {
        let config = AiConfig::from_lookup(lookup(&[])).unwrap_or_default();
        assert!(!config.has_providers());
        assert_eq!(config.models.len(), DEFAULT_MODELS.len());
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn model_list_is_configurable() {
        let config = AiConfig::from_lookup(lookup(&[
            ("GEMINI_MODELS", "gemini-2.0-flash, ,gemini-1.5-pro"),
            ("GEMINI_API_URL", "http://localhost:9999/v1/"),
        ]))
        .unwrap_or_default();
        assert_eq!(config.models, vec!["gemini-2.0-flash", "gemini-1.5-pro"]);
        assert_eq!(config.api_url, "http://localhost:9999/v1");
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        let result = AiConfig::from_lookup(lookup(&[("GEMINI_TIMEOUT_SECS", "soon")]));
        assert!(matches!(result, Err(AiError::Config(_))));
    }

    #[test]
    fn debug_redacts_keys() {
        let config = AiConfig {
            api_keys: vec!["secret-key".to_owned()],
            ..AiConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("1 redacted"));
    }
}
