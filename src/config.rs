//! Explicit per-client configuration.
//!
//! All state the core needs — credential, endpoint, model, sampling
//! parameters, timeout — is threaded through [`ClientConfig`]. The core keeps
//! no process-wide mutable state; anything ambient (key lookup, model
//! selection UI, persistence) belongs to the caller.

use std::collections::HashMap;
use std::time::Duration;

/// A secret string type for sensitive data like API keys.
/// Prevents accidental logging or display of secrets.
#[derive(Clone)]
pub struct SecretString(String);

impl SecretString {
    /// Create a new secret string.
    pub fn new(s: String) -> Self {
        Self(s)
    }

    /// Get the underlying secret value.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretString([REDACTED])")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s.to_string())
    }
}

/// Configuration for a [`ChatClient`](crate::client::ChatClient).
///
/// # Example
/// ```rust
/// use chatstream::config::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new("sk-...")
///     .with_model("gpt-4o-mini".to_string())
///     .with_temperature(0.7)
///     .with_timeout(Duration::from_secs(60));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// API key for authentication.
    pub api_key: Option<SecretString>,

    /// Base URL for API endpoints; defaults to the public OpenAI endpoint.
    pub base_url: Option<String>,

    /// Model identifier; falls back to the crate default when unset.
    pub model: Option<String>,

    /// Temperature for sampling (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// Top-p (nucleus) sampling parameter.
    pub top_p: Option<f32>,

    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,

    /// Request timeout; the core imposes none of its own.
    pub timeout: Option<Duration>,

    /// HTTP proxy URL.
    pub proxy: Option<String>,

    /// Additional HTTP headers to include in requests.
    pub extra_headers: Option<HashMap<String, String>>,
}

impl ClientConfig {
    /// Create a new configuration with an API key.
    pub fn new(api_key: impl Into<SecretString>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Set the model identifier.
    pub fn with_model(mut self, model: String) -> Self {
        self.model = Some(model);
        self
    }

    /// Set the temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set top-p sampling parameter.
    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Set maximum tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the proxy URL.
    pub fn with_proxy(mut self, proxy: String) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Add a single extra header.
    pub fn with_header(mut self, key: String, value: String) -> Self {
        self.extra_headers
            .get_or_insert_with(HashMap::new)
            .insert(key, value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_string_redacted_debug() {
        let secret = SecretString::new("sk-super-secret".to_string());
        assert_eq!(format!("{:?}", secret), "SecretString([REDACTED])");
        assert_eq!(secret.expose_secret(), "sk-super-secret");
    }

    #[test]
    fn test_builder_chain() {
        let config = ClientConfig::new("key")
            .with_model("gpt-4o-mini".to_string())
            .with_temperature(0.9)
            .with_timeout(Duration::from_secs(30))
            .with_header("X-Title".to_string(), "demo".to_string());

        assert_eq!(config.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(config.temperature, Some(0.9));
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(
            config.extra_headers.unwrap().get("X-Title").map(String::as_str),
            Some("demo")
        );
    }
}
