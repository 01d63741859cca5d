//! Transport configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::TransportError;

/// Where and how RPC calls are delivered.
///
/// Every field has a default, so a config only needs the base URI:
///
/// ```rust
/// use sugarbridge_transport::TransportConfig;
///
/// let config = TransportConfig::new("https://crm.example.com");
/// assert_eq!(config.timeout_secs, 3.0);
/// assert_eq!(config.method, "POST");
/// assert_eq!(
///     config.endpoint(),
///     "https://crm.example.com/service/v4_1/rest.php",
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Scheme and host of the CRM, e.g. `https://crm.example.com`.
    pub base_uri: String,

    /// Path of the REST entry point relative to `base_uri`.
    pub uri: String,

    /// Per-call deadline in seconds.
    pub timeout_secs: f64,

    /// HTTP method used for every call.
    pub method: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_uri: String::new(),
            uri: "service/v4_1/rest.php".to_string(),
            timeout_secs: 3.0,
            method: "POST".to_string(),
        }
    }
}

impl TransportConfig {
    /// Creates a config for `base_uri` with every other field defaulted.
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            ..Self::default()
        }
    }

    /// Sets the endpoint path.
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }

    /// Sets the per-call deadline in seconds.
    pub fn with_timeout_secs(mut self, secs: f64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Parses a config from a JSON document.
    ///
    /// Missing keys take their defaults. A key holding the wrong type
    /// (e.g. `"timeout_secs": "fast"`) is reported as
    /// [`TransportError::InvalidConfig`], and so is anything
    /// [`validate`](Self::validate) rejects.
    pub fn from_json(json: &str) -> Result<Self, TransportError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| TransportError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the config can address an endpoint.
    ///
    /// # Errors
    /// Returns [`TransportError::InvalidConfig`] when the base URI is
    /// empty or not `http(s)`, the timeout is not a positive finite number,
    /// or the method is not a valid HTTP method token.
    pub fn validate(&self) -> Result<(), TransportError> {
        let base = self.base_uri.trim();
        if base.is_empty() {
            return Err(TransportError::InvalidConfig(
                "base_uri is required".into(),
            ));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(TransportError::InvalidConfig(format!(
                "base_uri must be an http(s) URL, got {base:?}"
            )));
        }
        if !self.timeout_secs.is_finite() || self.timeout_secs <= 0.0 {
            return Err(TransportError::InvalidConfig(format!(
                "timeout_secs must be a positive number, got {}",
                self.timeout_secs
            )));
        }
        Duration::try_from_secs_f64(self.timeout_secs).map_err(|e| {
            TransportError::InvalidConfig(format!(
                "timeout_secs {} is out of range: {e}",
                self.timeout_secs
            ))
        })?;
        let method_ok = !self.method.is_empty()
            && self.method.bytes().all(|b| b.is_ascii_uppercase());
        if !method_ok {
            return Err(TransportError::InvalidConfig(format!(
                "method must be an upper-case HTTP method, got {:?}",
                self.method
            )));
        }
        Ok(())
    }

    /// The per-call deadline as a [`Duration`].
    ///
    /// Only meaningful on a validated config; out-of-range values on an
    /// unvalidated one saturate to [`Duration::MAX`].
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_secs).unwrap_or(Duration::MAX)
    }

    /// The full endpoint URL: `base_uri` and `uri` joined by one `/`.
    pub fn endpoint(&self) -> String {
        let base = self.base_uri.trim().trim_end_matches('/');
        let path = self.uri.trim().trim_start_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{path}")
        }
    }
}
