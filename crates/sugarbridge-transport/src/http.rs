//! HTTP transport implementation using `reqwest`.

use reqwest::{Client, Method};

use crate::{CallId, RpcForm, Transport, TransportConfig, TransportError};

/// An HTTP-based [`Transport`] that posts form-encoded RPC calls.
///
/// The underlying `reqwest::Client` keeps a connection pool, so one
/// transport should be created and reused. The session token travels in
/// `rest_data`, so no cookie store is needed.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    endpoint: String,
    method: Method,
}

impl HttpTransport {
    /// Builds a transport from a config.
    ///
    /// # Errors
    /// Returns [`TransportError::InvalidConfig`] if the config does not
    /// validate, and [`TransportError::Http`] if the HTTP client cannot
    /// be constructed (e.g. the TLS backend fails to initialize).
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        config.validate()?;

        let method = Method::from_bytes(config.method.as_bytes())
            .map_err(|e| TransportError::InvalidConfig(e.to_string()))?;

        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(from_reqwest)?;

        let endpoint = config.endpoint();
        tracing::debug!(%endpoint, %method, "http transport ready");

        Ok(Self {
            http,
            endpoint,
            method,
        })
    }

    /// The URL every call is sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Transport for HttpTransport {
    async fn call(
        &self,
        method: &str,
        rest_data: &str,
    ) -> Result<serde_json::Value, TransportError> {
        let id = CallId::next();
        tracing::debug!(%id, method, "sending rpc call");

        let response = self
            .http
            .request(self.method.clone(), &self.endpoint)
            .form(&RpcForm::new(method, rest_data))
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = response.status();
        let body = response.text().await.map_err(from_reqwest)?;

        if !status.is_success() {
            tracing::debug!(%id, status = status.as_u16(), "rpc call rejected");
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(%id, bytes = body.len(), "rpc call answered");

        // Some methods (logout) answer with an empty body.
        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&body).map_err(TransportError::Decode)
    }
}

/// Maps a `reqwest` error into a [`TransportError::Http`].
fn from_reqwest(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Http(format!("timed out: {e}"))
    } else {
        TransportError::Http(e.to_string())
    }
}
