/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// A transport parameter is missing, malformed, or of the wrong type.
    /// Raised before any network call is attempted.
    #[error("invalid transport configuration: {0}")]
    InvalidConfig(String),

    /// The request could not be sent or the response could not be read
    /// (connection refused, TLS failure, timeout, ...).
    #[error("http request failed: {0}")]
    Http(String),

    /// The endpoint answered with a non-success HTTP status.
    #[error("endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not valid JSON.
    #[error("response body is not JSON: {0}")]
    Decode(#[source] serde_json::Error),
}
