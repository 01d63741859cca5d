//! Error types for the protocol layer.

/// Errors that can occur while building requests or reading responses.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// A request payload could not be serialized to JSON.
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// The response decoded as JSON but lacks a structure the operation
    /// depends on, e.g. an empty `entry_list` from a single-entry fetch.
    #[error("unexpected response shape: {0}")]
    Shape(String),
}
