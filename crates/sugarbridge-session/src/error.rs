//! Error types for the session layer.

use std::path::PathBuf;

use sugarbridge_protocol::{ErrorEnvelope, ProtocolError};
use sugarbridge_transport::TransportError;

/// Errors that can occur while running an RPC operation.
///
/// Each variant is a distinct failure the caller can match on. None of
/// them is retried internally.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The operation needs a session and the client has none. Raised
    /// before anything is sent.
    #[error("not authenticated: log in or supply a session token first")]
    NotAuthenticated,

    /// The CRM answered with its error envelope.
    #[error("remote error: {0}")]
    Remote(ErrorEnvelope),

    /// Caller-supplied input was rejected before any call was made.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A local file named in the input could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The call never produced a usable response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response was not shaped the way the operation needs.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
