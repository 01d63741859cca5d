//! Unified error type for sugarbridge.

use sugarbridge_protocol::ProtocolError;
use sugarbridge_session::SessionError;
use sugarbridge_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `sugarbridge` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate.
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum CrmError {
    /// A transport-level error (config, connection, status, body).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, response shape).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (no session, remote error, bad input).
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl CrmError {
    /// Returns the CRM's error envelope if this error came from the
    /// server itself.
    pub fn remote(&self) -> Option<&sugarbridge_protocol::ErrorEnvelope> {
        match self {
            Self::Session(SessionError::Remote(envelope)) => Some(envelope),
            _ => None,
        }
    }
}
