//! Session types: what the client holds between login and logout.
//!
//! A session is the opaque token the CRM hands back from `login`, plus
//! the id of the user it belongs to. The token travels inside every later
//! call's `rest_data`; there are no cookies.

use std::fmt;

// ---------------------------------------------------------------------------
// ClientConfig
// ---------------------------------------------------------------------------

/// Client-side settings that are not about the transport.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Sent as `application_name` on login; shows up in the CRM's
    /// tracker tables.
    pub application_name: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            application_name: "sugarbridge".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Whether the client currently holds a session.
///
/// ```text
///   Anonymous ──(login)──→ Authenticated ──(logout)──→ Anonymous
/// ```
///
/// A failed login or logout leaves the state where it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => write!(f, "Anonymous"),
            Self::Authenticated => write!(f, "Authenticated"),
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// An authenticated session on the CRM.
///
/// Either returned by a successful login or built by hand from a token
/// obtained elsewhere (another process, an OAuth flow).
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// The session id the CRM issued.
    pub token: String,

    /// Id of the user the session belongs to, when known.
    pub user_id: Option<String>,
}

impl Session {
    /// Wraps an externally obtained token. The user id is unknown until
    /// [`get_user_id`](crate::SessionClient::get_user_id) is called.
    pub fn from_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user_id: None,
        }
    }
}

// The token is a bearer credential; keep it out of logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user_id", &self.user_id)
            .finish()
    }
}
