//! Login credentials and the password digest the CRM expects.
//!
//! The REST `login` method never receives the clear-text password: it
//! takes the lowercase hex MD5 of it and compares that against its user
//! table. That digest is a contract with the server, not a security
//! choice, so it cannot be swapped for a stronger hash here.

use md5::{Digest, Md5};

/// A username/password pair for [`login`](crate::SessionClient::login).
///
/// Both parts are optional so a half-filled form can be passed straight
/// through; login refuses to send anything unless both are present.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    /// Creates a complete pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    /// Sets the username.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Returns `(username, password)` if both are present and non-empty.
    pub fn complete(&self) -> Option<(&str, &str)> {
        let username = self.username.as_deref().filter(|u| !u.is_empty())?;
        let password = self.password.as_deref().filter(|p| !p.is_empty())?;
        Some((username, password))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Lowercase hex MD5 of `password`: 32 characters.
pub fn hash_password(password: &str) -> String {
    hex::encode(Md5::digest(password.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_known_digests() {
        assert_eq!(hash_password(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(hash_password("admin"), "21232f297a57a5a743894a0e4a801fc3");
    }

    #[test]
    fn test_hash_password_is_fixed_length_lowercase_hex() {
        let digest = hash_password("a much longer passphrase than usual");
        assert_eq!(digest.len(), 32);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_complete_requires_both_parts() {
        assert!(Credentials::default().complete().is_none());
        assert!(Credentials::default().with_username("u").complete().is_none());
        assert!(Credentials::default().with_password("p").complete().is_none());
        assert_eq!(Credentials::new("u", "p").complete(), Some(("u", "p")));
    }

    #[test]
    fn test_complete_treats_empty_as_missing() {
        assert!(Credentials::new("u", "").complete().is_none());
        assert!(Credentials::new("", "p").complete().is_none());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let debug = format!("{:?}", Credentials::new("admin", "hunter2"));
        assert!(debug.contains("admin"));
        assert!(!debug.contains("hunter2"));
    }
}
