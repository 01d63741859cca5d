//! Session lifecycle and RPC operations for sugarbridge.
//!
//! This crate is where calls get their meaning:
//!
//! 1. **Authentication**: turning [`Credentials`] into a [`Session`] via
//!    `login`, and back to nothing via `logout`
//! 2. **Operations**: every CRM method as a typed async call on
//!    [`SessionClient`]
//! 3. **Error separation**: the CRM's in-band error envelope surfaces as
//!    [`SessionError::Remote`], never as data
//!
//! # How it fits in the stack
//!
//! ```text
//! Application (above)  ← calls SessionClient operations
//!     ↕
//! Session Layer (this crate)  ← gates calls on the session, builds payloads
//!     ↕
//! Protocol Layer (below)  ← rest_data payloads, entry_list parsing
//!     ↕
//! Transport Layer  ← one form POST per call
//! ```

mod auth;
mod client;
mod error;
mod options;
mod session;

pub use auth::{hash_password, Credentials};
pub use client::SessionClient;
pub use error::SessionError;
pub use options::{
    Attachment, DocumentReceipt, EntryListOptions, GetEntryOptions,
    RelationshipQuery, SetRelationshipOptions, ATTACHMENT_KEYS,
};
pub use session::{ClientConfig, Session, SessionState};
