//! Wire protocol for sugarbridge.
//!
//! This crate knows how the CRM's REST endpoint shapes its data, and
//! nothing about how that data travels:
//!
//! - **Types** ([`Record`], [`FieldValue`], [`NameValue`], [`Entry`]):
//!   the caller-facing records and the wire pairs they map to.
//! - **Codec** ([`codec`]): records to `name_value_list`s, multi-value
//!   tokens, relationship specs.
//! - **Parser** ([`parser`]): `entry_list` / `relationship_list`
//!   responses back into entries.
//! - **Envelope** ([`classify`], [`ErrorEnvelope`]): telling an in-band
//!   error from data.
//! - **Requests** ([`requests`]): the positional `rest_data` payloads.
//!
//! # Architecture
//!
//! ```text
//! Session client → Protocol (rest_data / Entry) → Transport (HTTP form)
//! ```

pub mod codec;
mod envelope;
mod error;
pub mod parser;
pub mod requests;
mod types;

pub use envelope::{classify, ErrorEnvelope};
pub use error::ProtocolError;
pub use types::{
    Entry, EntryList, FieldValue, NameValue, Record, Related,
    RelationshipSpec, Relationships,
};
