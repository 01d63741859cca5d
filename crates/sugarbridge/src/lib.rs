//! # sugarbridge
//!
//! Async client for the SugarCRM legacy REST endpoint (`v4_1/rest.php`).
//!
//! sugarbridge turns the endpoint's positional JSON-over-form RPC into
//! typed async calls: records go out as `name_value_list`s, `entry_list`
//! responses come back as [`Entry`] values with their related records
//! merged in, and the CRM's in-band error envelope surfaces as an error
//! instead of data.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sugarbridge::prelude::*;
//!
//! # async fn run() -> Result<(), CrmError> {
//! let mut client = CrmClientBuilder::new("https://crm.example.com").build()?;
//! client.login(&Credentials::new("admin", "secret")).await?;
//!
//! let page = client
//!     .get_entry_list(
//!         "Contacts",
//!         &EntryListOptions::default().query("contacts.last_name = 'Smith'"),
//!     )
//!     .await?;
//! for contact in &page.entries {
//!     println!("{:?}", contact.text("first_name"));
//! }
//!
//! client.logout().await?;
//! # Ok(())
//! # }
//! ```

mod builder;
mod error;
pub mod logging;

pub use builder::{CrmClient, CrmClientBuilder};
pub use error::CrmError;

pub use sugarbridge_protocol as protocol;
pub use sugarbridge_session as session;
pub use sugarbridge_transport as transport;

pub use sugarbridge_protocol::{
    Entry, EntryList, ErrorEnvelope, FieldValue, Record, Related,
    RelationshipSpec,
};

pub mod prelude {
    //! Everything a typical caller needs, in one import.

    pub use crate::{CrmClient, CrmClientBuilder, CrmError};
    pub use sugarbridge_protocol::{
        Entry, EntryList, ErrorEnvelope, FieldValue, Record, Related,
        RelationshipSpec,
    };
    pub use sugarbridge_session::{
        Attachment, ClientConfig, Credentials, DocumentReceipt,
        EntryListOptions, GetEntryOptions, RelationshipQuery, Session,
        SessionClient, SessionError, SessionState, SetRelationshipOptions,
    };
    pub use sugarbridge_transport::{
        HttpTransport, Transport, TransportConfig, TransportError,
    };
}
