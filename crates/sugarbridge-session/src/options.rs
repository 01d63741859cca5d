//! Per-operation options and results.
//!
//! Every option struct defaults to the values the endpoint itself assumes
//! when an argument is left empty, so `Default::default()` is always a
//! valid starting point.

use std::collections::BTreeMap;

use sugarbridge_protocol::{Record, RelationshipSpec};

/// Options for [`get_entry`](crate::SessionClient::get_entry).
#[derive(Debug, Clone, Default)]
pub struct GetEntryOptions {
    /// Fields to return; empty means all.
    pub select_fields: Vec<String>,
    /// Related records to fetch alongside the entry.
    pub relationships: RelationshipSpec,
}

impl GetEntryOptions {
    /// Restricts the returned fields.
    pub fn select(mut self, fields: &[&str]) -> Self {
        self.select_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Adds a related module and the fields to fetch from it.
    pub fn relate(mut self, module: &str, fields: &[&str]) -> Self {
        self.relationships.insert(
            module.to_string(),
            fields.iter().map(|f| f.to_string()).collect(),
        );
        self
    }
}

/// Options for [`get_entry_list`](crate::SessionClient::get_entry_list).
#[derive(Debug, Clone, Default)]
pub struct EntryListOptions {
    /// SQL `WHERE` fragment, e.g. `accounts.name LIKE 'A%'`.
    pub query: String,
    /// SQL `ORDER BY` fragment.
    pub order_by: String,
    /// Index of the first entry to return.
    pub offset: u64,
    /// Fields to return; empty means all.
    pub select_fields: Vec<String>,
    /// Related records to fetch for every entry.
    pub relationships: RelationshipSpec,
    /// Page size; 0 lets the server decide.
    pub max_results: u64,
    /// Include deleted entries.
    pub deleted: bool,
}

impl EntryListOptions {
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = order_by.into();
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    pub fn max_results(mut self, max_results: u64) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn select(mut self, fields: &[&str]) -> Self {
        self.select_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn relate(mut self, module: &str, fields: &[&str]) -> Self {
        self.relationships.insert(
            module.to_string(),
            fields.iter().map(|f| f.to_string()).collect(),
        );
        self
    }

    pub fn include_deleted(mut self, deleted: bool) -> Self {
        self.deleted = deleted;
        self
    }
}

/// Options for [`get_relationships`](crate::SessionClient::get_relationships).
///
/// `link_field_name` names the link on the parent module (e.g.
/// `contacts` on `Accounts`) and has no sensible default.
#[derive(Debug, Clone, Default)]
pub struct RelationshipQuery {
    pub link_field_name: String,
    /// SQL `WHERE` fragment applied to the related module.
    pub query: String,
    /// Fields of the related records to return.
    pub related_fields: Vec<String>,
    /// Second-level relationships of the related records.
    pub relationships: RelationshipSpec,
    pub deleted: bool,
    pub order_by: String,
    pub offset: u64,
    /// Maximum related records; 0 lets the server decide.
    pub limit: u64,
}

impl RelationshipQuery {
    /// Starts a query over the given link.
    pub fn new(link_field_name: impl Into<String>) -> Self {
        Self {
            link_field_name: link_field_name.into(),
            ..Self::default()
        }
    }

    pub fn fields(mut self, fields: &[&str]) -> Self {
        self.related_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }
}

/// Options for [`set_relationship`](crate::SessionClient::set_relationship).
#[derive(Debug, Clone, Default)]
pub struct SetRelationshipOptions {
    pub link_field_name: String,
    /// Extra fields stored on the relationship row itself.
    pub fields: Record,
    /// Remove the relationship instead of creating it.
    pub delete: bool,
}

impl SetRelationshipOptions {
    pub fn new(link_field_name: impl Into<String>) -> Self {
        Self {
            link_field_name: link_field_name.into(),
            ..Self::default()
        }
    }

    pub fn delete(mut self, delete: bool) -> Self {
        self.delete = delete;
        self
    }
}

/// Companion keys accepted by [`set_document`](crate::SessionClient::set_document).
pub const ATTACHMENT_KEYS: [&str; 3] = ["file", "name", "filename"];

/// Companion data for a document upload, keyed by one of
/// [`ATTACHMENT_KEYS`]:
///
/// - `file`: local path of the bytes to upload (required)
/// - `filename`: name stored with the revision (defaults to the path's
///   final component)
/// - `name`: document name of the revision
pub type Attachment = BTreeMap<String, String>;

/// Ids produced by [`set_document`](crate::SessionClient::set_document).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentReceipt {
    /// Id of the created or updated base record.
    pub id: String,
    /// Id of the uploaded revision.
    pub note_id: String,
}
