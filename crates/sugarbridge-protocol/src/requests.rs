//! Typed `rest_data` payloads, one per RPC method.
//!
//! The endpoint binds `rest_data` members to method arguments by
//! position, not by name. Each payload is therefore a struct whose field
//! order is the method's argument order; serde keeps declaration order
//! when serializing, so the JSON comes out right. Never route these
//! through `serde_json::Value`, whose map type sorts keys.

use serde::Serialize;

use crate::{NameValue, ProtocolError};

/// RPC method names understood by the endpoint.
pub mod method {
    pub const LOGIN: &str = "login";
    pub const LOGOUT: &str = "logout";
    pub const GET_USER_ID: &str = "get_user_id";
    pub const OAUTH_ACCESS: &str = "oauth_access";
    pub const GET_MODULE_FIELDS: &str = "get_module_fields";
    pub const GET_AVAILABLE_MODULES: &str = "get_available_modules";
    pub const GET_ENTRY: &str = "get_entry";
    pub const GET_ENTRY_LIST: &str = "get_entry_list";
    pub const SET_ENTRY: &str = "set_entry";
    pub const SET_ENTRIES: &str = "set_entries";
    pub const GET_RELATIONSHIPS: &str = "get_relationships";
    pub const SET_RELATIONSHIP: &str = "set_relationship";
    pub const SET_DOCUMENT_REVISION: &str = "set_document_revision";
}

/// Serializes a payload into the string sent as `rest_data`.
///
/// # Errors
/// Returns [`ProtocolError::Encode`] if serialization fails.
pub fn to_rest_data<T: Serialize>(payload: &T) -> Result<String, ProtocolError> {
    serde_json::to_string(payload).map_err(ProtocolError::Encode)
}

/// `user_auth` member of a login.
#[derive(Debug, Clone, Serialize)]
pub struct UserAuth<'a> {
    pub user_name: &'a str,
    /// Hex digest of the password, never the password itself.
    pub password: &'a str,
}

/// `login(user_auth, application_name, name_value_list)`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub user_auth: UserAuth<'a>,
    pub application_name: &'a str,
    pub name_value_list: Vec<NameValue>,
}

/// Any method whose only argument is the session token: `logout`,
/// `get_user_id`, `oauth_access`, `get_available_modules`.
#[derive(Debug, Clone, Serialize)]
pub struct SessionRequest<'a> {
    pub session: &'a str,
}

/// `get_module_fields(session, module_name)`
#[derive(Debug, Clone, Serialize)]
pub struct ModuleRequest<'a> {
    pub session: &'a str,
    pub module_name: &'a str,
}

/// `get_entry(session, module_name, id, select_fields, link_name_to_fields_array)`
#[derive(Debug, Clone, Serialize)]
pub struct GetEntryRequest<'a> {
    pub session: &'a str,
    pub module_name: &'a str,
    pub id: &'a str,
    pub select_fields: &'a [String],
    pub link_name_to_fields_array: Vec<NameValue>,
}

/// `get_entry_list(session, module_name, query, order_by, offset,
/// select_fields, link_name_to_fields_array, max_results, deleted)`
#[derive(Debug, Clone, Serialize)]
pub struct GetEntryListRequest<'a> {
    pub session: &'a str,
    pub module_name: &'a str,
    pub query: &'a str,
    pub order_by: &'a str,
    pub offset: u64,
    pub select_fields: &'a [String],
    pub link_name_to_fields_array: Vec<NameValue>,
    pub max_results: u64,
    pub deleted: bool,
}

/// `set_entry(session, module_name, name_value_list)`
#[derive(Debug, Clone, Serialize)]
pub struct SetEntryRequest<'a> {
    pub session: &'a str,
    pub module_name: &'a str,
    pub name_value_list: Vec<NameValue>,
}

/// `set_entries(session, module_name, name_value_lists)`
#[derive(Debug, Clone, Serialize)]
pub struct SetEntriesRequest<'a> {
    pub session: &'a str,
    pub module_name: &'a str,
    pub name_value_list: Vec<Vec<NameValue>>,
}

/// `get_relationships(session, module_name, module_id, link_field_name,
/// related_module_query, related_fields,
/// related_module_link_name_to_fields_array, deleted, order_by, offset, limit)`
#[derive(Debug, Clone, Serialize)]
pub struct GetRelationshipsRequest<'a> {
    pub session: &'a str,
    pub module_name: &'a str,
    pub module_id: &'a str,
    pub link_field_name: &'a str,
    pub related_module_query: &'a str,
    pub related_fields: &'a [String],
    pub related_module_link_name_to_fields_array: Vec<NameValue>,
    pub deleted: bool,
    pub order_by: &'a str,
    pub offset: u64,
    pub limit: u64,
}

/// `set_relationship(session, module_name, module_id, link_field_name,
/// related_ids, name_value_list, delete)`
#[derive(Debug, Clone, Serialize)]
pub struct SetRelationshipRequest<'a> {
    pub session: &'a str,
    pub module_name: &'a str,
    pub module_id: &'a str,
    pub link_field_name: &'a str,
    pub related_ids: &'a [String],
    pub name_value_list: Vec<NameValue>,
    pub delete: bool,
}

/// The revision attached by `set_document_revision`.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentRevision<'a> {
    /// Id of the record the revision belongs to.
    pub id: &'a str,
    pub document_name: &'a str,
    /// Base64 of the file contents.
    pub file: String,
    pub filename: &'a str,
    pub revision: &'a str,
}

/// `set_document_revision(session, note)`
#[derive(Debug, Clone, Serialize)]
pub struct SetDocumentRevisionRequest<'a> {
    pub session: &'a str,
    pub note: DocumentRevision<'a>,
}
