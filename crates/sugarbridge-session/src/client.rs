//! The session client: every RPC operation, gated by the session.
//!
//! Each operation follows the same path:
//!
//! ```text
//! require session ──→ build payload ──→ transport.call ──→ classify
//!                                                        │
//!                              Err(envelope) ←───────────┤
//!                                                        ▼
//!                                                   parse response
//! ```
//!
//! # Concurrency note
//!
//! Only `login`, `logout`, `get_user_id`, and the session setters take
//! `&mut self`; everything else borrows shared. Sharing one client across
//! tasks therefore needs an external lock around those calls, which is the
//! single-writer contract the session state needs anyway.

use std::path::Path;

use base64::{engine::general_purpose, Engine as _};
use serde::Serialize;
use serde_json::Value;
use sugarbridge_protocol::codec::{
    encode_record, encode_record_batch, encode_relationship_spec,
};
use sugarbridge_protocol::parser::{
    decode_entry_list, decode_entry_page, decode_name_value_json,
    decode_single_entry, read_id,
};
use sugarbridge_protocol::requests::{
    method, to_rest_data, DocumentRevision, GetEntryListRequest,
    GetEntryRequest, GetRelationshipsRequest, LoginRequest, ModuleRequest,
    SessionRequest, SetDocumentRevisionRequest, SetEntriesRequest,
    SetEntryRequest, SetRelationshipRequest, UserAuth,
};
use sugarbridge_protocol::{
    classify, Entry, EntryList, FieldValue, NameValue, ProtocolError, Record,
};
use sugarbridge_transport::Transport;

use crate::auth::hash_password;
use crate::options::ATTACHMENT_KEYS;
use crate::{
    Attachment, ClientConfig, Credentials, DocumentReceipt, EntryListOptions,
    GetEntryOptions, RelationshipQuery, Session, SessionError, SessionState,
    SetRelationshipOptions,
};

/// A client for the CRM's REST endpoint.
///
/// Owns its transport and at most one [`Session`]. Create one client per
/// logical actor; two actors that need separate identities need two
/// clients.
///
/// ## Lifecycle
///
/// ```text
/// new() ──→ login() ──→ get_entry() / set_entry() / ... ──→ logout()
///   │                                                          │
///   ▼                                                          ▼
/// [Anonymous] ─────────────→ [Authenticated] ─────────────→ [Anonymous]
/// ```
pub struct SessionClient<T: Transport> {
    transport: T,
    config: ClientConfig,
    session: Option<Session>,
}

impl<T: Transport> SessionClient<T> {
    /// Creates an anonymous client with the default config.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    /// Creates an anonymous client with the given config.
    pub fn with_config(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            config,
            session: None,
        }
    }

    /// Creates a client that is already authenticated with a session
    /// obtained elsewhere.
    pub fn with_session(transport: T, session: Session) -> Self {
        let mut client = Self::new(transport);
        client.set_session(session);
        client
    }

    // -- session state ----------------------------------------------------

    /// The current state of the client.
    pub fn state(&self) -> SessionState {
        if self.is_authenticated() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        }
    }

    /// Returns `true` if a session with a non-empty token is held.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_ok()
    }

    /// The held session, if any.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The id of the logged-in user, if known.
    pub fn user_id(&self) -> Option<&str> {
        self.session.as_ref()?.user_id.as_deref()
    }

    /// Adopts an externally obtained session, replacing any held one.
    pub fn set_session(&mut self, session: Session) {
        tracing::info!(user_id = ?session.user_id, "session adopted");
        self.session = Some(session);
    }

    /// Drops the held session locally, without telling the server.
    pub fn clear_session(&mut self) -> Option<Session> {
        self.session.take()
    }

    /// The transport this client sends through.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the session token, or fails fast if there is none.
    fn token(&self) -> Result<&str, SessionError> {
        self.session
            .as_ref()
            .map(|s| s.token.as_str())
            .filter(|token| !token.is_empty())
            .ok_or(SessionError::NotAuthenticated)
    }

    // -- dispatch ---------------------------------------------------------

    /// Sends one RPC and separates remote errors from data.
    async fn rpc<P: Serialize>(
        &self,
        method: &str,
        payload: &P,
    ) -> Result<Value, SessionError> {
        let rest_data = to_rest_data(payload)?;
        tracing::debug!(method, "dispatching rpc");

        let response = self.transport.call(method, &rest_data).await?;

        classify(response).map_err(|envelope| {
            tracing::warn!(
                method,
                name = %envelope.name,
                number = envelope.number,
                "crm reported an error"
            );
            SessionError::Remote(envelope)
        })
    }

    // -- authentication -----------------------------------------------------

    /// Logs in and stores the returned session.
    ///
    /// Returns `Ok(false)` without contacting the server when either
    /// credential is missing or empty.
    ///
    /// # Errors
    /// - [`SessionError::Remote`] if the CRM rejects the login
    /// - [`SessionError::Protocol`] if the response carries no session id
    /// - [`SessionError::Transport`] if the call fails
    ///
    /// On error the previous session (if any) is kept.
    pub async fn login(
        &mut self,
        credentials: &Credentials,
    ) -> Result<bool, SessionError> {
        let Some((username, password)) = credentials.complete() else {
            tracing::debug!("login skipped: incomplete credentials");
            return Ok(false);
        };

        let digest = hash_password(password);
        let request = LoginRequest {
            user_auth: UserAuth {
                user_name: username,
                password: &digest,
            },
            application_name: &self.config.application_name,
            name_value_list: vec![NameValue::new("notifyonsave", "true")],
        };

        let response = self.rpc(method::LOGIN, &request).await?;

        let token = read_id(&response, "id")?;
        let values = response
            .get("name_value_list")
            .map(decode_name_value_json)
            .unwrap_or_default();
        let user_id = values
            .get("user_id")
            .and_then(FieldValue::as_str)
            .map(str::to_string);

        tracing::info!(user = username, user_id = ?user_id, "logged in");
        self.session = Some(Session { token, user_id });
        Ok(true)
    }

    /// Ends the session on the server, then forgets it locally.
    ///
    /// # Errors
    /// Fails with [`SessionError::NotAuthenticated`] without a session.
    /// If the call fails or the CRM reports an error, the session is kept.
    pub async fn logout(&mut self) -> Result<(), SessionError> {
        let session = self.token()?;
        self.rpc(method::LOGOUT, &SessionRequest { session }).await?;

        self.session = None;
        tracing::info!("logged out");
        Ok(())
    }

    /// Asks the CRM which user owns the session and records the answer.
    pub async fn get_user_id(&mut self) -> Result<String, SessionError> {
        let session = self.token()?;
        let response = self
            .rpc(method::GET_USER_ID, &SessionRequest { session })
            .await?;

        let user_id = response
            .as_str()
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                ProtocolError::Shape("get_user_id did not return an id".into())
            })?;

        if let Some(session) = self.session.as_mut() {
            session.user_id = Some(user_id.clone());
        }
        Ok(user_id)
    }

    /// Retrieves the OAuth access token for an explicit session id.
    ///
    /// Does not touch or require the held session.
    pub async fn oauth_access(&self, session: &str) -> Result<Value, SessionError> {
        self.rpc(method::OAUTH_ACCESS, &SessionRequest { session })
            .await
    }

    // -- metadata -----------------------------------------------------------

    /// Retrieves the field definitions of a module.
    pub async fn get_module_fields(
        &self,
        module: &str,
    ) -> Result<Value, SessionError> {
        let session = self.token()?;
        self.rpc(
            method::GET_MODULE_FIELDS,
            &ModuleRequest {
                session,
                module_name: module,
            },
        )
        .await
    }

    /// Lists the modules available to the session's user.
    pub async fn get_available_modules(&self) -> Result<Value, SessionError> {
        let session = self.token()?;
        self.rpc(method::GET_AVAILABLE_MODULES, &SessionRequest { session })
            .await
    }

    // -- entries --------------------------------------------------------------

    /// Fetches one entry by id, with any requested related records.
    ///
    /// # Errors
    /// Fails with [`ProtocolError::Shape`] (via [`SessionError::Protocol`])
    /// if the CRM returns no entry.
    pub async fn get_entry(
        &self,
        module: &str,
        id: &str,
        options: &GetEntryOptions,
    ) -> Result<Entry, SessionError> {
        let session = self.token()?;
        let request = GetEntryRequest {
            session,
            module_name: module,
            id,
            select_fields: &options.select_fields,
            link_name_to_fields_array: encode_relationship_spec(
                &options.relationships,
            ),
        };

        let response = self.rpc(method::GET_ENTRY, &request).await?;
        Ok(decode_single_entry(&response)?)
    }

    /// Fetches one page of entries matching a query.
    ///
    /// An empty page is returned as an [`EntryList`] with no entries.
    pub async fn get_entry_list(
        &self,
        module: &str,
        options: &EntryListOptions,
    ) -> Result<EntryList, SessionError> {
        let session = self.token()?;
        let request = GetEntryListRequest {
            session,
            module_name: module,
            query: &options.query,
            order_by: &options.order_by,
            offset: options.offset,
            select_fields: &options.select_fields,
            link_name_to_fields_array: encode_relationship_spec(
                &options.relationships,
            ),
            max_results: options.max_results,
            deleted: options.deleted,
        };

        let response = self.rpc(method::GET_ENTRY_LIST, &request).await?;
        let page = decode_entry_page(&response);
        tracing::debug!(
            module,
            result_count = page.result_count,
            total_count = page.total_count,
            "entry list fetched"
        );
        Ok(page)
    }

    /// Creates or updates one entry and returns its id.
    ///
    /// An `id` field in the record updates that entry; without one a new
    /// entry is created.
    pub async fn set_entry(
        &self,
        module: &str,
        record: &Record,
    ) -> Result<String, SessionError> {
        let session = self.token()?;
        let request = SetEntryRequest {
            session,
            module_name: module,
            name_value_list: encode_record(record),
        };

        let response = self.rpc(method::SET_ENTRY, &request).await?;
        Ok(read_id(&response, "id")?)
    }

    /// Creates or updates several entries in one call.
    ///
    /// Items that do not serialize to a JSON object are skipped. The
    /// acknowledgment (`{"ids": [...]}`) is returned as the CRM sent it.
    pub async fn set_entries<R: Serialize>(
        &self,
        module: &str,
        records: &[R],
    ) -> Result<Value, SessionError> {
        let session = self.token()?;
        let records = records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(ProtocolError::Encode)?;

        let request = SetEntriesRequest {
            session,
            module_name: module,
            name_value_list: encode_record_batch(&records),
        };

        self.rpc(method::SET_ENTRIES, &request).await
    }

    // -- relationships --------------------------------------------------------

    /// Fetches the records related to an entry through one link.
    pub async fn get_relationships(
        &self,
        module: &str,
        id: &str,
        options: &RelationshipQuery,
    ) -> Result<Vec<Entry>, SessionError> {
        let session = self.token()?;
        let request = GetRelationshipsRequest {
            session,
            module_name: module,
            module_id: id,
            link_field_name: &options.link_field_name,
            related_module_query: &options.query,
            related_fields: &options.related_fields,
            related_module_link_name_to_fields_array: encode_relationship_spec(
                &options.relationships,
            ),
            deleted: options.deleted,
            order_by: &options.order_by,
            offset: options.offset,
            limit: options.limit,
        };

        let response = self.rpc(method::GET_RELATIONSHIPS, &request).await?;
        Ok(decode_entry_list(&response))
    }

    /// Links (or, with `delete`, unlinks) related entries.
    ///
    /// Decoded like a list fetch; the CRM's plain `{created, failed,
    /// deleted}` acknowledgment has no `entry_list` and yields no entries.
    pub async fn set_relationship(
        &self,
        module: &str,
        id: &str,
        related_ids: &[String],
        options: &SetRelationshipOptions,
    ) -> Result<Vec<Entry>, SessionError> {
        let session = self.token()?;
        let request = SetRelationshipRequest {
            session,
            module_name: module,
            module_id: id,
            link_field_name: &options.link_field_name,
            related_ids,
            name_value_list: encode_record(&options.fields),
            delete: options.delete,
        };

        let response = self.rpc(method::SET_RELATIONSHIP, &request).await?;
        Ok(decode_entry_list(&response))
    }

    // -- documents --------------------------------------------------------------

    /// Creates or updates a document entry, then uploads a file as its
    /// revision.
    ///
    /// The attachment is checked and the file read before anything is
    /// sent, so bad input never leaves a half-created document behind.
    /// The revision number is the record's `revision` field, or `"1"`.
    ///
    /// # Errors
    /// - [`SessionError::Validation`] for a key outside
    ///   [`ATTACHMENT_KEYS`] or a missing `file`
    /// - [`SessionError::Io`] if the file cannot be read
    pub async fn set_document(
        &self,
        module: &str,
        record: &Record,
        attachment: &Attachment,
    ) -> Result<DocumentReceipt, SessionError> {
        let session = self.token()?;
        validate_attachment(attachment)?;

        let path = attachment
            .get("file")
            .filter(|p| !p.is_empty())
            .map(Path::new)
            .ok_or_else(|| {
                SessionError::Validation("attachment needs a `file` path".into())
            })?;
        let bytes = tokio::fs::read(path).await.map_err(|source| {
            SessionError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let filename = attachment
            .get("filename")
            .cloned()
            .or_else(|| {
                path.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .unwrap_or_default();
        let document_name = attachment
            .get("name")
            .map(String::as_str)
            .unwrap_or(filename.as_str());
        let revision = record
            .get("revision")
            .and_then(FieldValue::as_str)
            .unwrap_or("1");

        let id = self.set_entry(module, record).await?;

        let request = SetDocumentRevisionRequest {
            session,
            note: DocumentRevision {
                id: &id,
                document_name,
                file: general_purpose::STANDARD.encode(&bytes),
                filename: &filename,
                revision,
            },
        };
        let response = self.rpc(method::SET_DOCUMENT_REVISION, &request).await?;
        let note_id = read_id(&response, "id")?;

        tracing::info!(module, %id, %note_id, bytes = bytes.len(), "document uploaded");
        Ok(DocumentReceipt { id, note_id })
    }
}

/// Rejects attachment keys outside [`ATTACHMENT_KEYS`].
fn validate_attachment(attachment: &Attachment) -> Result<(), SessionError> {
    match attachment
        .keys()
        .find(|key| !ATTACHMENT_KEYS.contains(&key.as_str()))
    {
        Some(key) => Err(SessionError::Validation(format!(
            "unknown attachment key {key:?}; expected one of {ATTACHMENT_KEYS:?}"
        ))),
        None => Ok(()),
    }
}
