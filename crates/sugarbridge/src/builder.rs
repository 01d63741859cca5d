//! `CrmClient` builder.
//!
//! This is the entry point for talking to a CRM over HTTP. It ties
//! together all the layers: transport → protocol → session.

use sugarbridge_session::{ClientConfig, Session, SessionClient};
use sugarbridge_transport::{HttpTransport, TransportConfig};

use crate::CrmError;

/// A session client bound to the HTTP transport.
pub type CrmClient = SessionClient<HttpTransport>;

/// Builder for configuring a [`CrmClient`].
///
/// # Example
///
/// ```rust,no_run
/// use sugarbridge::prelude::*;
///
/// # async fn run() -> Result<(), CrmError> {
/// let mut client = CrmClientBuilder::new("https://crm.example.com")
///     .timeout_secs(10.0)
///     .application_name("nightly-sync")
///     .build()?;
/// client.login(&Credentials::new("admin", "secret")).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CrmClientBuilder {
    transport: TransportConfig,
    client: ClientConfig,
    session: Option<Session>,
}

impl CrmClientBuilder {
    /// Creates a builder for the CRM at `base_uri`, with default settings.
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self::from_transport_config(TransportConfig::new(base_uri))
    }

    /// Creates a builder from a ready-made transport config, e.g. one
    /// loaded with [`TransportConfig::from_json`].
    pub fn from_transport_config(config: TransportConfig) -> Self {
        Self {
            transport: config,
            client: ClientConfig::default(),
            session: None,
        }
    }

    /// Sets the endpoint path under the base URI.
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.transport.uri = uri.into();
        self
    }

    /// Sets the per-call deadline in seconds.
    pub fn timeout_secs(mut self, secs: f64) -> Self {
        self.transport.timeout_secs = secs;
        self
    }

    /// Sets the application name reported on login.
    pub fn application_name(mut self, name: impl Into<String>) -> Self {
        self.client.application_name = name.into();
        self
    }

    /// Starts the client with an existing session instead of anonymous.
    pub fn session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    /// Returns [`CrmError::Transport`] if the transport config does not
    /// validate or the HTTP client cannot be built. Nothing is sent.
    pub fn build(self) -> Result<CrmClient, CrmError> {
        let transport = HttpTransport::new(&self.transport)?;
        tracing::info!(endpoint = transport.endpoint(), "crm client ready");

        let mut client = SessionClient::with_config(transport, self.client);
        if let Some(session) = self.session {
            client.set_session(session);
        }
        Ok(client)
    }
}
