//! Transport abstraction layer for sugarbridge.
//!
//! Provides the [`Transport`] trait that carries one RPC call to the CRM's
//! REST endpoint and hands back the JSON-decoded response body. The layers
//! above never see HTTP: they build a `rest_data` payload, pick a method
//! name, and let the transport deliver it.
//!
//! # Feature Flags
//!
//! - `http` (default): HTTP transport via `reqwest`

#![allow(async_fn_in_trait)]

mod config;
mod error;
#[cfg(feature = "http")]
mod http;

pub use config::TransportConfig;
pub use error::TransportError;
#[cfg(feature = "http")]
pub use http::HttpTransport;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counter for generating unique call IDs.
static NEXT_CALL_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identifier for a single RPC call, used to correlate log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallId(u64);

impl CallId {
    /// Allocates the next process-wide call ID.
    pub fn next() -> Self {
        Self(NEXT_CALL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "call-{}", self.0)
    }
}

/// The form fields every call posts to the endpoint.
///
/// The CRM reads the method name and the encoding flags from the form and
/// the actual arguments from `rest_data`, which is a JSON document whose
/// key order is the method's argument order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RpcForm<'a> {
    pub method: &'a str,
    pub input_type: &'static str,
    pub response_type: &'static str,
    pub rest_data: &'a str,
}

impl<'a> RpcForm<'a> {
    /// Builds the form for `method` with a pre-serialized `rest_data`.
    pub fn new(method: &'a str, rest_data: &'a str) -> Self {
        Self {
            method,
            input_type: "JSON",
            response_type: "JSON",
            rest_data,
        }
    }
}

/// Delivers RPC calls to the CRM endpoint.
///
/// Implementations own connection handling, TLS, and the call deadline.
/// They must not retry: every call is at-most-once from the caller's
/// point of view.
pub trait Transport: Send + Sync + 'static {
    /// Sends `method` with the given JSON-encoded `rest_data` and returns
    /// the decoded response body (object, array, string, or `null`).
    async fn call(
        &self,
        method: &str,
        rest_data: &str,
    ) -> Result<serde_json::Value, TransportError>;
}
