//! Scripted transport shared by the session integration tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use sugarbridge_session::{Session, SessionClient};
use sugarbridge_transport::{Transport, TransportError};

/// One call the client sent.
#[derive(Debug, Clone)]
pub struct SentCall {
    pub method: String,
    /// `rest_data` exactly as it went out; key order is significant.
    pub raw: String,
    pub rest_data: Value,
}

/// A transport that answers from a queue of canned replies and records
/// every call it receives.
///
/// Clones share state, so a test can keep one handle for inspection while
/// the client owns the other.
#[derive(Clone, Default)]
pub struct MockTransport {
    replies: Arc<Mutex<VecDeque<Result<Value, TransportError>>>>,
    calls: Arc<Mutex<Vec<SentCall>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful reply.
    pub fn reply(&self, body: Value) -> &Self {
        self.replies.lock().unwrap().push_back(Ok(body));
        self
    }

    /// Queues a transport failure.
    pub fn fail(&self, error: TransportError) -> &Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    /// Everything sent so far, oldest first.
    pub fn calls(&self) -> Vec<SentCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// The most recent call.
    pub fn last(&self) -> SentCall {
        self.calls().pop().expect("no call was sent")
    }
}

impl Transport for MockTransport {
    async fn call(&self, method: &str, rest_data: &str) -> Result<Value, TransportError> {
        let parsed: Value =
            serde_json::from_str(rest_data).expect("rest_data should be JSON");
        self.calls.lock().unwrap().push(SentCall {
            method: method.to_string(),
            raw: rest_data.to_string(),
            rest_data: parsed,
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Value::Null))
    }
}

/// The envelope the CRM sends for any failed call.
pub fn error_envelope() -> Value {
    json!({"name": "MyError", "number": 10, "description": "bad"})
}

/// A client already holding session `abc`, plus a handle on its transport.
pub fn authenticated_client() -> (SessionClient<MockTransport>, MockTransport) {
    let transport = MockTransport::new();
    let client = SessionClient::with_session(transport.clone(), Session::from_token("abc"));
    (client, transport)
}

/// Builds an array-form `name_value_list`.
pub fn nv(pairs: &[(&str, &str)]) -> Value {
    Value::Array(
        pairs
            .iter()
            .map(|(name, value)| json!({"name": name, "value": value}))
            .collect(),
    )
}
