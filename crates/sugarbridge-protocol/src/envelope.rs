//! Recognising the CRM's error envelope.
//!
//! The endpoint reports failures in-band: the response body is a normal
//! JSON object that happens to carry `name`, `number`, and `description`.
//! There is no distinct message type, so recognition is structural and a
//! genuine record with exactly those three fields would be misread as an
//! error. [`classify`] is the one place that rule lives.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::scalar_to_string;

/// A failure reported by the CRM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Short error name, e.g. `"Invalid Login"`.
    pub name: String,
    /// Numeric error code.
    pub number: i64,
    /// Human-readable explanation.
    pub description: String,
}

impl fmt::Display for ErrorEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name, self.number, self.description)
    }
}

impl ErrorEnvelope {
    /// Reads an envelope out of `value` if it has the error shape: an
    /// object with non-null `name`, `number`, and `description`.
    pub fn detect(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let name = object.get("name").filter(|v| !v.is_null())?;
        let number = object.get("number").filter(|v| !v.is_null())?;
        let description = object.get("description").filter(|v| !v.is_null())?;

        let number = match number {
            Value::Number(n) => n.as_i64().unwrap_or_default(),
            Value::String(s) => s.trim().parse().unwrap_or_default(),
            _ => 0,
        };

        Some(Self {
            name: scalar_to_string(name),
            number,
            description: scalar_to_string(description),
        })
    }
}

/// Splits a decoded response into data or a remote error.
///
/// ```rust
/// use serde_json::json;
/// use sugarbridge_protocol::classify;
///
/// let err = classify(json!({"name": "MyError", "number": 10, "description": "bad"}))
///     .unwrap_err();
/// assert_eq!(err.name, "MyError");
///
/// assert!(classify(json!({"id": "abc"})).is_ok());
/// ```
pub fn classify(response: Value) -> Result<Value, ErrorEnvelope> {
    match ErrorEnvelope::detect(&response) {
        Some(envelope) => Err(envelope),
        None => Ok(response),
    }
}
