//! Verb and payload types for dispatched commands

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP verbs accepted by the Capsule v2 API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verb {
    Get,
    Post,
    Put,
}

impl Verb {
    /// Wire name of the verb
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
        }
    }
}

/// Request payload with its wire encoding decided up front.
///
/// The encoding is carried by the variant, never inferred from the
/// value's shape. A single call never mixes encodings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Payload {
    /// JSON object; becomes the query string on GET and the JSON body
    /// on POST/PUT.
    Json(Value),
    /// Legacy XML body, serialized under the `root` element.
    Xml {
        /// Name of the XML root element
        root: String,
        /// Content serialized beneath the root
        value: Value,
    },
}

impl Payload {
    /// Create a JSON payload
    pub fn json(value: Value) -> Self {
        Self::Json(value)
    }

    /// Create an XML payload with the given root element name
    pub fn xml(root: impl Into<String>, value: Value) -> Self {
        Self::Xml {
            root: root.into(),
            value,
        }
    }
}
