//! Decoded dispatcher results

use serde_json::Value;

/// Successful outcome of a dispatched request
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// 201 Created; the new resource id taken from the Location header
    Created(String),
    /// Decoded JSON body
    Json(Value),
    /// Decoded XML body, root element stripped
    Xml(Value),
    /// 2xx with nothing to decode
    NoContent,
}

impl ApiResponse {
    /// Decoded body, whichever encoding produced it
    pub fn into_value(self) -> Option<Value> {
        match self {
            ApiResponse::Json(value) | ApiResponse::Xml(value) => Some(value),
            _ => None,
        }
    }

    /// Resource id for a 201 Created response
    pub fn created_id(&self) -> Option<&str> {
        match self {
            ApiResponse::Created(id) => Some(id),
            _ => None,
        }
    }
}
