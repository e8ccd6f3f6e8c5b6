//! Party operations: search, lookup, creation, update and tagging.
//!
//! Every operation here is a thin parameter-shaping call into
//! [`CapsuleClient::send`]; the dispatcher is the sole judge of HTTP
//! success, so nothing in this module re-checks status codes.

use super::client::CapsuleClient;
use super::command::{Payload, Verb};
use super::response::ApiResponse;
use log::warn;
use serde_json::{Value, json};

impl CapsuleClient {
    /// Search parties matching a free-text query
    pub async fn search_parties(&self, query: &str) -> anyhow::Result<Vec<Value>> {
        let response = self
            .send(
                "parties/search",
                Verb::Get,
                Some(Payload::json(json!({ "q": query }))),
            )
            .await?;

        Ok(extract_parties(response.into_value()))
    }

    /// Id of the first person matching an email address, if any
    pub async fn find_party_by_email(&self, email: &str) -> anyhow::Result<Option<String>> {
        let response = self
            .send(
                "party",
                Verb::Get,
                Some(Payload::json(json!({ "email": email, "start": 0 }))),
            )
            .await?;

        Ok(response.into_value().as_ref().and_then(first_person_id))
    }

    /// Fetch a single party record
    pub async fn find_party(&self, id: &str, options: Option<Value>) -> anyhow::Result<Value> {
        let command = format!("parties/{}", urlencoding::encode(id));
        let payload = options.map(Payload::json);
        let response = self.send(&command, Verb::Get, payload).await?;

        response
            .into_value()
            .ok_or_else(|| anyhow::anyhow!("Party {} response had no body", id))
    }

    /// Update a party record
    pub async fn update_party(&self, id: &str, data: Value) -> anyhow::Result<()> {
        let command = format!("parties/{}", urlencoding::encode(id));
        self.send(&command, Verb::Put, Some(Payload::json(data)))
            .await?;
        Ok(())
    }

    /// Create a person record.
    ///
    /// Returns the new resource id when the server answers 201, or the
    /// decoded body otherwise.
    pub async fn create_person(&self, data: Value) -> anyhow::Result<Value> {
        self.create_party("person", data).await
    }

    /// Create an organisation record
    pub async fn create_organisation(&self, data: Value) -> anyhow::Result<Value> {
        self.create_party("organisation", data).await
    }

    // Creates go over the legacy XML surface, with the command's path
    // segment doubling as the root element name.
    async fn create_party(&self, kind: &str, data: Value) -> anyhow::Result<Value> {
        let response = self
            .send(kind, Verb::Post, Some(Payload::xml(kind, data)))
            .await?;

        match response {
            ApiResponse::Created(id) => Ok(Value::String(id)),
            ApiResponse::Json(value) | ApiResponse::Xml(value) => Ok(value),
            ApiResponse::NoContent => Ok(Value::Bool(true)),
        }
    }

    /// Tag a party.
    ///
    /// One call per tag, in the given order. A failed tag is logged and
    /// the remaining tags are still applied.
    pub async fn add_tag(&self, id: &str, tags: &[&str]) -> anyhow::Result<()> {
        for tag in tags {
            let command = format!(
                "party/{}/tag/{}",
                urlencoding::encode(id),
                urlencoding::encode(tag)
            );
            if let Err(e) = self.send(&command, Verb::Post, None).await {
                warn!("Tagging party {} with '{}' failed: {}", id, tag, e);
            }
        }
        Ok(())
    }

    /// Tags currently on a party
    pub async fn list_tags(&self, id: &str) -> anyhow::Result<Vec<Value>> {
        let command = format!("party/{}/tag", urlencoding::encode(id));
        let response = self.send(&command, Verb::Get, None).await?;

        let tags = response
            .into_value()
            .and_then(|mut value| value.get_mut("tags").map(Value::take))
            .and_then(|tags| match tags {
                Value::Array(items) => Some(items),
                _ => None,
            })
            .unwrap_or_default();
        Ok(tags)
    }
}

/// Party records from a search response's `parties` field.
fn extract_parties(value: Option<Value>) -> Vec<Value> {
    value
        .and_then(|mut value| value.get_mut("parties").map(Value::take))
        .and_then(|parties| match parties {
            Value::Array(items) => Some(items),
            _ => None,
        })
        .unwrap_or_default()
}

/// Probe the `parties.person.id` path of an email lookup response.
///
/// `person` may arrive as a single record or a sequence; the id may be
/// numeric or a string. A missing path is an absent match, not an error.
fn first_person_id(value: &Value) -> Option<String> {
    let person = value.get("parties")?.get("person")?;
    let first = match person {
        Value::Array(items) => items.first()?,
        other => other,
    };
    match first.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
