//! Custom-field definition retrieval and caching.
//!
//! Definitions are server-defined metadata describing the extensible
//! fields available on an entity type. They change rarely, so the
//! client keeps a per-entity cache that is populated lazily and only
//! ever invalidated by an explicit bypass.

use super::client::CapsuleClient;
use super::command::Verb;
use crate::config::Representation;
use log::debug;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Mutex;

/// Client-owned cache of reshaped definitions keyed by entity name.
///
/// The lock guards the map only; it is never held across a fetch, so
/// two concurrent misses may both fetch and the later store wins.
#[derive(Debug, Default)]
pub struct FieldCache {
    entries: Mutex<HashMap<String, Value>>,
}

impl FieldCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached entry for an entity, if present
    pub fn get(&self, entity: &str) -> Option<Value> {
        self.entries.lock().unwrap().get(entity).cloned()
    }

    /// Drop the entry for an entity
    pub fn remove(&self, entity: &str) {
        self.entries.lock().unwrap().remove(entity);
    }

    /// Store the entry for an entity
    pub fn store(&self, entity: &str, value: Value) {
        self.entries
            .lock()
            .unwrap()
            .insert(entity.to_string(), value);
    }
}

impl CapsuleClient {
    /// Fetch the custom-field definitions for an entity type.
    ///
    /// With `use_cache` a previously fetched entry is returned without a
    /// network call. Without it, any cached entry is dropped first and
    /// the definitions are always fetched fresh; the fresh result is
    /// not stored.
    pub async fn custom_fields_definitions(
        &self,
        entity: &str,
        use_cache: bool,
    ) -> anyhow::Result<Value> {
        if use_cache {
            if let Some(hit) = self.field_cache().get(entity) {
                debug!("definitions cache hit for {}", entity);
                return Ok(hit);
            }
        } else {
            self.field_cache().remove(entity);
        }

        let command = format!("{}/fields/definitions", urlencoding::encode(entity));
        let response = self.send(&command, Verb::Get, None).await?;
        let decoded = response
            .into_value()
            .ok_or_else(|| anyhow::anyhow!("Definitions response for '{}' had no body", entity))?;

        let reshaped = reshape_definitions(decoded, self.representation());
        if use_cache {
            self.field_cache().store(entity, reshaped.clone());
        }
        Ok(reshaped)
    }
}

/// Reshape a decoded definitions response.
///
/// Hash mode keys each definition by its `name` field (removed from the
/// entry); list mode keeps the raw ordered list.
pub(crate) fn reshape_definitions(mut decoded: Value, representation: Representation) -> Value {
    let definitions = decoded
        .get_mut("definitions")
        .map(Value::take)
        .unwrap_or_else(|| Value::Array(Vec::new()));

    match representation {
        Representation::List => definitions,
        Representation::Hash => {
            let mut by_name = Map::new();
            if let Value::Array(items) = definitions {
                for mut item in items {
                    let name = item
                        .as_object_mut()
                        .and_then(|entry| entry.remove("name"));
                    match name {
                        Some(Value::String(name)) => {
                            by_name.insert(name, item);
                        }
                        Some(other) => {
                            by_name.insert(other.to_string(), item);
                        }
                        // Nameless definitions cannot be keyed; skip them
                        None => continue,
                    }
                }
            }
            Value::Object(by_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hash_mode_keys_definitions_by_name() {
        let decoded = json!({
            "definitions": [
                {"name": "X", "type": "text"},
                {"name": "Y", "type": "date"}
            ]
        });

        let reshaped = reshape_definitions(decoded, Representation::Hash);
        assert_eq!(
            reshaped,
            json!({
                "X": {"type": "text"},
                "Y": {"type": "date"}
            })
        );
    }

    #[test]
    fn list_mode_keeps_the_raw_order() {
        let decoded = json!({
            "definitions": [
                {"name": "X", "type": "text"},
                {"name": "Y", "type": "date"}
            ]
        });

        let reshaped = reshape_definitions(decoded, Representation::List);
        assert_eq!(
            reshaped,
            json!([
                {"name": "X", "type": "text"},
                {"name": "Y", "type": "date"}
            ])
        );
    }

    #[test]
    fn missing_definitions_field_reshapes_to_empty() {
        assert_eq!(
            reshape_definitions(json!({}), Representation::Hash),
            json!({})
        );
        assert_eq!(
            reshape_definitions(json!({}), Representation::List),
            json!([])
        );
    }

    #[test]
    fn cache_returns_stored_entries_until_removed() {
        let cache = FieldCache::new();
        assert_eq!(cache.get("person"), None);

        cache.store("person", json!({"X": {"type": "text"}}));
        assert_eq!(cache.get("person"), Some(json!({"X": {"type": "text"}})));
        // A second read is served from the same entry
        assert_eq!(cache.get("person"), Some(json!({"X": {"type": "text"}})));

        cache.remove("person");
        assert_eq!(cache.get("person"), None);
    }

    #[test]
    fn cache_entries_are_per_entity() {
        let cache = FieldCache::new();
        cache.store("person", json!(["a"]));
        cache.store("organisation", json!(["b"]));

        cache.remove("person");
        assert_eq!(cache.get("person"), None);
        assert_eq!(cache.get("organisation"), Some(json!(["b"])));
    }
}
