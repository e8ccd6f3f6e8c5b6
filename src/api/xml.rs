//! Legacy XML codec for structured payloads and responses.
//!
//! The Capsule v2 legacy surface speaks attribute-free XML: every JSON
//! object becomes a nest of elements, sequences repeat their parent's
//! element name, and empty values are suppressed entirely. Encoding
//! emits an XML declaration; decoding does not require one.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use serde_json::{Map, Value};

use super::error::ApiError;

/// Encode a value as an XML document under the given root element.
pub fn to_xml(root: &str, value: &Value) -> Result<String, ApiError> {
    let mut writer = Writer::new(Vec::new());
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| ApiError::Xml(e.to_string()))?;
    write_element(&mut writer, root, value)?;
    String::from_utf8(writer.into_inner()).map_err(|e| ApiError::Xml(e.to_string()))
}

fn write_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &Value) -> Result<(), ApiError> {
    match value {
        // Suppressed rather than emitted as an empty element
        Value::Null => Ok(()),
        // Sequences repeat the enclosing element name per item
        Value::Array(items) => {
            for item in items {
                write_element(writer, name, item)?;
            }
            Ok(())
        }
        Value::Object(map) => {
            writer
                .write_event(Event::Start(BytesStart::new(name)))
                .map_err(|e| ApiError::Xml(e.to_string()))?;
            for (key, child) in map {
                write_element(writer, key, child)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(name)))
                .map_err(|e| ApiError::Xml(e.to_string()))
        }
        scalar => {
            let text = match scalar {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            writer
                .write_event(Event::Start(BytesStart::new(name)))
                .map_err(|e| ApiError::Xml(e.to_string()))?;
            writer
                .write_event(Event::Text(BytesText::new(&text)))
                .map_err(|e| ApiError::Xml(e.to_string()))?;
            writer
                .write_event(Event::End(BytesEnd::new(name)))
                .map_err(|e| ApiError::Xml(e.to_string()))
        }
    }
}

/// Decode an XML document into its root element name and content.
pub fn from_xml(text: &str) -> Result<(String, Value), ApiError> {
    let doc = roxmltree::Document::parse(text).map_err(|e| ApiError::Xml(e.to_string()))?;
    let root = doc.root_element();
    Ok((root.tag_name().name().to_string(), element_value(root)))
}

fn element_value(node: roxmltree::Node) -> Value {
    let children: Vec<_> = node.children().filter(|n| n.is_element()).collect();
    if children.is_empty() {
        let text = node.text().map(str::trim).unwrap_or("");
        if text.is_empty() {
            Value::Null
        } else {
            Value::String(text.to_string())
        }
    } else {
        let mut map = Map::new();
        for child in children {
            let name = child.tag_name().name().to_string();
            let value = element_value(child);
            // Empty elements are suppressed on decode as well
            if value.is_null() {
                continue;
            }
            match map.get_mut(&name) {
                Some(Value::Array(items)) => items.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    map.insert(name, value);
                }
            }
        }
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn encodes_nested_structure_under_root() {
        let xml = to_xml(
            "person",
            &json!({
                "first_name": "Eric",
                "last_name": "Draven"
            }),
        )
        .unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<person>"));
        assert!(xml.contains("<first_name>Eric</first_name>"));
        assert!(xml.contains("<last_name>Draven</last_name>"));
        assert!(xml.ends_with("</person>"));
    }

    #[test]
    fn structured_payload_round_trips_under_its_root() {
        let original = json!({
            "first_name": "Eric",
            "contacts": {
                "email": {
                    "email_address": "eric@thecrow.com"
                }
            }
        });

        let encoded = to_xml("person", &original).unwrap();
        let (root, decoded) = from_xml(&encoded).unwrap();

        assert_eq!(root, "person");
        assert_eq!(decoded, original);
    }

    #[test]
    fn repeated_siblings_decode_as_a_sequence() {
        let (root, decoded) =
            from_xml("<tags><tag>customer</tag><tag>lead</tag></tags>").unwrap();

        assert_eq!(root, "tags");
        assert_eq!(decoded, json!({"tag": ["customer", "lead"]}));
    }

    #[test]
    fn empty_elements_are_suppressed() {
        let xml = to_xml("person", &json!({"first_name": "Eric", "title": null})).unwrap();
        assert!(!xml.contains("title"));

        let (_, decoded) = from_xml("<person><first_name>Eric</first_name><title/></person>").unwrap();
        assert_eq!(decoded, json!({"first_name": "Eric"}));
    }

    #[test]
    fn scalar_text_is_escaped() {
        let xml = to_xml("organisation", &json!({"name": "Smith & Sons <Ltd>"})).unwrap();
        assert!(xml.contains("Smith &amp; Sons &lt;Ltd&gt;"));

        let (_, decoded) = from_xml(&xml).unwrap();
        assert_eq!(decoded, json!({"name": "Smith & Sons <Ltd>"}));
    }
}
