//! Serialization of Kafka documents to YAML or JSON strings.
//!
//! Rendering or persisting the text is left to the host.

use crate::docs::KafkaDocument;
use anyhow::{Context, Result};
use log::debug;

/// Serializes a Kafka document to YAML format.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_yaml(doc: &KafkaDocument) -> Result<String> {
    debug!("Serializing Kafka document to YAML");
    serde_yaml::to_string(doc).context("Failed to serialize Kafka document to YAML")
}

/// Serializes a Kafka document to JSON format with pretty printing.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(doc: &KafkaDocument) -> Result<String> {
    debug!("Serializing Kafka document to JSON");
    serde_json::to_string_pretty(doc).context("Failed to serialize Kafka document to JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::{EndpointDoc, Info};
    use crate::listeners::EndpointType;
    use crate::models::{Model, Properties, Property};
    use crate::type_resolver::PrimitiveType;
    use serde_json::json;
    use std::collections::BTreeMap;

    /// Helper function to create a small Kafka document for testing
    fn create_test_document() -> KafkaDocument {
        let mut properties = Properties::default();
        properties.insert("id".to_string(), Property::Primitive(PrimitiveType::U64));
        properties.insert(
            "status".to_string(),
            Property::Enum(vec!["NEW".to_string(), "PAID".to_string()]),
        );

        let mut definitions = BTreeMap::new();
        definitions.insert("OrderCreated".to_string(), Model::new("OrderCreated".to_string(), properties));

        KafkaDocument {
            info: Info {
                title: "Test API".to_string(),
                version: "1.0.0".to_string(),
                description: Some("A test API".to_string()),
            },
            endpoints: vec![EndpointDoc {
                topic: "orders".to_string(),
                endpoint_type: EndpointType::Consumer,
                payload: "OrderCreated".to_string(),
                schema: Property::Reference("OrderCreated".to_string()),
                example: Some(json!({"id": 0, "status": "NEW"})),
            }],
            definitions,
        }
    }

    #[test]
    fn test_serialize_yaml() {
        let doc = create_test_document();
        let yaml = serialize_yaml(&doc).unwrap();

        assert!(yaml.contains("info:"));
        assert!(yaml.contains("title: Test API"));
        assert!(yaml.contains("description: A test API"));
        assert!(yaml.contains("topic: orders"));
        assert!(yaml.contains("type: CONSUMER"));
        assert!(yaml.contains("#/definitions/OrderCreated"));
        assert!(yaml.contains("definitions:"));

        let parsed: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed["endpoints"][0]["example"]["status"], "NEW");
    }

    #[test]
    fn test_serialize_json() {
        let doc = create_test_document();
        let json = serialize_json(&doc).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["info"]["title"], "Test API");
        assert_eq!(parsed["endpoints"][0]["schema"]["$ref"], "#/definitions/OrderCreated");
        assert_eq!(
            parsed["definitions"]["OrderCreated"]["properties"]["id"],
            json!({"type": "integer", "format": "int64"})
        );
        assert_eq!(
            parsed["definitions"]["OrderCreated"]["properties"]["status"]["enum"],
            json!(["NEW", "PAID"])
        );
    }

    #[test]
    fn test_serialize_json_pretty_format() {
        let doc = create_test_document();
        let json = serialize_json(&doc).unwrap();

        assert!(json.contains('\n'));
        assert!(json.contains("  "));
        assert!(json.lines().count() > 5, "Pretty printed JSON should have multiple lines");
    }

    #[test]
    fn test_serialize_json_keeps_property_order() {
        let doc = create_test_document();
        let json = serialize_json(&doc).unwrap();

        let id = json.find("\"id\"").unwrap();
        let status = json.find("\"status\"").unwrap();
        assert!(id < status);
    }
}
