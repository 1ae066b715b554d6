use crate::docket::Docket;
use crate::error::Result;
use crate::listeners::{EndpointType, KafkaEndpoint};
use crate::models::{Model, ModelsService, Property};
use log::debug;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Kafka documentation builder
pub struct KafkaDocsBuilder {
    /// Document info section
    info: Info,
    /// One entry per endpoint
    endpoints: Vec<EndpointDoc>,
}

/// Document info object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Info {
    /// API title
    pub title: String,
    /// API version
    pub version: String,
    /// API description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A documented topic interaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointDoc {
    pub topic: String,
    #[serde(rename = "type")]
    pub endpoint_type: EndpointType,
    /// Schema name of the payload, or the payload type for non-model payloads
    pub payload: String,
    pub schema: Property,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
}

/// Complete documentation of an application's Kafka endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KafkaDocument {
    pub info: Info,
    pub endpoints: Vec<EndpointDoc>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub definitions: BTreeMap<String, Model>,
}

impl KafkaDocsBuilder {
    pub fn new(docket: &Docket) -> Self {
        debug!("Initializing KafkaDocsBuilder");
        Self {
            info: Info {
                title: docket.title.clone(),
                version: docket.version.clone(),
                description: docket.description.clone(),
            },
            endpoints: Vec::new(),
        }
    }

    /// Registers the endpoint's payload and records the endpoint.
    ///
    /// # Errors
    ///
    /// Propagates schema name collisions from the registry.
    pub fn add_endpoint(&mut self, endpoint: &KafkaEndpoint, models: &mut ModelsService) -> Result<()> {
        debug!("Adding endpoint: {}", endpoint);

        let (schema, example) = models.schema_for(&endpoint.payload)?;
        let payload = schema
            .reference()
            .map(str::to_string)
            .unwrap_or_else(|| endpoint.payload.to_string());

        self.endpoints.push(EndpointDoc {
            topic: endpoint.topic.clone(),
            endpoint_type: endpoint.endpoint_type,
            payload,
            schema,
            example,
        });
        Ok(())
    }

    pub fn build(mut self, models: &ModelsService) -> KafkaDocument {
        debug!("Building final Kafka document");

        self.endpoints.sort_by(|a, b| {
            (&a.topic, a.endpoint_type, &a.payload).cmp(&(&b.topic, b.endpoint_type, &b.payload))
        });

        KafkaDocument {
            info: self.info,
            endpoints: self.endpoints,
            definitions: models.get_definitions().clone(),
        }
    }
}
