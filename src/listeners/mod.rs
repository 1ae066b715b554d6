//! Kafka endpoint extraction from component classes.
//!
//! A [`KafkaListenersScanner`] looks at one resolved component and reports the Kafka
//! topics it consumes from or produces to, together with the payload type carried on
//! each topic. The endpoint scanner decides *which* classes to look at; implementations
//! of this trait decide *what* in a class counts as a listener.
//!
//! # Example
//!
//! ```no_run
//! use kafka_docs_from_source::classpath::ClassPath;
//! use kafka_docs_from_source::listeners::{KafkaListenersScanner, annotated::AnnotatedListenersScanner};
//! use std::path::Path;
//!
//! let classpath = ClassPath::load(Path::new("src")).unwrap();
//! let class = classpath.find_class("listeners::OrderListener").unwrap();
//! let endpoints = AnnotatedListenersScanner.kafka_endpoints_from_class(&class);
//! println!("Found {} endpoints", endpoints.len());
//! ```

pub mod annotated;

use crate::classpath::ComponentClass;
use crate::type_resolver::TypeInfo;
use serde::Serialize;
use std::fmt;

/// Extracts Kafka endpoints from a single component class.
pub trait KafkaListenersScanner {
    /// Returns every endpoint declared by `class`, possibly none.
    fn kafka_endpoints_from_class(&self, class: &ComponentClass<'_>) -> Vec<KafkaEndpoint>;
}

/// One topic interaction point of the application.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KafkaEndpoint {
    /// The Kafka topic
    pub topic: String,
    /// Whether the application publishes to or consumes from the topic
    pub endpoint_type: EndpointType,
    /// Payload type, as written at the declaration site until the endpoints service
    /// rewrites it crate-absolute
    pub payload: TypeInfo,
}

/// Direction of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EndpointType {
    Producer,
    Consumer,
}

impl KafkaEndpoint {
    pub fn new(topic: impl Into<String>, endpoint_type: EndpointType, payload: TypeInfo) -> Self {
        Self {
            topic: topic.into(),
            endpoint_type,
            payload,
        }
    }

    pub fn consumer(topic: impl Into<String>, payload: TypeInfo) -> Self {
        Self::new(topic, EndpointType::Consumer, payload)
    }

    pub fn producer(topic: impl Into<String>, payload: TypeInfo) -> Self {
        Self::new(topic, EndpointType::Producer, payload)
    }
}

impl fmt::Display for EndpointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointType::Producer => write!(f, "PRODUCER"),
            EndpointType::Consumer => write!(f, "CONSUMER"),
        }
    }
}

impl fmt::Display for KafkaEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.endpoint_type, self.topic, self.payload)
    }
}
