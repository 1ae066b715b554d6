//! Kafka endpoint documentation from Rust source.
//!
//! This library inspects the source tree of an application for components that
//! consume from or produce to Kafka topics and describes every payload as a
//! Swagger-style schema definition with an example JSON body. Discovery is static:
//! the sources are parsed with `syn`, nothing is compiled or executed.
//!
//! # Declarations
//!
//! Components are structs carrying a marker attribute (`#[component]` or
//! `#[service]` by default). Their methods declare endpoints:
//!
//! ```ignore
//! #[component]
//! pub struct OrderListener;
//!
//! impl OrderListener {
//!     #[kafka_listener(topics = ["orders"])]
//!     pub fn on_order(&self, event: OrderCreated) {}
//!
//!     #[kafka_producer(topic = "invoices")]
//!     pub fn publish(&self, invoice: Invoice) {}
//! }
//! ```
//!
//! # Architecture
//!
//! 1. [`scanner`] and [`parser`] - enumerate and parse the source files
//! 2. [`classpath`] - the parsed tree, component discovery and class lookup
//! 3. [`listeners`] - extraction of endpoints from a component
//! 4. [`endpoints`] - the deduplicated endpoint set of a base package
//! 5. [`type_resolver`] and [`models`] - schema definitions and examples of payloads
//! 6. [`docs`] and [`serializer`] - the assembled document and its YAML/JSON text
//!
//! # Example Usage
//!
//! ```no_run
//! use kafka_docs_from_source::{docket::Docket, generate::generate, serializer::serialize_json};
//!
//! let docket = Docket::new("./order-service/src").base_package("crate::kafka");
//! let doc = generate(&docket).unwrap();
//! println!("{}", serialize_json(&doc).unwrap());
//! ```

pub mod attributes;
pub mod classpath;
pub mod docket;
pub mod docs;
pub mod endpoints;
pub mod error;
pub mod generate;
pub mod listeners;
pub mod models;
pub mod parser;
pub mod scanner;
pub mod serializer;
pub mod type_resolver;
