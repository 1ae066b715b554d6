//! One-call documentation pass over a source tree.

use crate::classpath::ClassPath;
use crate::docket::Docket;
use crate::docs::{KafkaDocsBuilder, KafkaDocument};
use crate::endpoints::KafkaEndpointsService;
use crate::error::{Error, Result};
use crate::listeners::annotated::AnnotatedListenersScanner;
use crate::listeners::{KafkaEndpoint, KafkaListenersScanner};
use crate::models::ModelsService;
use crate::type_resolver::TypeResolver;
use log::info;

/// Loads the docket's source root and documents it with the attribute based scanner.
///
/// # Errors
///
/// Fails if the base package is missing, the source root does not exist, or two
/// payload types claim the same schema name.
pub fn generate(docket: &Docket) -> Result<KafkaDocument> {
    // Checked before touching the file system
    docket
        .normalized_base_package()
        .ok_or(Error::MissingBasePackage)?;

    let classpath = ClassPath::load(&docket.source_root)?;
    generate_from(docket, &classpath, &AnnotatedListenersScanner)
}

/// Documents an already loaded class path with a custom listener scanner.
pub fn generate_from(
    docket: &Docket,
    classpath: &ClassPath,
    listeners_scanner: &dyn KafkaListenersScanner,
) -> Result<KafkaDocument> {
    info!("Starting Kafka document generation...");

    let endpoints_service = KafkaEndpointsService::new(docket, classpath, listeners_scanner)?;

    let mut endpoints: Vec<&KafkaEndpoint> = endpoints_service.endpoints().iter().collect();
    endpoints.sort_by_key(|e| (e.topic.clone(), e.endpoint_type, e.payload.to_string()));

    info!("Registering payload models...");
    let mut models = ModelsService::new(TypeResolver::new(classpath));
    let mut builder = KafkaDocsBuilder::new(docket);
    for endpoint in endpoints {
        builder.add_endpoint(endpoint, &mut models)?;
    }

    let doc = builder.build(&models);
    info!(
        "Documented {} endpoints with {} models",
        doc.endpoints.len(),
        doc.definitions.len()
    );
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_generate_requires_base_package() {
        let result = generate(&Docket::new(PathBuf::from("/nonexistent/src")));

        assert!(matches!(result, Err(Error::MissingBasePackage)));
    }

    #[test]
    fn test_generate_missing_source_root() {
        let docket = Docket::new(PathBuf::from("/nonexistent/src")).base_package("listeners");

        let result = generate(&docket);

        assert!(matches!(result, Err(Error::SourceRootNotFound(_))));
    }

    #[test]
    fn test_generate_from_classpath() {
        let classpath = ClassPath::from_sources([
            (
                "listeners",
                r#"
                use crate::events::OrderCreated;

                #[component]
                pub struct OrderListener;

                impl OrderListener {
                    #[kafka_listener(topics = "orders")]
                    pub fn on_order(&self, event: OrderCreated) {}
                }
            "#,
            ),
            ("events", "pub struct OrderCreated { pub id: String }"),
        ])
        .unwrap();
        let docket = Docket::new("src").base_package("listeners");

        let doc = generate_from(&docket, &classpath, &AnnotatedListenersScanner).unwrap();

        assert_eq!(doc.endpoints.len(), 1);
        assert_eq!(doc.endpoints[0].payload, "OrderCreated");
        assert!(doc.definitions.contains_key("OrderCreated"));
    }
}
