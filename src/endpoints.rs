//! Discovery of the Kafka endpoints declared by an application's components.

use crate::classpath::{normalize_path, ClassPath};
use crate::docket::Docket;
use crate::error::{Error, Result};
use crate::listeners::{KafkaEndpoint, KafkaListenersScanner};
use crate::type_resolver::TypeResolver;
use log::{debug, error, info, warn};
use std::collections::HashSet;

/// The set of Kafka endpoints found below a docket's base package.
///
/// The set is computed once, in [`KafkaEndpointsService::new`], and never rescanned.
#[derive(Debug)]
pub struct KafkaEndpointsService {
    endpoints: HashSet<KafkaEndpoint>,
}

impl KafkaEndpointsService {
    /// Scans `classpath` for marked components below the docket's base package and
    /// collects their endpoints through `listeners_scanner`.
    ///
    /// Payload types are resolved in the module of the component declaring them, so
    /// endpoints are equal exactly when they name the same topic, direction and type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingBasePackage`] if the docket has no base package, and
    /// [`Error::AmbiguousType`] if a payload's simple name cannot be told apart.
    pub fn new(docket: &Docket, classpath: &ClassPath, listeners_scanner: &dyn KafkaListenersScanner) -> Result<Self> {
        let base_package = docket.normalized_base_package().ok_or(Error::MissingBasePackage)?;
        info!("Scanning for Kafka endpoints in package '{}'", base_package);

        let endpoints = Self::discover(docket, classpath, listeners_scanner, &base_package)?;

        info!("Found {} Kafka endpoints", endpoints.len());
        Ok(Self { endpoints })
    }

    pub fn endpoints(&self) -> &HashSet<KafkaEndpoint> {
        &self.endpoints
    }

    fn discover(
        docket: &Docket,
        classpath: &ClassPath,
        listeners_scanner: &dyn KafkaListenersScanner,
        base_package: &str,
    ) -> Result<HashSet<KafkaEndpoint>> {
        if !classpath.contains_package(base_package) {
            warn!("No modules found in package '{}'", base_package);
        }

        let mut candidates = classpath.find_candidate_components(base_package, &docket.component_markers);
        for component in &docket.components {
            let component = normalize_path(component);
            if !candidates.contains(&component) {
                candidates.push(component);
            }
        }

        let type_resolver = TypeResolver::new(classpath);
        let mut endpoints = HashSet::new();
        for candidate in &candidates {
            debug!("Inspecting component {}", candidate);

            let Some(class) = classpath.find_class(candidate) else {
                error!("Class {} not found", candidate);
                continue;
            };

            for mut endpoint in listeners_scanner.kafka_endpoints_from_class(&class) {
                endpoint.payload = type_resolver.canonicalize(&endpoint.payload, &class.module_path)?;
                debug!("Registering endpoint: {}", endpoint);
                endpoints.insert(endpoint);
            }
        }

        Ok(endpoints)
    }
}
