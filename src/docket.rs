//! Configuration for a documentation pass.
//!
//! A [`Docket`] names the source tree to inspect, the base package (module path)
//! whose components are scanned for Kafka listeners, and the info block of the
//! generated document. It can be built in code or deserialized from YAML/JSON:
//!
//! ```yaml
//! base_package: listeners
//! source_root: ./src
//! title: Order Service
//! version: 2.1.0
//! component_markers: [component, service, kafka_component]
//! components:
//!   - handlers::LegacyOrderHandler
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings consumed by the endpoint scanner and the document builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Docket {
    /// Module path whose marked components are scanned (e.g. `listeners` or `crate::kafka`)
    pub base_package: Option<String>,
    /// Directory holding the crate sources (the "class path")
    pub source_root: PathBuf,
    /// Attribute names identifying managed components, matched on the last path segment
    pub component_markers: Vec<String>,
    /// Component types registered explicitly by qualified path, scanned in addition to marked ones
    pub components: Vec<String>,
    pub title: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Default for Docket {
    fn default() -> Self {
        Self {
            base_package: None,
            source_root: PathBuf::from("src"),
            component_markers: vec!["component".to_string(), "service".to_string()],
            components: Vec::new(),
            title: "Kafka API".to_string(),
            version: "1.0.0".to_string(),
            description: None,
        }
    }
}

impl Docket {
    /// Creates a docket for the given source root with default settings.
    pub fn new(source_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            ..Self::default()
        }
    }

    pub fn base_package(mut self, base_package: impl Into<String>) -> Self {
        self.base_package = Some(base_package.into());
        self
    }

    pub fn component_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.component_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a component type to scan regardless of markers.
    pub fn component(mut self, qualified_name: impl Into<String>) -> Self {
        self.components.push(qualified_name.into());
        self
    }

    pub fn info(mut self, title: impl Into<String>, version: impl Into<String>, description: Option<String>) -> Self {
        self.title = title.into();
        self.version = version.into();
        self.description = description;
        self
    }

    /// Returns the normalized base package, or `None` when missing or blank.
    ///
    /// A leading `crate` segment is dropped, so `crate::listeners` and
    /// `listeners` name the same package and `crate` names the whole tree.
    pub fn normalized_base_package(&self) -> Option<String> {
        let raw = self.base_package.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }

        let stripped = raw
            .strip_prefix("crate::")
            .or_else(|| if raw == "crate" { Some("") } else { None })
            .unwrap_or(raw);

        Some(stripped.trim_matches(':').to_string())
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}
