use std::path::PathBuf;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the library
#[derive(Debug)]
pub enum Error {
    ParseError { file: PathBuf, message: String },
    /// The docket does not name a base package to scan
    MissingBasePackage,
    SourceRootNotFound(PathBuf),
    /// Two distinct types resolved to the same schema name
    SchemaNameCollision {
        name: String,
        existing: String,
        conflicting: String,
    },
    /// The requested type does not resolve to a struct definition
    NotAModel(String),
    /// A simple type name matches several definitions and no import decides between them
    AmbiguousType {
        name: String,
        context: String,
        candidates: Vec<String>,
    },
    SerializationError(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::ParseError { file, message } => {
                write!(f, "Parse error in {}: {}", file.display(), message)
            }
            Error::MissingBasePackage => write!(
                f,
                "Base package not provided - please provide a docket with base_package defined"
            ),
            Error::SourceRootNotFound(path) => {
                write!(f, "Source root does not exist: {}", path.display())
            }
            Error::SchemaNameCollision {
                name,
                existing,
                conflicting,
            } => write!(
                f,
                "Schema name '{}' is used by both {} and {}; add #[api_model(\"...\")] to one of them",
                name, existing, conflicting
            ),
            Error::NotAModel(name) => write!(f, "Type {} is not a struct and cannot be registered as a model", name),
            Error::AmbiguousType {
                name,
                context,
                candidates,
            } => write!(
                f,
                "Type {} used in module '{}' is ambiguous between {}; import or qualify it",
                name,
                context,
                candidates.join(", ")
            ),
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::SerializationError(format!("YAML error: {}", err))
    }
}
