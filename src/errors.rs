//! Shared error types for report compilation and generation.
//!
//! Only conditions that stop a report are errors. A parameter value or a
//! threshold that cannot be read as a number is data, not an error: it
//! surfaces as [`Verdict::Unknown`](crate::compliance::Verdict) or as an
//! empty statistic.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Entities a collaborator may fail to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Asset,
    FormConfiguration,
    Campaign,
    Profile,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::Asset => "asset",
            Entity::FormConfiguration => "form configuration",
            Entity::Campaign => "campaign",
            Entity::Profile => "report profile",
        };
        f.write_str(name)
    }
}

/// Main error type for report operations
#[derive(Debug, Error)]
pub enum Error {
    /// A required record does not exist; terminal for the whole request
    #[error("{entity} not found: {key}")]
    NotFound { entity: Entity, key: String },

    /// Invalid or inconsistent configuration / profile data
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Chart synthesis errors
    #[error("Chart error: {0}")]
    Chart(String),

    /// The external templating engine rejected the context
    #[error("Render error: {0}")]
    Render(String),

    /// Upload to the storage sink failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Writing the audit record failed
    #[error("Registry error: {0}")]
    Registry(String),

    /// A context key outside the report's field vocabulary
    #[error("Field {field} is not part of the {report} vocabulary")]
    UnknownField { report: String, field: String },

    /// Generic errors with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },

    /// File system errors with the offending path
    #[error("File system error: {message} ({})", path.display())]
    FileSystem {
        message: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}

impl Error {
    pub fn not_found(entity: Entity, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a file system error with path context
    pub fn file_system(
        message: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            message: message.into(),
            path: path.into(),
            source,
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Short stable category name, used in logs and CLI messages.
    pub fn category(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not-found",
            Self::Configuration(_) | Self::TomlDe(_) | Self::TomlSer(_) => "config",
            Self::Chart(_) | Self::Image(_) => "chart",
            Self::Render(_) => "render",
            Self::Storage(_) => "storage",
            Self::Registry(_) => "registry",
            Self::UnknownField { .. } => "vocabulary",
            Self::WithContext { .. } => "error",
            Self::FileSystem { .. } | Self::Io(_) => "io",
            Self::Json(_) => "json",
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}
