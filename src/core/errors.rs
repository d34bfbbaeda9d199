//! Shared error types for the application

use crate::core::Language;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for archmap operations
#[derive(Debug, Error)]
pub enum Error {
    /// The parser has no grammar for this language
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(Language),

    /// Source rejected by the parser
    #[error("Parse error in {language} source: {message}")]
    Parse { language: Language, message: String },

    /// Classification was requested but no file produced an embedding
    #[error("No embeddings available: no file was analyzed successfully")]
    NoEmbeddingsAvailable,

    /// The classifier returned an index outside the architecture table
    #[error("Invalid classifier output: index {index} is outside the {table_len}-entry architecture table")]
    InvalidClassifierOutput { index: usize, table_len: usize },

    /// Modularity requested on a graph without edges
    #[error("Modularity undefined: the dependency graph has no edges")]
    ModularityUndefined,

    /// Embeddings of different lengths cannot be averaged
    #[error("Embedding dimension mismatch: expected {expected}, found {found}")]
    EmbeddingDimensionMismatch { expected: usize, found: usize },

    /// Embedding provider failures
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Classifier failures (model loading, shape errors)
    #[error("Classifier error: {0}")]
    Classifier(String),

    /// File system related errors
    #[error("File system error: {message}")]
    FileSystem {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Pattern errors
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),
}

impl Error {
    /// Create a file system error with path context
    pub fn file_system(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::FileSystem {
            message: message.into(),
            path: Some(path.into()),
            source: None,
        }
    }

    /// Create a file system error that keeps the underlying io error
    pub fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        Self::FileSystem {
            message: format!("{}: {}", path.display(), source),
            path: Some(path),
            source: Some(source),
        }
    }

    /// Create a parse error for a language
    pub fn parse(language: Language, message: impl Into<String>) -> Self {
        Self::Parse {
            language,
            message: message.into(),
        }
    }

    /// Errors that only invalidate a single file and never the whole run
    pub fn is_file_scoped(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedLanguage(_)
                | Self::Parse { .. }
                | Self::Embedding(_)
                | Self::FileSystem { .. }
                | Self::Io(_)
        )
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
