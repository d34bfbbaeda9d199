pub mod ast;
pub mod errors;

pub use errors::{Error, Result};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Java,
    TypeScript,
    JavaScript,
    Unknown,
}

impl Language {
    /// Languages with a registered file extension
    pub const SUPPORTED: [Language; 4] = [
        Language::Python,
        Language::Java,
        Language::TypeScript,
        Language::JavaScript,
    ];

    /// Extensions match case-sensitively: `.PY` is not Python.
    pub fn from_extension(ext: &str) -> Self {
        static EXTENSION_MAP: &[(&str, Language)] = &[
            ("py", Language::Python),
            ("java", Language::Java),
            ("ts", Language::TypeScript),
            ("js", Language::JavaScript),
        ];

        EXTENSION_MAP
            .iter()
            .find(|(known, _)| *known == ext)
            .map(|(_, lang)| *lang)
            .unwrap_or(Language::Unknown)
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    pub fn is_supported(self) -> bool {
        self != Language::Unknown
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Java => "java",
            Language::TypeScript => "typescript",
            Language::JavaScript => "javascript",
            Language::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    File,
    Dir,
}

/// An entry discovered under the project root.
///
/// `relative_path` is always `/`-separated so that report keys are identical
/// across platforms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectFile {
    pub relative_path: String,
    pub kind: FileKind,
}

impl ProjectFile {
    pub fn file(relative_path: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            kind: FileKind::File,
        }
    }

    pub fn dir(relative_path: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            kind: FileKind::Dir,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == FileKind::File
    }

    pub fn language(&self) -> Language {
        Language::from_path(Path::new(&self.relative_path))
    }
}

/// Per-file analysis record. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAnalysis {
    pub path: String,
    pub language: Language,
    pub metrics: BTreeMap<String, i64>,
    pub complexity: BTreeMap<String, f64>,
    pub embedding: Vec<f32>,
}

/// Directed `(source, target)` edge, serialized as a two-element array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DependencyEdge(pub String, pub String);

impl DependencyEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self(source.into(), target.into())
    }

    pub fn source(&self) -> &str {
        &self.0
    }

    pub fn target(&self) -> &str {
        &self.1
    }
}

/// Architecture styles, in classifier output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArchitectureType {
    Monolithic,
    Microservices,
    Layered,
    #[serde(rename = "Event-Driven")]
    EventDriven,
    #[serde(rename = "Plugin-based")]
    PluginBased,
    #[serde(rename = "Service-Oriented")]
    ServiceOriented,
    #[serde(rename = "Pipe-and-Filter")]
    PipeAndFilter,
    #[serde(rename = "Client-Server")]
    ClientServer,
    /// Classification did not run (no embeddings or no classifier)
    #[serde(rename = "unknown")]
    Unknown,
}

impl ArchitectureType {
    /// Index -> label table. Order is fixed by the classifier contract.
    pub const TABLE: [ArchitectureType; 8] = [
        ArchitectureType::Monolithic,
        ArchitectureType::Microservices,
        ArchitectureType::Layered,
        ArchitectureType::EventDriven,
        ArchitectureType::PluginBased,
        ArchitectureType::ServiceOriented,
        ArchitectureType::PipeAndFilter,
        ArchitectureType::ClientServer,
    ];

    pub fn from_index(index: usize) -> Result<Self> {
        Self::TABLE
            .get(index)
            .copied()
            .ok_or(Error::InvalidClassifierOutput {
                index,
                table_len: Self::TABLE.len(),
            })
    }

    pub fn label(self) -> &'static str {
        match self {
            ArchitectureType::Monolithic => "Monolithic",
            ArchitectureType::Microservices => "Microservices",
            ArchitectureType::Layered => "Layered",
            ArchitectureType::EventDriven => "Event-Driven",
            ArchitectureType::PluginBased => "Plugin-based",
            ArchitectureType::ServiceOriented => "Service-Oriented",
            ArchitectureType::PipeAndFilter => "Pipe-and-Filter",
            ArchitectureType::ClientServer => "Client-Server",
            ArchitectureType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ArchitectureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Central-component count over edge count.
///
/// Has no defined value on a graph without edges; that case is carried
/// explicitly instead of as 0, NaN or infinity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModularityScore {
    Defined { value: f64 },
    Undefined { reason: String },
}

impl ModularityScore {
    pub fn from_counts(central_components: usize, edges: usize) -> Self {
        if edges == 0 {
            Self::Undefined {
                reason: Error::ModularityUndefined.to_string(),
            }
        } else {
            Self::Defined {
                value: central_components as f64 / edges as f64,
            }
        }
    }

    pub fn value(&self) -> Result<f64> {
        match self {
            Self::Defined { value } => Ok(*value),
            Self::Undefined { .. } => Err(Error::ModularityUndefined),
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Self::Defined { .. })
    }
}

impl std::fmt::Display for ModularityScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Defined { value } => write!(f, "{value:.3}"),
            Self::Undefined { .. } => f.write_str("undefined (no dependency edges)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureAnalysis {
    pub dependency_graph: Vec<DependencyEdge>,
    pub central_components: Vec<String>,
    pub architecture_type: ArchitectureType,
    pub modularity_score: ModularityScore,
}

/// A file whose analysis failed and which is absent from every other mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedFile {
    pub path: String,
    pub reason: String,
}

/// The unit of output of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectReport {
    pub file_documentation: BTreeMap<String, String>,
    pub code_analysis: BTreeMap<String, FileAnalysis>,
    pub architecture_analysis: ArchitectureAnalysis,
    pub project_documentation: String,
    #[serde(default)]
    pub failed_files: Vec<FailedFile>,
}
