// Export modules for library usage
pub mod analyzers;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod core;
pub mod docs;
pub mod embedding;
pub mod graph;
pub mod io;
pub mod observability;
pub mod pipeline;

// Re-export commonly used types
pub use crate::core::{
    ArchitectureAnalysis, ArchitectureType, DependencyEdge, Error, FailedFile, FileAnalysis,
    Language, ModularityScore, ProjectFile, ProjectReport, Result,
};

pub use crate::analyzers::{FileAnalyzer, SourceParser, TreeSitterParser};
pub use crate::classifier::{aggregate_embeddings, predict, ArchitectureClassifier, DenseClassifier};
pub use crate::docs::{enhance, DocumentationContext, DocumentationGenerator};
pub use crate::embedding::{EmbeddingProvider, HashedBagOfWords};
pub use crate::graph::DependencyGraph;
pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};
pub use crate::pipeline::{analyze_project, AnalysisServices, PipelineOptions, ProjectAnalyzer};
