use crate::embedding::DEFAULT_DIMENSIONS;
use crate::graph::DEFAULT_TOP_N;
use crate::io::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_OUTPUT_PATH: &str = "analysis_results.json";

/// Root of `.archmap.toml`. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArchmapConfig {
    #[serde(default)]
    pub analysis: Option<AnalysisConfig>,

    #[serde(default)]
    pub embedding: Option<EmbeddingConfig>,

    #[serde(default)]
    pub classifier: Option<ClassifierConfig>,

    #[serde(default)]
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Number of central components to report
    pub top_n: Option<usize>,
    /// Analyze files on the rayon pool
    pub parallel: Option<bool>,
    pub respect_gitignore: Option<bool>,
    /// Glob patterns, relative to the project root
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub dimensions: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// JSON weights file for the dense classifier
    pub model_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<PathBuf>,
    pub format: Option<OutputFormat>,
}

impl ArchmapConfig {
    pub fn top_n(&self) -> usize {
        self.analysis
            .as_ref()
            .and_then(|a| a.top_n)
            .unwrap_or(DEFAULT_TOP_N)
    }

    pub fn parallel(&self) -> bool {
        self.analysis
            .as_ref()
            .and_then(|a| a.parallel)
            .unwrap_or(false)
    }

    pub fn respect_gitignore(&self) -> bool {
        self.analysis
            .as_ref()
            .and_then(|a| a.respect_gitignore)
            .unwrap_or(true)
    }

    pub fn ignore_patterns(&self) -> Vec<String> {
        self.analysis
            .as_ref()
            .map(|a| a.ignore_patterns.clone())
            .unwrap_or_default()
    }

    pub fn embedding_dimensions(&self) -> usize {
        self.embedding
            .as_ref()
            .and_then(|e| e.dimensions)
            .unwrap_or(DEFAULT_DIMENSIONS)
    }

    pub fn model_path(&self) -> Option<PathBuf> {
        self.classifier.as_ref().and_then(|c| c.model_path.clone())
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .as_ref()
            .and_then(|o| o.path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH))
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output
            .as_ref()
            .and_then(|o| o.format)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_sections() {
        let config = ArchmapConfig::default();
        assert_eq!(config.top_n(), DEFAULT_TOP_N);
        assert!(!config.parallel());
        assert!(config.respect_gitignore());
        assert!(config.ignore_patterns().is_empty());
        assert_eq!(config.embedding_dimensions(), DEFAULT_DIMENSIONS);
        assert_eq!(config.model_path(), None);
        assert_eq!(config.output_path(), PathBuf::from("analysis_results.json"));
        assert_eq!(config.output_format(), OutputFormat::Json);
    }
}
