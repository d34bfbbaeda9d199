use crate::analyzers::{DependencyExtractor, ImportExtractor, SourceParser, TreeSitterParser};
use crate::classifier::ArchitectureClassifier;
use crate::config::ArchmapConfig;
use crate::core::Result;
use crate::docs::{ConceptExtractor, DocumentationGenerator, IdentifierConcepts, OutlineGenerator};
use crate::embedding::{EmbeddingProvider, HashedBagOfWords};
use crate::graph::DEFAULT_TOP_N;

/// The collaborators a run depends on.
///
/// Optional capabilities are checked before use: without a classifier the
/// architecture type is `unknown`, without a dependency extractor the graph
/// stays empty, without a concept extractor documentation has no key
/// concepts.
pub struct AnalysisServices {
    pub parser: Box<dyn SourceParser>,
    pub embedder: Box<dyn EmbeddingProvider>,
    pub classifier: Option<Box<dyn ArchitectureClassifier>>,
    pub documentation: Box<dyn DocumentationGenerator>,
    pub dependencies: Option<Box<dyn DependencyExtractor>>,
    pub concepts: Option<Box<dyn ConceptExtractor>>,
}

impl Default for AnalysisServices {
    fn default() -> Self {
        Self {
            parser: Box::new(TreeSitterParser::new()),
            embedder: Box::new(HashedBagOfWords::default()),
            classifier: None,
            documentation: Box::new(OutlineGenerator::new()),
            dependencies: Some(Box::new(ImportExtractor)),
            concepts: Some(Box::new(IdentifierConcepts::default())),
        }
    }
}

impl AnalysisServices {
    /// Built-in services with an embedding of the given width.
    pub fn builtin(embedding_dimensions: usize) -> Result<Self> {
        Ok(Self {
            embedder: Box::new(HashedBagOfWords::new(embedding_dimensions)?),
            ..Self::default()
        })
    }

    pub fn with_parser(mut self, parser: impl SourceParser + 'static) -> Self {
        self.parser = Box::new(parser);
        self
    }

    pub fn with_embedder(mut self, embedder: impl EmbeddingProvider + 'static) -> Self {
        self.embedder = Box::new(embedder);
        self
    }

    pub fn with_classifier(mut self, classifier: impl ArchitectureClassifier + 'static) -> Self {
        self.classifier = Some(Box::new(classifier));
        self
    }

    pub fn with_documentation(
        mut self,
        generator: impl DocumentationGenerator + 'static,
    ) -> Self {
        self.documentation = Box::new(generator);
        self
    }

    pub fn with_dependencies(mut self, extractor: Option<Box<dyn DependencyExtractor>>) -> Self {
        self.dependencies = extractor;
        self
    }

    pub fn with_concepts(mut self, extractor: Option<Box<dyn ConceptExtractor>>) -> Self {
        self.concepts = extractor;
        self
    }

    pub fn has_classifier(&self) -> bool {
        self.classifier.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Number of central components to report
    pub top_n: usize,
    /// Analyze files on the rayon pool
    pub parallel: bool,
    pub respect_gitignore: bool,
    pub ignore_patterns: Vec<String>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            parallel: false,
            respect_gitignore: true,
            ignore_patterns: Vec::new(),
        }
    }
}

impl PipelineOptions {
    pub fn from_config(config: &ArchmapConfig) -> Self {
        Self {
            top_n: config.top_n(),
            parallel: config.parallel(),
            respect_gitignore: config.respect_gitignore(),
            ignore_patterns: config.ignore_patterns(),
        }
    }
}
