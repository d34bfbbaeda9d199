use crate::core::{ast::SyntaxTree, Error, FileAnalysis, Language, Result};
use crate::embedding::EmbeddingProvider;

pub mod imports;
pub mod metrics;
pub mod parser;

pub use imports::{DependencyExtractor, ImportExtractor};
pub use metrics::{compute_metrics, SourceMetrics};
pub use parser::TreeSitterParser;

/// Turns source text into a syntax tree.
pub trait SourceParser: Send + Sync {
    fn supports(&self, language: Language) -> bool;
    fn parse(&self, content: &str, language: Language) -> Result<SyntaxTree>;
}

/// A successful per-file analysis together with the tree it came from.
///
/// The tree is kept so later stages (dependency discovery, documentation)
/// can reuse it without re-parsing.
#[derive(Debug)]
pub struct ParsedFile {
    pub analysis: FileAnalysis,
    pub tree: SyntaxTree,
}

/// Combines parsing, metrics and embedding into one `FileAnalysis`.
pub struct FileAnalyzer<'a> {
    parser: &'a dyn SourceParser,
    embedder: &'a dyn EmbeddingProvider,
}

impl<'a> FileAnalyzer<'a> {
    pub fn new(parser: &'a dyn SourceParser, embedder: &'a dyn EmbeddingProvider) -> Self {
        Self { parser, embedder }
    }

    /// Analyze one file.
    ///
    /// Fails with `UnsupportedLanguage` when the parser has no grammar for
    /// `language` and with `Parse` when the content is rejected. A language
    /// that parses but has no metric rules yields zero-valued metrics.
    pub fn analyze(&self, path: &str, content: &str, language: Language) -> Result<FileAnalysis> {
        self.analyze_with_tree(path, content, language)
            .map(|parsed| parsed.analysis)
    }

    pub fn analyze_with_tree(
        &self,
        path: &str,
        content: &str,
        language: Language,
    ) -> Result<ParsedFile> {
        if !language.is_supported() || !self.parser.supports(language) {
            return Err(Error::UnsupportedLanguage(language));
        }

        let tree = self.parser.parse(content, language)?;
        let SourceMetrics {
            metrics,
            complexity,
        } = compute_metrics(&tree);
        let embedding = self.embedder.embed(content)?;

        Ok(ParsedFile {
            analysis: FileAnalysis {
                path: path.to_string(),
                language,
                metrics,
                complexity,
                embedding,
            },
            tree,
        })
    }
}
