//! Documentation synthesis.
//!
//! Base documentation comes from a `DocumentationGenerator`; `enhance` then
//! merges analysis findings into it. `project` builds the project-level
//! overview from the finished per-file results.

pub mod concepts;
pub mod outline;
pub mod project;

use crate::core::{ast::SyntaxTree, ArchitectureType, FileAnalysis, Language, Result};
use std::collections::BTreeMap;
use std::fmt::Write;

pub use concepts::{ConceptExtractor, IdentifierConcepts};
pub use outline::OutlineGenerator;
pub use project::project_overview;

/// Produces the base documentation text for one file.
pub trait DocumentationGenerator: Send + Sync {
    fn generate_base_documentation(&self, code: &str, language: Language) -> Result<String>;

    /// Documentation for a file that has already been parsed. Generators
    /// that work on the syntax tree override this to skip a second parse.
    fn document_tree(&self, tree: &SyntaxTree) -> Result<String> {
        self.generate_base_documentation(&tree.source, tree.language)
    }
}

/// Findings that `enhance` can merge into documentation. Absent fields skip
/// their section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentationContext {
    pub complexity: Option<BTreeMap<String, f64>>,
    pub key_concepts: Option<Vec<String>>,
    pub architecture_type: Option<ArchitectureType>,
}

impl DocumentationContext {
    pub fn from_analysis(analysis: &FileAnalysis) -> Self {
        Self {
            complexity: Some(analysis.complexity.clone()),
            ..Self::default()
        }
    }

    pub fn with_key_concepts(mut self, concepts: Vec<String>) -> Self {
        self.key_concepts = Some(concepts);
        self
    }
}

/// Append complexity, key concepts and architecture type to `base_text`,
/// in that order.
pub fn enhance(base_text: &str, context: &DocumentationContext) -> String {
    let mut doc = base_text.to_string();

    if let Some(complexity) = &context.complexity {
        doc.push_str("\n\nCode Complexity:\n");
        for (metric, value) in complexity {
            let _ = writeln!(doc, "- {metric}: {value}");
        }
    }

    if let Some(concepts) = &context.key_concepts {
        doc.push_str("\n\nKey Concepts:\n");
        for concept in concepts {
            let _ = writeln!(doc, "- {concept}");
        }
    }

    if let Some(architecture_type) = &context.architecture_type {
        let _ = writeln!(doc, "\n\nArchitecture Type: {architecture_type}");
    }

    doc
}
