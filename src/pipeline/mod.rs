//! Project orchestration.
//!
//! A run enumerates the project, analyzes each supported file in isolation,
//! then, after every file is done, builds the dependency graph, ranks central
//! components, classifies the architecture and writes the project overview.
//! A failing file is logged, listed in `failed_files` and left out of every
//! other part of the report.

mod services;

pub use services::{AnalysisServices, PipelineOptions};

use crate::analyzers::FileAnalyzer;
use crate::classifier::{aggregate_embeddings, predict};
use crate::core::{
    ArchitectureAnalysis, ArchitectureType, Error, FailedFile, FileAnalysis, ModularityScore,
    ProjectFile, ProjectReport, Result,
};
use crate::docs::{enhance, project_overview, DocumentationContext};
use crate::graph::DependencyGraph;
use crate::io::{read_source, ProjectWalker};
use crate::observability::{
    increment_processed, set_current_file, set_phase, start_progress, AnalysisPhase,
};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, info_span, warn};

/// Everything a successfully analyzed file contributes to the report.
#[derive(Debug, Clone)]
struct FileOutcome {
    analysis: FileAnalysis,
    documentation: String,
    dependencies: Vec<String>,
}

pub struct ProjectAnalyzer {
    services: AnalysisServices,
    options: PipelineOptions,
}

impl ProjectAnalyzer {
    pub fn new(services: AnalysisServices, options: PipelineOptions) -> Self {
        Self { services, options }
    }

    pub fn services(&self) -> &AnalysisServices {
        &self.services
    }

    /// Analyze the project under `root`.
    ///
    /// Fails only on project-level errors: an unreadable root, an invalid
    /// ignore pattern, or a classifier contract violation
    /// (`InvalidClassifierOutput`, `EmbeddingDimensionMismatch`).
    pub fn run(&self, root: &Path) -> Result<ProjectReport> {
        let _span = info_span!("project_analysis", root = %root.display()).entered();
        let started = Instant::now();

        let files = self.discover(root)?;
        let project_files: BTreeSet<String> =
            files.iter().map(|f| f.relative_path.clone()).collect();
        info!(files = files.len(), "Discovered source files");

        let outcomes = self.analyze_files(root, &files, &project_files);

        let mut file_documentation = BTreeMap::new();
        let mut code_analysis = BTreeMap::new();
        let mut failed_files = Vec::new();
        let mut graph = DependencyGraph::new();

        // Single accumulation point, in path order
        for (file, outcome) in files.iter().zip(outcomes) {
            match outcome {
                Ok(outcome) => {
                    let path = file.relative_path.clone();
                    for target in outcome.dependencies {
                        if project_files.contains(&target) {
                            graph.add_dependency(path.clone(), target);
                        }
                    }
                    file_documentation.insert(path.clone(), outcome.documentation);
                    code_analysis.insert(path, outcome.analysis);
                }
                Err(e) => {
                    error!(path = %file.relative_path, error = %e, "Error processing file");
                    failed_files.push(FailedFile {
                        path: file.relative_path.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let architecture_analysis = self.analyze_architecture(&graph, &code_analysis)?;

        let project_documentation = {
            let _phase = set_phase(AnalysisPhase::Documentation);
            project_overview(&file_documentation, &code_analysis, &architecture_analysis)
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            analyzed = code_analysis.len(),
            failed = failed_files.len(),
            elapsed_ms,
            "Project analysis complete"
        );

        Ok(ProjectReport {
            file_documentation,
            code_analysis,
            architecture_analysis,
            project_documentation,
            failed_files,
        })
    }

    /// Supported source files under `root`, sorted by path.
    fn discover(&self, root: &Path) -> Result<Vec<ProjectFile>> {
        let _phase = set_phase(AnalysisPhase::FileDiscovery);
        let entries = ProjectWalker::new(root)
            .with_ignore_patterns(&self.options.ignore_patterns)?
            .respect_gitignore(self.options.respect_gitignore)
            .walk()?;

        Ok(entries
            .into_iter()
            .filter(ProjectFile::is_file)
            .filter(|file| {
                let supported = file.language().is_supported();
                if !supported {
                    debug!(path = %file.relative_path, "Skipping unsupported file");
                }
                supported
            })
            .collect())
    }

    /// One result per file, in the order of `files`.
    fn analyze_files(
        &self,
        root: &Path,
        files: &[ProjectFile],
        project_files: &BTreeSet<String>,
    ) -> Vec<Result<FileOutcome>> {
        start_progress(files.len());
        let process = |file: &ProjectFile| {
            let outcome = self.process_file(root, file, project_files);
            increment_processed();
            outcome
        };

        if self.options.parallel {
            files.par_iter().map(process).collect()
        } else {
            files.iter().map(process).collect()
        }
    }

    fn process_file(
        &self,
        root: &Path,
        file: &ProjectFile,
        project_files: &BTreeSet<String>,
    ) -> Result<FileOutcome> {
        let _phase = set_phase(AnalysisPhase::FileAnalysis);
        let _file = set_current_file(file.relative_path.as_str());
        let path = file.relative_path.as_str();
        let language = file.language();

        let content = read_source(&root.join(path))?;
        let analyzer =
            FileAnalyzer::new(self.services.parser.as_ref(), self.services.embedder.as_ref());
        let parsed = analyzer.analyze_with_tree(path, &content, language)?;

        let base = self.services.documentation.document_tree(&parsed.tree)?;
        let mut context = DocumentationContext::from_analysis(&parsed.analysis);
        if let Some(extractor) = &self.services.concepts {
            let concepts = extractor.key_concepts(&parsed.tree);
            if !concepts.is_empty() {
                context = context.with_key_concepts(concepts);
            }
        }
        let documentation = enhance(&base, &context);

        let dependencies = self
            .services
            .dependencies
            .as_ref()
            .map(|extractor| extractor.extract(path, &parsed.tree, project_files))
            .unwrap_or_default();

        debug!(path, dependencies = dependencies.len(), "Analyzed file");
        Ok(FileOutcome {
            analysis: parsed.analysis,
            documentation,
            dependencies,
        })
    }

    fn analyze_architecture(
        &self,
        graph: &DependencyGraph,
        code_analysis: &BTreeMap<String, FileAnalysis>,
    ) -> Result<ArchitectureAnalysis> {
        let (dependency_graph, central_components) = {
            let _phase = set_phase(AnalysisPhase::DependencyGraph);
            (
                graph.get_dependencies(),
                graph.get_central_components(self.options.top_n),
            )
        };

        let architecture_type = {
            let _phase = set_phase(AnalysisPhase::Classification);
            let embeddings: Vec<&[f32]> = code_analysis
                .values()
                .map(|analysis| analysis.embedding.as_slice())
                .collect();
            self.classify(&embeddings)?
        };

        let modularity_score =
            ModularityScore::from_counts(central_components.len(), dependency_graph.len());

        Ok(ArchitectureAnalysis {
            dependency_graph,
            central_components,
            architecture_type,
            modularity_score,
        })
    }

    fn classify(&self, embeddings: &[&[f32]]) -> Result<ArchitectureType> {
        let Some(classifier) = self.services.classifier.as_deref() else {
            info!("No classifier configured; architecture type is unknown");
            return Ok(ArchitectureType::Unknown);
        };

        match aggregate_embeddings(embeddings) {
            Ok(aggregated) => predict(classifier, &aggregated),
            Err(Error::NoEmbeddingsAvailable) => {
                warn!("No file was analyzed successfully; architecture type is unknown");
                Ok(ArchitectureType::Unknown)
            }
            Err(e) => Err(e),
        }
    }
}

/// Analyze `root` with the built-in services and default options.
pub fn analyze_project(root: &Path) -> Result<ProjectReport> {
    ProjectAnalyzer::new(AnalysisServices::default(), PipelineOptions::default()).run(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::{SourceParser, TreeSitterParser};
    use crate::classifier::ArchitectureClassifier;
    use crate::core::{ast::SyntaxTree, Language};
    use crate::docs::DocumentationGenerator;
    use crate::embedding::EmbeddingProvider;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::fs;
    use tempfile::TempDir;

    struct FixedIndex(usize);

    impl ArchitectureClassifier for FixedIndex {
        fn classify(&self, _embedding: &[f32]) -> Result<usize> {
            Ok(self.0)
        }
    }

    fn write(root: &Path, path: &str, content: &str) {
        let full = root.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, content).unwrap();
    }

    fn analyzer(classifier: Option<usize>) -> ProjectAnalyzer {
        let mut services = AnalysisServices::builtin(8).unwrap();
        if let Some(index) = classifier {
            services = services.with_classifier(FixedIndex(index));
        }
        ProjectAnalyzer::new(services, PipelineOptions::default())
    }

    #[test]
    fn test_failed_file_is_isolated() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.py", "import b\n");
        write(dir.path(), "b.py", "def f():\n    return 1\n");
        write(dir.path(), "c.py", "def (((:\n");
        write(dir.path(), "notes.txt", "not code");

        let report = analyzer(Some(2)).run(dir.path()).unwrap();

        assert_eq!(
            report.code_analysis.keys().collect::<Vec<_>>(),
            vec!["a.py", "b.py"]
        );
        assert_eq!(
            report.file_documentation.keys().collect::<Vec<_>>(),
            vec!["a.py", "b.py"]
        );
        assert_eq!(report.failed_files.len(), 1);
        assert_eq!(report.failed_files[0].path, "c.py");
        assert!(report.failed_files[0].reason.contains("Parse error"));
        assert_eq!(
            report.architecture_analysis.architecture_type,
            ArchitectureType::Layered
        );
    }

    #[test]
    fn test_edges_only_between_project_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "app.py", "import os\nimport db\n");
        write(dir.path(), "db.py", "import sqlite3\n");

        let report = analyzer(None).run(dir.path()).unwrap();
        let architecture = &report.architecture_analysis;

        assert_eq!(
            architecture.dependency_graph,
            vec![crate::core::DependencyEdge::new("app.py", "db.py")]
        );
        // two nodes: every centrality score is 0, ties broken by name
        assert_eq!(architecture.central_components, vec!["app.py", "db.py"]);
        assert_eq!(architecture.modularity_score.value().unwrap(), 2.0);
    }

    #[test]
    fn test_empty_project_has_unknown_architecture() {
        let dir = TempDir::new().unwrap();

        let report = analyzer(Some(0)).run(dir.path()).unwrap();

        assert!(report.code_analysis.is_empty());
        assert_eq!(
            report.architecture_analysis.architecture_type,
            ArchitectureType::Unknown
        );
        assert!(!report.architecture_analysis.modularity_score.is_defined());
        assert!(report.project_documentation.contains("Total files analyzed: 0"));
    }

    #[test]
    fn test_without_classifier_architecture_is_unknown() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.py", "x = 1\n");

        let analyzer = analyzer(None);
        assert!(!analyzer.services().has_classifier());
        let report = analyzer.run(dir.path()).unwrap();
        assert_eq!(
            report.architecture_analysis.architecture_type,
            ArchitectureType::Unknown
        );
    }

    #[test]
    fn test_out_of_range_classifier_output_fails_run() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.py", "x = 1\n");

        let err = analyzer(Some(8)).run(dir.path()).unwrap_err();
        assert!(matches!(err, Error::InvalidClassifierOutput { index: 8, .. }));
    }

    #[test]
    fn test_documentation_contains_complexity() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "a.py",
            "def load_orders(order_ids):\n    if order_ids:\n        return 1\n",
        );
        write(dir.path(), "b.py", "x = 1\n");

        let report = analyzer(None).run(dir.path()).unwrap();
        let doc = &report.file_documentation["a.py"];

        assert!(doc.starts_with("Python module"));
        assert!(doc.contains("- cyclomatic_complexity: 2"));
        assert!(doc.contains("Key Concepts:\n- ids\n- order\n"));
        assert!(!report.file_documentation["b.py"].contains("Key Concepts"));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let dir = TempDir::new().unwrap();
        for i in 0..12 {
            let next = (i + 1) % 12;
            write(
                dir.path(),
                &format!("pkg/m{i:02}.py"),
                &format!("from . import m{next:02}\n\ndef f{i}():\n    return {i}\n"),
            );
        }
        write(dir.path(), "pkg/__init__.py", "");
        write(dir.path(), "pkg/broken.py", "class (:\n");

        let sequential = analyzer(Some(1)).run(dir.path()).unwrap();
        let parallel = ProjectAnalyzer::new(
            AnalysisServices::builtin(8).unwrap().with_classifier(FixedIndex(1)),
            PipelineOptions {
                parallel: true,
                ..PipelineOptions::default()
            },
        )
        .run(dir.path())
        .unwrap();

        assert_eq!(sequential, parallel);
        assert_eq!(sequential.failed_files.len(), 1);
        assert_eq!(sequential.architecture_analysis.dependency_graph.len(), 12);
    }

    /// Counts parses while delegating to the tree-sitter parser
    #[derive(Default)]
    struct CountingParser {
        inner: TreeSitterParser,
        parses: Arc<AtomicUsize>,
    }

    impl SourceParser for CountingParser {
        fn supports(&self, language: Language) -> bool {
            self.inner.supports(language)
        }

        fn parse(&self, content: &str, language: Language) -> Result<SyntaxTree> {
            self.parses.fetch_add(1, Ordering::SeqCst);
            self.inner.parse(content, language)
        }
    }

    #[test]
    fn test_each_file_is_parsed_once() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.py", "import b\n\ndef run():\n    pass\n");
        write(dir.path(), "b.py", "class Store:\n    pass\n");

        let parser = CountingParser::default();
        let parses = Arc::clone(&parser.parses);
        let services = AnalysisServices::builtin(8).unwrap().with_parser(parser);
        let report = ProjectAnalyzer::new(services, PipelineOptions::default())
            .run(dir.path())
            .unwrap();

        assert_eq!(report.code_analysis.len(), 2);
        assert_eq!(parses.load(Ordering::SeqCst), 2);
    }

    struct PlainText;

    impl DocumentationGenerator for PlainText {
        fn generate_base_documentation(&self, code: &str, language: Language) -> Result<String> {
            Ok(format!("{language}: {} bytes", code.len()))
        }
    }

    struct ConstantEmbedding;

    impl EmbeddingProvider for ConstantEmbedding {
        fn embed(&self, _code: &str) -> Result<Vec<f32>> {
            Ok(vec![0.5; 3])
        }

        fn dimensions(&self) -> usize {
            3
        }
    }

    #[test]
    fn test_optional_capabilities_can_be_removed() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.py", "import b\n\ndef load_orders():\n    pass\n");
        write(dir.path(), "b.py", "x = 1\n");

        let services = AnalysisServices::default()
            .with_embedder(ConstantEmbedding)
            .with_documentation(PlainText)
            .with_dependencies(None)
            .with_concepts(None);
        let report = ProjectAnalyzer::new(services, PipelineOptions::default())
            .run(dir.path())
            .unwrap();

        assert!(report.architecture_analysis.dependency_graph.is_empty());
        assert_eq!(report.code_analysis["a.py"].embedding, vec![0.5; 3]);
        let doc = &report.file_documentation["b.py"];
        assert!(doc.starts_with("python: 6 bytes\n\nCode Complexity:\n"));
        assert!(!report.file_documentation["a.py"].contains("Key Concepts"));
    }
}
