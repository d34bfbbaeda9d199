mod common;

use archmap::core::{ArchitectureType, DependencyEdge, Language};
use archmap::io::{OutputFormat, OutputWriter};
use archmap::pipeline::{AnalysisServices, PipelineOptions, ProjectAnalyzer};
use common::{FixedIndex, TestProject};
use indoc::indoc;
use pretty_assertions::assert_eq;

fn services() -> AnalysisServices {
    AnalysisServices::builtin(16).unwrap()
}

#[test]
fn test_one_unparseable_file_of_three() {
    let project = TestProject::new()
        .with_file("good_one.py", "def a():\n    return 1\n")
        .with_file("good_two.py", "class B:\n    pass\n")
        .with_file("broken.py", "def broken(:\n    return\n");

    let report = ProjectAnalyzer::new(services(), PipelineOptions::default())
        .run(project.path())
        .unwrap();

    assert_eq!(report.code_analysis.len(), 2);
    assert_eq!(report.file_documentation.len(), 2);
    assert!(!report.code_analysis.contains_key("broken.py"));
    assert!(!report.file_documentation.contains_key("broken.py"));
    assert_eq!(report.failed_files.len(), 1);
    assert_eq!(report.failed_files[0].path, "broken.py");
}

#[test]
fn test_empty_project_reports_unknown_architecture() {
    let project = TestProject::new().with_file("README.md", "# nothing to analyze");

    let report = ProjectAnalyzer::new(
        services().with_classifier(FixedIndex(0)),
        PipelineOptions::default(),
    )
    .run(project.path())
    .unwrap();

    assert!(report.code_analysis.is_empty());
    assert!(report.failed_files.is_empty());
    assert_eq!(
        report.architecture_analysis.architecture_type,
        ArchitectureType::Unknown
    );
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["architecture_analysis"]["architecture_type"], "unknown");
    assert_eq!(json["code_analysis"], serde_json::json!({}));
}

#[test]
fn test_mixed_language_project() {
    let project = TestProject::new()
        .with_file(
            "web/app.js",
            indoc! {r#"
                const api = require('./api');
                import { render } from './view.js';
                export function start() { return render(api.load()); }
            "#},
        )
        .with_file("web/api.js", "module.exports = { load() { return []; } };\n")
        .with_file("web/view.js", "export function render(items) { return items.length; }\n")
        .with_file(
            "src/main/java/com/acme/App.java",
            indoc! {r#"
                package com.acme;
                import com.acme.util.Strings;
                public class App { }
            "#},
        )
        .with_file(
            "src/main/java/com/acme/util/Strings.java",
            "package com.acme.util;\npublic class Strings { }\n",
        )
        .with_file("types/model.ts", "export interface Model { id: number }\n");

    let report = ProjectAnalyzer::new(services(), PipelineOptions::default())
        .run(project.path())
        .unwrap();

    assert_eq!(report.code_analysis.len(), 6);
    assert_eq!(
        report.code_analysis["types/model.ts"].language,
        Language::TypeScript
    );
    let java = &report.code_analysis["src/main/java/com/acme/App.java"];
    assert!(java.metrics.values().all(|v| *v == 0));

    assert_eq!(
        report.architecture_analysis.dependency_graph,
        vec![
            DependencyEdge::new(
                "src/main/java/com/acme/App.java",
                "src/main/java/com/acme/util/Strings.java"
            ),
            DependencyEdge::new("web/app.js", "web/api.js"),
            DependencyEdge::new("web/app.js", "web/view.js"),
        ]
    );
}

#[test]
fn test_central_component_of_a_chain() {
    let project = TestProject::new()
        .with_file("app/a.py", "from . import b\n")
        .with_file("app/b.py", "from . import c\n")
        .with_file("app/c.py", "x = 1\n")
        .with_file("app/__init__.py", "");

    let report = ProjectAnalyzer::new(
        services(),
        PipelineOptions {
            top_n: 1,
            ..PipelineOptions::default()
        },
    )
    .run(project.path())
    .unwrap();

    let architecture = &report.architecture_analysis;
    assert_eq!(architecture.central_components, vec!["app/b.py"]);
    assert_eq!(architecture.modularity_score.value().unwrap(), 0.5);
}

#[test]
fn test_ignore_patterns_and_gitignore() {
    let project = TestProject::new()
        .with_file(".gitignore", "build/\n")
        .with_file("build/generated.py", "x = 1\n")
        .with_file("vendor/lib.js", "var x = 1;\n")
        .with_file("main.py", "print('hi')\n");

    let report = ProjectAnalyzer::new(
        services(),
        PipelineOptions {
            ignore_patterns: vec!["vendor".to_string()],
            ..PipelineOptions::default()
        },
    )
    .run(project.path())
    .unwrap();

    assert_eq!(
        report.code_analysis.keys().collect::<Vec<_>>(),
        vec!["main.py"]
    );
}

#[test]
fn test_invalid_utf8_is_a_file_failure() {
    let project = TestProject::new().with_file("ok.py", "x = 1\n");
    std::fs::write(project.join("latin1.py"), [0x78, 0x20, 0x3d, 0x20, 0xe9]).unwrap();

    let report = ProjectAnalyzer::new(services(), PipelineOptions::default())
        .run(project.path())
        .unwrap();

    assert_eq!(report.code_analysis.len(), 1);
    assert_eq!(report.failed_files[0].path, "latin1.py");
}

#[test]
fn test_aggregation_excludes_failed_files() {
    // The classifier sees the mean of successful embeddings only, so a
    // stub that records its input lets us compare against a direct mean.
    use archmap::classifier::{aggregate_embeddings, ArchitectureClassifier};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recording(Arc<Mutex<Vec<f32>>>);
    impl ArchitectureClassifier for Recording {
        fn classify(&self, embedding: &[f32]) -> archmap::Result<usize> {
            *self.0.lock().unwrap() = embedding.to_vec();
            Ok(0)
        }
    }

    let project = TestProject::new()
        .with_file("a.py", "def alpha():\n    return 1\n")
        .with_file("b.py", "class Beta:\n    pass\n")
        .with_file("c.py", "def (:\n");

    let recording = Recording::default();
    let report = ProjectAnalyzer::new(
        services().with_classifier(recording.clone()),
        PipelineOptions::default(),
    )
    .run(project.path())
    .unwrap();

    let embeddings: Vec<&[f32]> = report
        .code_analysis
        .values()
        .map(|a| a.embedding.as_slice())
        .collect();
    assert_eq!(embeddings.len(), 2);
    assert_eq!(
        *recording.0.lock().unwrap(),
        aggregate_embeddings(&embeddings).unwrap()
    );
}

#[test]
fn test_markdown_rendering_contains_overview() {
    let project = TestProject::new().with_file("main.py", "def main():\n    pass\n");
    let report = ProjectAnalyzer::new(services(), PipelineOptions::default())
        .run(project.path())
        .unwrap();

    let mut buffer = Vec::new();
    archmap::io::create_writer(OutputFormat::Markdown, &mut buffer)
        .write_report(&report)
        .unwrap();
    let markdown = String::from_utf8(buffer).unwrap();

    assert!(markdown.contains("## Project Documentation"));
    assert!(markdown.contains("Project Overview"));
    assert!(markdown.contains("Total files analyzed: 1"));
}
