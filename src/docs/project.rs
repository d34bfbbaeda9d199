use super::outline::truncate_chars;
use crate::core::{ArchitectureAnalysis, FileAnalysis};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Characters of each file's documentation quoted in the overview
pub const SUMMARY_PREVIEW_CHARS: usize = 200;

/// Build the project-level overview from finished per-file results.
///
/// Files appear in path order. Only files present in `file_documentation`
/// get a summary entry.
pub fn project_overview(
    file_documentation: &BTreeMap<String, String>,
    code_analysis: &BTreeMap<String, FileAnalysis>,
    architecture: &ArchitectureAnalysis,
) -> String {
    let mut doc = String::from("Project Overview\n\n");
    let _ = writeln!(doc, "Total files analyzed: {}", code_analysis.len());
    let _ = writeln!(doc, "Architecture type: {}", architecture.architecture_type);
    let _ = writeln!(
        doc,
        "Dependencies: {} edges",
        architecture.dependency_graph.len()
    );
    let _ = writeln!(doc, "Modularity score: {}", architecture.modularity_score);

    doc.push_str("\nKey Components:\n");
    if architecture.central_components.is_empty() {
        doc.push_str("- (none)\n");
    }
    for component in &architecture.central_components {
        let _ = writeln!(doc, "- {component}");
    }

    doc.push_str("\nFile Summaries:\n");
    for (path, documentation) in file_documentation {
        let _ = writeln!(doc, "\n{path}:");
        if let Some(analysis) = code_analysis.get(path) {
            let _ = writeln!(doc, "Complexity: {}", format_complexity(analysis));
        }
        let _ = writeln!(
            doc,
            "Summary: {}",
            truncate_chars(documentation, SUMMARY_PREVIEW_CHARS)
        );
    }

    doc
}

fn format_complexity(analysis: &FileAnalysis) -> String {
    analysis
        .complexity
        .iter()
        .map(|(metric, value)| format!("{metric}={value}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ArchitectureType, DependencyEdge, Language, ModularityScore};
    use pretty_assertions::assert_eq;

    fn analysis(path: &str, cyclomatic: f64) -> FileAnalysis {
        FileAnalysis {
            path: path.to_string(),
            language: Language::Python,
            metrics: BTreeMap::new(),
            complexity: BTreeMap::from([("cyclomatic_complexity".to_string(), cyclomatic)]),
            embedding: vec![0.0; 4],
        }
    }

    #[test]
    fn test_overview_layout() {
        let code_analysis = BTreeMap::from([
            ("b.py".to_string(), analysis("b.py", 1.0)),
            ("a.py".to_string(), analysis("a.py", 3.0)),
        ]);
        let file_documentation = BTreeMap::from([
            ("b.py".to_string(), "Module b.".to_string()),
            ("a.py".to_string(), "Module a.".to_string()),
        ]);
        let architecture = ArchitectureAnalysis {
            dependency_graph: vec![DependencyEdge::new("a.py", "b.py")],
            central_components: vec!["a.py".to_string()],
            architecture_type: ArchitectureType::Layered,
            modularity_score: ModularityScore::from_counts(1, 1),
        };

        let doc = project_overview(&file_documentation, &code_analysis, &architecture);

        assert_eq!(
            doc,
            "Project Overview\n\n\
             Total files analyzed: 2\n\
             Architecture type: Layered\n\
             Dependencies: 1 edges\n\
             Modularity score: 1.000\n\
             \nKey Components:\n- a.py\n\
             \nFile Summaries:\n\
             \na.py:\nComplexity: cyclomatic_complexity=3\nSummary: Module a.\n\
             \nb.py:\nComplexity: cyclomatic_complexity=1\nSummary: Module b.\n"
        );
    }

    #[test]
    fn test_overview_of_empty_project() {
        let architecture = ArchitectureAnalysis {
            dependency_graph: Vec::new(),
            central_components: Vec::new(),
            architecture_type: ArchitectureType::Unknown,
            modularity_score: ModularityScore::from_counts(0, 0),
        };

        let doc = project_overview(&BTreeMap::new(), &BTreeMap::new(), &architecture);

        assert!(doc.contains("Total files analyzed: 0"));
        assert!(doc.contains("Architecture type: unknown"));
        assert!(doc.contains("Modularity score: undefined"));
        assert!(doc.contains("- (none)"));
    }

    #[test]
    fn test_long_documentation_is_previewed() {
        let long_doc = "x".repeat(500);
        let file_documentation = BTreeMap::from([("a.py".to_string(), long_doc)]);
        let architecture = ArchitectureAnalysis {
            dependency_graph: Vec::new(),
            central_components: Vec::new(),
            architecture_type: ArchitectureType::Unknown,
            modularity_score: ModularityScore::from_counts(0, 0),
        };

        let doc = project_overview(&file_documentation, &BTreeMap::new(), &architecture);
        let summary = doc
            .lines()
            .find(|line| line.starts_with("Summary: "))
            .unwrap();
        assert_eq!(summary.len(), "Summary: ".len() + SUMMARY_PREVIEW_CHARS + 3);
    }
}
