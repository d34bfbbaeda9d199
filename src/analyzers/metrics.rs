//! Parse-tree metrics and complexity.
//!
//! Each language with a rule-set maps tree-sitter node kinds to the things we
//! count. A language that parses but has no rule-set still gets every key,
//! with zero values, so downstream consumers see a uniform shape.

use crate::core::{ast::SyntaxTree, Language};
use std::collections::BTreeMap;
use tree_sitter::Node;

pub const NUM_FUNCTIONS: &str = "num_functions";
pub const NUM_CLASSES: &str = "num_classes";
pub const NUM_IMPORTS: &str = "num_imports";
pub const LINES_OF_CODE: &str = "lines_of_code";
pub const CYCLOMATIC_COMPLEXITY: &str = "cyclomatic_complexity";
pub const MAX_NESTING_DEPTH: &str = "max_nesting_depth";

#[derive(Debug)]
pub struct MetricRules {
    pub functions: &'static [&'static str],
    pub classes: &'static [&'static str],
    pub imports: &'static [&'static str],
    /// Each occurrence adds one decision point
    pub decisions: &'static [&'static str],
    /// `binary_expression` operators that short-circuit
    pub logical_operators: &'static [&'static str],
    /// Control structures that increase nesting depth
    pub nesting: &'static [&'static str],
}

static PYTHON_RULES: MetricRules = MetricRules {
    functions: &["function_definition"],
    classes: &["class_definition"],
    imports: &["import_statement", "import_from_statement"],
    decisions: &[
        "if_statement",
        "elif_clause",
        "for_statement",
        "while_statement",
        "except_clause",
        "conditional_expression",
        "boolean_operator",
        "case_clause",
        "if_clause",
    ],
    logical_operators: &[],
    nesting: &[
        "if_statement",
        "for_statement",
        "while_statement",
        "try_statement",
        "with_statement",
        "match_statement",
    ],
};

const JS_DECISIONS: &[&str] = &[
    "if_statement",
    "ternary_expression",
    "switch_case",
    "while_statement",
    "do_statement",
    "for_statement",
    "for_in_statement",
    "catch_clause",
];

const JS_NESTING: &[&str] = &[
    "if_statement",
    "switch_statement",
    "while_statement",
    "do_statement",
    "for_statement",
    "for_in_statement",
    "try_statement",
];

static JAVASCRIPT_RULES: MetricRules = MetricRules {
    functions: &[
        "function_declaration",
        "function_expression",
        "arrow_function",
        "method_definition",
        "generator_function_declaration",
    ],
    classes: &["class_declaration", "class"],
    imports: &["import_statement"],
    decisions: JS_DECISIONS,
    logical_operators: &["&&", "||", "??"],
    nesting: JS_NESTING,
};

static TYPESCRIPT_RULES: MetricRules = MetricRules {
    functions: &[
        "function_declaration",
        "function_expression",
        "arrow_function",
        "method_definition",
        "generator_function_declaration",
    ],
    classes: &["class_declaration", "abstract_class_declaration", "class"],
    imports: &["import_statement"],
    decisions: JS_DECISIONS,
    logical_operators: &["&&", "||", "??"],
    nesting: JS_NESTING,
};

pub fn rules_for(language: Language) -> Option<&'static MetricRules> {
    match language {
        Language::Python => Some(&PYTHON_RULES),
        Language::JavaScript => Some(&JAVASCRIPT_RULES),
        Language::TypeScript => Some(&TYPESCRIPT_RULES),
        Language::Java | Language::Unknown => None,
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceMetrics {
    pub metrics: BTreeMap<String, i64>,
    pub complexity: BTreeMap<String, f64>,
}

impl SourceMetrics {
    /// Every key present, every value zero
    pub fn zeroed() -> Self {
        Self::from_counts(&Counts::default())
    }

    fn from_counts(counts: &Counts) -> Self {
        let metrics = [
            (NUM_FUNCTIONS, counts.functions),
            (NUM_CLASSES, counts.classes),
            (NUM_IMPORTS, counts.imports),
            (LINES_OF_CODE, counts.lines),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value as i64))
        .collect();

        let complexity = [
            (CYCLOMATIC_COMPLEXITY, counts.cyclomatic() as f64),
            (MAX_NESTING_DEPTH, counts.max_nesting as f64),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();

        Self {
            metrics,
            complexity,
        }
    }
}

#[derive(Debug, Default)]
struct Counts {
    functions: usize,
    classes: usize,
    imports: usize,
    lines: usize,
    decisions: usize,
    max_nesting: usize,
}

impl Counts {
    /// One path through the file plus one per decision point
    fn cyclomatic(&self) -> usize {
        1 + self.decisions
    }
}

/// Compute metrics for a parsed file.
pub fn compute_metrics(tree: &SyntaxTree) -> SourceMetrics {
    let Some(rules) = rules_for(tree.language) else {
        return SourceMetrics::zeroed();
    };

    let mut counts = Counts {
        lines: count_code_lines(&tree.source),
        ..Counts::default()
    };

    tree.walk(|node, _| {
        let kind = node.kind();
        if !node.is_named() {
            return;
        }
        if rules.functions.contains(&kind) {
            counts.functions += 1;
        }
        if rules.classes.contains(&kind) {
            counts.classes += 1;
        }
        if rules.imports.contains(&kind) {
            counts.imports += 1;
        }
        if rules.decisions.contains(&kind) || is_logical_expression(node, rules, tree) {
            counts.decisions += 1;
        }
    });

    counts.max_nesting = max_nesting(tree.root(), rules, 0);
    SourceMetrics::from_counts(&counts)
}

fn is_logical_expression(node: Node<'_>, rules: &MetricRules, tree: &SyntaxTree) -> bool {
    node.kind() == "binary_expression"
        && node
            .child_by_field_name("operator")
            .is_some_and(|op| rules.logical_operators.contains(&tree.text(&op)))
}

fn max_nesting(node: Node<'_>, rules: &MetricRules, depth: usize) -> usize {
    let depth = if rules.nesting.contains(&node.kind()) {
        depth + 1
    } else {
        depth
    };

    let mut cursor = node.walk();
    let deepest_child = node
        .named_children(&mut cursor)
        .map(|child| max_nesting(child, rules, depth))
        .max()
        .unwrap_or(depth);
    deepest_child.max(depth)
}

fn count_code_lines(source: &str) -> usize {
    source.lines().filter(|line| !line.trim().is_empty()).count()
}
