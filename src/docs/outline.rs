use super::DocumentationGenerator;
use crate::analyzers::{SourceParser, TreeSitterParser};
use crate::core::{ast::SyntaxTree, Language, Result};
use std::fmt::Write;
use tree_sitter::Node;

const CLASS_KINDS: &[&str] = &[
    "class_definition",
    "class_declaration",
    "abstract_class_declaration",
    "interface_declaration",
    "enum_declaration",
];

const FUNCTION_KINDS: &[&str] = &[
    "function_definition",
    "function_declaration",
    "generator_function_declaration",
    "method_definition",
    "method_declaration",
    "constructor_declaration",
];

/// Longest leading description kept from a module docstring or comment
const MAX_SUMMARY_CHARS: usize = 240;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Definition {
    name: String,
    line: usize,
    /// Enclosing class, for methods
    owner: Option<String>,
}

#[derive(Debug, Default)]
struct Outline {
    summary: Option<String>,
    classes: Vec<Definition>,
    functions: Vec<Definition>,
}

/// Structural documentation: a module summary line plus the classes and
/// functions it defines, each with its line number.
#[derive(Debug, Clone, Default)]
pub struct OutlineGenerator {
    parser: TreeSitterParser,
}

impl OutlineGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parser(parser: TreeSitterParser) -> Self {
        Self { parser }
    }

    /// Render an outline from an already parsed tree.
    pub fn outline(&self, tree: &SyntaxTree) -> String {
        render(tree, &collect(tree))
    }
}

impl DocumentationGenerator for OutlineGenerator {
    fn generate_base_documentation(&self, code: &str, language: Language) -> Result<String> {
        let tree = self.parser.parse(code, language)?;
        Ok(self.outline(&tree))
    }

    fn document_tree(&self, tree: &SyntaxTree) -> Result<String> {
        Ok(self.outline(tree))
    }
}

fn collect(tree: &SyntaxTree) -> Outline {
    let mut outline = Outline {
        summary: leading_summary(tree),
        ..Outline::default()
    };

    tree.walk(|node, _| {
        let kind = node.kind();
        let is_class = CLASS_KINDS.contains(&kind);
        if !is_class && !FUNCTION_KINDS.contains(&kind) {
            return;
        }
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        let definition = Definition {
            name: tree.text(&name).to_string(),
            line: node.start_position().row + 1,
            owner: if is_class {
                None
            } else {
                enclosing_class(node, tree)
            },
        };
        if is_class {
            outline.classes.push(definition);
        } else {
            outline.functions.push(definition);
        }
    });

    outline
}

fn enclosing_class(node: Node<'_>, tree: &SyntaxTree) -> Option<String> {
    let mut current = node.parent();
    while let Some(parent) = current {
        if CLASS_KINDS.contains(&parent.kind()) {
            return parent
                .child_by_field_name("name")
                .map(|name| tree.text(&name).to_string());
        }
        if FUNCTION_KINDS.contains(&parent.kind()) {
            return None;
        }
        current = parent.parent();
    }
    None
}

/// Module docstring (Python) or leading comment (everything else).
fn leading_summary(tree: &SyntaxTree) -> Option<String> {
    let root = tree.root();
    let first = root.named_child(0)?;

    let raw = match (tree.language, first.kind()) {
        (Language::Python, "expression_statement") => {
            let string = first.named_child(0).filter(|n| n.kind() == "string")?;
            tree.text(&string).to_string()
        }
        (_, kind) if kind.ends_with("comment") => tree.text(&first).to_string(),
        _ => return None,
    };

    let cleaned = clean_comment(&raw);
    (!cleaned.is_empty()).then(|| truncate_chars(&cleaned, MAX_SUMMARY_CHARS))
}

fn clean_comment(raw: &str) -> String {
    raw.lines()
        .map(|line| {
            line.trim()
                .trim_start_matches("/**")
                .trim_start_matches("/*")
                .trim_end_matches("*/")
                .trim_start_matches("//")
                .trim_start_matches('*')
                .trim_matches(|c| c == '"' || c == '\'')
                .trim()
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}

fn render(tree: &SyntaxTree, outline: &Outline) -> String {
    let lines = tree.source.lines().count();
    let mut doc = format!("{} module ({} lines).", capitalized(tree.language), lines);

    if let Some(summary) = &outline.summary {
        let _ = write!(doc, "\n\n{summary}");
    }

    if !outline.classes.is_empty() {
        doc.push_str("\n\nClasses:");
        for class in &outline.classes {
            let _ = write!(doc, "\n- {} (line {})", class.name, class.line);
        }
    }

    if !outline.functions.is_empty() {
        doc.push_str("\n\nFunctions:");
        for function in &outline.functions {
            match &function.owner {
                Some(owner) => {
                    let _ = write!(
                        doc,
                        "\n- {owner}.{} (line {})",
                        function.name, function.line
                    );
                }
                None => {
                    let _ = write!(doc, "\n- {} (line {})", function.name, function.line);
                }
            }
        }
    }

    if outline.classes.is_empty() && outline.functions.is_empty() {
        doc.push_str("\n\nNo classes or functions defined.");
    }

    doc
}

fn capitalized(language: Language) -> &'static str {
    match language {
        Language::Python => "Python",
        Language::Java => "Java",
        Language::TypeScript => "TypeScript",
        Language::JavaScript => "JavaScript",
        Language::Unknown => "Unknown",
    }
}
