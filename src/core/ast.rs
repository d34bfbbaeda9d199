use crate::core::Language;
use tree_sitter::{Node, Tree};

/// A parsed source file: the concrete syntax tree plus the text it was built from.
#[derive(Clone, Debug)]
pub struct SyntaxTree {
    pub language: Language,
    pub tree: Tree,
    pub source: String,
}

impl SyntaxTree {
    pub fn new(language: Language, tree: Tree, source: impl Into<String>) -> Self {
        Self {
            language,
            tree,
            source: source.into(),
        }
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Source text covered by `node`; empty if the byte range is not valid UTF-8.
    pub fn text<'a>(&'a self, node: &Node<'_>) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or_default()
    }

    /// First error or missing node, as `(row, column)` (1-based row).
    pub fn first_error(&self) -> Option<(usize, usize)> {
        find_error(self.root()).map(|node| {
            let pos = node.start_position();
            (pos.row + 1, pos.column)
        })
    }

    /// Depth-first, pre-order walk over every node.
    pub fn walk(&self, mut visit: impl FnMut(Node<'_>, usize)) {
        let mut cursor = self.tree.walk();
        let mut depth = 0usize;
        loop {
            visit(cursor.node(), depth);
            if cursor.goto_first_child() {
                depth += 1;
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return;
                }
                depth -= 1;
            }
        }
    }
}

fn find_error(node: Node<'_>) -> Option<Node<'_>> {
    if !node.has_error() {
        return None;
    }
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find_map(find_error);
    found.or(Some(node))
}
