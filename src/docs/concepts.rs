use crate::core::ast::SyntaxTree;
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashSet};

pub const DEFAULT_CONCEPT_LIMIT: usize = 5;

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "self", "this", "cls", "args", "kwargs", "get", "set", "the", "and", "for", "new", "init",
        "main", "value", "data", "item", "items", "result", "tmp", "obj", "str", "int", "len",
        "none", "true", "false", "null", "undefined", "return", "void", "var", "let", "const",
        "public", "private", "static", "string", "number", "boolean", "list", "dict", "print",
        "console", "log", "object", "map", "key", "keys", "index",
    ]
    .into_iter()
    .collect()
});

const IDENTIFIER_KINDS: &[&str] = &[
    "identifier",
    "type_identifier",
    "property_identifier",
    "shorthand_property_identifier",
];

/// Derives the handful of domain words a file is "about".
pub trait ConceptExtractor: Send + Sync {
    fn key_concepts(&self, tree: &SyntaxTree) -> Vec<String>;
}

/// Ranks identifier words by frequency.
///
/// Identifiers are split into lowercase words; words shorter than three
/// characters and common programming noise are dropped. Ties are broken
/// alphabetically.
#[derive(Debug, Clone)]
pub struct IdentifierConcepts {
    limit: usize,
}

impl Default for IdentifierConcepts {
    fn default() -> Self {
        Self {
            limit: DEFAULT_CONCEPT_LIMIT,
        }
    }
}

impl IdentifierConcepts {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl ConceptExtractor for IdentifierConcepts {
    fn key_concepts(&self, tree: &SyntaxTree) -> Vec<String> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();

        tree.walk(|node, _| {
            if !IDENTIFIER_KINDS.contains(&node.kind()) {
                return;
            }
            for word in identifier_words(tree.text(&node)) {
                *counts.entry(word).or_default() += 1;
            }
        });

        let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
        // BTreeMap order already sorts names; a stable sort keeps it for ties
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
            .into_iter()
            .take(self.limit)
            .map(|(word, _)| word)
            .collect()
    }
}

fn identifier_words(identifier: &str) -> impl Iterator<Item = String> {
    split_identifier(identifier)
        .into_iter()
        .map(|word| word.to_ascii_lowercase())
        .filter(|word| word.len() >= 3 && !STOP_WORDS.contains(word.as_str()))
}

/// Split at `_`, digits, lower-to-upper transitions and the end of an
/// acronym (`HTTPRequest` -> `HTTP`, `Request`).
fn split_identifier(identifier: &str) -> Vec<String> {
    let chars: Vec<char> = identifier.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphabetic() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        let prev = i.checked_sub(1).map(|p| chars[p]);
        let next = chars.get(i + 1).copied();
        let boundary = c.is_uppercase()
            && prev.is_some_and(|p| {
                p.is_lowercase()
                    || (p.is_uppercase() && next.is_some_and(|n| n.is_lowercase()))
            });
        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}
