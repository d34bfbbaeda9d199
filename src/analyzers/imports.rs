//! Dependency discovery from import statements.
//!
//! Specifiers are collected from the parse tree and resolved against the set
//! of files in the project. Anything that does not resolve to a project file
//! (standard library, third-party packages) is dropped.

use crate::core::{ast::SyntaxTree, Language};
use std::collections::BTreeSet;
use tree_sitter::Node;

/// Finds the project files a source file depends on.
pub trait DependencyExtractor: Send + Sync {
    /// Relative paths of project files that `path` imports, sorted, without `path` itself.
    fn extract(&self, path: &str, tree: &SyntaxTree, project_files: &BTreeSet<String>)
        -> Vec<String>;
}

/// Resolves `import`/`require`/`from ... import` statements to project paths.
#[derive(Debug, Clone, Default)]
pub struct ImportExtractor;

impl DependencyExtractor for ImportExtractor {
    fn extract(
        &self,
        path: &str,
        tree: &SyntaxTree,
        project_files: &BTreeSet<String>,
    ) -> Vec<String> {
        let specifiers = collect_specifiers(tree);
        let mut targets: BTreeSet<String> = specifiers
            .iter()
            .flat_map(|spec| resolve(tree.language, path, spec, project_files))
            .collect();
        targets.remove(path);
        targets.into_iter().collect()
    }
}

/// An import as written in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSpecifier {
    /// `import a.b` / `from ..a import b`: leading dots, dotted module path,
    /// and names imported from it (which may themselves be modules)
    Python {
        level: usize,
        module: Vec<String>,
        names: Vec<String>,
    },
    /// `import x from './y'`, `require('./y')`, `import('./y')`
    Module(String),
    /// `import com.example.Type;` / `import com.example.*;`
    Java { segments: Vec<String>, wildcard: bool },
}

pub fn collect_specifiers(tree: &SyntaxTree) -> Vec<ImportSpecifier> {
    let mut specifiers = Vec::new();
    tree.walk(|node, _| {
        let found = match tree.language {
            Language::Python => python_specifier(node, tree),
            Language::JavaScript | Language::TypeScript => module_specifier(node, tree),
            Language::Java => java_specifier(node, tree),
            Language::Unknown => None,
        };
        specifiers.extend(found);
    });
    specifiers
}

fn python_specifier(node: Node<'_>, tree: &SyntaxTree) -> Option<ImportSpecifier> {
    match node.kind() {
        "import_statement" => {
            // `import a.b, c as d`: no shared module, every name is its own module
            let mut cursor = node.walk();
            let names: Vec<String> = node
                .children_by_field_name("name", &mut cursor)
                .filter_map(|child| dotted_name_of(child, tree))
                .collect();
            (!names.is_empty()).then_some(ImportSpecifier::Python {
                level: 0,
                module: Vec::new(),
                names,
            })
        }
        "import_from_statement" => {
            let module_node = node.child_by_field_name("module_name")?;
            let module_text = tree.text(&module_node);
            let level = module_text.chars().take_while(|c| *c == '.').count();
            let module = split_dotted(&module_text[level..]);

            let mut cursor = node.walk();
            let names = node
                .children_by_field_name("name", &mut cursor)
                .filter_map(|child| dotted_name_of(child, tree))
                .collect();
            Some(ImportSpecifier::Python {
                level,
                module,
                names,
            })
        }
        _ => None,
    }
}

fn dotted_name_of(node: Node<'_>, tree: &SyntaxTree) -> Option<String> {
    match node.kind() {
        "dotted_name" => Some(tree.text(&node).to_string()),
        "aliased_import" => node
            .child_by_field_name("name")
            .map(|name| tree.text(&name).to_string()),
        _ => None,
    }
}

fn split_dotted(text: &str) -> Vec<String> {
    text.split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn module_specifier(node: Node<'_>, tree: &SyntaxTree) -> Option<ImportSpecifier> {
    match node.kind() {
        // ES6 imports and re-exports
        "import_statement" | "export_statement" => node
            .child_by_field_name("source")
            .map(|source| ImportSpecifier::Module(unquote(tree.text(&source)))),
        // CommonJS require and dynamic import()
        "call_expression" => {
            let function = node.child_by_field_name("function")?;
            let callee = tree.text(&function);
            if callee != "require" && callee != "import" {
                return None;
            }
            let arguments = node.child_by_field_name("arguments")?;
            let mut cursor = arguments.walk();
            let first_string = arguments
                .named_children(&mut cursor)
                .find(|child| child.kind() == "string")?;
            Some(ImportSpecifier::Module(unquote(tree.text(&first_string))))
        }
        _ => None,
    }
}

fn unquote(text: &str) -> String {
    text.trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .to_string()
}

fn java_specifier(node: Node<'_>, tree: &SyntaxTree) -> Option<ImportSpecifier> {
    if node.kind() != "import_declaration" {
        return None;
    }
    let mut cursor = node.walk();
    let mut segments = Vec::new();
    let mut wildcard = false;
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "scoped_identifier" | "identifier" => segments = split_dotted(tree.text(&child)),
            "asterisk" => wildcard = true,
            _ => {}
        }
    }
    (!segments.is_empty()).then_some(ImportSpecifier::Java { segments, wildcard })
}

/// Resolve one specifier to the project files it may refer to.
pub fn resolve(
    language: Language,
    importer: &str,
    specifier: &ImportSpecifier,
    project_files: &BTreeSet<String>,
) -> Vec<String> {
    match specifier {
        ImportSpecifier::Python {
            level,
            module,
            names,
        } => resolve_python(importer, *level, module, names, project_files),
        ImportSpecifier::Module(spec) => resolve_module(language, importer, spec, project_files),
        ImportSpecifier::Java { segments, wildcard } => {
            resolve_java(segments, *wildcard, project_files)
        }
    }
}

fn resolve_python(
    importer: &str,
    level: usize,
    module: &[String],
    names: &[String],
    project_files: &BTreeSet<String>,
) -> Vec<String> {
    if level == 0 && module.is_empty() && names.len() > 1 {
        return names
            .iter()
            .flat_map(|name| {
                resolve_python(importer, 0, &[], std::slice::from_ref(name), project_files)
            })
            .collect();
    }

    let importer_dir = parent_segments(importer);
    let bases: Vec<Vec<String>> = if level > 0 {
        match importer_dir.len().checked_sub(level - 1) {
            Some(keep) => vec![importer_dir[..keep].to_vec()],
            None => return Vec::new(),
        }
    } else {
        // Absolute imports: try every enclosing directory, closest first
        (0..=importer_dir.len())
            .rev()
            .map(|keep| importer_dir[..keep].to_vec())
            .collect()
    };

    let name_paths: Vec<Vec<String>> = names.iter().map(|name| split_dotted(name)).collect();
    for base in bases {
        let mut found = Vec::new();
        let module_path: Vec<String> = base.iter().chain(module).cloned().collect();

        if !module.is_empty() {
            found.extend(python_module_file(&module_path, project_files));
        }
        for name in &name_paths {
            let candidate: Vec<String> = module_path.iter().chain(name).cloned().collect();
            found.extend(python_module_file(&candidate, project_files));
        }
        if !found.is_empty() {
            return found;
        }
    }
    Vec::new()
}

fn python_module_file(segments: &[String], project_files: &BTreeSet<String>) -> Option<String> {
    if segments.is_empty() {
        return None;
    }
    let joined = segments.join("/");
    [format!("{joined}.py"), format!("{joined}/__init__.py")]
        .into_iter()
        .find(|candidate| project_files.contains(candidate))
}

fn resolve_module(
    language: Language,
    importer: &str,
    spec: &str,
    project_files: &BTreeSet<String>,
) -> Vec<String> {
    // Bare specifiers name packages, not project files
    if !(spec.starts_with("./") || spec.starts_with("../")) {
        return Vec::new();
    }

    let mut segments = parent_segments(importer);
    for part in spec.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Vec::new();
                }
            }
            other => segments.push(other.to_string()),
        }
    }
    let base = segments.join("/");

    let extensions: &[&str] = match language {
        Language::TypeScript => &["ts", "js"],
        _ => &["js", "ts"],
    };
    std::iter::once(base.clone())
        .chain(extensions.iter().map(|ext| format!("{base}.{ext}")))
        .chain(extensions.iter().map(|ext| format!("{base}/index.{ext}")))
        .find(|candidate| project_files.contains(candidate))
        .into_iter()
        .collect()
}

fn resolve_java(
    segments: &[String],
    wildcard: bool,
    project_files: &BTreeSet<String>,
) -> Vec<String> {
    if wildcard {
        let package_dir = format!("{}/", segments.join("/"));
        return project_files
            .iter()
            .filter(|file| file.ends_with(".java"))
            .filter(|file| {
                parent_dir(file).is_some_and(|dir| {
                    format!("{dir}/").ends_with(&package_dir)
                        && path_boundary(&format!("{dir}/"), &package_dir)
                })
            })
            .cloned()
            .collect();
    }

    // `import static a.B.member;` names a member: also try without the last segment
    (1..=segments.len())
        .rev()
        .take(2)
        .map(|len| format!("{}.java", segments[..len].join("/")))
        .find_map(|suffix| {
            project_files
                .iter()
                .find(|file| file.ends_with(&suffix) && path_boundary(file, &suffix))
                .cloned()
        })
        .into_iter()
        .collect()
}

/// `haystack` ends with `suffix` at a `/` boundary
fn path_boundary(haystack: &str, suffix: &str) -> bool {
    haystack.len() == suffix.len()
        || haystack[..haystack.len() - suffix.len()].ends_with('/')
}

fn parent_dir(path: &str) -> Option<&str> {
    path.rsplit_once('/').map(|(dir, _)| dir)
}

fn parent_segments(path: &str) -> Vec<String> {
    parent_dir(path)
        .map(|dir| dir.split('/').map(String::from).collect())
        .unwrap_or_default()
}
