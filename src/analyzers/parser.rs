use super::SourceParser;
use crate::core::{ast::SyntaxTree, Error, Language, Result};
use tree_sitter::Parser;

/// tree-sitter backed parser for every supported language.
///
/// A fresh `tree_sitter::Parser` is created per call, so one instance can be
/// shared across rayon workers.
#[derive(Debug, Clone)]
pub struct TreeSitterParser {
    languages: Vec<Language>,
}

impl Default for TreeSitterParser {
    fn default() -> Self {
        Self {
            languages: Language::SUPPORTED.to_vec(),
        }
    }
}

impl TreeSitterParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the parser to a subset of languages
    pub fn with_languages(mut self, languages: Vec<Language>) -> Self {
        self.languages = languages
            .into_iter()
            .filter(|lang| grammar(*lang).is_some())
            .collect();
        self
    }
}

fn grammar(language: Language) -> Option<tree_sitter::Language> {
    match language {
        Language::Python => Some(tree_sitter_python::LANGUAGE.into()),
        Language::Java => Some(tree_sitter_java::LANGUAGE.into()),
        Language::TypeScript => Some(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
        Language::JavaScript => Some(tree_sitter_javascript::LANGUAGE.into()),
        Language::Unknown => None,
    }
}

impl SourceParser for TreeSitterParser {
    fn supports(&self, language: Language) -> bool {
        self.languages.contains(&language)
    }

    fn parse(&self, content: &str, language: Language) -> Result<SyntaxTree> {
        if !self.supports(language) {
            return Err(Error::UnsupportedLanguage(language));
        }
        let grammar = grammar(language).ok_or(Error::UnsupportedLanguage(language))?;

        let mut parser = Parser::new();
        parser
            .set_language(&grammar)
            .map_err(|e| Error::parse(language, format!("failed to load grammar: {e}")))?;

        let tree = parser
            .parse(content, None)
            .ok_or_else(|| Error::parse(language, "parser produced no tree"))?;
        let syntax_tree = SyntaxTree::new(language, tree, content);

        match syntax_tree.first_error() {
            Some((line, column)) => Err(Error::parse(
                language,
                format!("syntax error at line {line}, column {column}"),
            )),
            None => Ok(syntax_tree),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_python() {
        let tree = TreeSitterParser::new()
            .parse("def f(x):\n    return x + 1\n", Language::Python)
            .unwrap();
        assert_eq!(tree.language, Language::Python);
        assert_eq!(tree.root().kind(), "module");
    }

    #[test]
    fn test_parse_invalid_python_reports_location() {
        let err = TreeSitterParser::new()
            .parse("def broken(:\n    return\n", Language::Python)
            .unwrap_err();
        match err {
            Error::Parse { language, message } => {
                assert_eq!(language, Language::Python);
                assert!(message.starts_with("syntax error at line"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_each_supported_language() {
        let parser = TreeSitterParser::new();
        let samples = [
            (Language::Java, "class A { void f() { } }"),
            (Language::TypeScript, "const x: number = 1;"),
            (Language::JavaScript, "function f() { return 1; }"),
        ];
        for (language, code) in samples {
            assert!(parser.parse(code, language).is_ok(), "{language} failed");
        }
    }

    #[test]
    fn test_unknown_language_is_unsupported() {
        let err = TreeSitterParser::new()
            .parse("anything", Language::Unknown)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedLanguage(Language::Unknown)));
    }

    #[test]
    fn test_restricted_languages() {
        let parser = TreeSitterParser::new().with_languages(vec![Language::Python]);
        assert!(parser.supports(Language::Python));
        assert!(!parser.supports(Language::Java));
        assert!(matches!(
            parser.parse("class A {}", Language::Java),
            Err(Error::UnsupportedLanguage(Language::Java))
        ));
    }
}
