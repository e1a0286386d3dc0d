use tree_sitter::{Language, Node as TSNode, Parser, Tree};

use crate::error::{CodemapError, CodemapResult};

pub struct TreeSitterParser {
    parser: Parser,
}

impl TreeSitterParser {
    pub fn new(language: Language) -> CodemapResult<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(language)
            .map_err(|e| CodemapError::Extraction(format!("failed to load grammar: {e}")))?;
        Ok(Self { parser })
    }

    pub fn parse(&mut self, source: &str, file: &str) -> CodemapResult<Tree> {
        self.parser
            .parse(source, None)
            .ok_or_else(|| CodemapError::Extraction(format!("failed to parse file: {file}")))
    }
}

pub fn extract_text<'a>(node: &TSNode, source: &'a [u8]) -> &'a str {
    std::str::from_utf8(&source[node.byte_range()]).unwrap_or("")
}

pub fn find_child_by_kind<'a>(node: &'a TSNode, kind: &str) -> Option<TSNode<'a>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|child| child.kind() == kind);
    found
}

/// Docstring convention: the first statement of a body (or of the module
/// root) is a bare string literal.
pub fn extract_docstring(body: &TSNode, source: &[u8]) -> Option<String> {
    let mut cursor = body.walk();
    let first = body
        .children(&mut cursor)
        .find(|child| !matches!(child.kind(), "comment"))?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let string_node = first.child(0)?;
    if string_node.kind() != "string" {
        return None;
    }
    let raw = extract_text(&string_node, source);
    if raw.starts_with("\"\"\"") || raw.starts_with("'''") {
        Some(raw.trim_matches(|c| c == '"' || c == '\'').trim().to_string())
    } else {
        None
    }
}
