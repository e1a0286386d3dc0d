use tree_sitter::Node as TSNode;

use super::common::{extract_docstring, extract_text, find_child_by_kind, TreeSitterParser};
use super::{module_name_for, FileExtraction, LanguageParser};
use crate::core::symbols::{RawReference, ReferenceKind, Symbol, SymbolKind};
use crate::error::CodemapResult;

/// Python symbol and reference extractor built on the tree-sitter grammar.
///
/// Emits one `module` symbol per file plus `class`/`function`/`method`
/// symbols with dotted qualified names, and raw (unresolved) call, import,
/// and inheritance references for the resolver.
pub struct PythonParser;

impl PythonParser {
    pub fn new() -> Self {
        Self
    }

    fn extract_module_children(
        &self,
        root: &TSNode,
        source: &[u8],
        file: &str,
        module: &str,
        out: &mut FileExtraction,
    ) {
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            self.dispatch_top_level(&child, source, file, module, out);
        }
    }

    fn dispatch_top_level(
        &self,
        node: &TSNode,
        source: &[u8],
        file: &str,
        module: &str,
        out: &mut FileExtraction,
    ) {
        match node.kind() {
            "import_statement" | "import_from_statement" => {
                self.process_import(node, source, file, module, out);
            }
            "decorated_definition" => {
                if let Some(definition) = node.child_by_field_name("definition") {
                    self.dispatch_top_level(&definition, source, file, module, out);
                }
            }
            "class_definition" => {
                self.process_class(node, source, file, module, out);
            }
            "function_definition" => {
                self.process_function(node, source, file, module, None, out);
            }
            _ => {
                // Top-level statements: calls are attributed to the module.
                self.collect_calls(node, source, file, module, out);
            }
        }
    }

    fn process_class(
        &self,
        node: &TSNode,
        source: &[u8],
        file: &str,
        module: &str,
        out: &mut FileExtraction,
    ) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let class_name = extract_text(&name_node, source);
        let qualified = format!("{module}.{class_name}");
        let line = node.start_position().row + 1;

        let body = find_child_by_kind(node, "block");
        let mut symbol = Symbol::new(qualified.clone(), SymbolKind::Class, file.to_string(), line);
        if let Some(doc) = body.as_ref().and_then(|b| extract_docstring(b, source)) {
            symbol = symbol.with_docstring(doc);
        }
        out.symbols.push(symbol);

        // Base classes in the superclass argument list become raw
        // inheritance references.
        if let Some(superclasses) = find_child_by_kind(node, "argument_list") {
            let mut cursor = superclasses.walk();
            for base in superclasses.children(&mut cursor) {
                if matches!(base.kind(), "identifier" | "attribute" | "dotted_name") {
                    out.references.push(RawReference {
                        from_sym: qualified.clone(),
                        name: extract_text(&base, source).to_string(),
                        kind: ReferenceKind::Inherit,
                        file: file.to_string(),
                        line: base.start_position().row + 1,
                    });
                }
            }
        }

        if let Some(body) = body {
            let mut cursor = body.walk();
            for stmt in body.children(&mut cursor) {
                match stmt.kind() {
                    "function_definition" => {
                        self.process_function(&stmt, source, file, module, Some(&qualified), out);
                    }
                    "decorated_definition" => {
                        if let Some(def) = stmt.child_by_field_name("definition") {
                            if def.kind() == "function_definition" {
                                self.process_function(
                                    &def,
                                    source,
                                    file,
                                    module,
                                    Some(&qualified),
                                    out,
                                );
                            }
                        }
                    }
                    _ => self.collect_calls_from(&stmt, source, file, &qualified, out),
                }
            }
        }
    }

    fn process_function(
        &self,
        node: &TSNode,
        source: &[u8],
        file: &str,
        module: &str,
        owner: Option<&str>,
        out: &mut FileExtraction,
    ) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let func_name = extract_text(&name_node, source);
        let (qualified, kind) = match owner {
            Some(class_qualified) => (
                format!("{class_qualified}.{func_name}"),
                SymbolKind::Method,
            ),
            None => (format!("{module}.{func_name}"), SymbolKind::Function),
        };
        let line = node.start_position().row + 1;

        let mut symbol = Symbol::new(qualified.clone(), kind, file.to_string(), line);

        if let Some(params) = node.child_by_field_name("parameters") {
            let mut signature = extract_text(&params, source).to_string();
            if let Some(return_type) = node.child_by_field_name("return_type") {
                signature.push_str(" -> ");
                signature.push_str(extract_text(&return_type, source));
            }
            symbol = symbol.with_signature(signature);
        }

        let body = find_child_by_kind(node, "block");
        if let Some(doc) = body.as_ref().and_then(|b| extract_docstring(b, source)) {
            symbol = symbol.with_docstring(doc);
        }
        out.symbols.push(symbol);

        // Calls anywhere in the body (including nested defs) are attributed
        // to this declared symbol.
        if let Some(body) = body {
            self.collect_calls_from(&body, source, file, &qualified, out);
        }
    }

    fn process_import(
        &self,
        node: &TSNode,
        source: &[u8],
        file: &str,
        module: &str,
        out: &mut FileExtraction,
    ) {
        let line = node.start_position().row + 1;
        let mut push = |name: String| {
            if !name.is_empty() {
                out.references.push(RawReference {
                    from_sym: module.to_string(),
                    name,
                    kind: ReferenceKind::Import,
                    file: file.to_string(),
                    line,
                });
            }
        };

        match node.kind() {
            "import_statement" => {
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    match child.kind() {
                        "dotted_name" => push(extract_text(&child, source).to_string()),
                        "aliased_import" => {
                            if let Some(name) = child.child_by_field_name("name") {
                                push(extract_text(&name, source).to_string());
                            }
                        }
                        _ => {}
                    }
                }
            }
            "import_from_statement" => {
                let base = node
                    .child_by_field_name("module_name")
                    .map(|m| extract_text(&m, source).trim_matches('.').to_string())
                    .unwrap_or_default();

                let mut seen_import_keyword = false;
                let mut imported_any = false;
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    if child.kind() == "import" {
                        seen_import_keyword = true;
                        continue;
                    }
                    if !seen_import_keyword {
                        continue;
                    }
                    match child.kind() {
                        "dotted_name" | "aliased_import" => {
                            let name_node = if child.kind() == "aliased_import" {
                                child.child_by_field_name("name")
                            } else {
                                Some(child)
                            };
                            if let Some(name_node) = name_node {
                                let name = extract_text(&name_node, source);
                                imported_any = true;
                                if base.is_empty() {
                                    push(name.to_string());
                                } else {
                                    push(format!("{base}.{name}"));
                                }
                            }
                        }
                        "wildcard_import" => {
                            imported_any = true;
                            push(base.clone());
                        }
                        _ => {}
                    }
                }
                if !imported_any {
                    push(base);
                }
            }
            _ => {}
        }
    }

    fn collect_calls(
        &self,
        node: &TSNode,
        source: &[u8],
        file: &str,
        from_sym: &str,
        out: &mut FileExtraction,
    ) {
        self.collect_calls_from(node, source, file, from_sym, out);
    }

    fn collect_calls_from(
        &self,
        node: &TSNode,
        source: &[u8],
        file: &str,
        from_sym: &str,
        out: &mut FileExtraction,
    ) {
        if node.kind() == "call" {
            if let Some(function_node) = node.child_by_field_name("function") {
                if let Some(name) = Self::called_name(&function_node, source) {
                    out.references.push(RawReference {
                        from_sym: from_sym.to_string(),
                        name,
                        kind: ReferenceKind::Call,
                        file: file.to_string(),
                        line: node.start_position().row + 1,
                    });
                }
            }
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.collect_calls_from(&child, source, file, from_sym, out);
        }
    }

    /// Name of the call target: bare identifiers stay bare, attribute chains
    /// keep their dotted text, and instance prefixes (`self.`, `cls.`,
    /// `super().`) are stripped to the bare method name.
    fn called_name(function_node: &TSNode, source: &[u8]) -> Option<String> {
        let text = match function_node.kind() {
            "identifier" | "attribute" => extract_text(function_node, source),
            _ => return None,
        };
        if text.is_empty() {
            return None;
        }
        for prefix in ["self.", "cls.", "super()."] {
            if let Some(stripped) = text.strip_prefix(prefix) {
                return Some(stripped.to_string());
            }
        }
        Some(text.to_string())
    }
}

impl Default for PythonParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageParser for PythonParser {
    fn extract(&self, source: &str, file: &str) -> CodemapResult<FileExtraction> {
        let mut parser = TreeSitterParser::new(tree_sitter_python::language())?;
        let tree = parser.parse(source, file)?;
        let root = tree.root_node();
        let source_bytes = source.as_bytes();
        let module = module_name_for(file);

        let mut out = FileExtraction::default();

        let mut module_symbol = Symbol::new(module.clone(), SymbolKind::Module, file.to_string(), 1);
        if let Some(doc) = extract_docstring(&root, source_bytes) {
            module_symbol = module_symbol.with_docstring(doc);
        }
        out.symbols.push(module_symbol);

        self.extract_module_children(&root, source_bytes, file, &module, &mut out);

        Ok(out)
    }

    fn language_name(&self) -> &str {
        "python"
    }
}
