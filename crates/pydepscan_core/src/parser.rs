use dashmap::DashMap;
use log::{debug, trace};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tree_sitter::{Node, Parser};

use crate::{
    error::{Result, ScanError},
    types::ImportOccurrence,
};

/// Returns the imports of a Python module, parsing it at most once per cache.
pub fn imports_for(
    file: &Path,
    cache: &DashMap<PathBuf, Vec<ImportOccurrence>>,
) -> Result<Vec<ImportOccurrence>> {
    let file_buf = file.to_path_buf();
    if let Some(v) = cache.get(&file_buf) {
        trace!("Cache hit for imports: {}", file.display());
        return Ok(v.clone());
    }
    trace!("Parsing file for imports: {}", file.display());
    let src = fs::read_to_string(file).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ScanError::NotFound { path: file_buf.clone() },
        _ => ScanError::Read { path: file_buf.clone(), source },
    })?;

    let imports = imports_in_source(&src, file)?;

    debug!("Found {} imports in {}", imports.len(), file.display());
    cache.insert(file_buf, imports.clone());
    Ok(imports)
}

/// Parses Python source code and returns every import it contains, in source
/// order. `path` is only used for error reporting.
pub fn imports_in_source(source: &str, path: &Path) -> Result<Vec<ImportOccurrence>> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|_| ScanError::Language)?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ScanError::Parse { path: path.to_path_buf(), line: 1, column: 1 })?;

    let root = tree.root_node();
    if let Some(bad) = first_invalid(root) {
        let pos = bad.start_position();
        debug!("Syntax error in {} at {}:{}", path.display(), pos.row + 1, pos.column + 1);
        return Err(ScanError::Parse {
            path: path.to_path_buf(),
            line: pos.row + 1,
            column: pos.column + 1,
        });
    }

    let mut visitor = ImportVisitor::new(source.as_bytes());
    visitor.visit(root);
    Ok(visitor.imports)
}

/// Statements the grammar still accepts although only Python 2 allows them.
const PYTHON2_STATEMENTS: &[&str] = &["print_statement", "exec_statement"];

/// Finds the first node, in document order, that Python 3 would reject: an
/// `ERROR` or `MISSING` node, or a Python 2 only statement.
fn first_invalid(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() || PYTHON2_STATEMENTS.contains(&node.kind()) {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(bad) = first_invalid(child) {
            return Some(bad);
        }
    }
    if node.has_error() { Some(node) } else { None }
}

/// The syntax tree shapes relevant to import detection.
enum PyNode<'tree> {
    /// `import a.b, c as d`
    Import(Node<'tree>),
    /// `from a.b import c` or `from .a import b`
    ImportFrom(Node<'tree>),
    /// `from __future__ import annotations`
    FutureImport(Node<'tree>),
    /// Indented body of a compound statement
    Block(Node<'tree>),
    Other(Node<'tree>),
}

impl<'tree> PyNode<'tree> {
    fn classify(node: Node<'tree>) -> Self {
        match node.kind() {
            "import_statement" => PyNode::Import(node),
            "import_from_statement" => PyNode::ImportFrom(node),
            "future_import_statement" => PyNode::FutureImport(node),
            "block" => PyNode::Block(node),
            _ => PyNode::Other(node),
        }
    }
}

/// Walks a syntax tree tracking how many blocks enclose the current node.
///
/// Every compound statement body (`if`, `try`/`except`, loops, `with`, `match`
/// cases, `def`, `class`) is a `block`, so a depth of zero means module level.
struct ImportVisitor<'src> {
    source: &'src [u8],
    depth: usize,
    imports: Vec<ImportOccurrence>,
}

impl<'src> ImportVisitor<'src> {
    fn new(source: &'src [u8]) -> Self {
        Self { source, depth: 0, imports: Vec::new() }
    }

    fn visit(&mut self, node: Node<'_>) {
        match PyNode::classify(node) {
            PyNode::Import(n) => self.visit_import(n),
            PyNode::ImportFrom(n) => self.visit_import_from(n),
            PyNode::FutureImport(n) => self.visit_future_import(n),
            PyNode::Block(n) => {
                self.depth += 1;
                self.visit_children(n);
                self.depth -= 1;
            }
            PyNode::Other(n) => self.visit_children(n),
        }
    }

    fn visit_children(&mut self, node: Node<'_>) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.visit(child);
        }
    }

    fn visit_import(&mut self, node: Node<'_>) {
        let mut cursor = node.walk();
        for target in node.children_by_field_name("name", &mut cursor) {
            if let Some(module) = self.target_name(target) {
                self.push(node, module);
            }
        }
    }

    fn visit_import_from(&mut self, node: Node<'_>) {
        let Some(module_node) = node.child_by_field_name("module_name") else {
            return;
        };
        // from . import x / from .sibling import x
        if module_node.kind() == "relative_import" {
            trace!("Skipping relative import at line {}", node.start_position().row + 1);
            return;
        }
        if let Some(module) = self.dotted_name(module_node) {
            self.push_from(node, &module);
        }
    }

    fn visit_future_import(&mut self, node: Node<'_>) {
        self.push_from(node, "__future__");
    }

    /// Records `module.member` for every imported member, or `module` alone
    /// for wildcard imports.
    fn push_from(&mut self, node: Node<'_>, module: &str) {
        let mut cursor = node.walk();
        let members: Vec<String> = node
            .children_by_field_name("name", &mut cursor)
            .filter_map(|target| self.target_name(target))
            .collect();

        if members.is_empty() {
            self.push(node, module.to_string());
        }
        for member in members {
            self.push(node, format!("{}.{}", module, member));
        }
    }

    fn push(&mut self, node: Node<'_>, module: String) {
        let line = node.start_position().row + 1;
        trace!("Found import '{}' at line {} (depth {})", module, line, self.depth);
        self.imports.push(ImportOccurrence { module, depth: self.depth });
    }

    /// Name bound by an import target: `a.b` or `a.b as c`.
    fn target_name(&self, node: Node<'_>) -> Option<String> {
        match node.kind() {
            "dotted_name" => self.dotted_name(node),
            "aliased_import" => {
                node.child_by_field_name("name").and_then(|name| self.dotted_name(name))
            }
            _ => None,
        }
    }

    /// Joins the identifiers of a `dotted_name`, dropping any whitespace or
    /// line continuations between segments.
    fn dotted_name(&self, node: Node<'_>) -> Option<String> {
        let mut cursor = node.walk();
        let parts: Vec<&str> = node
            .named_children(&mut cursor)
            .filter(|child| child.kind() == "identifier")
            .filter_map(|child| child.utf8_text(self.source).ok())
            .collect();
        if parts.is_empty() { None } else { Some(parts.join(".")) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let file_path = dir.join(name);
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    fn parse(source: &str) -> Vec<ImportOccurrence> {
        imports_in_source(source, Path::new("test.py")).unwrap()
    }

    fn modules(imports: &[ImportOccurrence]) -> Vec<(&str, usize)> {
        imports.iter().map(|i| (i.module.as_str(), i.depth)).collect()
    }

    #[test]
    fn test_plain_import() {
        let imports = parse("import requests\n");
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].module, "requests");
        assert_eq!(imports[0].depth, 0);
    }

    #[test]
    fn test_dotted_and_aliased_import() {
        let imports = parse("import numpy as np\nimport os.path as osp\n");
        assert_eq!(modules(&imports), vec![("numpy", 0), ("os.path", 0)]);
    }

    #[test]
    fn test_multiple_targets_share_depth() {
        let imports = parse("if x:\n    import a.b, c as d, e\n");
        assert_eq!(modules(&imports), vec![("a.b", 1), ("c", 1), ("e", 1)]);
    }

    #[test]
    fn test_from_import_members() {
        let imports = parse("from a.b import c, d as e\n");
        assert_eq!(modules(&imports), vec![("a.b.c", 0), ("a.b.d", 0)]);
    }

    #[test]
    fn test_from_import_parenthesized() {
        let imports = parse("from a import (\n    b,\n    c,\n)\n");
        assert_eq!(modules(&imports), vec![("a.b", 0), ("a.c", 0)]);
    }

    #[test]
    fn test_wildcard_import() {
        let imports = parse("from a.b import *\n");
        assert_eq!(modules(&imports), vec![("a.b", 0)]);
    }

    #[test]
    fn test_relative_imports_skipped() {
        let imports = parse("from . import sibling\nfrom .pkg import thing\nfrom ..up import x\n");
        assert!(imports.is_empty());
    }

    #[test]
    fn test_future_import() {
        let imports = parse("from __future__ import annotations\n");
        assert_eq!(modules(&imports), vec![("__future__.annotations", 0)]);
    }

    #[test]
    fn test_conditional_imports_are_nested() {
        let imports = parse(
            "if sys.platform == 'win32':\n    import winreg\nelif x:\n    import a\nelse:\n    import b\n",
        );
        assert_eq!(modules(&imports), vec![("winreg", 1), ("a", 1), ("b", 1)]);
    }

    #[test]
    fn test_try_except_imports_are_nested() {
        let imports = parse(
            "try:\n    import lxml\nexcept ImportError:\n    import xml\nfinally:\n    import c\n",
        );
        assert_eq!(modules(&imports), vec![("lxml", 1), ("xml", 1), ("c", 1)]);
    }

    #[test]
    fn test_function_and_method_imports() {
        let imports = parse(
            "def func():\n    import re\n\nclass Klass:\n    def method(self):\n        import yaml\n",
        );
        assert_eq!(modules(&imports), vec![("re", 1), ("yaml", 2)]);
    }

    #[test]
    fn test_loop_with_and_match_imports() {
        let imports = parse(
            "for i in x:\n    import a\nwhile y:\n    import b\nwith z:\n    import c\nmatch v:\n    case 1:\n        import d\n",
        );
        assert_eq!(modules(&imports)[..3], [("a", 1), ("b", 1), ("c", 1)]);
        assert_eq!(imports[3].module, "d");
        assert!(!imports[3].is_global());
    }

    #[test]
    fn test_decorated_function_import() {
        let imports = parse("@decorator\ndef f():\n    import a\n");
        assert_eq!(modules(&imports), vec![("a", 1)]);
    }

    #[test]
    fn test_single_line_compound_statement_is_nested() {
        let imports = parse("if x: import a\n");
        assert_eq!(modules(&imports), vec![("a", 1)]);
    }

    #[test]
    fn test_semicolon_separated_imports_are_global() {
        let imports = parse("import a; import b\n");
        assert_eq!(modules(&imports), vec![("a", 0), ("b", 0)]);
    }

    #[test]
    fn test_depth_resets_after_block() {
        let imports = parse("if x:\n    import a\nimport b\n");
        assert_eq!(modules(&imports), vec![("a", 1), ("b", 0)]);
    }

    #[test]
    fn test_comments_and_strings_ignored() {
        let imports = parse("# import fake\ns = 'import other'\n\"\"\"\nimport doc\n\"\"\"\n");
        assert!(imports.is_empty());
    }

    #[test]
    fn test_no_imports() {
        assert!(parse("x = 42\n").is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_syntax_error() {
        let err = imports_in_source("import a\ndef f(:\n    pass\n", Path::new("bad.py"))
            .unwrap_err();
        match err {
            ScanError::Parse { path, line, column } => {
                assert_eq!(path, PathBuf::from("bad.py"));
                assert!(line >= 1 && column >= 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_python2_statements_rejected() {
        for source in ["import a\nprint 'x'\n", "import a\nexec 'x = 1'\n"] {
            let err = imports_in_source(source, Path::new("py2.py")).unwrap_err();
            match err {
                ScanError::Parse { line, column, .. } => assert_eq!((line, column), (2, 1)),
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn test_print_and_exec_calls_accepted() {
        let imports = parse("import a\nprint('x')\nexec('x = 1')\n");
        assert_eq!(modules(&imports), vec![("a", 0)]);
    }

    #[test]
    fn test_imports_for_file() {
        let temp_dir = TempDir::new().unwrap();
        let cache = DashMap::new();
        let file = create_test_file(temp_dir.path(), "mod.py", "import foo\nfrom bar import baz\n");
        let imports = imports_for(&file, &cache).unwrap();
        assert_eq!(modules(&imports), vec![("foo", 0), ("bar.baz", 0)]);
    }

    #[test]
    fn test_imports_for_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let cache = DashMap::new();
        let err = imports_for(&temp_dir.path().join("missing.py"), &cache).unwrap_err();
        assert!(matches!(err, ScanError::NotFound { .. }));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_behavior() {
        let temp_dir = TempDir::new().unwrap();
        let cache = DashMap::new();
        let file = create_test_file(temp_dir.path(), "mod.py", "import foo\n");

        let imports1 = imports_for(&file, &cache).unwrap();
        assert_eq!(imports1.len(), 1);

        // Cached result survives changes on disk
        fs::write(&file, "import foo\nimport bar\n").unwrap();
        let imports2 = imports_for(&file, &cache).unwrap();
        assert_eq!(imports1, imports2);
        assert_eq!(cache.len(), 1);
    }
}
