//! Cross-file import/export reference graph.
//!
//! One ordered traversal of the file list builds three maps keyed by
//! relative path: incoming references, aggregated import usage, and export
//! sets. Resolution is closed-world: an edge only ever targets a file in
//! the scanned set, and a specifier that resolves to nothing is dropped
//! silently (imports of assets, package names and bundler aliases are
//! expected to miss).
//!
//! Known precision gap: dynamic `import()` expressions and bundler path
//! aliases are not resolved, which can yield false-positive orphans and
//! unused exports for files reached only that way.

use concord_core::{AnalysisWarning, SourceFile, SOURCE_EXTENSIONS};
use concord_syntax::fallback::{self, RawExports, RawImport};
use concord_syntax::{resolve, walk};
use std::collections::{BTreeMap, BTreeSet};
use tree_sitter::Node;

/// Export surface of one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSet {
    /// Exported names; aliases are recorded under the exported name.
    pub named: BTreeSet<String>,

    /// Whether the file has a default export.
    pub has_default: bool,
}

impl From<RawExports> for ExportSet {
    fn from(raw: RawExports) -> Self {
        Self {
            named: raw.named,
            has_default: raw.has_default,
        }
    }
}

/// Import usage of one target file, aggregated across all importers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportUsage {
    /// Exported names consumed by name anywhere in the project.
    pub named: BTreeSet<String>,

    /// Some importer used a default import.
    pub default_import: bool,

    /// Some importer used `import * as X` or bound the whole module; this
    /// counts as consuming every export.
    pub namespace_import: bool,
}

impl ImportUsage {
    fn fold(&mut self, import: &RawImport) {
        self.named.extend(import.named.iter().cloned());
        self.default_import |= import.default_import;
        self.namespace_import |= import.namespace;
    }
}

/// The closed-world reference graph over the scanned file set.
#[derive(Debug, Default)]
pub struct ReferenceGraph {
    incoming: BTreeMap<String, BTreeSet<String>>,
    usage: BTreeMap<String, ImportUsage>,
    exports: BTreeMap<String, ExportSet>,
}

impl ReferenceGraph {
    /// Builds the graph with one pass over the file list.
    ///
    /// Never fails: files whose syntax cannot be resolved fall back to
    /// regex extraction, reported through the returned warnings.
    pub fn build(files: &[SourceFile]) -> (Self, Vec<AnalysisWarning>) {
        let existing: BTreeSet<String> =
            files.iter().map(|f| f.relative_path.clone()).collect();

        let mut graph = ReferenceGraph::default();
        let mut warnings = Vec::new();

        // Every scanned file is a node, even when nothing references it.
        for file in files {
            graph.incoming.entry(file.relative_path.clone()).or_default();
        }

        for file in files {
            let (imports, exports, warning) = scan_module(file);
            if let Some(warning) = warning {
                warnings.push(warning);
            }
            graph.exports.insert(file.relative_path.clone(), exports);

            for import in &imports {
                let Some(target) =
                    resolve_specifier(&file.relative_path, &import.specifier, &existing)
                else {
                    continue;
                };
                graph
                    .incoming
                    .entry(target.clone())
                    .or_default()
                    .insert(file.relative_path.clone());
                graph.usage.entry(target).or_default().fold(import);
            }
        }

        (graph, warnings)
    }

    /// Paths of files importing `path`. Empty for unreferenced files.
    pub fn incoming_references(&self, path: &str) -> &BTreeSet<String> {
        static EMPTY: BTreeSet<String> = BTreeSet::new();
        self.incoming.get(path).unwrap_or(&EMPTY)
    }

    /// Aggregated usage of `path`'s exports, if anyone imports it.
    pub fn usage_of(&self, path: &str) -> Option<&ImportUsage> {
        self.usage.get(path)
    }

    /// Export surface of `path`.
    pub fn exports_of(&self, path: &str) -> Option<&ExportSet> {
        self.exports.get(path)
    }
}

/// Scans one file for imports and exports, degrading from the tree to the
/// regex scanners when no tier produced a tree.
fn scan_module(file: &SourceFile) -> (Vec<RawImport>, ExportSet, Option<AnalysisWarning>) {
    let resolution = resolve(&file.content, &file.extension);
    match resolution.root() {
        Some(root) => {
            let mut imports = Vec::new();
            let mut exports = RawExports::default();
            collect_from_tree(root, &resolution.source, &mut imports, &mut exports);
            let warning = resolution.used_fallback.then(|| {
                AnalysisWarning::new(&file.relative_path, crate::engine::TYPE_STRIP_WARNING)
            });
            (imports, exports.into(), warning)
        }
        None => {
            let warning =
                AnalysisWarning::new(&file.relative_path, crate::engine::PARSE_FALLBACK_WARNING);
            (
                fallback::scan_imports(&file.content),
                fallback::scan_exports(&file.content).into(),
                Some(warning),
            )
        }
    }
}

/// Recursive tree scan for import statements, export statements and
/// `require` calls (which may appear anywhere, not just at the top level).
fn collect_from_tree(
    node: Node<'_>,
    source: &str,
    imports: &mut Vec<RawImport>,
    exports: &mut RawExports,
) {
    match node.kind() {
        "import_statement" => {
            if let Some(import) = import_from_node(node, source) {
                imports.push(import);
            }
        }
        "export_statement" => exports_from_node(node, source, exports),
        "call_expression" => {
            if let Some(import) = require_from_node(node, source) {
                imports.push(import);
            }
        }
        _ => {}
    }
    for child in walk::children(node) {
        collect_from_tree(child, source, imports, exports);
    }
}

/// Extracts one ESM import statement.
fn import_from_node(node: Node<'_>, source: &str) -> Option<RawImport> {
    let source_node = node.child_by_field_name("source")?;
    let mut import = RawImport {
        specifier: walk::string_value(source_node, source),
        ..Default::default()
    };

    let mut has_clause = false;
    for child in walk::named_children(node) {
        if child.kind() != "import_clause" {
            continue;
        }
        has_clause = true;
        for part in walk::named_children(child) {
            match part.kind() {
                "identifier" => import.default_import = true,
                "namespace_import" => import.namespace = true,
                "named_imports" => {
                    for specifier in walk::named_children(part) {
                        if specifier.kind() != "import_specifier" {
                            continue;
                        }
                        if let Some(name) = specifier.child_by_field_name("name") {
                            import
                                .named
                                .insert(walk::node_text(name, source).to_string());
                        }
                    }
                }
                _ => {}
            }
        }
    }
    if !has_clause {
        import.side_effect_only = true;
    }
    Some(import)
}

/// Folds one export statement into the file's export surface.
fn exports_from_node(node: Node<'_>, source: &str, exports: &mut RawExports) {
    // `export type { … }` is type-only and stays out of the surface.
    if walk::children(node).iter().any(|child| child.kind() == "type") {
        return;
    }
    let is_default = walk::children(node)
        .iter()
        .any(|child| child.kind() == "default");
    if is_default {
        exports.has_default = true;
    }

    if let Some(declaration) = node.child_by_field_name("declaration") {
        match declaration.kind() {
            "function_declaration"
            | "generator_function_declaration"
            | "class_declaration"
            | "abstract_class_declaration"
            | "enum_declaration" => {
                // `export default function foo()` exports `default`, not `foo`.
                if !is_default {
                    if let Some(name) = declaration.child_by_field_name("name") {
                        exports
                            .named
                            .insert(walk::node_text(name, source).to_string());
                    }
                }
            }
            "lexical_declaration" | "variable_declaration" => {
                for declarator in walk::named_children(declaration) {
                    if declarator.kind() != "variable_declarator" {
                        continue;
                    }
                    if let Some(name) = declarator.child_by_field_name("name") {
                        if name.kind() == "identifier" {
                            exports
                                .named
                                .insert(walk::node_text(name, source).to_string());
                        }
                    }
                }
            }
            // interface_declaration / type_alias_declaration are type-only
            // and never participate in usage tracking.
            _ => {}
        }
    }

    for child in walk::named_children(node) {
        if child.kind() != "export_clause" {
            continue;
        }
        for specifier in walk::named_children(child) {
            if specifier.kind() != "export_specifier" {
                continue;
            }
            let exported = specifier
                .child_by_field_name("alias")
                .or_else(|| specifier.child_by_field_name("name"))
                .map(|n| walk::node_text(n, source).to_string());
            match exported.as_deref() {
                Some("default") => exports.has_default = true,
                Some(name) if !name.is_empty() => {
                    exports.named.insert(name.to_string());
                }
                _ => {}
            }
        }
    }
    // `export * from './x'` records nothing: the re-exported names are
    // unknown without resolving the target's surface.
}

/// Extracts a `require('x')` call, classified by how its result is bound.
fn require_from_node(node: Node<'_>, source: &str) -> Option<RawImport> {
    let function = node.child_by_field_name("function")?;
    if function.kind() != "identifier" || walk::node_text(function, source) != "require" {
        return None;
    }
    let arguments = node.child_by_field_name("arguments")?;
    let argument = walk::named_children(arguments)
        .into_iter()
        .find(|child| child.kind() == "string")?;

    let mut import = RawImport {
        specifier: walk::string_value(argument, source),
        ..Default::default()
    };

    match node.parent() {
        Some(parent) if parent.kind() == "variable_declarator" => {
            match parent.child_by_field_name("name") {
                Some(name) if name.kind() == "object_pattern" => {
                    for entry in walk::named_children(name) {
                        match entry.kind() {
                            "shorthand_property_identifier_pattern" => {
                                import
                                    .named
                                    .insert(walk::node_text(entry, source).to_string());
                            }
                            "pair_pattern" => {
                                if let Some(key) = entry.child_by_field_name("key") {
                                    import
                                        .named
                                        .insert(walk::node_text(key, source).to_string());
                                }
                            }
                            _ => {}
                        }
                    }
                }
                // `const X = require(…)` consumes the whole module.
                Some(_) => import.namespace = true,
                None => import.side_effect_only = true,
            }
        }
        Some(parent) if parent.kind() == "member_expression" => {
            if let Some(property) = parent.child_by_field_name("property") {
                import
                    .named
                    .insert(walk::node_text(property, source).to_string());
            } else {
                import.namespace = true;
            }
        }
        _ => import.side_effect_only = true,
    }

    Some(import)
}

/// Resolves a relative specifier against the scanned file set.
///
/// Order: exact path, then each source extension appended in priority
/// order, then `index.<ext>` treating the specifier as a directory. Bare
/// package names never resolve here.
pub fn resolve_specifier(
    importer: &str,
    specifier: &str,
    existing: &BTreeSet<String>,
) -> Option<String> {
    if !specifier.starts_with('.') {
        return None;
    }
    let directory = match importer.rfind('/') {
        Some(idx) => &importer[..idx],
        None => "",
    };
    let base = normalize_relative(directory, specifier)?;

    if existing.contains(&base) {
        return Some(base);
    }
    for extension in SOURCE_EXTENSIONS {
        let candidate = format!("{base}{extension}");
        if existing.contains(&candidate) {
            return Some(candidate);
        }
    }
    for extension in SOURCE_EXTENSIONS {
        let candidate = format!("{base}/index{extension}");
        if existing.contains(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Joins a directory and a relative specifier into a normalized
/// forward-slash path. `None` when `..` escapes the project root.
fn normalize_relative(directory: &str, specifier: &str) -> Option<String> {
    let mut segments: Vec<&str> = if directory.is_empty() {
        Vec::new()
    } else {
        directory.split('/').collect()
    };
    for part in specifier.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }
    Some(segments.join("/"))
}
