//! Regex-based extraction for files without a syntax tree.
//!
//! When every resolver tier fails, downstream analyzers still need
//! identifiers, imports, exports and await counts. These scanners trade
//! precision for availability: they work line-wise, cannot see through
//! multi-line statements, and will match inside strings and comments.
//! Callers already know they are on the low-confidence path when they
//! reach for this module.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static IMPORT_FROM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^[ \t]*import\s+(?:type\s+)?([^;'"]+?)\s+from\s+['"]([^'"]+)['"]"#)
        .expect("static regex")
});

static IMPORT_BARE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)^[ \t]*import\s*['"]([^'"]+)['"]"#).expect("static regex"));

static REQUIRE_BOUND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?:const|let|var)\s+(\{[^}]*\}|[A-Za-z_$][\w$]*)\s*=\s*require\s*\(\s*['"]([^'"]+)['"]\s*\)"#,
    )
    .expect("static regex")
});

static REQUIRE_MEMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"require\s*\(\s*['"]([^'"]+)['"]\s*\)\s*\.\s*([A-Za-z_$][\w$]*)"#)
        .expect("static regex")
});

static REQUIRE_ANY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"require\s*\(\s*['"]([^'"]+)['"]\s*\)"#).expect("static regex"));

static NAMESPACE_CLAUSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\s+as\s+[A-Za-z_$][\w$]*").expect("static regex"));

static DEFAULT_CLAUSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z_$][\w$]*)\s*(?:,|$)").expect("static regex"));

static BRACE_CLAUSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^}]*)\}").expect("static regex"));

static EXPORT_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^[ \t]*export\s+(?:declare\s+)?(?:async\s+)?(?:const|let|var|function\*?|class|enum)\s+([A-Za-z_$][\w$]*)",
    )
    .expect("static regex")
});

static EXPORT_DEFAULT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*export\s+default\b").expect("static regex"));

static EXPORT_BRACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*export\s*\{([^}]*)\}").expect("static regex"));

static DECLARED_IDENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:const|let|var|function|class)\s+([A-Za-z_$][\w$]*)").expect("static regex")
});

static AWAIT_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bawait\b").expect("static regex"));

/// One import statement, regex-extracted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawImport {
    /// Specifier as written (`./utils`, `react`, …).
    pub specifier: String,

    /// `import X from …`.
    pub default_import: bool,

    /// Exported names consumed via `{ … }` (aliases resolved to the
    /// *exported* name) or CJS destructuring.
    pub named: BTreeSet<String>,

    /// `import * as X from …` or `const X = require(…)`.
    pub namespace: bool,

    /// `import './x'` or a bare `require('./x')` call.
    pub side_effect_only: bool,
}

impl RawImport {
    fn for_specifier(specifier: &str) -> Self {
        Self {
            specifier: specifier.to_string(),
            ..Default::default()
        }
    }
}

/// Regex-extracted export surface of a file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawExports {
    /// Exported names (the *exported* side of any alias).
    pub named: BTreeSet<String>,

    /// Whether the file has a default export (directly or via
    /// `export { x as default }`).
    pub has_default: bool,
}

/// Parses an ESM import clause (`Foo, { a as b }, * as ns`) into flags.
fn parse_import_clause(clause: &str, import: &mut RawImport) {
    let clause = clause.trim();

    if NAMESPACE_CLAUSE.is_match(clause) {
        import.namespace = true;
    }
    if let Some(caps) = DEFAULT_CLAUSE.captures(clause) {
        // A bare brace or star clause never matches here; a leading
        // identifier is the default binding.
        if &caps[1] != "type" {
            import.default_import = true;
        }
    }
    if let Some(caps) = BRACE_CLAUSE.captures(clause) {
        for item in caps[1].split(',') {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            // `type Foo` inline type specifiers still reference the name.
            let item = item.strip_prefix("type ").unwrap_or(item).trim();
            // `exported as local`: usage is keyed by the exported name.
            let exported = item.split_whitespace().next().unwrap_or(item);
            if !exported.is_empty() {
                import.named.insert(exported.to_string());
            }
        }
    }
    if !import.default_import && !import.namespace && import.named.is_empty() {
        import.side_effect_only = true;
    }
}

/// Extracts all import statements from source text.
///
/// Recognizes `import … from 'x'`, side-effect `import 'x'`, and the
/// `require('x')` family (bound, destructured, member-accessed, bare).
pub fn scan_imports(source: &str) -> Vec<RawImport> {
    let mut imports = Vec::new();
    // Byte spans already claimed by a more specific require form.
    let mut claimed: Vec<(usize, usize)> = Vec::new();

    for caps in IMPORT_FROM.captures_iter(source) {
        let mut import = RawImport::for_specifier(&caps[2]);
        parse_import_clause(&caps[1], &mut import);
        imports.push(import);
    }

    for caps in IMPORT_BARE.captures_iter(source) {
        let mut import = RawImport::for_specifier(&caps[1]);
        import.side_effect_only = true;
        imports.push(import);
    }

    for caps in REQUIRE_BOUND.captures_iter(source) {
        let Some(whole) = caps.get(0) else { continue };
        claimed.push((whole.start(), whole.end()));

        let mut import = RawImport::for_specifier(&caps[2]);
        let binding = caps[1].trim();
        if let Some(inner) = binding.strip_prefix('{').and_then(|b| b.strip_suffix('}')) {
            for item in inner.split(',') {
                let item = item.trim();
                if item.is_empty() || item.starts_with("...") {
                    continue;
                }
                // `{ source: local }`: usage is the source property.
                let property = item.split(':').next().unwrap_or(item).trim();
                if !property.is_empty() {
                    import.named.insert(property.to_string());
                }
            }
        } else {
            // `const X = require(…)` consumes the whole module.
            import.namespace = true;
        }
        imports.push(import);
    }

    for caps in REQUIRE_MEMBER.captures_iter(source) {
        let Some(whole) = caps.get(0) else { continue };
        if claimed.iter().any(|&(s, e)| whole.start() < e && whole.end() > s) {
            continue;
        }
        claimed.push((whole.start(), whole.end()));

        let mut import = RawImport::for_specifier(&caps[1]);
        import.named.insert(caps[2].to_string());
        imports.push(import);
    }

    for caps in REQUIRE_ANY.captures_iter(source) {
        let Some(whole) = caps.get(0) else { continue };
        if claimed.iter().any(|&(s, e)| whole.start() < e && whole.end() > s) {
            continue;
        }
        let mut import = RawImport::for_specifier(&caps[1]);
        import.side_effect_only = true;
        imports.push(import);
    }

    imports
}

/// Extracts the export surface from source text.
pub fn scan_exports(source: &str) -> RawExports {
    let mut exports = RawExports::default();

    for caps in EXPORT_DECL.captures_iter(source) {
        exports.named.insert(caps[1].to_string());
    }

    if EXPORT_DEFAULT.is_match(source) {
        exports.has_default = true;
    }

    for caps in EXPORT_BRACE.captures_iter(source) {
        for item in caps[1].split(',') {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            let mut parts = item.split_whitespace();
            let local = parts.next().unwrap_or("");
            // `local as exported`: the exported name is what importers see.
            let exported = match (parts.next(), parts.next()) {
                (Some("as"), Some(alias)) => alias,
                _ => local,
            };
            if exported == "default" {
                exports.has_default = true;
            } else if !exported.is_empty() {
                exports.named.insert(exported.to_string());
            }
        }
    }

    exports
}

/// Declared-identifier candidates (`const x`, `function f`, `class C`).
pub fn scan_identifiers(source: &str) -> Vec<String> {
    DECLARED_IDENT
        .captures_iter(source)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Flat count of `await` occurrences, the no-tree degradation of the
/// control-flow analyzer.
pub fn count_awaits(source: &str) -> usize {
    AWAIT_WORD.find_iter(source).count()
}
