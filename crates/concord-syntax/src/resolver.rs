//! The tiered syntax resolver.

use tree_sitter::{Language, Parser, Tree};

use crate::strip;

/// Outcome of resolving one file's syntax.
#[derive(Debug)]
pub struct SyntaxResolution {
    /// The parsed tree, when any tier succeeded.
    pub tree: Option<Tree>,

    /// True when the tree was parsed from type-stripped text rather than
    /// the original source. Consumers can use this to distinguish full
    /// precision from the degraded tier.
    pub used_fallback: bool,

    /// The exact text the tree was parsed from. Node byte ranges refer to
    /// this buffer, which differs from the original content when
    /// `used_fallback` is set (stripping is length-preserving, but callers
    /// should not assume that).
    pub source: String,
}

impl SyntaxResolution {
    /// Root node of the tree, when one exists.
    pub fn root(&self) -> Option<tree_sitter::Node<'_>> {
        self.tree.as_ref().map(|tree| tree.root_node())
    }
}

/// Primary and alternate grammar for an extension.
///
/// TypeScript sources try the TSX grammar second (it accepts a superset of
/// angle-bracket-free code the plain grammar rejects, and vice versa);
/// JavaScript-family sources try TSX second, which shrugs off stray
/// TypeScript syntax inside `.js` files.
fn grammars_for(extension: &str) -> [Language; 2] {
    let js: Language = tree_sitter_javascript::LANGUAGE.into();
    let ts: Language = tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into();
    let tsx: Language = tree_sitter_typescript::LANGUAGE_TSX.into();
    match extension {
        ".ts" => [ts, tsx],
        ".tsx" => [tsx, ts],
        _ => [js, tsx],
    }
}

/// One parse attempt. `None` on grammar-load failure, parser bail-out, or
/// a tree whose root contains error nodes.
fn try_parse(language: &Language, source: &str) -> Option<Tree> {
    let mut parser = Parser::new();
    parser.set_language(language).ok()?;
    let tree = parser.parse(source, None)?;
    if tree.root_node().has_error() {
        None
    } else {
        Some(tree)
    }
}

/// Resolves file text into a syntax tree, degrading through the tiers.
///
/// Never errors; a `tree` of `None` means every tier failed and the caller
/// must use the regex [`crate::fallback`] helpers for this file.
pub fn resolve(content: &str, extension: &str) -> SyntaxResolution {
    let grammars = grammars_for(extension);

    for language in &grammars {
        if let Some(tree) = try_parse(language, content) {
            return SyntaxResolution {
                tree: Some(tree),
                used_fallback: false,
                source: content.to_string(),
            };
        }
    }

    // Tier 3: blank out type-only constructs and retry. Only worth doing
    // when stripping actually changed something.
    let stripped = strip::strip_type_constructs(content);
    if stripped != content {
        for language in &grammars {
            if let Some(tree) = try_parse(language, &stripped) {
                tracing::debug!(extension, "parsed via type-stripped fallback");
                return SyntaxResolution {
                    tree: Some(tree),
                    used_fallback: true,
                    source: stripped,
                };
            }
        }
    }

    tracing::debug!(extension, "all parse tiers failed");
    SyntaxResolution {
        tree: None,
        used_fallback: false,
        source: content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_javascript_parses() {
        let resolution = resolve("const x = 1;\nfunction f() { return x; }\n", ".js");
        assert!(resolution.tree.is_some());
        assert!(!resolution.used_fallback);
    }

    #[test]
    fn test_typescript_parses_with_primary_grammar() {
        let resolution = resolve(
            "interface Foo { a: string }\nexport const x: number = 1;\n",
            ".ts",
        );
        assert!(resolution.tree.is_some());
        assert!(!resolution.used_fallback);
    }

    #[test]
    fn test_typescript_in_js_file_recovers_via_alternate_grammar() {
        // The JS grammar rejects the annotation; the TSX tier accepts it.
        let resolution = resolve("const x: number = 1;\n", ".js");
        assert!(resolution.tree.is_some());
    }

    #[test]
    fn test_garbage_yields_no_tree() {
        let resolution = resolve("@@@ %% ((( this is not code", ".js");
        assert!(resolution.tree.is_none());
        assert!(!resolution.used_fallback);
        // The original text is handed back for regex fallback.
        assert!(resolution.source.contains("not code"));
    }

    #[test]
    fn test_empty_input_parses() {
        let resolution = resolve("", ".ts");
        assert!(resolution.tree.is_some());
    }

    #[test]
    fn test_jsx_parses() {
        let resolution = resolve(
            "export function App() { return <div className=\"x\">hi</div>; }\n",
            ".jsx",
        );
        assert!(resolution.tree.is_some());
    }

    #[test]
    fn test_resolver_never_panics_on_odd_input() {
        for content in ["\0\0\0", "🦀🦀🦀", "{{{{{{", "`unterminated"] {
            let _ = resolve(content, ".js");
            let _ = resolve(content, ".ts");
        }
    }
}
