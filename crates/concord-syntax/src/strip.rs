//! Textual stripping of type-only constructs.
//!
//! The third resolver tier blanks TypeScript-only syntax out of a source
//! buffer so the retry grammars see plain JavaScript-shaped code. Blanking
//! replaces bytes with spaces and leaves newlines alone, so byte offsets,
//! lengths and line numbers all survive the transformation.
//!
//! This is a heuristic scanner, not a parser: brace matching ignores
//! strings and comments inside interface bodies. A construct it cannot
//! delimit is left untouched and the retry simply fails onward to the
//! regex tier.

use once_cell::sync::Lazy;
use regex::Regex;

static TYPE_ONLY_IMPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*import\s+type\b[^\n]*").expect("static regex"));

static TYPE_ONLY_EXPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*export\s+type\s*\{[^\n]*").expect("static regex"));

static INTERFACE_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\bexport\s+)?(?:\bdeclare\s+)?\binterface\s+[A-Za-z_$][\w$]*")
        .expect("static regex")
});

static TYPE_ALIAS_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:export\s+)?type\s+[A-Za-z_$][\w$]*").expect("static regex")
});

static AS_CONST: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bas\s+const\b").expect("static regex"));

/// Blanks a byte range, preserving newlines.
fn blank(bytes: &mut [u8], start: usize, end: usize) {
    let len = bytes.len();
    for byte in bytes.iter_mut().take(end.min(len)).skip(start) {
        if *byte != b'\n' {
            *byte = b' ';
        }
    }
}

/// Index just past the matching close brace for the first `{` at or after
/// `from`, or `None` when braces never balance.
fn balanced_brace_end(bytes: &[u8], from: usize) -> Option<usize> {
    let open = bytes[from..].iter().position(|&b| b == b'{')? + from;
    let mut depth = 0usize;
    for (offset, &byte) in bytes[open..].iter().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Index just past the `;` terminating a type alias that starts at `from`,
/// skipping semicolons nested inside braces.
fn alias_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, &byte) in bytes[from..].iter().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b';' if depth == 0 => return Some(from + offset + 1),
            _ => {}
        }
    }
    None
}

/// Strips type-only constructs from a source buffer.
///
/// Removed, space-for-space: type-only imports and exports, whole
/// interface declarations, type-alias statements, and `as const`
/// assertions. The result has the same byte length and line structure as
/// the input; when nothing matched, the input is returned verbatim.
pub fn strip_type_constructs(source: &str) -> String {
    let mut bytes = source.as_bytes().to_vec();

    for m in TYPE_ONLY_IMPORT.find_iter(source) {
        blank(&mut bytes, m.start(), m.end());
    }
    for m in TYPE_ONLY_EXPORT.find_iter(source) {
        blank(&mut bytes, m.start(), m.end());
    }
    for m in INTERFACE_START.find_iter(source) {
        if let Some(end) = balanced_brace_end(source.as_bytes(), m.end()) {
            blank(&mut bytes, m.start(), end);
        }
    }
    for m in TYPE_ALIAS_START.find_iter(source) {
        if let Some(end) = alias_end(source.as_bytes(), m.end()) {
            blank(&mut bytes, m.start(), end);
        }
    }
    for m in AS_CONST.find_iter(source) {
        blank(&mut bytes, m.start(), m.end());
    }

    // Every byte is either untouched or an ASCII space, so this cannot
    // fail; fall back to the original rather than panicking regardless.
    String::from_utf8(bytes).unwrap_or_else(|_| source.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_type_only_import() {
        let stripped = strip_type_constructs("import type { Foo } from './foo';\nconst x = 1;\n");
        assert!(!stripped.contains("import type"));
        assert!(stripped.contains("const x = 1;"));
    }

    #[test]
    fn test_strips_interface_body() {
        let source = "interface Props {\n  title: string;\n  count: number;\n}\nconst a = 2;\n";
        let stripped = strip_type_constructs(source);
        assert!(!stripped.contains("interface"));
        assert!(!stripped.contains("title: string"));
        assert!(stripped.contains("const a = 2;"));
    }

    #[test]
    fn test_strips_type_alias() {
        let source = "export type Id = string | number;\nlet id = 1;\n";
        let stripped = strip_type_constructs(source);
        assert!(!stripped.contains("type Id"));
        assert!(stripped.contains("let id = 1;"));
    }

    #[test]
    fn test_strips_as_const() {
        let stripped = strip_type_constructs("const modes = ['a', 'b'] as const;\n");
        assert!(!stripped.contains("as const"));
        assert!(stripped.contains("const modes = ['a', 'b']"));
    }

    #[test]
    fn test_preserves_length_and_lines() {
        let source = "interface A { x: string }\nconst y = 1; // keep\ntype B = A;\n";
        let stripped = strip_type_constructs(source);
        assert_eq!(stripped.len(), source.len());
        assert_eq!(stripped.lines().count(), source.lines().count());
    }

    #[test]
    fn test_unbalanced_interface_left_alone() {
        let source = "interface Broken {\n  a: string;\n";
        let stripped = strip_type_constructs(source);
        assert!(stripped.contains("interface Broken"));
    }

    #[test]
    fn test_untyped_source_returned_verbatim() {
        let source = "const x = 1;\nfunction f() {}\n";
        assert_eq!(strip_type_constructs(source), source);
    }
}
