//! Small helpers for walking tree-sitter trees.
//!
//! Tree-sitter nodes are dynamically shaped: every node exposes a kind
//! discriminator and an enumerable child list, and nothing else is
//! guaranteed. These helpers keep analyzer walks free of cursor plumbing.

use tree_sitter::Node;

/// Text of a node, sliced from the buffer the tree was parsed from.
///
/// Returns an empty string on (impossible under correct use) UTF-8 slicing
/// failures rather than propagating them into analyzers.
pub fn node_text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// 1-indexed line number of a node's start.
pub fn line_number(node: Node<'_>) -> usize {
    node.start_position().row + 1
}

/// Unquoted value of a string-literal node (`'./x'` → `./x`).
pub fn string_value(node: Node<'_>, source: &str) -> String {
    node_text(node, source)
        .trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .to_string()
}

/// All children of a node, collected so callers can recurse without
/// holding a `TreeCursor` across the recursion.
pub fn children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

/// Named children only (skips punctuation and keyword tokens).
pub fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// The 1-indexed source line, for finding snippets.
pub fn line_at(source: &str, line: usize) -> &str {
    source.lines().nth(line.saturating_sub(1)).unwrap_or("")
}
