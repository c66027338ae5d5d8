//! Concord Syntax - Tiered JavaScript/TypeScript syntax resolution.
//!
//! The resolver turns file text into a tree-sitter tree, or signals that
//! downstream analyzers must fall back to regex extraction. Its contract is
//! availability over precision: it never errors and never panics, and each
//! tier degrades rather than aborts:
//!
//! 1. parse with the primary grammar for the file's extension;
//! 2. parse with the alternate grammar;
//! 3. strip type-only constructs and retry both grammars on the stripped
//!    text (`used_fallback = true`);
//! 4. give up: `tree = None`, callers switch to the [`fallback`] helpers.
//!
//! A parse only counts as a success when the resulting root node is free of
//! error nodes; tree-sitter is error-tolerant, so a "successful" parse of
//! broken input would otherwise hand analyzers a tree full of garbage.

pub mod fallback;
pub mod resolver;
pub mod strip;
pub mod walk;

pub use fallback::{RawExports, RawImport};
pub use resolver::{resolve, SyntaxResolution};
