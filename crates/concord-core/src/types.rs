//! Core data types for Concord analysis.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Source file extensions Concord analyzes, in specifier-resolution
/// priority order (see the reference graph builder).
pub const SOURCE_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs"];

/// A single source file handed to the engine by the file provider.
///
/// Files are created once per run and never mutated; every analyzer reads
/// the same ordered slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Root-relative path with forward slashes (e.g. `src/utils/date.ts`).
    pub relative_path: String,

    /// Decoded file contents.
    pub content: String,

    /// Lowercase, dot-prefixed extension (e.g. `.tsx`).
    pub extension: String,
}

impl SourceFile {
    /// Convenience constructor used throughout the test suites.
    pub fn new(
        relative_path: impl Into<String>,
        content: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            relative_path: relative_path.into(),
            content: content.into(),
            extension: extension.into(),
        }
    }

    /// Basename with the extension stripped (`src/Button.tsx` → `Button`).
    pub fn stem(&self) -> &str {
        let base = self
            .relative_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.relative_path);
        base.strip_suffix(self.extension.as_str()).unwrap_or(base)
    }

    /// Directory portion of the relative path (`""` for root-level files).
    pub fn directory(&self) -> &str {
        match self.relative_path.rfind('/') {
            Some(idx) => &self.relative_path[..idx],
            None => "",
        }
    }
}

/// Finding severity. The derived `Ord` gives the strict total order
/// low < medium < high that the severity filter and gates rely on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
}

impl Severity {
    /// Lowercase display name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    /// Parse from CLI/config string.
    pub fn from_cli_name(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Analysis categories, one per analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryId {
    /// Identifier and filename naming consistency
    Naming,
    /// Orphan files, unused exports, stub files
    DeadCode,
    /// Unhandled awaits and empty catch blocks
    AsyncHygiene,
    /// Module-syntax and promise-style drift
    Patterns,
    /// Console calls, debugger statements, TODO markers
    Leftovers,
}

impl CategoryId {
    /// Returns all categories in a consistent order.
    pub fn all() -> &'static [CategoryId] {
        &[
            CategoryId::Naming,
            CategoryId::DeadCode,
            CategoryId::AsyncHygiene,
            CategoryId::Patterns,
            CategoryId::Leftovers,
        ]
    }

    /// Returns the display title for this category.
    pub fn title(&self) -> &'static str {
        match self {
            CategoryId::Naming => "Naming Consistency",
            CategoryId::DeadCode => "Dead Code",
            CategoryId::AsyncHygiene => "Async & Error Handling",
            CategoryId::Patterns => "Pattern Consistency",
            CategoryId::Leftovers => "Leftover Debug Code",
        }
    }

    /// Returns the kebab-case name used in CLI arguments and reports.
    pub fn cli_name(&self) -> &'static str {
        match self {
            CategoryId::Naming => "naming",
            CategoryId::DeadCode => "dead-code",
            CategoryId::AsyncHygiene => "async-hygiene",
            CategoryId::Patterns => "patterns",
            CategoryId::Leftovers => "leftovers",
        }
    }

    /// Returns the description for this category.
    pub fn description(&self) -> &'static str {
        match self {
            CategoryId::Naming => "Identifier and filename naming consistency",
            CategoryId::DeadCode => "Orphan files, unused exports and stub files",
            CategoryId::AsyncHygiene => "Unhandled awaits and empty catch blocks",
            CategoryId::Patterns => "Module-syntax and promise-style drift",
            CategoryId::Leftovers => "Console calls, debugger statements and TODO markers",
        }
    }

    /// Parse from CLI string.
    pub fn from_cli_name(s: &str) -> Option<Self> {
        Self::all().iter().find(|c| c.cli_name() == s).copied()
    }
}

/// Source location attached to a finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Root-relative file path.
    pub file: String,

    /// Line number (1-indexed).
    pub line: usize,

    /// Trimmed source line, truncated for display.
    pub snippet: String,
}

impl SourceLocation {
    /// Builds a location from a line of source, trimming and truncating
    /// the snippet to keep report payloads small.
    pub fn new(file: impl Into<String>, line: usize, raw_line: &str) -> Self {
        let mut snippet: String = raw_line.trim().chars().take(120).collect();
        if raw_line.trim().chars().count() > 120 {
            snippet.push('…');
        }
        Self {
            file: file.into(),
            line,
            snippet,
        }
    }
}

/// A single issue discovered by an analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// How serious the issue is.
    pub severity: Severity,

    /// Human-readable description.
    pub message: String,

    /// Specific locations, when the analyzer can pinpoint them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<SourceLocation>,

    /// Whole files involved, for file-granular findings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
}

impl Finding {
    /// File-granular finding with no line-level locations.
    pub fn for_files(severity: Severity, message: impl Into<String>, files: Vec<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            locations: Vec::new(),
            files,
        }
    }

    /// Location-granular finding.
    pub fn at_locations(
        severity: Severity,
        message: impl Into<String>,
        locations: Vec<SourceLocation>,
    ) -> Self {
        Self {
            severity,
            message: message.into(),
            locations,
            files: Vec::new(),
        }
    }
}

/// Result of one category analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryReport {
    /// Category identity.
    pub id: CategoryId,

    /// Display title.
    pub title: String,

    /// Bounded score in `[0, 10]`; higher means more issues.
    pub score: u8,

    /// Severity derived from the score (see [`crate::scoring`]).
    pub severity: Severity,

    /// Number of structurally distinct findings after severity filtering.
    pub total_issues: usize,

    /// One-line summary regenerated from the (possibly filtered) findings.
    pub summary: String,

    /// The findings themselves.
    pub findings: Vec<Finding>,

    /// Raw analyzer metrics (counts that fed the signal ratio).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metrics: BTreeMap<String, serde_json::Value>,

    /// Actionable suggestions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<String>,
}

/// A non-fatal problem encountered during analysis.
///
/// Parse failures and unreadable files land here; they never abort a run.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnalysisWarning {
    /// File where the problem occurred.
    pub file: String,

    /// What happened.
    pub message: String,
}

impl AnalysisWarning {
    pub fn new(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            message: message.into(),
        }
    }
}

/// Full analysis report for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Overall project score in `[0, 100]`; higher is better.
    pub overall_score: u8,

    /// Sum of per-category `total_issues`.
    pub total_issues: usize,

    /// One entry per enabled analyzer. Empty when no files were scanned.
    pub categories: Vec<CategoryReport>,

    /// Quality-gate failures, filled in after baseline comparison.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gate_failures: Vec<String>,

    /// Deduplicated non-fatal warnings from all analyzers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<AnalysisWarning>,
}

impl Report {
    /// The report for an empty scan: perfect score, nothing to say.
    pub fn empty() -> Self {
        Self {
            overall_score: 100,
            total_issues: 0,
            categories: Vec::new(),
            gate_failures: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Counts findings across all categories by severity.
    pub fn severity_counts(&self) -> (usize, usize, usize) {
        let mut low = 0;
        let mut medium = 0;
        let mut high = 0;
        for category in &self.categories {
            for finding in &category.findings {
                match finding.severity {
                    Severity::Low => low += 1,
                    Severity::Medium => medium += 1,
                    Severity::High => high += 1,
                }
            }
        }
        (low, medium, high)
    }
}
