//! The audit engine: runs enabled analyzers and aggregates the report.

use concord_core::scoring;
use concord_core::{
    AnalysisWarning, CategoryId, CategoryReport, Finding, Manifest, Report, Severity, SourceFile,
};
use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::{async_hygiene, dead_code, leftovers, naming, patterns};

/// Canonical warning messages, shared so the engine's deduplication
/// collapses the same per-file condition across analyzers.
pub(crate) const PARSE_FALLBACK_WARNING: &str = "parse failed; degraded to regex extraction";
pub(crate) const TYPE_STRIP_WARNING: &str = "parsed after stripping type-only syntax";

/// Path/name conventions that mark a file as an entrypoint.
///
/// The defaults cover the common conventions (`index|main|app`, `pages/`,
/// `routes/`); monorepos with custom entry layouts override them in
/// configuration rather than patching the analyzer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrypointConfig {
    /// Basenames (extension stripped) treated as entrypoints.
    pub names: Vec<String>,

    /// Path prefixes whose files are all entrypoints.
    pub dirs: Vec<String>,
}

impl Default for EntrypointConfig {
    fn default() -> Self {
        Self {
            names: vec!["index".to_string(), "main".to_string(), "app".to_string()],
            dirs: vec!["pages/".to_string(), "routes/".to_string()],
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Analyzers to run, in report order.
    pub categories: Vec<CategoryId>,

    /// Findings below this severity are filtered from the report. The
    /// filter recomputes per-category issue totals and summaries but never
    /// the scores, which always reflect the unfiltered signal.
    pub min_severity: Severity,

    /// Minimum code-line count below which a file is a stub.
    pub stub_min_lines: usize,

    /// Entrypoint conventions.
    pub entrypoints: EntrypointConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            categories: CategoryId::all().to_vec(),
            min_severity: Severity::Low,
            stub_min_lines: 3,
            entrypoints: EntrypointConfig::default(),
        }
    }
}

/// Runs the configured analyzers over a scanned file set.
///
/// The engine is pure with respect to its inputs: analyzers are
/// independent read-only passes, each owning its private accumulators, so
/// their execution order only affects incidental warning ordering.
#[derive(Debug, Default)]
pub struct AuditEngine {
    config: EngineConfig,
}

impl AuditEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Analyzes the file set and assembles the report.
    ///
    /// Never fails: parse failures and resolution misses degrade per file
    /// and surface as deduplicated warnings. Zero scanned files yield the
    /// empty report (overall score 100, no categories).
    pub fn analyze(&self, files: &[SourceFile], manifest: Option<&Manifest>) -> Report {
        if files.is_empty() {
            return Report::empty();
        }

        let mut categories = Vec::new();
        let mut warnings: BTreeSet<AnalysisWarning> = BTreeSet::new();

        for category in &self.config.categories {
            let (mut report, category_warnings) = match category {
                CategoryId::Naming => naming::analyze(files),
                CategoryId::DeadCode => dead_code::analyze(files, manifest, &self.config),
                CategoryId::AsyncHygiene => async_hygiene::analyze(files),
                CategoryId::Patterns => patterns::analyze(files),
                CategoryId::Leftovers => leftovers::analyze(files),
            };
            warnings.extend(category_warnings);
            scoring::apply_severity_filter(&mut report, self.config.min_severity);
            tracing::debug!(
                category = report.id.cli_name(),
                score = report.score,
                issues = report.total_issues,
                "category analyzed"
            );
            categories.push(report);
        }

        let scores: Vec<u8> = categories.iter().map(|c| c.score).collect();
        Report {
            overall_score: scoring::overall_score(&scores),
            total_issues: categories.iter().map(|c| c.total_issues).sum(),
            categories,
            gate_failures: Vec::new(),
            warnings: warnings.into_iter().collect(),
        }
    }
}

/// Assembles a category report from an analyzer's raw output. Shared by
/// every analyzer so scoring and summary rules stay in one place.
pub(crate) fn build_category(
    id: CategoryId,
    signal_ratio: f64,
    findings: Vec<Finding>,
    metrics: BTreeMap<String, serde_json::Value>,
    recommendations: Vec<String>,
) -> CategoryReport {
    let score = scoring::category_score(signal_ratio);
    CategoryReport {
        id,
        title: id.title().to_string(),
        score,
        severity: scoring::severity_for_score(score),
        total_issues: findings.len(),
        summary: scoring::summary_line(&findings, Severity::Low),
        findings,
        metrics,
        recommendations,
    }
}
