//! Post-scoring quality gates.
//!
//! Gates are the only user-visible failure path: the engine itself never
//! raises an error over analysis content. Each configured gate is checked
//! against the finished report (and the baseline comparison, when one
//! exists); failures are returned as messages for the report and mapped to
//! a non-zero exit code by the CLI.

use crate::baseline::BaselineComparison;
use crate::types::{Report, Severity};

/// Configured quality gates. All gates are opt-in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateConfig {
    /// Fail when the overall score falls below this floor.
    pub min_overall_score: Option<u8>,

    /// Fail when total issues exceed this ceiling.
    pub max_total_issues: Option<usize>,

    /// Fail when any finding exceeds this severity ceiling.
    pub max_severity: Option<Severity>,

    /// Fail when the baseline comparison reports regressions.
    pub fail_on_regression: bool,
}

impl GateConfig {
    /// Whether any gate is configured at all.
    pub fn is_active(&self) -> bool {
        self.min_overall_score.is_some()
            || self.max_total_issues.is_some()
            || self.max_severity.is_some()
            || self.fail_on_regression
    }
}

/// Evaluates all configured gates against a finished report.
pub fn evaluate(
    report: &Report,
    comparison: Option<&BaselineComparison>,
    config: &GateConfig,
) -> Vec<String> {
    let mut failures = Vec::new();

    if let Some(floor) = config.min_overall_score {
        if report.overall_score < floor {
            failures.push(format!(
                "Overall score {} is below the configured floor {}",
                report.overall_score, floor
            ));
        }
    }

    if let Some(ceiling) = config.max_total_issues {
        if report.total_issues > ceiling {
            failures.push(format!(
                "Total issues {} exceed the configured ceiling {}",
                report.total_issues, ceiling
            ));
        }
    }

    if let Some(ceiling) = config.max_severity {
        let worst = report
            .categories
            .iter()
            .flat_map(|category| category.findings.iter())
            .map(|finding| finding.severity)
            .max();
        if let Some(worst) = worst {
            if worst > ceiling {
                failures.push(format!(
                    "Findings reach {} severity, above the configured ceiling {}",
                    worst, ceiling
                ));
            }
        }
    }

    if config.fail_on_regression {
        if let Some(comparison) = comparison {
            for regression in &comparison.regressions {
                failures.push(format!("Baseline regression: {}", regression));
            }
        }
    }

    failures
}
