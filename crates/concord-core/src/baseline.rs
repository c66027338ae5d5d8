//! Baseline snapshots and regression detection.
//!
//! A snapshot captures the shape of one run (overall score, issue total,
//! finding counts by severity, per-category scores) so later runs can be
//! compared against it. The comparator reports deltas plus an explicit
//! regression list; persistence of the snapshot JSON lives in the CLI's
//! baseline store.

use crate::types::{Report, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Finding counts grouped by severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

/// Per-category entry inside a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineCategory {
    pub score: u8,
    pub total_issues: usize,
    pub severity: Severity,
}

/// Persisted shape of one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineSnapshot {
    pub overall_score: u8,
    pub total_issues: usize,
    pub finding_counts: SeverityCounts,
    /// Keyed by category CLI name (`dead-code`, `naming`, …).
    pub categories: BTreeMap<String, BaselineCategory>,
}

impl BaselineSnapshot {
    /// Captures a snapshot of a finished report.
    pub fn of(report: &Report) -> Self {
        let (low, medium, high) = report.severity_counts();
        let categories = report
            .categories
            .iter()
            .map(|category| {
                (
                    category.id.cli_name().to_string(),
                    BaselineCategory {
                        score: category.score,
                        total_issues: category.total_issues,
                        severity: category.severity,
                    },
                )
            })
            .collect();

        Self {
            overall_score: report.overall_score,
            total_issues: report.total_issues,
            finding_counts: SeverityCounts { low, medium, high },
            categories,
        }
    }
}

/// Signed changes between the current run and the baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineDeltas {
    /// Overall score change (positive = improved).
    pub score: i32,
    /// Total issue change (positive = more issues).
    pub total_issues: i64,
    /// High-severity finding change.
    pub high_findings: i64,
    /// Medium-severity finding change.
    pub medium_findings: i64,
}

/// Result of comparing a run against a stored baseline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineComparison {
    pub deltas: BaselineDeltas,
    /// Human-readable regression descriptions; empty means no regression.
    pub regressions: Vec<String>,
}

impl BaselineComparison {
    pub fn has_regressions(&self) -> bool {
        !self.regressions.is_empty()
    }
}

/// Compares the current run against a baseline.
///
/// A regression is recorded iff the overall score dropped, the total issue
/// count rose, the high-severity finding count rose, or any per-category
/// score strictly increased versus its baseline entry. Categories absent
/// from the baseline (newly enabled analyzers) are not regressions.
pub fn compare(current: &BaselineSnapshot, baseline: &BaselineSnapshot) -> BaselineComparison {
    let deltas = BaselineDeltas {
        score: i32::from(current.overall_score) - i32::from(baseline.overall_score),
        total_issues: current.total_issues as i64 - baseline.total_issues as i64,
        high_findings: current.finding_counts.high as i64 - baseline.finding_counts.high as i64,
        medium_findings: current.finding_counts.medium as i64
            - baseline.finding_counts.medium as i64,
    };

    let mut regressions = Vec::new();

    if current.overall_score < baseline.overall_score {
        regressions.push(format!(
            "Overall score dropped from {} to {}",
            baseline.overall_score, current.overall_score
        ));
    }
    if current.total_issues > baseline.total_issues {
        regressions.push(format!(
            "Total issues rose from {} to {}",
            baseline.total_issues, current.total_issues
        ));
    }
    if current.finding_counts.high > baseline.finding_counts.high {
        regressions.push(format!(
            "High-severity findings rose from {} to {}",
            baseline.finding_counts.high, current.finding_counts.high
        ));
    }
    for (id, entry) in &current.categories {
        if let Some(previous) = baseline.categories.get(id) {
            if entry.score > previous.score {
                regressions.push(format!(
                    "Category `{}` score rose from {} to {}",
                    id, previous.score, entry.score
                ));
            }
        }
    }

    BaselineComparison {
        deltas,
        regressions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(overall: u8, issues: usize, high: usize, categories: &[(&str, u8)]) -> BaselineSnapshot {
        BaselineSnapshot {
            overall_score: overall,
            total_issues: issues,
            finding_counts: SeverityCounts {
                low: 0,
                medium: 0,
                high,
            },
            categories: categories
                .iter()
                .map(|(id, score)| {
                    (
                        id.to_string(),
                        BaselineCategory {
                            score: *score,
                            total_issues: 0,
                            severity: Severity::Low,
                        },
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn test_identical_runs_have_no_regressions() {
        let base = snapshot(80, 5, 1, &[("naming", 2)]);
        let comparison = compare(&base, &base);
        assert!(!comparison.has_regressions());
        assert_eq!(comparison.deltas, BaselineDeltas::default());
    }

    #[test]
    fn test_score_drop_is_a_regression() {
        let baseline = snapshot(80, 5, 1, &[]);
        let current = snapshot(75, 5, 1, &[]);
        let comparison = compare(&current, &baseline);
        assert_eq!(comparison.regressions.len(), 1);
        assert_eq!(comparison.deltas.score, -5);
    }

    #[test]
    fn test_issue_rise_is_a_regression() {
        let baseline = snapshot(80, 5, 1, &[]);
        let current = snapshot(80, 9, 1, &[]);
        let comparison = compare(&current, &baseline);
        assert_eq!(comparison.regressions.len(), 1);
        assert_eq!(comparison.deltas.total_issues, 4);
    }

    #[test]
    fn test_high_findings_rise_is_a_regression() {
        let baseline = snapshot(80, 5, 1, &[]);
        let current = snapshot(80, 5, 3, &[]);
        let comparison = compare(&current, &baseline);
        assert_eq!(comparison.regressions.len(), 1);
        assert_eq!(comparison.deltas.high_findings, 2);
    }

    #[test]
    fn test_category_score_rise_is_a_regression() {
        let baseline = snapshot(80, 5, 1, &[("naming", 2), ("dead-code", 4)]);
        let current = snapshot(80, 5, 1, &[("naming", 5), ("dead-code", 4)]);
        let comparison = compare(&current, &baseline);
        assert_eq!(comparison.regressions.len(), 1);
        assert!(comparison.regressions[0].contains("naming"));
    }

    #[test]
    fn test_new_category_is_not_a_regression() {
        let baseline = snapshot(80, 5, 1, &[]);
        let current = snapshot(80, 5, 1, &[("patterns", 9)]);
        let comparison = compare(&current, &baseline);
        assert!(!comparison.has_regressions());
    }

    #[test]
    fn test_improvement_is_not_a_regression() {
        let baseline = snapshot(70, 10, 3, &[("naming", 6)]);
        let current = snapshot(85, 4, 1, &[("naming", 2)]);
        let comparison = compare(&current, &baseline);
        assert!(!comparison.has_regressions());
        assert_eq!(comparison.deltas.score, 15);
        assert_eq!(comparison.deltas.total_issues, -6);
    }

    #[test]
    fn test_snapshot_roundtrips_through_json() {
        let original = snapshot(64, 12, 2, &[("naming", 3), ("leftovers", 7)]);
        let json = serde_json::to_string(&original).unwrap();
        let restored: BaselineSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(original, restored);
    }
}
