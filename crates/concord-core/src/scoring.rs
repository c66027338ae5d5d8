//! Signal-to-score aggregation rules.
//!
//! Each analyzer reduces its raw counts to a *signal ratio*: a weighted sum
//! divided by a normalized file-count denominator. This module turns ratios
//! into bounded scores and scores into severities, and aggregates category
//! scores into the overall 0–100 project score. All arithmetic clamps;
//! nothing here can leave its declared range.

use crate::types::{CategoryReport, Finding, Severity};

/// Converts a signal ratio into a category score in `[0, 10]`.
///
/// The ratio is clamped to `[0, 1]` before scaling, so a pathological
/// project cannot push a score past 10.
pub fn category_score(signal_ratio: f64) -> u8 {
    (signal_ratio.clamp(0.0, 1.0) * 10.0).round() as u8
}

/// Severity of a category, derived from its score: high at 7+, medium at
/// 4+, low below.
pub fn severity_for_score(score: u8) -> Severity {
    if score >= 7 {
        Severity::High
    } else if score >= 4 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Overall project score in `[0, 100]` from category scores.
///
/// With zero categories (an empty scan) the project is unblemished: 100.
pub fn overall_score(category_scores: &[u8]) -> u8 {
    if category_scores.is_empty() {
        return 100;
    }
    let mean = category_scores.iter().map(|&s| f64::from(s)).sum::<f64>()
        / category_scores.len() as f64;
    (100.0 - 10.0 * mean).clamp(0.0, 100.0).round() as u8
}

/// Normalized file-count denominator for signal ratios.
///
/// Every category divides by `max(factor × file_count, 1)` so that tiny
/// projects do not divide by values below one.
pub fn file_denominator(file_count: usize, factor: f64) -> f64 {
    (factor * file_count as f64).max(1.0)
}

/// Applies the configured minimum-severity filter to a category.
///
/// Findings below the threshold are removed and `total_issues` plus the
/// summary are recomputed from the filtered set. The score and severity
/// are **not** recomputed: they are always derived from the unfiltered
/// signal, so filtering changes what is listed, never how the project is
/// rated.
pub fn apply_severity_filter(category: &mut CategoryReport, min_severity: Severity) {
    if min_severity == Severity::Low {
        return;
    }
    category
        .findings
        .retain(|finding| finding.severity >= min_severity);
    category.total_issues = category.findings.len();
    category.summary = summary_line(&category.findings, min_severity);
}

/// One-line category summary from a finding set.
pub fn summary_line(findings: &[Finding], min_severity: Severity) -> String {
    if findings.is_empty() {
        if min_severity > Severity::Low {
            format!("No issues at or above {} severity", min_severity)
        } else {
            "No issues detected".to_string()
        }
    } else {
        let high = findings
            .iter()
            .filter(|f| f.severity == Severity::High)
            .count();
        if high > 0 {
            format!("{} issues ({} high severity)", findings.len(), high)
        } else {
            format!("{} issues", findings.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CategoryId, Finding};
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_category_score_clamps() {
        assert_eq!(category_score(-1.0), 0);
        assert_eq!(category_score(0.0), 0);
        assert_eq!(category_score(0.5), 5);
        assert_eq!(category_score(1.0), 10);
        assert_eq!(category_score(42.0), 10);
    }

    #[test]
    fn test_category_score_rounds() {
        assert_eq!(category_score(0.44), 4);
        assert_eq!(category_score(0.45), 5);
    }

    #[test]
    fn test_severity_thresholds() {
        assert_eq!(severity_for_score(0), Severity::Low);
        assert_eq!(severity_for_score(3), Severity::Low);
        assert_eq!(severity_for_score(4), Severity::Medium);
        assert_eq!(severity_for_score(6), Severity::Medium);
        assert_eq!(severity_for_score(7), Severity::High);
        assert_eq!(severity_for_score(10), Severity::High);
    }

    #[test]
    fn test_overall_score_zero_categories_is_100() {
        assert_eq!(overall_score(&[]), 100);
    }

    #[test]
    fn test_overall_score_mean() {
        assert_eq!(overall_score(&[0, 0, 0]), 100);
        assert_eq!(overall_score(&[10, 10]), 0);
        assert_eq!(overall_score(&[2, 4]), 70);
    }

    #[test]
    fn test_file_denominator_floor() {
        assert_eq!(file_denominator(0, 0.6), 1.0);
        assert_eq!(file_denominator(1, 0.6), 1.0);
        assert_eq!(file_denominator(10, 0.6), 6.0);
    }

    fn category_with(findings: Vec<Finding>) -> CategoryReport {
        CategoryReport {
            id: CategoryId::Leftovers,
            title: CategoryId::Leftovers.title().to_string(),
            score: 8,
            severity: severity_for_score(8),
            total_issues: findings.len(),
            summary: summary_line(&findings, Severity::Low),
            findings,
            metrics: BTreeMap::new(),
            recommendations: Vec::new(),
        }
    }

    #[test]
    fn test_severity_filter_keeps_score() {
        let mut category = category_with(vec![
            Finding::for_files(Severity::Low, "low", vec!["a.js".into()]),
            Finding::for_files(Severity::Medium, "medium", vec!["b.js".into()]),
            Finding::for_files(Severity::High, "high", vec!["c.js".into()]),
        ]);

        apply_severity_filter(&mut category, Severity::Medium);

        assert_eq!(category.findings.len(), 2);
        assert_eq!(category.total_issues, 2);
        // Score and severity are untouched by filtering.
        assert_eq!(category.score, 8);
        assert_eq!(category.severity, Severity::High);
    }

    #[test]
    fn test_severity_filter_empty_summary() {
        let mut category =
            category_with(vec![Finding::for_files(Severity::Low, "low", vec![])]);
        apply_severity_filter(&mut category, Severity::High);
        assert_eq!(category.total_issues, 0);
        assert!(category.summary.contains("high"));
    }

    proptest! {
        #[test]
        fn prop_category_score_in_range(ratio in -100.0f64..100.0) {
            prop_assert!(category_score(ratio) <= 10);
        }

        #[test]
        fn prop_overall_score_in_range(scores in proptest::collection::vec(0u8..=10, 0..8)) {
            prop_assert!(overall_score(&scores) <= 100);
        }
    }
}
