//! Human-readable terminal output.

use concord_core::{CategoryReport, Report, Severity};

use super::BaselineView;

const MAX_LISTED_FINDINGS: usize = 10;

fn severity_marker(severity: Severity) -> &'static str {
    match severity {
        Severity::Low => "·",
        Severity::Medium => "⚠",
        Severity::High => "✖",
    }
}

fn print_category(category: &CategoryReport) {
    println!(
        "\n{} {} - score {}/10 ({} severity, {} issues)",
        severity_marker(category.severity),
        category.title,
        category.score,
        category.severity,
        category.total_issues
    );
    println!("  {}", category.summary);

    for finding in category.findings.iter().take(MAX_LISTED_FINDINGS) {
        println!("    {} {}", severity_marker(finding.severity), finding.message);
        if let Some(location) = finding.locations.first() {
            println!("      {}:{}  {}", location.file, location.line, location.snippet);
        }
    }
    if category.findings.len() > MAX_LISTED_FINDINGS {
        println!(
            "    … and {} more",
            category.findings.len() - MAX_LISTED_FINDINGS
        );
    }

    for recommendation in &category.recommendations {
        println!("    💡 {}", recommendation);
    }
}

/// Prints the full report to stdout.
pub fn print_report(report: &Report, baseline: &BaselineView) {
    println!(
        "Overall score: {}/100 ({} issues)",
        report.overall_score, report.total_issues
    );

    for category in &report.categories {
        print_category(category);
    }

    match baseline {
        BaselineView::Compared(comparison) => {
            println!("\nBaseline comparison:");
            let deltas = &comparison.deltas;
            println!(
                "  score {:+}, issues {:+}, high findings {:+}, medium findings {:+}",
                deltas.score, deltas.total_issues, deltas.high_findings, deltas.medium_findings
            );
            if comparison.regressions.is_empty() {
                println!("  no regressions");
            } else {
                for regression in &comparison.regressions {
                    println!("  ✖ {}", regression);
                }
            }
        }
        BaselineView::Missing => println!("\nBaseline: missing (run with --save-baseline to create one)"),
        BaselineView::Corrupt => println!("\nBaseline: corrupt, comparison skipped"),
        BaselineView::Disabled => {}
    }

    if !report.warnings.is_empty() {
        println!("\n{} warning(s):", report.warnings.len());
        for warning in report.warnings.iter().take(MAX_LISTED_FINDINGS) {
            println!("  {} - {}", warning.file, warning.message);
        }
        if report.warnings.len() > MAX_LISTED_FINDINGS {
            println!("  … and {} more", report.warnings.len() - MAX_LISTED_FINDINGS);
        }
    }

    if !report.gate_failures.is_empty() {
        println!("\nQuality gates failed:");
        for failure in &report.gate_failures {
            println!("  ✖ {}", failure);
        }
    }
}
