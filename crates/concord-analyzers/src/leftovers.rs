//! Leftover debug code: console calls, debugger statements, TODO markers.
//!
//! A line-wise textual scan; test and fixture files are exempt (debug
//! output is part of their job). One finding is emitted per file and
//! signal kind, carrying every occurrence as a location, so issue totals
//! count distinct problems rather than raw occurrences.

use concord_core::scoring::file_denominator;
use concord_core::{
    AnalysisWarning, CategoryId, CategoryReport, Finding, Severity, SourceFile, SourceLocation,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use crate::classify;
use crate::engine::build_category;

static CONSOLE_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bconsole\.(?:log|debug|trace)\s*\(").expect("static regex"));

static DEBUGGER_STATEMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*debugger\s*;?\s*$").expect("static regex"));

static TODO_COMMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?://|/\*|^\s*\*).*?\b(?:TODO|FIXME|HACK|XXX)\b").expect("static regex")
});

fn locations_matching(file: &SourceFile, pattern: &Regex) -> Vec<SourceLocation> {
    file.content
        .lines()
        .enumerate()
        .filter(|(_, line)| pattern.is_match(line))
        .map(|(idx, line)| SourceLocation::new(&file.relative_path, idx + 1, line))
        .collect()
}

/// Runs the leftover scan across the file set.
pub fn analyze(files: &[SourceFile]) -> (CategoryReport, Vec<AnalysisWarning>) {
    let mut findings = Vec::new();
    let mut console_hits = 0usize;
    let mut debugger_hits = 0usize;
    let mut todo_hits = 0usize;

    for file in files {
        if classify::is_test_or_fixture(&file.relative_path) {
            continue;
        }

        let console = locations_matching(file, &CONSOLE_CALL);
        if !console.is_empty() {
            console_hits += console.len();
            findings.push(Finding::at_locations(
                Severity::Low,
                format!(
                    "`{}` has {} console.log/debug/trace call(s)",
                    file.relative_path,
                    console.len()
                ),
                console,
            ));
        }

        let debuggers = locations_matching(file, &DEBUGGER_STATEMENT);
        if !debuggers.is_empty() {
            debugger_hits += debuggers.len();
            findings.push(Finding::at_locations(
                Severity::Medium,
                format!("`{}` contains a debugger statement", file.relative_path),
                debuggers,
            ));
        }

        let todos = locations_matching(file, &TODO_COMMENT);
        if !todos.is_empty() {
            todo_hits += todos.len();
            findings.push(Finding::at_locations(
                Severity::Low,
                format!(
                    "`{}` carries {} TODO/FIXME marker(s)",
                    file.relative_path,
                    todos.len()
                ),
                todos,
            ));
        }
    }

    let signal = (0.5 * console_hits as f64
        + 2.0 * debugger_hits as f64
        + 0.25 * todo_hits as f64)
        / file_denominator(files.len(), 0.6);

    let mut metrics = BTreeMap::new();
    metrics.insert("console_hits".to_string(), console_hits.into());
    metrics.insert("debugger_hits".to_string(), debugger_hits.into());
    metrics.insert("todo_hits".to_string(), todo_hits.into());

    let mut recommendations = Vec::new();
    if console_hits > 0 {
        recommendations
            .push("Replace console output with the project logger or remove it".to_string());
    }
    if debugger_hits > 0 {
        recommendations.push("Delete debugger statements before shipping".to_string());
    }
    if todo_hits > 0 {
        recommendations.push("Turn TODO markers into tracked issues".to_string());
    }

    (
        build_category(CategoryId::Leftovers, signal, findings, metrics, recommendations),
        Vec::new(),
    )
}
