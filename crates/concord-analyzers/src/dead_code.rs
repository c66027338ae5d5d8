//! Dead-code analysis: orphan files, unused exports, stub files.

use concord_core::{AnalysisWarning, CategoryId, Finding, Manifest, Severity, SourceFile};
use concord_core::scoring::file_denominator;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use crate::classify;
use crate::engine::{build_category, EngineConfig};
use crate::graph::ReferenceGraph;

static RE_EXPORT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^export\s*(?:\*|\{[^}]*\})(?:\s*from\s*['"][^'"]+['"])?\s*;?\s*$"#)
        .expect("static regex")
});

/// Counts lines that carry actual code: blank, comment-only and
/// brace-only lines are excluded.
fn code_line_count(content: &str) -> usize {
    content
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return false;
            }
            if trimmed.starts_with("//")
                || trimmed.starts_with("/*")
                || trimmed.starts_with('*')
            {
                return false;
            }
            !trimmed
                .chars()
                .all(|c| "{}[]();,".contains(c) || c.is_whitespace())
        })
        .count()
}

/// Whether every non-blank line is a bare re-export statement.
fn is_re_export_only(content: &str) -> bool {
    let mut saw_line = false;
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        saw_line = true;
        if !RE_EXPORT_LINE.is_match(trimmed) {
            return false;
        }
    }
    saw_line
}

/// Runs dead-code classification over the reference graph.
pub fn analyze(
    files: &[SourceFile],
    manifest: Option<&Manifest>,
    config: &EngineConfig,
) -> (concord_core::CategoryReport, Vec<AnalysisWarning>) {
    let (graph, warnings) = ReferenceGraph::build(files);

    let mut findings = Vec::new();
    let mut orphan_count = 0usize;
    let mut unused_export_count = 0usize;
    let mut stub_count = 0usize;

    for file in files {
        let path = &file.relative_path;
        let entrypoint = classify::is_entrypoint(file, &config.entrypoints);
        let test_file = classify::is_test_or_fixture(path);
        let tool_config = classify::is_declared_tool_config(path, manifest);

        if !entrypoint && !test_file && !tool_config {
            if graph.incoming_references(path).is_empty() {
                orphan_count += 1;
                findings.push(Finding::for_files(
                    Severity::Medium,
                    format!("Orphaned file `{path}`: nothing imports it"),
                    vec![path.clone()],
                ));
            }
        }

        if !entrypoint && !test_file {
            if let Some(exports) = graph.exports_of(path) {
                let usage = graph.usage_of(path);
                let namespace_consumed =
                    usage.map(|u| u.namespace_import).unwrap_or(false);
                if !namespace_consumed {
                    for name in &exports.named {
                        let used = usage.map(|u| u.named.contains(name)).unwrap_or(false);
                        if !used {
                            unused_export_count += 1;
                            findings.push(Finding::for_files(
                                Severity::Medium,
                                format!("Unused export `{name}` in `{path}`"),
                                vec![path.clone()],
                            ));
                        }
                    }
                    if exports.has_default {
                        let used = usage
                            .map(|u| u.default_import || u.named.contains("default"))
                            .unwrap_or(false);
                        if !used {
                            unused_export_count += 1;
                            findings.push(Finding::for_files(
                                Severity::Medium,
                                format!("Unused export `default` in `{path}`"),
                                vec![path.clone()],
                            ));
                        }
                    }
                }
            }
        }

        if code_line_count(&file.content) < config.stub_min_lines
            || is_re_export_only(&file.content)
        {
            stub_count += 1;
            findings.push(Finding::for_files(
                Severity::Low,
                format!("Stub file `{path}`: little or no real code"),
                vec![path.clone()],
            ));
        }
    }

    let signal = (2.0 * orphan_count as f64 + unused_export_count as f64 + stub_count as f64)
        / file_denominator(files.len(), 0.6);

    let mut metrics = BTreeMap::new();
    metrics.insert("file_count".to_string(), files.len().into());
    metrics.insert("orphan_count".to_string(), orphan_count.into());
    metrics.insert(
        "unused_export_count".to_string(),
        unused_export_count.into(),
    );
    metrics.insert("stub_count".to_string(), stub_count.into());

    let mut recommendations = Vec::new();
    if orphan_count > 0 {
        recommendations
            .push("Delete orphaned files or wire them into an entrypoint".to_string());
    }
    if unused_export_count > 0 {
        recommendations
            .push("Remove unused exports or their `export` keywords".to_string());
    }
    if stub_count > 0 {
        recommendations.push("Fold stub files into their consumers".to_string());
    }

    (
        build_category(CategoryId::DeadCode, signal, findings, metrics, recommendations),
        warnings,
    )
}
