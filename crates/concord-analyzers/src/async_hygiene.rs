//! Control-flow-sensitive await/catch analysis.
//!
//! A recursive walk over each file's tree carries one piece of state:
//! whether the current position is inside a try-protected block. Awaits
//! outside protection whose call chain has no `.catch` link are unhandled;
//! catch blocks with no statements swallow errors. Each file is analyzed
//! with fresh state; there is no cross-file interaction.

use concord_core::scoring::file_denominator;
use concord_core::{
    AnalysisWarning, CategoryId, CategoryReport, Finding, Severity, SourceFile, SourceLocation,
};
use concord_syntax::{fallback, resolve, walk};
use std::collections::BTreeMap;
use tree_sitter::Node;

use crate::engine::build_category;

#[derive(Debug, Default)]
struct FlowOutcome {
    total_await: usize,
    unhandled: Vec<SourceLocation>,
    empty_catches: Vec<SourceLocation>,
}

/// Whether the awaited expression's call chain contains a `.catch` member
/// access at any link. Walks leftward through nested call/member
/// expressions, so `a().catch().then()` still counts as handled.
fn chain_has_catch(node: Node<'_>, source: &str) -> bool {
    let mut current = Some(node);
    while let Some(n) = current {
        match n.kind() {
            "call_expression" => current = n.child_by_field_name("function"),
            "member_expression" => {
                if let Some(property) = n.child_by_field_name("property") {
                    if walk::node_text(property, source) == "catch" {
                        return true;
                    }
                }
                current = n.child_by_field_name("object");
            }
            "parenthesized_expression" => current = n.named_child(0),
            _ => return false,
        }
    }
    false
}

/// Whether a catch clause's block contains no statements (comments alone
/// do not count as handling).
fn is_empty_catch(handler: Node<'_>) -> bool {
    let Some(body) = handler.child_by_field_name("body") else {
        return false;
    };
    walk::named_children(body)
        .iter()
        .all(|child| child.kind() == "comment")
}

fn visit(node: Node<'_>, protected: bool, source: &str, path: &str, out: &mut FlowOutcome) {
    match node.kind() {
        "try_statement" => {
            // The try body is protected; a catch/finally body is not
            // itself protected.
            if let Some(body) = node.child_by_field_name("body") {
                visit(body, true, source, path, out);
            }
            if let Some(handler) = node.child_by_field_name("handler") {
                if is_empty_catch(handler) {
                    let line = walk::line_number(handler);
                    out.empty_catches.push(SourceLocation::new(
                        path,
                        line,
                        walk::line_at(source, line),
                    ));
                }
                visit(handler, false, source, path, out);
            }
            if let Some(finalizer) = node.child_by_field_name("finalizer") {
                visit(finalizer, false, source, path, out);
            }
            return;
        }
        "await_expression" => {
            out.total_await += 1;
            let handled = protected
                || node
                    .named_child(0)
                    .map(|inner| chain_has_catch(inner, source))
                    .unwrap_or(false);
            if !handled {
                let line = walk::line_number(node);
                out.unhandled
                    .push(SourceLocation::new(path, line, walk::line_at(source, line)));
            }
        }
        _ => {}
    }
    for child in walk::children(node) {
        visit(child, protected, source, path, out);
    }
}

fn analyze_file(file: &SourceFile) -> (FlowOutcome, Option<AnalysisWarning>) {
    let resolution = resolve(&file.content, &file.extension);
    match resolution.root() {
        Some(root) => {
            let mut out = FlowOutcome::default();
            visit(
                root,
                false,
                &resolution.source,
                &file.relative_path,
                &mut out,
            );
            let warning = resolution.used_fallback.then(|| {
                AnalysisWarning::new(&file.relative_path, crate::engine::TYPE_STRIP_WARNING)
            });
            (out, warning)
        }
        None => {
            // Without a tree there is no try context to consult: count
            // awaits flat and claim nothing about handling.
            let out = FlowOutcome {
                total_await: fallback::count_awaits(&file.content),
                ..Default::default()
            };
            let warning =
                AnalysisWarning::new(&file.relative_path, crate::engine::PARSE_FALLBACK_WARNING);
            (out, Some(warning))
        }
    }
}

/// Runs the await/catch analysis across the file set.
pub fn analyze(files: &[SourceFile]) -> (CategoryReport, Vec<AnalysisWarning>) {
    let mut warnings = Vec::new();
    let mut findings = Vec::new();
    let mut total_await = 0usize;
    let mut unhandled_await = 0usize;
    let mut empty_catch = 0usize;

    for file in files {
        let (outcome, warning) = analyze_file(file);
        warnings.extend(warning);

        total_await += outcome.total_await;
        unhandled_await += outcome.unhandled.len();
        empty_catch += outcome.empty_catches.len();

        for location in outcome.unhandled {
            findings.push(Finding::at_locations(
                Severity::Medium,
                format!(
                    "`await` at {}:{} has no surrounding try and no `.catch`",
                    location.file, location.line
                ),
                vec![location],
            ));
        }
        for location in outcome.empty_catches {
            findings.push(Finding::at_locations(
                Severity::Medium,
                format!(
                    "Empty catch block at {}:{} swallows errors",
                    location.file, location.line
                ),
                vec![location],
            ));
        }
    }

    let signal = (1.5 * unhandled_await as f64 + 2.0 * empty_catch as f64)
        / file_denominator(files.len(), 0.5);

    let mut metrics = BTreeMap::new();
    metrics.insert("total_await".to_string(), total_await.into());
    metrics.insert("unhandled_await".to_string(), unhandled_await.into());
    metrics.insert("empty_catch".to_string(), empty_catch.into());

    let mut recommendations = Vec::new();
    if unhandled_await > 0 {
        recommendations.push(
            "Wrap awaits in try/catch or chain `.catch` on the promise".to_string(),
        );
    }
    if empty_catch > 0 {
        recommendations.push("Log or rethrow inside empty catch blocks".to_string());
    }

    (
        build_category(
            CategoryId::AsyncHygiene,
            signal,
            findings,
            metrics,
            recommendations,
        ),
        warnings,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(content: &str) -> CategoryReport {
        let files = vec![SourceFile::new("a.js", content, ".js")];
        analyze(&files).0
    }

    fn metric(report: &CategoryReport, key: &str) -> u64 {
        report.metrics[key].as_u64().unwrap()
    }

    #[test]
    fn test_bare_await_is_unhandled() {
        let report = run("async function f(url) {\n  await fetch(url);\n}\n");
        assert_eq!(metric(&report, "total_await"), 1);
        assert_eq!(metric(&report, "unhandled_await"), 1);
    }

    #[test]
    fn test_try_protected_await_is_handled() {
        let report = run(
            "async function f(url) {\n  try {\n    await fetch(url);\n  } catch (e) {\n    report(e);\n  }\n}\n",
        );
        assert_eq!(metric(&report, "total_await"), 1);
        assert_eq!(metric(&report, "unhandled_await"), 0);
        assert_eq!(metric(&report, "empty_catch"), 0);
    }

    #[test]
    fn test_empty_catch_is_its_own_finding() {
        let report =
            run("async function f(url) {\n  try {\n    await fetch(url);\n  } catch (e) {}\n}\n");
        assert_eq!(metric(&report, "unhandled_await"), 0);
        assert_eq!(metric(&report, "empty_catch"), 1);
        assert!(report
            .findings
            .iter()
            .any(|f| f.message.contains("Empty catch block")));
    }

    #[test]
    fn test_catch_chain_counts_as_handled() {
        let report = run("async function f() {\n  await fetch('/x').catch(log);\n}\n");
        assert_eq!(metric(&report, "unhandled_await"), 0);
    }

    #[test]
    fn test_inner_catch_link_counts_as_handled() {
        // The .catch is not the outermost link; the leftward walk must
        // still find it.
        let report = run("async function f() {\n  await fetch('/x').catch(log).then(done);\n}\n");
        assert_eq!(metric(&report, "total_await"), 1);
        assert_eq!(metric(&report, "unhandled_await"), 0);
    }

    #[test]
    fn test_catch_in_handler_body_is_not_protected() {
        let report = run(
            "async function f() {\n  try {\n    await a();\n  } catch (e) {\n    await cleanup();\n  }\n}\n",
        );
        assert_eq!(metric(&report, "total_await"), 2);
        // The await inside the catch body has no protection of its own.
        assert_eq!(metric(&report, "unhandled_await"), 1);
    }

    #[test]
    fn test_finally_is_not_protected() {
        let report = run(
            "async function f() {\n  try {\n    await a();\n  } finally {\n    await release();\n  }\n}\n",
        );
        assert_eq!(metric(&report, "unhandled_await"), 1);
    }

    #[test]
    fn test_nested_try_keeps_protection() {
        let report = run(
            "async function f() {\n  try {\n    if (x) {\n      await deep();\n    }\n  } catch (e) {\n    report(e);\n  }\n}\n",
        );
        assert_eq!(metric(&report, "unhandled_await"), 0);
    }

    #[test]
    fn test_unparseable_file_counts_awaits_flat() {
        let files = vec![SourceFile::new(
            "broken.js",
            "await a(); }}}} not parseable {{{{ await b();",
            ".js",
        )];
        let (report, warnings) = analyze(&files);

        assert_eq!(report.metrics["total_await"].as_u64().unwrap(), 2);
        assert_eq!(report.metrics["unhandled_await"].as_u64().unwrap(), 0);
        assert!(warnings.iter().any(|w| w.file == "broken.js"));
    }

    #[test]
    fn test_all_awaits_covered_means_zero_unhandled() {
        let report = run(
            "async function f() {\n  try {\n    await one();\n  } catch (e) {\n    report(e);\n  }\n  await two().catch(report);\n}\n",
        );
        assert_eq!(metric(&report, "total_await"), 2);
        assert_eq!(metric(&report, "unhandled_await"), 0);
    }
}
