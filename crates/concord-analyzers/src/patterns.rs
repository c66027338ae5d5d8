//! Pattern drift detection: module syntax and promise style.
//!
//! These checks are textual by design: `require(` in a string literal is
//! indistinguishable from real usage without evaluating the program, and
//! the drift signal tolerates that noise. Config files (`*.config.*`,
//! dotfile rc files) legitimately use CommonJS in ESM projects and are
//! exempt from module-syntax drift.

use concord_core::scoring::file_denominator;
use concord_core::{AnalysisWarning, CategoryId, CategoryReport, Finding, Severity, SourceFile};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use crate::engine::build_category;

static ESM_SYNTAX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*(?:import\b|export\b)").expect("static regex"));

static CJS_SYNTAX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)\brequire\s*\(|\bmodule\.exports\b|^[ \t]*exports\.[A-Za-z_$]")
        .expect("static regex")
});

static THEN_CALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.then\s*\(").expect("static regex"));

static AWAIT_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bawait\b").expect("static regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModuleSyntax {
    Esm,
    Cjs,
    Mixed,
    Neither,
}

fn module_syntax_of(content: &str) -> ModuleSyntax {
    let esm = ESM_SYNTAX.is_match(content);
    let cjs = CJS_SYNTAX.is_match(content);
    match (esm, cjs) {
        (true, true) => ModuleSyntax::Mixed,
        (true, false) => ModuleSyntax::Esm,
        (false, true) => ModuleSyntax::Cjs,
        (false, false) => ModuleSyntax::Neither,
    }
}

/// Config files are allowed to deviate from the project module style.
fn is_config_like(file: &SourceFile) -> bool {
    let basename = file
        .relative_path
        .rsplit('/')
        .next()
        .unwrap_or(&file.relative_path);
    basename.starts_with('.') || basename.contains(".config.")
}

/// Runs the pattern-drift analysis across the file set.
pub fn analyze(files: &[SourceFile]) -> (CategoryReport, Vec<AnalysisWarning>) {
    let mut findings = Vec::new();

    let mut esm_files: Vec<&SourceFile> = Vec::new();
    let mut cjs_files: Vec<&SourceFile> = Vec::new();
    let mut mixed_files = 0usize;
    let mut then_files: Vec<&SourceFile> = Vec::new();
    let mut await_files = 0usize;

    for file in files {
        if THEN_CALL.is_match(&file.content) {
            then_files.push(file);
        }
        if AWAIT_WORD.is_match(&file.content) {
            await_files += 1;
        }

        if is_config_like(file) {
            continue;
        }
        match module_syntax_of(&file.content) {
            ModuleSyntax::Esm => esm_files.push(file),
            ModuleSyntax::Cjs => cjs_files.push(file),
            ModuleSyntax::Mixed => {
                mixed_files += 1;
                findings.push(Finding::for_files(
                    Severity::Medium,
                    format!(
                        "`{}` mixes ESM and CommonJS syntax in one file",
                        file.relative_path
                    ),
                    vec![file.relative_path.clone()],
                ));
            }
            ModuleSyntax::Neither => {}
        }
    }

    // Project-level module drift: flag the minority style only when both
    // styles are present.
    let mut minority_module_files = 0usize;
    if !esm_files.is_empty() && !cjs_files.is_empty() {
        let (minority, majority_label) = if cjs_files.len() <= esm_files.len() {
            (&cjs_files, "ESM imports")
        } else {
            (&esm_files, "CommonJS require")
        };
        minority_module_files = minority.len();
        for file in minority.iter() {
            findings.push(Finding::for_files(
                Severity::Low,
                format!(
                    "`{}` deviates from the project's dominant module style ({})",
                    file.relative_path, majority_label
                ),
                vec![file.relative_path.clone()],
            ));
        }
    }

    // Promise-style drift: .then chains in an await-dominant project.
    let mut then_drift_files = 0usize;
    if await_files > then_files.len() {
        then_drift_files = then_files.len();
        for file in &then_files {
            findings.push(Finding::for_files(
                Severity::Low,
                format!(
                    "`{}` uses .then() chains while the project favors async/await",
                    file.relative_path
                ),
                vec![file.relative_path.clone()],
            ));
        }
    }

    let signal = (2.0 * mixed_files as f64
        + minority_module_files as f64
        + 0.5 * then_drift_files as f64)
        / file_denominator(files.len(), 0.7);

    let mut metrics = BTreeMap::new();
    metrics.insert("esm_files".to_string(), esm_files.len().into());
    metrics.insert("cjs_files".to_string(), cjs_files.len().into());
    metrics.insert("mixed_module_files".to_string(), mixed_files.into());
    metrics.insert(
        "minority_module_files".to_string(),
        minority_module_files.into(),
    );
    metrics.insert("then_files".to_string(), then_files.len().into());
    metrics.insert("await_files".to_string(), await_files.into());

    let mut recommendations = Vec::new();
    if mixed_files > 0 || minority_module_files > 0 {
        recommendations.push("Converge on one module syntax across the project".to_string());
    }
    if then_drift_files > 0 {
        recommendations.push("Rewrite .then() chains with async/await".to_string());
    }

    (
        build_category(CategoryId::Patterns, signal, findings, metrics, recommendations),
        Vec::new(),
    )
}
