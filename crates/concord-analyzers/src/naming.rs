//! Naming convention classification.
//!
//! Identifiers and filenames are classified against two independent
//! pattern sets, each tested in a fixed priority order with first match
//! winning; identifiers matching no pattern stay out of the tallies. The
//! project's dominant identifier style is the one with the highest total
//! count, ties broken by the priority order, which makes the computation
//! independent of file ordering.

use concord_core::scoring::file_denominator;
use concord_core::{
    AnalysisWarning, CategoryId, CategoryReport, Finding, Severity, SourceFile,
};
use concord_syntax::{fallback, resolve, walk};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use tree_sitter::Node;

use crate::engine::build_category;

/// Identifier styles in classification priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IdentifierStyle {
    Camel,
    Snake,
    Pascal,
    ScreamingSnake,
}

impl IdentifierStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierStyle::Camel => "camelCase",
            IdentifierStyle::Snake => "snake_case",
            IdentifierStyle::Pascal => "PascalCase",
            IdentifierStyle::ScreamingSnake => "SCREAMING_SNAKE",
        }
    }

    fn all() -> &'static [IdentifierStyle] {
        &[
            IdentifierStyle::Camel,
            IdentifierStyle::Snake,
            IdentifierStyle::Pascal,
            IdentifierStyle::ScreamingSnake,
        ]
    }
}

/// Filename styles in classification priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileStyle {
    Kebab,
    Snake,
    Camel,
    Pascal,
}

impl FileStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStyle::Kebab => "kebab-case",
            FileStyle::Snake => "snake_case",
            FileStyle::Camel => "camelCase",
            FileStyle::Pascal => "PascalCase",
        }
    }
}

static CAMEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z][a-zA-Z0-9]*$").expect("static regex"));
static SNAKE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9]*(_[a-z0-9]+)+$").expect("static regex"));
static PASCAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][a-zA-Z0-9]*$").expect("static regex"));
static SCREAMING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Z0-9]*(_[A-Z0-9]+)+$").expect("static regex"));

static FILE_KEBAB: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9]*(-[a-z0-9]+)*$").expect("static regex"));
static FILE_SNAKE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9]*(_[a-z0-9]+)+$").expect("static regex"));
static FILE_CAMEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9]*([A-Z][a-zA-Z0-9]*)+$").expect("static regex"));
static FILE_PASCAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][a-zA-Z0-9]*$").expect("static regex"));

/// Classifies one identifier; first matching pattern wins.
pub fn classify_identifier(name: &str) -> Option<IdentifierStyle> {
    if CAMEL.is_match(name) {
        Some(IdentifierStyle::Camel)
    } else if SNAKE.is_match(name) {
        Some(IdentifierStyle::Snake)
    } else if PASCAL.is_match(name) {
        Some(IdentifierStyle::Pascal)
    } else if SCREAMING.is_match(name) {
        Some(IdentifierStyle::ScreamingSnake)
    } else {
        None
    }
}

/// Classifies one filename stem; first matching pattern wins.
pub fn classify_filename(stem: &str) -> Option<FileStyle> {
    if FILE_KEBAB.is_match(stem) {
        Some(FileStyle::Kebab)
    } else if FILE_SNAKE.is_match(stem) {
        Some(FileStyle::Snake)
    } else if FILE_CAMEL.is_match(stem) {
        Some(FileStyle::Camel)
    } else if FILE_PASCAL.is_match(stem) {
        Some(FileStyle::Pascal)
    } else {
        None
    }
}

/// Harvests declared names from the tree walk (function, class, method
/// and variable declarations).
fn harvest_from_tree(node: Node<'_>, source: &str, out: &mut Vec<String>) {
    match node.kind() {
        "function_declaration" | "generator_function_declaration" | "class_declaration" => {
            if let Some(name) = node.child_by_field_name("name") {
                out.push(walk::node_text(name, source).to_string());
            }
        }
        "variable_declarator" => {
            if let Some(name) = node.child_by_field_name("name") {
                if name.kind() == "identifier" {
                    out.push(walk::node_text(name, source).to_string());
                }
            }
        }
        "method_definition" => {
            if let Some(name) = node.child_by_field_name("name") {
                let text = walk::node_text(name, source);
                if text != "constructor" {
                    out.push(text.to_string());
                }
            }
        }
        _ => {}
    }
    for child in walk::children(node) {
        harvest_from_tree(child, source, out);
    }
}

fn harvest_identifiers(file: &SourceFile) -> (Vec<String>, Option<AnalysisWarning>) {
    let resolution = resolve(&file.content, &file.extension);
    match resolution.root() {
        Some(root) => {
            let mut names = Vec::new();
            harvest_from_tree(root, &resolution.source, &mut names);
            (names, None)
        }
        None => (
            fallback::scan_identifiers(&file.content),
            Some(AnalysisWarning::new(
                &file.relative_path,
                crate::engine::PARSE_FALLBACK_WARNING,
            )),
        ),
    }
}

/// Case-folds a name with separators stripped, for component/filename
/// comparison (`user-card` == `UserCard`).
fn fold_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Extensions whose files are expected to be named after the component
/// they export.
fn is_component_extension(extension: &str) -> bool {
    matches!(extension, ".jsx" | ".tsx")
}

/// Runs the naming analysis across the file set.
pub fn analyze(files: &[SourceFile]) -> (CategoryReport, Vec<AnalysisWarning>) {
    let mut warnings = Vec::new();
    let mut findings = Vec::new();

    // Per-style totals and per-file tallies, folded in one pass.
    let mut totals: BTreeMap<IdentifierStyle, usize> = BTreeMap::new();
    let mut per_file: Vec<(usize, BTreeMap<IdentifierStyle, usize>)> = Vec::new();

    for (index, file) in files.iter().enumerate() {
        let (names, warning) = harvest_identifiers(file);
        warnings.extend(warning);

        let mut counts: BTreeMap<IdentifierStyle, usize> = BTreeMap::new();
        for name in &names {
            if let Some(style) = classify_identifier(name) {
                *counts.entry(style).or_default() += 1;
                *totals.entry(style).or_default() += 1;
            }
        }
        per_file.push((index, counts));
    }

    // Dominant style: highest total, ties broken by priority order. The
    // result only depends on the totals, never on file ordering.
    // `max_by_key` keeps the last maximal element, so iterating in reverse
    // priority order makes the earliest style win ties.
    let dominant = IdentifierStyle::all()
        .iter()
        .rev()
        .copied()
        .max_by_key(|style| totals.get(style).copied().unwrap_or(0));
    let classified_total: usize = totals.values().sum();

    let mut minority_files = 0usize;
    if let Some(dominant) = dominant {
        if classified_total > 0 {
            for (index, counts) in &per_file {
                let minority: usize = counts
                    .iter()
                    .filter(|(style, _)| **style != dominant)
                    .map(|(_, count)| *count)
                    .sum();
                if minority > 0 {
                    minority_files += 1;
                    findings.push(Finding::for_files(
                        Severity::Low,
                        format!(
                            "`{}` mixes identifier styles into a {} project",
                            files[*index].relative_path,
                            dominant.as_str()
                        ),
                        vec![files[*index].relative_path.clone()],
                    ));
                }
            }
        }
    }

    // Mixed-style directories, judged on classified filename stems.
    let mut directories: BTreeMap<&str, BTreeMap<FileStyle, Vec<&str>>> = BTreeMap::new();
    for file in files {
        if let Some(style) = classify_filename(file.stem()) {
            directories
                .entry(file.directory())
                .or_default()
                .entry(style)
                .or_default()
                .push(&file.relative_path);
        }
    }
    let mut mixed_directories = 0usize;
    for (directory, buckets) in &directories {
        if buckets.len() > 1 {
            mixed_directories += 1;
            let involved: Vec<String> = buckets
                .values()
                .flatten()
                .map(|path| path.to_string())
                .collect();
            let label = if directory.is_empty() {
                "project root"
            } else {
                directory
            };
            findings.push(Finding::for_files(
                Severity::Low,
                format!("Directory `{label}` mixes filename styles"),
                involved,
            ));
        }
    }

    // Component/filename mismatches for view-like extensions.
    let mut mismatches = 0usize;
    for file in files {
        if !is_component_extension(&file.extension) {
            continue;
        }
        let exports = fallback::scan_exports(&file.content);
        let components: BTreeSet<&String> = exports
            .named
            .iter()
            .filter(|name| name.chars().next().is_some_and(|c| c.is_uppercase()))
            .collect();
        if components.is_empty() {
            continue;
        }
        let stem = fold_name(file.stem());
        if components.iter().all(|name| fold_name(name) != stem) {
            mismatches += 1;
            let names: Vec<String> = components.iter().map(|n| n.to_string()).collect();
            findings.push(Finding::for_files(
                Severity::Medium,
                format!(
                    "`{}` exports {} but is not named after any of them",
                    file.relative_path,
                    names.join(", ")
                ),
                vec![file.relative_path.clone()],
            ));
        }
    }

    let signal = (1.5 * minority_files as f64
        + mixed_directories as f64
        + 2.0 * mismatches as f64)
        / file_denominator(files.len(), 0.8);

    let mut metrics = BTreeMap::new();
    for style in IdentifierStyle::all() {
        metrics.insert(
            format!("identifiers_{}", style.as_str()),
            totals.get(style).copied().unwrap_or(0).into(),
        );
    }
    if let Some(dominant) = dominant {
        if classified_total > 0 {
            metrics.insert("dominant_style".to_string(), dominant.as_str().into());
            let share = totals.get(&dominant).copied().unwrap_or(0) as f64
                / classified_total as f64;
            metrics.insert(
                "dominant_share".to_string(),
                ((share * 100.0).round() as u64).into(),
            );
        }
    }
    metrics.insert("minority_file_count".to_string(), minority_files.into());
    metrics.insert(
        "mixed_directory_count".to_string(),
        mixed_directories.into(),
    );
    metrics.insert("component_mismatch_count".to_string(), mismatches.into());

    let mut recommendations = Vec::new();
    if minority_files > 0 {
        if let Some(dominant) = dominant {
            recommendations.push(format!(
                "Standardize identifiers on {} to match the rest of the project",
                dominant.as_str()
            ));
        }
    }
    if mixed_directories > 0 {
        recommendations.push("Pick one filename style per directory".to_string());
    }
    if mismatches > 0 {
        recommendations.push("Rename component files after their main export".to_string());
    }

    (
        build_category(CategoryId::Naming, signal, findings, metrics, recommendations),
        warnings,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_classification_priority() {
        assert_eq!(classify_identifier("fooBar"), Some(IdentifierStyle::Camel));
        assert_eq!(classify_identifier("foo"), Some(IdentifierStyle::Camel));
        assert_eq!(classify_identifier("foo_bar"), Some(IdentifierStyle::Snake));
        assert_eq!(classify_identifier("FooBar"), Some(IdentifierStyle::Pascal));
        assert_eq!(
            classify_identifier("MAX_RETRIES"),
            Some(IdentifierStyle::ScreamingSnake)
        );
        // All-caps single words fall to PascalCase by priority order.
        assert_eq!(classify_identifier("FOO"), Some(IdentifierStyle::Pascal));
        assert_eq!(classify_identifier("_private"), None);
        assert_eq!(classify_identifier("$jquery"), None);
    }

    #[test]
    fn test_filename_classification_priority() {
        assert_eq!(classify_filename("user-card"), Some(FileStyle::Kebab));
        assert_eq!(classify_filename("button"), Some(FileStyle::Kebab));
        assert_eq!(classify_filename("user_card"), Some(FileStyle::Snake));
        assert_eq!(classify_filename("userCard"), Some(FileStyle::Camel));
        assert_eq!(classify_filename("UserCard"), Some(FileStyle::Pascal));
        assert_eq!(classify_filename("user.card"), None);
    }

    fn project(entries: &[(&str, &str)]) -> Vec<SourceFile> {
        entries
            .iter()
            .map(|(path, content)| {
                let extension = path
                    .rfind('.')
                    .map(|idx| path[idx..].to_string())
                    .unwrap_or_default();
                SourceFile::new(*path, *content, extension)
            })
            .collect()
    }

    fn camel_file(path: &str) -> (String, String) {
        (
            path.to_string(),
            "const someValue = 1;\nfunction doWork() {}\n".to_string(),
        )
    }

    #[test]
    fn test_dominant_style_and_minority_files() {
        // Nine camelCase files and one snake_case file.
        let mut entries: Vec<(String, String)> =
            (0..9).map(|i| camel_file(&format!("src/mod{i}.js"))).collect();
        entries.push((
            "src/legacy.js".to_string(),
            "const some_value = 1;\nfunction do_work() {}\n".to_string(),
        ));
        let files: Vec<SourceFile> = entries
            .iter()
            .map(|(p, c)| SourceFile::new(p.clone(), c.clone(), ".js"))
            .collect();

        let (report, _) = analyze(&files);

        assert_eq!(report.metrics["dominant_style"], "camelCase");
        assert_eq!(report.metrics["dominant_share"].as_u64().unwrap(), 90);
        assert_eq!(report.metrics["minority_file_count"].as_u64().unwrap(), 1);
    }

    #[test]
    fn test_dominant_style_is_order_independent() {
        let mut entries: Vec<(String, String)> =
            (0..5).map(|i| camel_file(&format!("src/mod{i}.js"))).collect();
        entries.push((
            "src/legacy.js".to_string(),
            "const one_thing = 1;\n".to_string(),
        ));
        let files: Vec<SourceFile> = entries
            .iter()
            .map(|(p, c)| SourceFile::new(p.clone(), c.clone(), ".js"))
            .collect();

        let (forward, _) = analyze(&files);
        let mut reversed = files.clone();
        reversed.reverse();
        let (backward, _) = analyze(&reversed);

        assert_eq!(forward.metrics["dominant_style"], backward.metrics["dominant_style"]);
        assert_eq!(
            forward.metrics["minority_file_count"],
            backward.metrics["minority_file_count"]
        );
        assert_eq!(forward.score, backward.score);
    }

    #[test]
    fn test_mixed_style_directory() {
        let files = project(&[
            ("src/user-card.js", "const a = 1;\n"),
            ("src/UserAvatar.js", "const b = 2;\n"),
            ("other/plain.js", "const c = 3;\n"),
        ]);
        let (report, _) = analyze(&files);
        assert_eq!(report.metrics["mixed_directory_count"].as_u64().unwrap(), 1);
    }

    #[test]
    fn test_component_mismatch() {
        let files = project(&[(
            "src/widgets/card.tsx",
            "export function ProfileBadge() {\n  return null;\n}\n",
        )]);
        let (report, _) = analyze(&files);
        assert_eq!(
            report.metrics["component_mismatch_count"].as_u64().unwrap(),
            1
        );
    }

    #[test]
    fn test_component_match_with_separators() {
        // `user-card` matches `UserCard` after folding.
        let files = project(&[(
            "src/user-card.tsx",
            "export function UserCard() {\n  return null;\n}\n",
        )]);
        let (report, _) = analyze(&files);
        assert_eq!(
            report.metrics["component_mismatch_count"].as_u64().unwrap(),
            0
        );
    }

    #[test]
    fn test_uniform_project_scores_clean() {
        let files = project(&[
            ("src/alpha.js", "const aValue = 1;\n"),
            ("src/beta.js", "const bValue = 2;\n"),
        ]);
        let (report, _) = analyze(&files);
        assert_eq!(report.score, 0);
        assert!(report.findings.is_empty());
    }
}
