//! Concord FS - Async file provider.
//!
//! Feeds the engine an ordered sequence of decoded [`SourceFile`] records:
//! discovery walks the project with gitignore support on the blocking
//! thread pool, then file contents are read asynchronously. Per-file
//! problems (unreadable, non-UTF-8, oversized) drop that file with a
//! warning; only a failed walk of the root itself is an error.

use concord_core::{AnalysisWarning, Error, Manifest, Result, SourceFile, SOURCE_EXTENSIONS};
use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Discovery and read options.
#[derive(Debug, Clone)]
pub struct ProviderOptions {
    /// Extensions to treat as source files (lowercase, dot-prefixed).
    pub extensions: Vec<String>,

    /// Additional ignore globs beyond .gitignore.
    pub ignore_patterns: Vec<String>,

    /// Maximum file size to read. Oversized files are skipped with a
    /// warning.
    pub max_file_size: Option<u64>,

    /// Respect .gitignore files during the walk.
    pub respect_gitignore: bool,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            extensions: SOURCE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            ignore_patterns: Vec::new(),
            max_file_size: Some(10 * 1024 * 1024),
            respect_gitignore: true,
        }
    }
}

/// Result of collecting a project's sources.
#[derive(Debug, Default)]
pub struct CollectedSources {
    /// Decoded files, sorted by relative path.
    pub files: Vec<SourceFile>,

    /// Files dropped or skipped, with the reason.
    pub warnings: Vec<AnalysisWarning>,
}

/// Root-relative forward-slash path, or `None` for non-UTF-8 components.
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut parts = Vec::new();
    for component in relative.components() {
        parts.push(component.as_os_str().to_str()?);
    }
    Some(parts.join("/"))
}

/// Lowercase dot-prefixed extension of a path, when it has one.
fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
}

/// Walks the project tree, returning candidate files with their relative
/// paths and any per-entry warnings. Runs synchronously; callers offload
/// it to the blocking pool.
fn walk_tree(
    root: &Path,
    options: &ProviderOptions,
) -> Result<(Vec<(PathBuf, String)>, Vec<AnalysisWarning>)> {
    let mut builder = WalkBuilder::new(root);
    builder
        .git_ignore(options.respect_gitignore)
        .git_exclude(options.respect_gitignore)
        .git_global(false)
        .require_git(false)
        .hidden(true)
        .follow_links(false)
        .filter_entry(|entry| entry.file_name() != "node_modules");

    if !options.ignore_patterns.is_empty() {
        let mut overrides = OverrideBuilder::new(root);
        for pattern in &options.ignore_patterns {
            overrides
                .add(&format!("!{pattern}"))
                .map_err(|e| Error::Provider {
                    message: format!("bad ignore pattern `{pattern}`: {e}"),
                })?;
        }
        let overrides = overrides.build().map_err(|e| Error::Provider {
            message: format!("failed to compile ignore patterns: {e}"),
        })?;
        builder.overrides(overrides);
    }

    let mut candidates = Vec::new();
    let mut warnings = Vec::new();

    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warnings.push(AnalysisWarning::new("", format!("walk error: {e}")));
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.path();
        let Some(extension) = extension_of(path) else {
            continue;
        };
        if !options.extensions.contains(&extension) {
            continue;
        }
        let Some(relative) = relative_path(root, path) else {
            warnings.push(AnalysisWarning::new(
                path.to_string_lossy(),
                "non-UTF-8 path skipped",
            ));
            continue;
        };
        if let Some(limit) = options.max_file_size {
            if entry.metadata().map(|m| m.len() > limit).unwrap_or(false) {
                warnings.push(AnalysisWarning::new(
                    &relative,
                    format!("skipped: larger than {limit} bytes"),
                ));
                continue;
            }
        }
        candidates.push((path.to_path_buf(), relative));
    }

    // The engine contract is an ordered sequence; sort by relative path
    // so runs are reproducible across platforms and walk orders.
    candidates.sort_by(|a, b| a.1.cmp(&b.1));

    Ok((candidates, warnings))
}

/// Discovers and reads a project's source files.
///
/// # Errors
///
/// Only setup failures are errors (unreadable root, bad ignore patterns).
/// Individual files that cannot be read are dropped with a warning.
pub async fn collect_sources(root: &Path, options: &ProviderOptions) -> Result<CollectedSources> {
    let root = root.to_path_buf();
    let walk_options = options.clone();
    let (candidates, mut warnings) =
        tokio::task::spawn_blocking(move || walk_tree(&root, &walk_options))
            .await
            .map_err(|e| Error::Provider {
                message: format!("walk task failed: {e}"),
            })??;

    let mut files = Vec::with_capacity(candidates.len());
    for (path, relative) in candidates {
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                let extension = extension_of(&path).unwrap_or_default();
                files.push(SourceFile {
                    relative_path: relative,
                    content,
                    extension,
                });
            }
            Err(e) => {
                tracing::warn!(file = %relative, error = %e, "dropping unreadable file");
                warnings.push(AnalysisWarning::new(&relative, format!("read failed: {e}")));
            }
        }
    }

    Ok(CollectedSources { files, warnings })
}

/// Reads the project manifest, if one exists and parses.
///
/// Absence and corruption are both `None`: manifest data only suppresses
/// false positives, so a bad manifest must never fail the run.
pub async fn read_manifest(root: &Path) -> Option<Manifest> {
    let content = tokio::fs::read_to_string(root.join("package.json"))
        .await
        .ok()?;
    match Manifest::from_package_json(&content) {
        Ok(manifest) => Some(manifest),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unparseable package.json");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_collects_only_source_extensions() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("app.ts"), "export const a = 1;\n").unwrap();
        fs::write(root.join("style.css"), "body {}\n").unwrap();
        fs::write(root.join("readme.md"), "# hi\n").unwrap();

        let collected = collect_sources(root, &ProviderOptions::default())
            .await
            .unwrap();

        assert_eq!(collected.files.len(), 1);
        assert_eq!(collected.files[0].relative_path, "app.ts");
        assert_eq!(collected.files[0].extension, ".ts");
    }

    #[tokio::test]
    async fn test_paths_are_forward_slash_and_sorted() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("src/deep")).unwrap();
        fs::write(root.join("zz.js"), "").unwrap();
        fs::write(root.join("src/deep/thing.js"), "").unwrap();
        fs::write(root.join("src/aa.js"), "").unwrap();

        let collected = collect_sources(root, &ProviderOptions::default())
            .await
            .unwrap();

        let paths: Vec<&str> = collected
            .files
            .iter()
            .map(|f| f.relative_path.as_str())
            .collect();
        assert_eq!(paths, vec!["src/aa.js", "src/deep/thing.js", "zz.js"]);
    }

    #[tokio::test]
    async fn test_respects_gitignore() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join(".gitignore"), "generated.js\n").unwrap();
        fs::write(root.join("kept.js"), "").unwrap();
        fs::write(root.join("generated.js"), "").unwrap();

        let collected = collect_sources(root, &ProviderOptions::default())
            .await
            .unwrap();

        let paths: Vec<&str> = collected
            .files
            .iter()
            .map(|f| f.relative_path.as_str())
            .collect();
        assert_eq!(paths, vec!["kept.js"]);
    }

    #[tokio::test]
    async fn test_custom_ignore_patterns() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("dist")).unwrap();
        fs::write(root.join("dist/bundle.js"), "").unwrap();
        fs::write(root.join("app.js"), "").unwrap();

        let options = ProviderOptions {
            ignore_patterns: vec!["dist/**".to_string()],
            ..Default::default()
        };
        let collected = collect_sources(root, &options).await.unwrap();

        assert_eq!(collected.files.len(), 1);
        assert_eq!(collected.files[0].relative_path, "app.js");
    }

    #[tokio::test]
    async fn test_node_modules_always_skipped() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::write(root.join("node_modules/pkg/index.js"), "").unwrap();
        fs::write(root.join("own.js"), "").unwrap();

        let collected = collect_sources(root, &ProviderOptions::default())
            .await
            .unwrap();
        assert_eq!(collected.files.len(), 1);
    }

    #[tokio::test]
    async fn test_non_utf8_file_dropped_with_warning() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("good.js"), "const ok = 1;\n").unwrap();
        fs::write(root.join("binary.js"), [0xff, 0xfe, 0x00, 0x01]).unwrap();

        let collected = collect_sources(root, &ProviderOptions::default())
            .await
            .unwrap();

        assert_eq!(collected.files.len(), 1);
        assert_eq!(collected.files[0].relative_path, "good.js");
        assert!(collected
            .warnings
            .iter()
            .any(|w| w.file == "binary.js" && w.message.contains("read failed")));
    }

    #[tokio::test]
    async fn test_oversized_file_skipped() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("big.js"), "x".repeat(64)).unwrap();
        fs::write(root.join("small.js"), "y").unwrap();

        let options = ProviderOptions {
            max_file_size: Some(16),
            ..Default::default()
        };
        let collected = collect_sources(root, &options).await.unwrap();

        assert_eq!(collected.files.len(), 1);
        assert_eq!(collected.files[0].relative_path, "small.js");
        assert!(collected.warnings.iter().any(|w| w.file == "big.js"));
    }

    #[tokio::test]
    async fn test_read_manifest() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        // Missing manifest.
        assert!(read_manifest(root).await.is_none());

        // Corrupt manifest.
        fs::write(root.join("package.json"), "{ not json").unwrap();
        assert!(read_manifest(root).await.is_none());

        // Valid manifest.
        fs::write(
            root.join("package.json"),
            r#"{"dependencies": {"react": "^18.0.0"}}"#,
        )
        .unwrap();
        let manifest = read_manifest(root).await.unwrap();
        assert!(manifest.has_dependency("react"));
    }
}
