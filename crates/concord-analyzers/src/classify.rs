//! File-role classification shared by the analyzers.
//!
//! Orphan and unused-export findings are suppressed for three file roles:
//! entrypoints (reachable by convention, not by import), test/fixture
//! files (reachable by a test runner), and root-level config files of
//! tools the manifest declares (reachable by the tool itself).

use concord_core::{Manifest, SourceFile};

use crate::engine::EntrypointConfig;

/// Root-level config files that belong to a declared tool. Maps the
/// dependency name to the config basename prefix it owns.
const TOOL_CONFIGS: &[(&str, &str)] = &[
    ("tailwindcss", "tailwind.config"),
    ("jest", "jest.config"),
    ("vitest", "vitest.config"),
    ("vite", "vite.config"),
    ("webpack", "webpack.config"),
    ("rollup", "rollup.config"),
    ("next", "next.config"),
    ("postcss", "postcss.config"),
    ("eslint", "eslint.config"),
    ("eslint", ".eslintrc"),
    ("prettier", "prettier.config"),
    ("babel", "babel.config"),
    ("@playwright/test", "playwright.config"),
    ("cypress", "cypress.config"),
];

/// Path segments that mark test or fixture trees.
const TEST_SEGMENTS: &[&str] = &[
    "tests",
    "test",
    "__tests__",
    "__mocks__",
    "e2e",
    "cypress",
    "fixtures",
    "testdata",
];

/// Whether a file is an entrypoint by the configured path/name convention.
///
/// Entrypoints are exempt from orphan and unused-export classification:
/// they are reached by runtimes and frameworks, not by imports.
pub fn is_entrypoint(file: &SourceFile, config: &EntrypointConfig) -> bool {
    if config.names.iter().any(|name| file.stem() == name) {
        return true;
    }
    config
        .dirs
        .iter()
        .any(|dir| file.relative_path.starts_with(dir.as_str()))
}

/// Whether a path belongs to a test, spec, mock or fixture tree.
pub fn is_test_or_fixture(path: &str) -> bool {
    let basename = path.rsplit('/').next().unwrap_or(path);
    let lower = basename.to_lowercase();
    if lower.contains(".test.") || lower.contains(".spec.") {
        return true;
    }
    path.split('/')
        .any(|segment| TEST_SEGMENTS.contains(&segment))
}

/// Whether a root-level file is the config of a tool the manifest
/// declares. Without a manifest nothing is suppressed.
pub fn is_declared_tool_config(path: &str, manifest: Option<&Manifest>) -> bool {
    let Some(manifest) = manifest else {
        return false;
    };
    if path.contains('/') {
        return false;
    }
    TOOL_CONFIGS.iter().any(|(dependency, prefix)| {
        path.starts_with(prefix) && manifest.has_dependency(dependency)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str) -> SourceFile {
        let extension = path
            .rfind('.')
            .map(|idx| path[idx..].to_string())
            .unwrap_or_default();
        SourceFile::new(path, "", extension)
    }

    #[test]
    fn test_entrypoint_by_name() {
        let config = EntrypointConfig::default();
        assert!(is_entrypoint(&file("index.ts"), &config));
        assert!(is_entrypoint(&file("src/main.js"), &config));
        assert!(is_entrypoint(&file("app.tsx"), &config));
        assert!(!is_entrypoint(&file("utils/helper.js"), &config));
    }

    #[test]
    fn test_entrypoint_by_directory() {
        let config = EntrypointConfig::default();
        assert!(is_entrypoint(&file("pages/about.tsx"), &config));
        assert!(is_entrypoint(&file("routes/user.ts"), &config));
        assert!(!is_entrypoint(&file("src/pages.ts"), &config));
    }

    #[test]
    fn test_entrypoint_config_is_overridable() {
        let config = EntrypointConfig {
            names: vec!["server".to_string()],
            dirs: vec!["handlers/".to_string()],
        };
        assert!(is_entrypoint(&file("server.ts"), &config));
        assert!(is_entrypoint(&file("handlers/login.ts"), &config));
        assert!(!is_entrypoint(&file("index.ts"), &config));
    }

    #[test]
    fn test_test_and_fixture_paths() {
        assert!(is_test_or_fixture("src/date.test.ts"));
        assert!(is_test_or_fixture("src/Button.spec.tsx"));
        assert!(is_test_or_fixture("__tests__/setup.js"));
        assert!(is_test_or_fixture("src/__mocks__/api.js"));
        assert!(is_test_or_fixture("e2e/login.ts"));
        assert!(!is_test_or_fixture("src/latest.ts"));
        assert!(!is_test_or_fixture("src/contest/rank.ts"));
    }

    #[test]
    fn test_tool_config_requires_manifest_entry() {
        let manifest = Manifest::from_package_json(
            r#"{"devDependencies": {"tailwindcss": "^3.0.0"}}"#,
        )
        .unwrap();

        assert!(is_declared_tool_config(
            "tailwind.config.js",
            Some(&manifest)
        ));
        // Tool not declared.
        assert!(!is_declared_tool_config("jest.config.js", Some(&manifest)));
        // Not root-level.
        assert!(!is_declared_tool_config(
            "config/tailwind.config.js",
            Some(&manifest)
        ));
        // No manifest at all.
        assert!(!is_declared_tool_config("tailwind.config.js", None));
    }
}
