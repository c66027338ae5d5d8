//! Package manifest model.
//!
//! The reference graph builder consumes the dependency names of an optional
//! `package.json` to suppress known "safe tool" false positives (e.g. a
//! `tailwind.config.js` is not an orphan when `tailwindcss` is declared).
//! A missing manifest is not an error.

use crate::error::{Error, Result};
use std::collections::BTreeSet;

/// Dependency tables read from `package.json`.
const DEPENDENCY_TABLES: &[&str] = &[
    "dependencies",
    "devDependencies",
    "peerDependencies",
    "optionalDependencies",
];

/// Read-only view of a project's declared dependencies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    /// Union of all dependency table keys.
    pub dependencies: BTreeSet<String>,
}

impl Manifest {
    /// Parses a `package.json` payload, folding all dependency tables
    /// into one name set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the payload is not valid JSON. A valid
    /// JSON document without dependency tables yields an empty manifest.
    pub fn from_package_json(content: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|source| Error::Json {
                file: "package.json".to_string(),
                source,
            })?;

        let mut dependencies = BTreeSet::new();
        for table in DEPENDENCY_TABLES {
            if let Some(map) = value.get(table).and_then(|v| v.as_object()) {
                dependencies.extend(map.keys().cloned());
            }
        }

        Ok(Self { dependencies })
    }

    /// Whether the project declares a dependency by this exact name.
    pub fn has_dependency(&self, name: &str) -> bool {
        self.dependencies.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folds_all_dependency_tables() {
        let manifest = Manifest::from_package_json(
            r#"{
                "name": "demo",
                "dependencies": { "react": "^18.0.0" },
                "devDependencies": { "jest": "^29.0.0" },
                "peerDependencies": { "vue": "^3.0.0" },
                "optionalDependencies": { "fsevents": "^2.0.0" }
            }"#,
        )
        .unwrap();

        for name in ["react", "jest", "vue", "fsevents"] {
            assert!(manifest.has_dependency(name), "missing {name}");
        }
        assert!(!manifest.has_dependency("webpack"));
    }

    #[test]
    fn test_manifest_without_tables_is_empty() {
        let manifest = Manifest::from_package_json(r#"{"name": "bare"}"#).unwrap();
        assert!(manifest.dependencies.is_empty());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let result = Manifest::from_package_json("{ nope");
        assert!(matches!(result, Err(Error::Json { .. })));
    }
}
