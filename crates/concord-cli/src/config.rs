//! TOML configuration loaded from `.concord.toml`.

use anyhow::{bail, Context, Result};
use concord_analyzers::{EngineConfig, EntrypointConfig};
use concord_core::{CategoryId, GateConfig, Severity};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Concord configuration loaded from `.concord.toml`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConcordConfig {
    /// Analysis options.
    #[serde(default)]
    pub analysis: AnalysisSection,

    /// Entrypoint conventions.
    #[serde(default)]
    pub entrypoints: EntrypointSection,

    /// Extra ignore globs.
    #[serde(default)]
    pub ignore: IgnoreSection,

    /// Quality gates.
    #[serde(default)]
    pub gates: GatesSection,

    /// Baseline snapshot location.
    #[serde(default)]
    pub baseline: BaselineSection,
}

/// Analysis behavior configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnalysisSection {
    /// Categories to run; all of them when omitted.
    #[serde(default)]
    pub categories: Vec<String>,

    /// Minimum finding severity to report.
    #[serde(default)]
    pub min_severity: Option<String>,

    /// Minimum code-line count below which a file is a stub.
    #[serde(default)]
    pub stub_min_lines: Option<usize>,
}

/// Entrypoint detection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EntrypointSection {
    /// Basenames (extension stripped) treated as entrypoints.
    #[serde(default = "default_entry_names")]
    pub names: Vec<String>,

    /// Path prefixes whose files are all entrypoints.
    #[serde(default = "default_entry_dirs")]
    pub dirs: Vec<String>,
}

impl Default for EntrypointSection {
    fn default() -> Self {
        Self {
            names: default_entry_names(),
            dirs: default_entry_dirs(),
        }
    }
}

fn default_entry_names() -> Vec<String> {
    vec!["index".to_string(), "main".to_string(), "app".to_string()]
}

fn default_entry_dirs() -> Vec<String> {
    vec!["pages/".to_string(), "routes/".to_string()]
}

/// Ignore patterns applied on top of .gitignore.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct IgnoreSection {
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Quality gate configuration. All gates are opt-in.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GatesSection {
    /// Fail when the overall score is below this floor.
    #[serde(default)]
    pub min_score: Option<u8>,

    /// Fail when total issues exceed this ceiling.
    #[serde(default)]
    pub max_issues: Option<usize>,

    /// Fail when any finding exceeds this severity.
    #[serde(default)]
    pub max_severity: Option<String>,

    /// Fail when the baseline comparison reports regressions.
    #[serde(default)]
    pub fail_on_regression: bool,
}

/// Baseline snapshot location.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BaselineSection {
    #[serde(default = "default_baseline_path")]
    pub path: String,
}

impl Default for BaselineSection {
    fn default() -> Self {
        Self {
            path: default_baseline_path(),
        }
    }
}

fn default_baseline_path() -> String {
    ".concord/baseline.json".to_string()
}

impl ConcordConfig {
    /// Loads configuration for a project root.
    ///
    /// An explicitly passed path must exist; the conventional
    /// `.concord.toml` is optional and its absence yields defaults.
    pub fn load(explicit: Option<&Path>, root: &Path) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    bail!("config file not found: {}", path.display());
                }
                path.to_path_buf()
            }
            None => {
                let conventional = root.join(".concord.toml");
                if !conventional.exists() {
                    return Ok(Self::default());
                }
                conventional
            }
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("invalid TOML in {}", path.display()))
    }

    /// Builds the engine configuration, with CLI values taking precedence
    /// over the file.
    pub fn engine_config(
        &self,
        cli_categories: &[String],
        cli_min_severity: Option<&str>,
    ) -> Result<EngineConfig> {
        let names = if !cli_categories.is_empty() {
            cli_categories
        } else {
            self.analysis.categories.as_slice()
        };
        let categories = if names.is_empty() {
            CategoryId::all().to_vec()
        } else {
            names
                .iter()
                .map(|name| {
                    CategoryId::from_cli_name(name)
                        .with_context(|| format!("unknown category `{name}`"))
                })
                .collect::<Result<Vec<_>>>()?
        };

        let severity_name = cli_min_severity.or(self.analysis.min_severity.as_deref());
        let min_severity = match severity_name {
            Some(name) => Severity::from_cli_name(name)
                .with_context(|| format!("unknown severity `{name}`"))?,
            None => Severity::Low,
        };

        Ok(EngineConfig {
            categories,
            min_severity,
            stub_min_lines: self.analysis.stub_min_lines.unwrap_or(3),
            entrypoints: EntrypointConfig {
                names: self.entrypoints.names.clone(),
                dirs: self.entrypoints.dirs.clone(),
            },
        })
    }

    /// Builds the gate configuration.
    pub fn gate_config(&self) -> Result<GateConfig> {
        let max_severity = match self.gates.max_severity.as_deref() {
            Some(name) => Some(
                Severity::from_cli_name(name)
                    .with_context(|| format!("unknown severity `{name}`"))?,
            ),
            None => None,
        };
        Ok(GateConfig {
            min_overall_score: self.gates.min_score,
            max_total_issues: self.gates.max_issues,
            max_severity,
            fail_on_regression: self.gates.fail_on_regression,
        })
    }
}
