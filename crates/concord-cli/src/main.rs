//! Concord CLI - Consistency auditor for JavaScript/TypeScript.

mod baseline_store;
mod config;
mod formatters;

use anyhow::Result;
use clap::Parser;
use concord_analyzers::AuditEngine;
use concord_core::{baseline, gates, BaselineSnapshot, CategoryId};
use concord_fs::ProviderOptions;
use std::path::PathBuf;

use baseline_store::BaselineStatus;
use config::ConcordConfig;
use formatters::BaselineView;

#[derive(Parser, Debug)]
#[command(name = "concord")]
#[command(about = "Consistency auditor for JavaScript/TypeScript projects", long_about = None)]
struct Cli {
    /// Project root to audit
    #[arg(value_name = "PATH", default_value = ".")]
    path: PathBuf,

    /// Categories to analyze (default: all)
    ///
    /// Use --list-categories to see what is available.
    #[arg(short, long, value_name = "CATEGORY")]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,

    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value = "human")]
    format: OutputFormat,

    /// Configuration file path (default: <PATH>/.concord.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Minimum finding severity to report (low, medium, high)
    #[arg(long, value_name = "SEVERITY")]
    min_severity: Option<String>,

    /// Additional ignore patterns (can be specified multiple times)
    #[arg(long = "ignore", value_name = "PATTERN")]
    ignore_patterns: Vec<String>,

    /// Disable .gitignore respect during discovery
    #[arg(long)]
    no_gitignore: bool,

    /// Baseline snapshot path (default from config)
    #[arg(long, value_name = "FILE")]
    baseline: Option<PathBuf>,

    /// Save the current run as the new baseline
    #[arg(long)]
    save_baseline: bool,

    /// Skip baseline comparison entirely
    #[arg(long)]
    no_baseline: bool,

    /// Verbose output
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Human,
    Json,
}

fn init_tracing(verbose: u8) {
    let directive = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn list_categories() {
    println!("Available categories:");
    for category in CategoryId::all() {
        println!(
            "  {:<14} {}",
            category.cli_name(),
            category.description()
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.list_categories {
        list_categories();
        return Ok(());
    }

    let config = ConcordConfig::load(cli.config.as_deref(), &cli.path)?;
    let engine_config = config.engine_config(&cli.category, cli.min_severity.as_deref())?;
    let gate_config = config.gate_config()?;

    let mut ignore_patterns = config.ignore.patterns.clone();
    ignore_patterns.extend(cli.ignore_patterns.iter().cloned());
    let provider_options = ProviderOptions {
        ignore_patterns,
        respect_gitignore: !cli.no_gitignore,
        ..Default::default()
    };

    let collected = concord_fs::collect_sources(&cli.path, &provider_options).await?;
    let manifest = concord_fs::read_manifest(&cli.path).await;
    tracing::info!(files = collected.files.len(), "collected sources");

    let engine = AuditEngine::new(engine_config);
    let mut report = engine.analyze(&collected.files, manifest.as_ref());
    report.warnings.extend(collected.warnings);
    report.warnings.sort();
    report.warnings.dedup();

    // Baseline comparison and persistence.
    let baseline_path = cli
        .baseline
        .clone()
        .unwrap_or_else(|| cli.path.join(&config.baseline.path));
    let current_snapshot = BaselineSnapshot::of(&report);
    let baseline_view = if cli.no_baseline {
        BaselineView::Disabled
    } else {
        match baseline_store::load(&baseline_path) {
            BaselineStatus::Loaded(snapshot) => {
                BaselineView::Compared(baseline::compare(&current_snapshot, &snapshot))
            }
            BaselineStatus::Missing => BaselineView::Missing,
            BaselineStatus::Corrupt => BaselineView::Corrupt,
        }
    };

    let comparison = match &baseline_view {
        BaselineView::Compared(comparison) => Some(comparison),
        _ => None,
    };
    report.gate_failures = gates::evaluate(&report, comparison, &gate_config);

    if cli.save_baseline {
        baseline_store::save(&baseline_path, &current_snapshot)?;
        tracing::info!(path = %baseline_path.display(), "baseline saved");
    }

    match cli.format {
        OutputFormat::Human => formatters::human::print_report(&report, &baseline_view),
        OutputFormat::Json => formatters::json::print_json(&report, &baseline_view),
    }

    if !report.gate_failures.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}
