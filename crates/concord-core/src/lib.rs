//! Concord Core - Data model, scoring and baseline comparison.
//!
//! This crate provides the foundational types for Concord's consistency
//! analysis pipeline. It defines:
//!
//! - [`SourceFile`]: The immutable per-file input record
//! - [`Finding`], [`CategoryReport`] and [`Report`]: Analysis results
//! - [`scoring`]: Signal-ratio to bounded-score aggregation rules
//! - [`baseline`]: Snapshot comparison and regression detection
//! - [`gates`]: Post-scoring quality gate evaluation
//!
//! # Architecture
//!
//! Concord separates the analysis engine from its collaborators:
//!
//! ```text
//! ┌──────────────────┐
//! │   concord-cli    │  (User interface, config, rendering)
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │ concord-analyzers│  (Category analyzers + engine)
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │  concord-core    │  (This crate - model, scoring, baseline)
//! └──────────────────┘
//! ```
//!
//! The engine never fails a run over analysis content: parse failures,
//! unresolvable imports and unreadable files degrade to warnings, and the
//! only user-visible failure path is the post-scoring gate evaluation in
//! [`gates`].

pub mod baseline;
pub mod error;
pub mod gates;
pub mod manifest;
pub mod scoring;
pub mod types;

// Re-export core types for convenience
pub use baseline::{BaselineComparison, BaselineDeltas, BaselineSnapshot};
pub use error::{Error, Result};
pub use gates::GateConfig;
pub use manifest::Manifest;
pub use types::{
    AnalysisWarning, CategoryId, CategoryReport, Finding, Report, Severity, SourceLocation,
    SourceFile, SOURCE_EXTENSIONS,
};
