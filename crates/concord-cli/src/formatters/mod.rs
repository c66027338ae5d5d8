//! Report rendering.

pub mod human;
pub mod json;

use concord_core::BaselineComparison;

/// Baseline information attached to a rendered report.
#[derive(Debug)]
pub enum BaselineView {
    /// Comparison against a loaded snapshot.
    Compared(BaselineComparison),

    /// No snapshot was found at the configured path.
    Missing,

    /// A snapshot file exists but could not be decoded.
    Corrupt,

    /// Baseline comparison was not requested.
    Disabled,
}
