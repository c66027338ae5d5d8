//! JSON output for scripting and CI consumption.

use concord_core::Report;
use serde_json::json;

use super::BaselineView;

/// Prints the report as pretty JSON to stdout.
pub fn print_json(report: &Report, baseline: &BaselineView) {
    let baseline_value = match baseline {
        BaselineView::Compared(comparison) => json!({
            "status": "compared",
            "deltas": comparison.deltas,
            "regressions": comparison.regressions,
        }),
        BaselineView::Missing => json!({ "status": "missing" }),
        BaselineView::Corrupt => json!({ "status": "corrupt" }),
        BaselineView::Disabled => json!({ "status": "disabled" }),
    };

    let output = json!({
        "report": report,
        "baseline": baseline_value,
    });

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing report: {}", e),
    }
}
