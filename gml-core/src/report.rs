//! Output formatting for the CLI - plain summaries and JSON.

use serde_json::json;

use crate::builder::Written;
use crate::extract::ExtractionResult;
use crate::output::WriteOutcome;

/// JSON document describing an extraction.
pub fn extraction_json(result: &ExtractionResult) -> serde_json::Value {
    json!({
        "type": result.type_name,
        "scanned": result.scanned,
        "list": result.names().collect::<Vec<_>>(),
        "declarations": result.declarations(),
    })
}

/// Prints the extraction as pretty JSON.
///
/// Falls back to a compact rendering if pretty printing fails.
pub fn print_json(result: &ExtractionResult) {
    let value = extraction_json(result);
    match serde_json::to_string_pretty(&value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            println!("{}", value);
        }
    }
}

/// One-line summary of a write, for stderr.
pub fn summary(result: &ExtractionResult, written: &Written) -> String {
    let action = match written.outcome {
        WriteOutcome::Written => "wrote",
        WriteOutcome::Unchanged => "unchanged",
    };
    format!(
        "{} {} ({} constants of type {})",
        action,
        written.path.display(),
        result.len(),
        result.type_name
    )
}
