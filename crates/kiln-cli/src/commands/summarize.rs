//! Summarize command implementation.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use kiln_core::{PassSnapshot, summarize_at};

use crate::cli::SummarizeArgs;
use crate::error::{CliError, Result, ResultExt};

/// Execute the summarize command.
///
/// # Errors
///
/// Returns errors for a missing or unreadable snapshot, invalid snapshot
/// JSON, or a `--now-ms` value outside the supported date range.
pub async fn execute(args: SummarizeArgs) -> Result<()> {
    let json = read_snapshot(&args.snapshot)?;
    let line = summary_line(&json, args.now_ms)?;
    println!("{}", line);
    Ok(())
}

/// Render the summary line for snapshot JSON, at `now_ms` or the current time.
pub fn summary_line(json: &str, now_ms: Option<i64>) -> Result<String> {
    let snapshot: PassSnapshot = serde_json::from_str(json)?;
    let now = match now_ms {
        Some(ms) => DateTime::from_timestamp_millis(ms)
            .ok_or_else(|| CliError::InvalidArgument(format!("--now-ms {} is out of range", ms)))?,
        None => Utc::now(),
    };

    tracing::debug!(
        assets = snapshot.assets.len(),
        generated = snapshot.generated_files.len(),
        "summarizing pass started at {}",
        snapshot.start_time
    );
    Ok(summarize_at(&snapshot, now))
}

fn read_snapshot(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut json = String::new();
        std::io::stdin().read_to_string(&mut json)?;
        return Ok(json);
    }
    std::fs::read_to_string(path).with_path(path)
}
