//! Authentication check against the provider via `ssh -T`
//!
//! GitHub always exits with status 1 for `ssh -T`, even when authentication
//! succeeded, so the exit code is ignored and the greeting text decides.

use tracing::debug;

use crate::error::Result;
use crate::process::ProcessRunner;
use crate::settings::PROVIDER_USER;

const SUCCESS_MARKER: &str = "successfully authenticated";
const NO_OUTPUT: &str = "SSH returned no output";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionReport {
    /// Combined stderr and stdout, never empty
    pub output: String,
    pub ok: bool,
}

/// Classify captured `ssh -T` output
pub fn classify(stdout: &str, stderr: &str) -> ConnectionReport {
    let combined = format!("{}\n{}", stderr, stdout).trim().to_string();
    let ok = combined.to_lowercase().contains(SUCCESS_MARKER);
    let output = if combined.is_empty() {
        NO_OUTPUT.to_string()
    } else {
        combined
    };
    ConnectionReport { output, ok }
}

/// Run `ssh -T git@<alias>` with `program` and classify the result
pub async fn test_connection(
    runner: &dyn ProcessRunner,
    program: &str,
    alias: &str,
) -> Result<ConnectionReport> {
    let target = format!("{}@{}", PROVIDER_USER, alias);
    let output = runner
        .run(program, &["-T".to_string(), target])
        .await?;

    let report = classify(&output.stdout, &output.stderr);
    debug!(alias, exit_code = ?output.exit_code, ok = report.ok, "connection test finished");
    Ok(report)
}
