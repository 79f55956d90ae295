//! Check command — validates the fixed-column record format.

use std::path::PathBuf;

use miette::{IntoDiagnostic, Result, WrapErr};

use crate::output::{print_json, CheckOutput, OutputFormat};

/// Run the check command.
pub fn run(input: PathBuf, format: OutputFormat) -> Result<()> {
    let source = std::fs::read_to_string(&input)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read DBD file: {}", input.display()))?;

    tracing::info!("Checking {}", input.display());

    let lines = ims_dbd::logical_lines(&source)
        .map_err(|e| miette::miette!("Record format error: {}", e))?;

    if format.is_json() {
        print_json(&CheckOutput {
            status: "success".to_string(),
            statements: lines.len(),
        });
        return Ok(());
    }

    println!("✓ Record format: {} logical statements", lines.len());
    Ok(())
}
