//! Decode command — renders a DBD source file as JSON or a text report.

use std::path::PathBuf;

use miette::{IntoDiagnostic, Result, WrapErr};

use crate::output::OutputFormat;

/// Run the decode command.
pub fn run(input: PathBuf, format: OutputFormat, output: Option<PathBuf>) -> Result<()> {
    let source = std::fs::read_to_string(&input)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read DBD file: {}", input.display()))?;

    tracing::info!("Decoding {}", input.display());

    let segments =
        ims_dbd::decode(&source).map_err(|e| miette::miette!("DBD decode error: {}", e))?;

    tracing::debug!("Decoded {} segments", segments.len());

    if format.is_json() {
        // One JSON object per segment, with `attributes`, `fields`,
        // `leftChildren`, `crossReferences` keys.
        let rendered = serde_json::to_string_pretty(&segments).into_diagnostic()?;
        match output {
            Some(path) => {
                std::fs::write(&path, rendered)
                    .into_diagnostic()
                    .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
            }
            None => println!("{rendered}"),
        }
        return Ok(());
    }

    // Text report.
    println!("DBD Analysis: {}", input.display());
    println!("───────────────────────────────────────────────────────────────");
    println!("SEGMENTS: {} total", segments.len());

    for (i, segment) in segments.iter().enumerate() {
        println!();
        println!("Segment {}: SEGM {}", i + 1, render_attributes(&segment.attributes));
        for field in &segment.fields {
            println!("  FIELD  {}", render_attributes(&field.attributes));
        }
        for lchild in &segment.left_children {
            println!("  LCHILD {}", render_attributes(&lchild.attributes));
        }
        for xref in &segment.cross_references {
            println!("  XDFLD  {}", render_attributes(&xref.attributes));
        }
    }

    Ok(())
}

/// Render an attribute list back into `KEY=VALUE` form.
fn render_attributes(attributes: &[ims_dbd::Attribute]) -> String {
    attributes
        .iter()
        .map(|a| format!("{}={}", a.key, a.value))
        .collect::<Vec<_>>()
        .join(",")
}
