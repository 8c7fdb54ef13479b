use anyhow::{Context, Result};
use std::path::Path;

use crate::config::load_config;
use crate::scoring::{score_patches_detailed, symbols::PythonSymbols};
use crate::util::{color_enabled_stdout, sym_check, sym_cross};

/// Score two on-disk unified diffs against each other and print the result.
/// Weights come from `patchscore.yaml` in the current directory when
/// present, otherwise the defaults.
pub fn handle_score(generated: String, actual: String, json: bool) -> Result<()> {
    let generated_text = std::fs::read_to_string(&generated)
        .with_context(|| format!("read generated diff {generated}"))?;
    let actual_text = std::fs::read_to_string(&actual)
        .with_context(|| format!("read actual diff {actual}"))?;

    let config = load_config(&Path::new(".").join("patchscore.yaml"))?;
    let breakdown = score_patches_detailed(
        &generated_text,
        &actual_text,
        &config.scoring.weights(),
        &PythonSymbols,
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&breakdown).context("render breakdown")?);
        return Ok(());
    }

    let ce = color_enabled_stdout();
    let sym = if breakdown.combined >= 0.5 { sym_check(ce) } else { sym_cross(ce) };
    println!("{} similarity: {:.4}", sym, breakdown.combined);
    println!("  files:     {:.4}", breakdown.file_score);
    println!("  functions: {:.4}", breakdown.function_score);
    println!("  variables: {:.4}", breakdown.variable_score);
    Ok(())
}
