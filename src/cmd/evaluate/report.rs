use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::scoring::ScoreBreakdown;

/// Per-case record written next to the artifacts it points at.
#[derive(Debug, Serialize)]
pub struct CaseSummary {
    pub pr_number: u64,
    pub similarity: f64,
    pub file_score: f64,
    pub function_score: f64,
    pub variable_score: f64,
    pub doc_path: String,
    pub generated_patch_path: String,
    pub actual_patch_path: String,
}

/// Run-level summary: every score, their mean over scored cases, wall-clock
/// runtime, and the labeled errors of skipped cases.
#[derive(Debug, Serialize)]
pub struct RunMetrics {
    pub per_case_similarity: Vec<f64>,
    pub mean_score: f64,
    pub runtime_secs: f64,
    pub errors: Vec<String>,
}

impl RunMetrics {
    pub fn new(scores: Vec<f64>, runtime_secs: f64, errors: Vec<String>) -> Self {
        let mean_score = scores.iter().sum::<f64>() / std::cmp::max(scores.len(), 1) as f64;
        Self { per_case_similarity: scores, mean_score, runtime_secs, errors }
    }
}

/// Write the inspection artifacts for one evaluated case: the documentation
/// the model saw, both patches, and a JSON summary pointing at them.
pub fn write_case_artifacts(
    results_dir: &Path,
    pr_number: u64,
    doc_text: &str,
    generated_diff: &str,
    actual_diff: &str,
    breakdown: &ScoreBreakdown,
) -> Result<CaseSummary> {
    let case_dir = results_dir.join(format!("pr_{pr_number}"));
    std::fs::create_dir_all(&case_dir)
        .with_context(|| format!("create case dir {}", case_dir.display()))?;

    let doc_path = case_dir.join("doc.txt");
    let gen_path = case_dir.join("gen_patch.diff");
    let actual_path = case_dir.join("actual_patch.diff");

    std::fs::write(&doc_path, doc_text).context("write doc.txt")?;
    std::fs::write(&gen_path, generated_diff).context("write gen_patch.diff")?;
    std::fs::write(&actual_path, actual_diff).context("write actual_patch.diff")?;

    let summary = CaseSummary {
        pr_number,
        similarity: breakdown.combined,
        file_score: breakdown.file_score,
        function_score: breakdown.function_score,
        variable_score: breakdown.variable_score,
        doc_path: doc_path.display().to_string(),
        generated_patch_path: gen_path.display().to_string(),
        actual_patch_path: actual_path.display().to_string(),
    };

    let summary_json = serde_json::to_string_pretty(&summary).context("serialize case summary")?;
    std::fs::write(case_dir.join("summary.json"), summary_json).context("write summary.json")?;

    Ok(summary)
}

/// Write `metrics.json` and `correct.json` into the results directory and
/// return the metrics path.
pub fn write_run_metrics(results_dir: &Path, metrics: &RunMetrics) -> Result<PathBuf> {
    std::fs::create_dir_all(results_dir)
        .with_context(|| format!("create results dir {}", results_dir.display()))?;

    let metrics_path = results_dir.join("metrics.json");
    let metrics_json = serde_json::to_string_pretty(metrics).context("serialize metrics")?;
    std::fs::write(&metrics_path, metrics_json).context("write metrics.json")?;

    let correct = serde_json::json!({
        "correct": true,
        "error": metrics.errors.join("; "),
    });
    std::fs::write(
        results_dir.join("correct.json"),
        serde_json::to_string_pretty(&correct).context("serialize correct.json")?,
    )
    .context("write correct.json")?;

    Ok(metrics_path)
}
