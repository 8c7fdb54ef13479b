pub mod docs;
pub mod github;
pub mod logging;
pub mod model;
pub mod prompts;
pub mod report;
pub mod tree;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Instant;

use crate::config::load_config;
use crate::scoring::score_patches_detailed;
use crate::scoring::symbols::PythonSymbols;
use crate::util::get_github_token_from_env_or_config;

use github::{FetchError, GithubClient};
use logging::{debug_log, init_debug_logging};
use report::RunMetrics;

/// Run the full evaluation: fetch merged PRs, generate a candidate patch for
/// each, score it against the merged diff, and persist artifacts + metrics.
///
/// One case failing is recorded and skipped; only setup failures (config,
/// cache dir, results dir) abort the run.
pub fn handle_evaluate(
    cwd: String,
    results_dir: String,
    model: Option<String>,
    num_cases: Option<usize>,
    cases: Option<String>,
    debug: bool,
) -> Result<()> {
    let cwd_path = Path::new(&cwd);
    let cwd_abs = cwd_path.canonicalize().unwrap_or_else(|_| cwd_path.to_path_buf());

    let config_path = cwd_abs.join("patchscore.yaml");
    let mut config = load_config(&config_path)?;

    // CLI overrides on top of the project YAML.
    if let Some(m) = model.filter(|m| !m.trim().is_empty()) {
        config.agent.model = m;
    }
    if let Some(n) = num_cases {
        config.cases.limit = n;
    }
    if let Some(ids) = cases.as_deref() {
        config.cases.ids = parse_case_ids(ids)?;
    }

    let debug_file = init_debug_logging(&cwd_abs, debug)?;
    debug_log(&debug_file, &format!("Evaluating {} with model {}", config.repo, config.agent.model), debug);

    let token = get_github_token_from_env_or_config();
    let client = GithubClient::new(&config.github, &config.repo, &cwd_abs, token)?;

    let results_root = cwd_abs.join(&results_dir);
    std::fs::create_dir_all(&results_root)
        .with_context(|| format!("create results dir {}", results_root.display()))?;

    let start = Instant::now();
    let mut scores: Vec<f64> = Vec::new();
    let mut errors: Vec<String> = Vec::new();

    let pr_numbers: Vec<u64> = if !config.cases.ids.is_empty() {
        select_case_ids(&config.cases.ids, config.cases.limit)
    } else {
        match client.list_merged_prs(config.cases.limit) {
            Ok(nums) => nums,
            Err(e) => {
                errors.push(format!("failed_list_prs: {e}"));
                Vec::new()
            }
        }
    };
    debug_log(&debug_file, &format!("Cases: {:?}", pr_numbers), debug);

    // Documentation is stable across cases; build it once.
    let doc_text = docs::generate_docs(&client, &config);
    debug_log(&debug_file, &format!("Documentation context: {} chars", doc_text.len()), debug);

    let weights = config.scoring.weights();
    let pb = ProgressBar::new(pr_numbers.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} cases")
            .unwrap()
            .progress_chars("=>-"),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(120));

    for pr_number in pr_numbers {
        let details = match client.pr_details(pr_number) {
            Ok(d) => d,
            Err(FetchError::RateLimited) => {
                errors.push(format!("pr_{pr_number}: rate limit exceeded (set GITHUB_TOKEN or rely on cache)"));
                pb.inc(1);
                continue;
            }
            Err(e) => {
                errors.push(format!("pr_{pr_number}: {e}"));
                pb.inc(1);
                continue;
            }
        };

        let generated = match model::generate_patch(
            &config.agent.model,
            config.agent.max_tokens,
            &doc_text,
            &details.body,
        ) {
            Ok(diff) => diff,
            Err(e) => {
                errors.push(format!("pr_{pr_number}: {e}"));
                pb.inc(1);
                continue;
            }
        };

        debug_log(&debug_file, &format!("--- PR {pr_number} GENERATED PATCH ---\n{generated}"), false);
        debug_log(&debug_file, &format!("--- PR {pr_number} ACTUAL PATCH ---\n{}", details.diff_text), false);

        let breakdown = score_patches_detailed(&generated, &details.diff_text, &weights, &PythonSymbols);
        scores.push(breakdown.combined);

        if let Err(e) = report::write_case_artifacts(
            &results_root,
            pr_number,
            &doc_text,
            &generated,
            &details.diff_text,
            &breakdown,
        ) {
            debug_log(&debug_file, &format!("Failed to write artifacts for PR {pr_number}: {e}"), debug);
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let metrics = RunMetrics::new(scores, start.elapsed().as_secs_f64(), errors);
    report::write_run_metrics(&results_root, &metrics)?;

    println!("{}", serde_json::to_string_pretty(&metrics).context("render metrics")?);
    Ok(())
}

/// Provider + GitHub preflight for the `check` subcommand.
pub fn check_evaluate(cwd: String, model: Option<String>) -> Result<()> {
    let cwd_path = Path::new(&cwd);
    let cwd_abs = cwd_path.canonicalize().unwrap_or_else(|_| cwd_path.to_path_buf());
    let config_path = cwd_abs.join("patchscore.yaml");
    let config = load_config(&config_path)?;

    let effective_model = model
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(config.agent.model);

    let client = crate::common::network::default_client(10)?;
    let provider = crate::common::network::detect_provider();
    let api_key = crate::util::get_openai_api_key_from_env_or_config();
    crate::common::network::preflight_check(&client, provider, &effective_model, api_key.as_deref())?;
    println!("Preflight passed for model '{}'.", effective_model);
    Ok(())
}

/// The case limit caps explicit id lists the same way it caps discovery.
pub fn select_case_ids(ids: &[u64], limit: usize) -> Vec<u64> {
    ids.iter().copied().take(limit).collect()
}

fn parse_case_ids(raw: &str) -> Result<Vec<u64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u64>().with_context(|| format!("invalid PR number '{s}' in --cases")))
        .collect()
}
