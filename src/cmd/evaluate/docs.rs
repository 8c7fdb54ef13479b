use anyhow::Result;

use crate::config::EvalConfig;

use super::github::GithubClient;
use super::model;
use super::prompts;
use super::tree::build_file_tree;

/// Build repository documentation once per run: render the file tree, let
/// the model pick the relevant files, fetch them, and summarize.
///
/// Documentation quality only influences the generated patches, so any
/// failure here degrades to a placeholder string instead of aborting the
/// evaluation.
pub fn generate_docs(client: &GithubClient, config: &EvalConfig) -> String {
    match try_generate_docs(client, config) {
        Ok(doc) => doc,
        Err(_) => "Could not fetch repository documentation context.".to_string(),
    }
}

fn try_generate_docs(client: &GithubClient, config: &EvalConfig) -> Result<String> {
    let (paths, branch) = client.repo_tree()?;
    let tree = build_file_tree(&paths);

    let selected = model::select_files(
        &config.agent.model,
        config.agent.max_tokens,
        &tree,
        &paths,
        config.docs.max_files,
    )?;
    if selected.is_empty() {
        anyhow::bail!("model selected no files");
    }

    let mut parts: Vec<String> = Vec::with_capacity(selected.len());
    for path in &selected {
        match client.raw_file(&branch, path) {
            // Large files are truncated; the model only needs the shape.
            Ok(content) => {
                let clipped: String = content.chars().take(8000).collect();
                parts.push(format!("--- FILE: {path} ---\n{clipped}"));
            }
            Err(e) => parts.push(format!("--- FILE: {path} (error: {e}) ---")),
        }
    }

    let merged = parts.join("\n\n");
    let summary = model::call_text_model(
        &config.agent.model,
        prompts::SYSTEM_MESSAGE,
        &prompts::build_summarize_prompt(&merged),
        config.agent.max_tokens,
    )?;
    Ok(summary)
}
