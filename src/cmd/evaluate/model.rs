use anyhow::{Context, Result};
use serde_json::json;

use crate::common::network::{
    ProviderKind, default_client, detect_provider, ollama_chat_url, openai_responses_url,
    parse_model_text, parse_ollama_text,
};
use crate::util::get_openai_api_key_from_env_or_config;

use super::prompts;

/// One blocking call to the configured text model. Providers:
/// - OpenAI via the Responses API (needs an API key),
/// - Ollama via the OpenAI-compatible chat completions endpoint.
pub fn call_text_model(model: &str, system: &str, user: &str, max_tokens: u32) -> Result<String> {
    let provider = detect_provider();
    let client = default_client(300)?;

    match provider {
        ProviderKind::Ollama => {
            let url = ollama_chat_url();
            let messages = vec![
                json!({"role": "system", "content": system}),
                json!({"role": "user", "content": user}),
            ];

            let resp = client
                .post(&url)
                .json(&json!({
                    "model": model,
                    "messages": messages,
                    "stream": false,
                    "max_tokens": max_tokens
                }))
                .send()
                .context("send ollama chat request")?;

            let status = resp.status();
            let text = resp.text().unwrap_or_default();
            if !status.is_success() {
                anyhow::bail!("Ollama error {}: {}", status, text);
            }
            let body: serde_json::Value = serde_json::from_str(&text).context("parse ollama json")?;
            if let Some(s) = parse_ollama_text(&body) {
                return Ok(s);
            }
            anyhow::bail!("No text in Ollama response")
        }
        ProviderKind::OpenAi => {
            let api_key = get_openai_api_key_from_env_or_config()
                .context("OPENAI_API_KEY not set and no key stored; run `patchscore auth --set-openai-key`")?;
            let input = vec![
                json!({"role":"system","content":system}),
                json!({"role":"user","content":user}),
            ];
            let url = openai_responses_url();
            let resp = client
                .post(&url)
                .bearer_auth(api_key)
                .json(&json!({
                    "model": model,
                    "input": input,
                    "max_output_tokens": max_tokens
                }))
                .send()
                .context("send openai request")?;

            let status = resp.status();
            let text = resp.text().unwrap_or_default();
            if !status.is_success() {
                anyhow::bail!("OpenAI error {}: {}", status, text);
            }
            let body: serde_json::Value = serde_json::from_str(&text).context("parse openai json")?;
            if let Some(s) = parse_model_text(&body) {
                return Ok(s);
            }
            anyhow::bail!("No text in OpenAI response")
        }
    }
}

/// Ask the model for a candidate unified diff. The raw reply is returned
/// as-is; the scorer copes with anything that is not a well-formed diff.
pub fn generate_patch(model: &str, max_tokens: u32, doc_text: &str, pr_body: &str) -> Result<String> {
    let user = prompts::build_patch_prompt(doc_text, pr_body);
    let content = call_text_model(model, prompts::PATCH_SYSTEM_MESSAGE, &user, max_tokens)?;
    Ok(content.trim().to_string())
}

/// Ask the model to select documentation-worthy files from a rendered tree.
/// The reply is expected to be a JSON array of relative paths; anything else
/// degrades to an empty selection.
pub fn select_files(model: &str, max_tokens: u32, tree: &str, known_paths: &[String], cap: usize) -> Result<Vec<String>> {
    let user = prompts::build_selection_prompt(tree);
    let reply = call_text_model(model, prompts::SYSTEM_MESSAGE, &user, max_tokens)?;
    Ok(parse_selection(&reply, known_paths, cap))
}

/// Pull a JSON array of paths out of a model reply, tolerating fences and
/// surrounding prose, and keep only paths that actually exist in the repo.
pub fn parse_selection(reply: &str, known_paths: &[String], cap: usize) -> Vec<String> {
    let Some(start) = reply.find('[') else { return Vec::new() };
    let Some(end) = reply.rfind(']') else { return Vec::new() };
    if end < start {
        return Vec::new();
    }
    let Ok(parsed) = serde_json::from_str::<Vec<String>>(&reply[start..=end]) else {
        return Vec::new();
    };

    let mut selected = Vec::new();
    for path in parsed {
        let path = path.trim().trim_start_matches("./").to_string();
        if known_paths.iter().any(|p| *p == path) && !selected.contains(&path) {
            selected.push(path);
        }
        if selected.len() >= cap {
            break;
        }
    }
    selected
}
