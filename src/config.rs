use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use anyhow::Context;

use crate::scoring::ScoreWeights;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalConfig {
    /// GitHub repository the evaluation runs against, `owner/name`.
    pub repo: String,
    pub agent: AgentConfig,
    pub github: GithubConfig,
    pub cases: CaseConfig,
    pub scoring: ScoringConfig,
    pub docs: DocsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub model: String,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    pub api_base: String,
    /// Pause applied before every API request, to stay under rate limits.
    pub request_delay_ms: u64,
    pub cache_dir: String,
    /// Bypass cache reads and always hit the network.
    #[serde(default)]
    pub force_fetch: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseConfig {
    /// How many PRs to evaluate; caps explicit `ids` and discovery alike.
    pub limit: usize,
    /// Explicit PR numbers; when set, discovery is skipped.
    #[serde(default)]
    pub ids: Vec<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub file_weight: f64,
    pub function_weight: f64,
    pub variable_weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocsConfig {
    /// Cap on how many files the model may select for summarization.
    pub max_files: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            repo: "pallets/click".to_string(),
            agent: AgentConfig {
                model: "gemma3:12b".to_string(),
                max_tokens: 2048,
            },
            github: GithubConfig {
                api_base: "https://api.github.com".to_string(),
                request_delay_ms: 500,
                cache_dir: ".patchscore/cache".to_string(),
                force_fetch: false,
            },
            cases: CaseConfig { limit: 3, ids: Vec::new() },
            scoring: ScoringConfig {
                file_weight: 0.5,
                function_weight: 0.35,
                variable_weight: 0.15,
            },
            docs: DocsConfig { max_files: 8 },
        }
    }
}

impl ScoringConfig {
    pub fn weights(&self) -> ScoreWeights {
        ScoreWeights {
            file: self.file_weight,
            function: self.function_weight,
            variable: self.variable_weight,
        }
    }
}

pub fn load_config(config_path: &PathBuf) -> anyhow::Result<EvalConfig> {
    if !config_path.exists() {
        return Ok(EvalConfig::default());
    }

    let content = std::fs::read_to_string(config_path)
        .context("Failed to read patchscore.yaml")?;

    let config: EvalConfig = serde_yaml::from_str(&content)
        .context("Failed to parse patchscore.yaml")?;

    Ok(config)
}

pub fn save_config(config: &EvalConfig, config_path: &PathBuf) -> anyhow::Result<()> {
    let content = serde_yaml::to_string(config)
        .context("Failed to serialize config")?;

    std::fs::write(config_path, content)
        .context("Failed to write patchscore.yaml")?;

    Ok(())
}
