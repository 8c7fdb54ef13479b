use anyhow::{Context, Result};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha1::{Digest, Sha1};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::GithubConfig;

/// Failures of the case fetcher. `RateLimited` is the one variant the
/// evaluation loop treats specially: skip the case and keep going.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("GitHub rate limit exceeded (set GITHUB_TOKEN or rely on cache)")]
    RateLimited,
    #[error("GitHub API error {status}: {body}")]
    Api { status: StatusCode, body: String },
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Everything the evaluation needs about one merged pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseDetails {
    pub body: String,
    pub files: Vec<PrFile>,
    pub diff_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrFile {
    pub filename: String,
    #[serde(default)]
    pub raw_url: Option<String>,
    #[serde(default)]
    pub patch: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct PrListCache {
    fetched_at: chrono::DateTime<chrono::Utc>,
    pr_numbers: Vec<u64>,
}

#[derive(Serialize, Deserialize)]
struct PrDetailsCache {
    fetched_at: chrono::DateTime<chrono::Utc>,
    #[serde(flatten)]
    details: CaseDetails,
}

/// Blocking GitHub client for one repository, with a JSON file cache and a
/// fixed pause before every request. Retry/backoff policy lives entirely
/// here; the scorer never learns about any of it.
pub struct GithubClient {
    client: Client,
    api_base: String,
    repo: String,
    cache_dir: PathBuf,
    delay: Duration,
    force_fetch: bool,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(cfg: &GithubConfig, repo: &str, project_root: &Path, token: Option<String>) -> Result<Self> {
        let cache_dir = project_root.join(&cfg.cache_dir);
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("create cache dir {}", cache_dir.display()))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("patchscore/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("create http client")?;
        Ok(Self {
            client,
            api_base: cfg.api_base.trim_end_matches('/').to_string(),
            repo: repo.to_string(),
            cache_dir,
            delay: Duration::from_millis(cfg.request_delay_ms),
            force_fetch: cfg.force_fetch,
            token,
        })
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    fn api_url(&self, path: &str) -> Result<String, FetchError> {
        let base = Url::parse(&format!("{}/", self.api_base)).context("parse api base")?;
        Ok(base.join(path).context("join api path")?.to_string())
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response, FetchError> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        let mut req = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = self.token.as_deref() {
            req = req.bearer_auth(token);
        }
        let resp = req.send()?;
        let status = resp.status();
        if status == StatusCode::FORBIDDEN {
            return Err(FetchError::RateLimited);
        }
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(FetchError::Api { status, body });
        }
        Ok(resp)
    }

    fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let resp = self.get(url)?;
        Ok(resp.json::<Value>()?)
    }

    fn read_cache<T: serde::de::DeserializeOwned>(&self, name: &str) -> Option<T> {
        if self.force_fetch {
            return None;
        }
        let path = self.cache_dir.join(name);
        let text = std::fs::read_to_string(path).ok()?;
        serde_json::from_str(&text).ok()
    }

    fn write_cache<T: Serialize>(&self, name: &str, value: &T) {
        // A failed cache write is not worth failing the run over.
        if let Ok(text) = serde_json::to_string(value) {
            let _ = std::fs::write(self.cache_dir.join(name), text);
        }
    }

    /// List up to `limit` recently closed PRs that were actually merged and
    /// carry at least one non-empty per-file patch.
    pub fn list_merged_prs(&self, limit: usize) -> Result<Vec<u64>, FetchError> {
        let cache_name = format!("closed_prs_{limit}.json");
        if let Some(cached) = self.read_cache::<PrListCache>(&cache_name) {
            if !cached.pr_numbers.is_empty() {
                return Ok(cached.pr_numbers.into_iter().take(limit).collect());
            }
        }

        let per_page = std::cmp::max(30, limit * 3);
        let url = self.api_url(&format!(
            "repos/{}/pulls?state=closed&per_page={}",
            self.repo, per_page
        ))?;
        let list = self.get_json(&url)?;
        let prs = list.as_array().cloned().unwrap_or_default();

        let mut pr_numbers: Vec<u64> = Vec::new();
        for pr in prs {
            if pr_numbers.len() >= limit {
                break;
            }
            let Some(number) = pr.get("number").and_then(|v| v.as_u64()) else {
                continue;
            };
            if pr.get("merged_at").map(Value::is_null).unwrap_or(true) {
                continue;
            }
            // Keep only PRs whose file list carries real patch text.
            let files_url = self.api_url(&format!("repos/{}/pulls/{}/files", self.repo, number))?;
            match self.get_json(&files_url) {
                Ok(files) => {
                    let has_patch = files
                        .as_array()
                        .map(|fs| {
                            fs.iter().any(|f| {
                                f.get("patch")
                                    .and_then(|p| p.as_str())
                                    .map(|p| !p.trim().is_empty())
                                    .unwrap_or(false)
                            })
                        })
                        .unwrap_or(false);
                    if has_patch {
                        pr_numbers.push(number);
                    }
                }
                Err(FetchError::RateLimited) => return Err(FetchError::RateLimited),
                Err(_) => continue,
            }
        }

        self.write_cache(
            &cache_name,
            &PrListCache { fetched_at: chrono::Utc::now(), pr_numbers: pr_numbers.clone() },
        );
        Ok(pr_numbers)
    }

    /// Fetch PR body, file metadata and the raw unified diff. Cached; on a
    /// rate limit the cached copy is served when present.
    pub fn pr_details(&self, number: u64) -> Result<CaseDetails, FetchError> {
        let cache_name = format!("pr_{number}.json");
        if let Some(cached) = self.read_cache::<PrDetailsCache>(&cache_name) {
            return Ok(cached.details);
        }

        let fetched = self.fetch_pr_details(number);
        if matches!(fetched, Err(FetchError::RateLimited)) {
            // force_fetch suppresses cache reads above, not this fallback.
            let path = self.cache_dir.join(&cache_name);
            if let Ok(text) = std::fs::read_to_string(path) {
                if let Ok(cached) = serde_json::from_str::<PrDetailsCache>(&text) {
                    return Ok(cached.details);
                }
            }
        }
        let details = fetched?;

        self.write_cache(
            &cache_name,
            &PrDetailsCache { fetched_at: chrono::Utc::now(), details: details.clone() },
        );
        Ok(details)
    }

    fn fetch_pr_details(&self, number: u64) -> Result<CaseDetails, FetchError> {
        let pr_url = self.api_url(&format!("repos/{}/pulls/{}", self.repo, number))?;
        let pr = self.get_json(&pr_url)?;
        let body = pr
            .get("body")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        let files_url = self.api_url(&format!("repos/{}/pulls/{}/files", self.repo, number))?;
        let files: Vec<PrFile> = serde_json::from_value(self.get_json(&files_url)?)
            .context("parse PR file list")?;

        let diff_text = match pr.get("diff_url").and_then(|v| v.as_str()) {
            Some(diff_url) => self.get(diff_url)?.text()?,
            None => String::new(),
        };

        Ok(CaseDetails { body, files, diff_text })
    }

    /// Resolve the repo's default branch and the full list of blob paths.
    pub fn repo_tree(&self) -> Result<(Vec<String>, String), FetchError> {
        let meta = self.get_json(&self.api_url(&format!("repos/{}", self.repo))?)?;
        let default_branch = meta
            .get("default_branch")
            .and_then(|v| v.as_str())
            .unwrap_or("main")
            .to_string();

        let tree_url = self.api_url(&format!(
            "repos/{}/git/trees/{}?recursive=1",
            self.repo, default_branch
        ))?;
        let tree = self.get_json(&tree_url)?;
        let paths = tree
            .get("tree")
            .and_then(|v| v.as_array())
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| e.get("type").and_then(|t| t.as_str()) == Some("blob"))
                    .filter_map(|e| e.get("path").and_then(|p| p.as_str()))
                    .map(|p| p.to_string())
                    .collect()
            })
            .unwrap_or_default();
        Ok((paths, default_branch))
    }

    /// Raw file content at `branch`, cached under a content-address of the URL.
    pub fn raw_file(&self, branch: &str, path: &str) -> Result<String, FetchError> {
        let url = format!("https://raw.githubusercontent.com/{}/{}/{}", self.repo, branch, path);
        let digest = Sha1::digest(url.as_bytes());
        let key: String = digest.iter().map(|b| format!("{b:02x}")).collect();
        let cache_name = format!("raw_{key}.txt");

        if !self.force_fetch {
            if let Ok(text) = std::fs::read_to_string(self.cache_dir.join(&cache_name)) {
                return Ok(text);
            }
        }

        let text = self.get(&url)?.text()?;
        let _ = std::fs::write(self.cache_dir.join(&cache_name), &text);
        Ok(text)
    }
}
