use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::io::{self, Read};

use crate::util::{
    get_openai_api_key_from_env_or_config, load_config, save_config,
    set_openai_api_key_in_config, unset_openai_api_key_in_config,
};
use owo_colors::OwoColorize;
use reqwest::blocking::Client;
use serde::Deserialize;

#[derive(Deserialize, Default)]
struct GithubUser {
    login: Option<String>,
    name: Option<String>,
}

pub fn handle_auth(set_openai_key: bool, unset_openai_key: bool) -> Result<()> {
    let ce = crate::util::color_enabled_stdout();
    // Handle OpenAI key management flags first
    if set_openai_key {
        println!("Enter your OpenAI API key (or set OPENAI_API_KEY):");
        let key = match rpassword::read_password() {
            Ok(k) => if k.trim().is_empty() { env::var("OPENAI_API_KEY").unwrap_or_default() } else { k },
            Err(_) => env::var("OPENAI_API_KEY").unwrap_or_default(),
        };
        if key.trim().is_empty() {
            bail!("OpenAI API key cannot be empty");
        }
        set_openai_api_key_in_config(&key)?;
        println!("{} OpenAI API key saved to local config.", crate::util::sym_check(ce));
        return Ok(());
    }
    if unset_openai_key {
        unset_openai_api_key_in_config()?;
        println!("{} Removed stored OpenAI API key.", crate::util::sym_check(ce));
        return Ok(());
    }

    // If we already have a token, show it masked and try to resolve identity.
    if let Ok(cfg) = load_config() {
        if let Some(token) = cfg.github_token.as_ref() {
            let masked = if token.len() > 8 { format!("{}...", &token[..8]) } else { "...".to_string() };
            println!("{} GitHub token: {}", crate::util::sym_check(ce), masked.blue().bold());
            if get_openai_api_key_from_env_or_config().is_some() {
                println!("{} OpenAI API key detected.", crate::util::sym_check(ce));
            } else {
                println!("{} No OpenAI API key detected. OpenAI patch generation needs one; Ollama does not.", crate::util::sym_question(ce));
                println!("   You can set one with: patchscore auth --set-openai-key");
            }

            if whoami(token, ce) {
                return Ok(());
            }
            println!("Token appears invalid or expired. Please enter a new one.");
        }
    }

    println!("Enter your GitHub personal access token (or set GITHUB_TOKEN):");
    let token = match rpassword::read_password() {
        Ok(t) => t,
        Err(_) => {
            if let Ok(t) = env::var("GITHUB_TOKEN") { t } else {
                let mut buf = String::new();
                io::stdin().read_to_string(&mut buf).context("Failed to read token from stdin")?;
                buf
            }
        }
    };
    if token.trim().is_empty() {
        bail!("Token cannot be empty");
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} Saving token...").unwrap());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));

    let mut cfg = load_config().unwrap_or_default();
    cfg.github_token = Some(token.trim().to_string());
    save_config(&cfg)?;

    pb.finish_with_message("Token Saved");
    println!("{} GitHub token saved.", crate::util::sym_check(ce));
    whoami(token.trim(), ce);
    Ok(())
}

/// Resolve the token's identity against the GitHub API. Best effort: any
/// network or auth problem just reports false.
fn whoami(token: &str, ce: bool) -> bool {
    if let Ok(client) = Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .user_agent(concat!("patchscore/", env!("CARGO_PKG_VERSION")))
        .build()
    {
        if let Ok(r) = client
            .get("https://api.github.com/user")
            .header("Accept", "application/vnd.github+json")
            .bearer_auth(token)
            .send()
        {
            if r.status().is_success() {
                if let Ok(user) = r.json::<GithubUser>() {
                    if let Some(login) = user.login { println!("{} Login: {}", crate::util::sym_check(ce), login); }
                    if let Some(name) = user.name { println!("{} Name: {}", crate::util::sym_check(ce), name); }
                }
                return true;
            }
        }
    }
    false
}
