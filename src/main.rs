use anyhow::Result;
use clap::{Parser, Subcommand};

use patchscore::cmd;

#[derive(Parser)]
#[command(name = "patchscore", version, about = "Score LLM-generated patches against merged fixes", long_about = None, disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a generated unified diff against the actual one
    Score {
        /// Path to the generated diff
        generated: String,
        /// Path to the actual (merged) diff
        actual: String,
        /// Print the component breakdown as JSON
        #[arg(long)]
        json: bool,
    },
    /// Save and inspect your GitHub token and OpenAI key
    Auth {
        /// Store an OpenAI API key in the local config
        #[arg(long)]
        set_openai_key: bool,
        /// Remove the stored OpenAI API key
        #[arg(long)]
        unset_openai_key: bool,
    },
    /// Evaluate generated patches against merged PRs of the configured repo
    Evaluate {
        /// Project directory holding patchscore.yaml
        #[arg(long, default_value = ".")]
        cwd: String,
        /// Directory for per-case artifacts and run metrics
        #[arg(long, default_value = "results")]
        results_dir: String,
        /// Model override (default: patchscore.yaml)
        #[arg(long)]
        model: Option<String>,
        /// How many merged PRs to evaluate
        #[arg(long)]
        num_cases: Option<usize>,
        /// Comma-separated PR numbers to evaluate (e.g. 123,456)
        #[arg(long)]
        cases: Option<String>,
        /// Enable debug logging to a .logs file
        #[arg(long)]
        debug: bool,
    },
    /// Run a provider preflight for the configured or given model
    Check {
        /// Project directory holding patchscore.yaml
        #[arg(long, default_value = ".")]
        cwd: String,
        /// Model to check (default: patchscore.yaml)
        #[arg(long)]
        model: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Score { generated, actual, json } => cmd::score::handle_score(generated, actual, json),
        Commands::Auth { set_openai_key, unset_openai_key } => cmd::auth::handle_auth(set_openai_key, unset_openai_key),
        Commands::Evaluate { cwd, results_dir, model, num_cases, cases, debug } => {
            cmd::evaluate::handle_evaluate(cwd, results_dir, model, num_cases, cases, debug)
        }
        Commands::Check { cwd, model } => cmd::evaluate::check_evaluate(cwd, model),
    }
}
