//! Liferaft CLI entry point

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use anyhow::Result;

use liferaft::auth::{AuthAction, InquirePrompter, JsonTokenStore, TokenInput, TokenStore, TwoFactorFlow};
use liferaft::config::{self, Config};
use liferaft::github::{Github, GithubClient};
use liferaft::ui;

#[derive(Parser)]
#[command(name = "liferaft")]
#[command(about = "🛟 Liferaft - send Liferaft pull requests to GitHub")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set your GitHub personal access token
    Auth {
        /// Your GitHub personal access token
        token: Option<String>,
    },

    /// Show Liferaft status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = config::load()?;

    match cli.command {
        Commands::Auth { token } => {
            if let Err(e) = run_auth(&config, token).await {
                ui::print_error(&e.to_string());
                return Err(e);
            }
        }

        Commands::Status => {
            run_status(&config).await?;
        }
    }

    Ok(())
}

async fn run_auth(config: &Config, token: Option<String>) -> Result<()> {
    let github = GithubClient::from_config(config)?;
    let store = JsonTokenStore::new(config.token_path());
    let action = AuthAction::new(github, store);

    match token {
        Some(token) => {
            action.execute(TokenInput::Direct(token)).await?;
        }
        None => {
            ui::print_liferaft_header("Sign in to GitHub");
            let prompter = InquirePrompter;
            TwoFactorFlow::new(&action, &prompter, config.two_factor_retries)
                .prompt_and_run()
                .await?;
        }
    }

    ui::print_success(&format!("Token saved to {:?}", action.store().path()));
    Ok(())
}

async fn run_status(config: &Config) -> Result<()> {
    let store = JsonTokenStore::new(config.token_path());

    ui::print_liferaft_header("Status");
    ui::print_step(&format!("Config: {:?}", config::config_path()));
    ui::print_step(&format!("Token file: {:?}", store.path()));
    ui::print_step(&format!("Target: {}/{}", config.target.owner, config.target.repository));

    match store.load()? {
        Some(token) => {
            let github = GithubClient::from_config(config)?.with_token(token);
            match github.username().await {
                Ok(login) => ui::print_success(&format!("GitHub token: ✓ ({})", login)),
                Err(e) => ui::print_warning(&format!("GitHub token stored but not usable: {}", e)),
            }
        }
        None => {
            ui::print_warning("GitHub token: not set (run 'liferaft auth')");
        }
    }

    Ok(())
}
