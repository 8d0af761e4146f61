// crates/openprodoc-mcp/src/main.rs
// openprodoc-mcp - OpenProdoc document management over MCP

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use openprodoc::config::EnvConfig;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Install the global subscriber. stdout is the MCP channel, so logs go to
/// stderr or to OPENPRODOC_LOG_FILE.
fn init_logging(default_level: Level, env_config: &EnvConfig) -> Result<()> {
    let level = env_config
        .log_level
        .as_deref()
        .and_then(|l| l.parse::<Level>().ok())
        .unwrap_or(default_level);

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_ansi(false);

    match &env_config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let subscriber = builder.with_writer(Mutex::new(file)).finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        None => {
            let subscriber = builder.with_writer(std::io::stderr).finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env files. Already-set variables are kept, so the project file
    // beats the global one and the real environment beats both.
    let _ = dotenvy::dotenv();
    if let Some(home) = dirs::home_dir() {
        let _ = dotenvy::from_path(home.join(".openprodoc/.env"));
    }

    let cli = Cli::parse();

    let log_level = match &cli.command {
        Some(Commands::Serve) | None => Level::WARN, // Quiet for MCP stdio
        Some(Commands::Tool { .. }) | Some(Commands::Config) => Level::INFO,
    };

    let env_config = EnvConfig::load();
    init_logging(log_level, &env_config)?;
    env_config.log_loaded();

    match cli.command {
        None | Some(Commands::Serve) => {
            cli::run_mcp_server(env_config).await?;
        }
        Some(Commands::Tool { name, args }) => {
            cli::run_tool(env_config, name, args).await?;
        }
        Some(Commands::Config) => {
            cli::run_config_check(&env_config)?;
        }
    }

    Ok(())
}
