use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use depo_application::DependencySession;
use depo_core::project::ProjectPath;
use depo_infrastructure::{ConfigService, HttpTransport, InvokeGateway};

mod commands;
mod logging;
mod render;

use commands::Command;

#[derive(Parser)]
#[command(name = "depo")]
#[command(about = "depo - edit a project's dependency manifest through its backend", long_about = None)]
struct Cli {
    /// Project directory (defaults to the current directory)
    #[arg(long, global = true)]
    project: Option<PathBuf>,

    /// Configuration file (defaults to ~/.config/depo/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_service = match cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new()?,
    };
    let config = config_service
        .get_config()
        .with_context(|| format!("loading {}", config_service.path().display()))?;

    let interactive = matches!(cli.command, Command::Shell);
    let log_guard = logging::init(&config.logging, !interactive)?;
    tracing::debug!("[depo] backend at {}", config.backend.url);

    let transport = Arc::new(HttpTransport::from_config(&config.backend));
    let gateway = Arc::new(InvokeGateway::new(transport));
    let session = Arc::new(DependencySession::new(gateway));

    if interactive {
        return commands::shell::run(session, cli.project.map(ProjectPath::from)).await;
    }

    let project = match cli.project {
        Some(dir) => ProjectPath::from(dir),
        None => ProjectPath::from(std::env::current_dir().context("reading current directory")?),
    };

    if let Err(err) = commands::run_once(&session, project, cli.command).await {
        eprintln!("{}", format!("Error: {:#}", err).red());
        drop(log_guard);
        std::process::exit(1);
    }
    Ok(())
}
