mod commands;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use jobcal_core::{JobcalConfig, SyncCoordinator};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jobcal")]
#[command(about = "Sync job schedules with external calendars over iCalendar feeds")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import events from a remote feed and remember the link
    Pull {
        account: String,

        /// Feed link, e.g. https://calendar.example.com/ical/abc/basic.ics
        url: String,
    },
    /// Publish the account's upcoming jobs as a subscribable feed
    Push { account: String },
    /// Show the stored integration for an account
    Status { account: String },
    /// Turn an account's integration off without deleting it
    Deactivate { account: String },
    /// Parse a local .ics file and list its events
    Parse { file: PathBuf },
    /// Generate a feed from a JSON file of jobs and print it
    Generate {
        jobs: PathBuf,

        /// Calendar name (defaults to the configured one)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Show config paths, creating a default config file if none exists
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = JobcalConfig::load()?;

    match cli.command {
        Commands::Pull { account, url } => {
            commands::pull::run(&coordinator(&config)?, &account, &url).await
        }
        Commands::Push { account } => commands::push::run(&coordinator(&config)?, &account).await,
        Commands::Status { account } => {
            commands::status::run(&coordinator(&config)?, &account).await
        }
        Commands::Deactivate { account } => {
            commands::deactivate::run(&coordinator(&config)?, &account).await
        }
        Commands::Parse { file } => commands::parse::run(&file),
        Commands::Generate { jobs, name } => commands::generate::run(&config, &jobs, name),
        Commands::Config => commands::config::run(&config),
    }
}

fn coordinator(config: &JobcalConfig) -> Result<SyncCoordinator> {
    Ok(SyncCoordinator::from_config(config)?)
}
