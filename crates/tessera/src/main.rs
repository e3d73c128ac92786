//! Tessera CLI - theme asset build pipeline.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tessera_build::SiteSettings;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "tessera")]
#[command(about = "Theme asset build pipeline")]
#[command(version)]
pub struct Cli {
    /// Path to site.toml config file
    #[arg(short, long, default_value = "site.toml")]
    config: PathBuf,

    /// Build once and exit with a status code
    #[arg(long)]
    production: bool,

    /// Like --production, but suppress informational output
    #[arg(long)]
    silent: bool,

    /// Rebuild on source changes (the default outside production)
    #[arg(long)]
    watch: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let production = cli.production || cli.silent;

    // Initialize logging; errors always surface, even when silent.
    let filter = if cli.silent {
        EnvFilter::new("error")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    let settings = SiteSettings::load(&cli.config)?;

    if production {
        if cli.watch {
            tracing::debug!("--watch is ignored in production mode");
        }
        // Exit 0 on success; a build error propagates and exits 1.
        commands::build::run(&settings)?;
        return Ok(());
    }

    commands::watch::run(settings).await
}
