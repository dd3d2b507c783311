use anyhow::{Context, ensure};
use clap::Parser;
use std::path::PathBuf;
use std::process;
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tvtidy::{ShowRenamer, TmdbProvider};

/// Rename TV show episode files to "Show SxxEyy Title.ext" using
/// The Movie Database.
///
/// Processes one show at a time rather than a whole library. Some shows
/// require manual intervention (e.g. joint episodes) which can't really be
/// automated, so reprocessing everything would mess up the data.
#[derive(Debug, Parser)]
#[command(name = "tvtidy", version)]
struct Cli {
    /// Path to the show root directory, e.g. "Breaking Bad (2008)"
    show_dir: PathBuf,

    /// Compute and log the rename plan without moving any files
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let started = Instant::now();

    match run(&cli) {
        Ok(rename_count) => {
            info!("renamed {rename_count} file(s)");
            info!("elapsed: {:.2?}", started.elapsed());
        }
        Err(e) => {
            error!("fatal error: {e:#}");
            info!("elapsed: {:.2?}", started.elapsed());
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<usize> {
    let api_key = std::env::var("TMDB_API_KEY").context("TMDB_API_KEY not set")?;
    ensure!(!api_key.trim().is_empty(), "TMDB_API_KEY is blank");

    info!(
        "running - show_dir={}, dry_run={}",
        cli.show_dir.display(),
        cli.dry_run
    );

    let renamer = ShowRenamer::new(TmdbProvider::new(api_key));
    Ok(renamer.run(&cli.show_dir, cli.dry_run)?)
}
