//! tvtidy - Rename TV show episode files to a canonical form
//!
//! This library parses a show directory laid out as
//! `<Show Name> (<Year>)/Season <NN>/<video files>`, resolves episode
//! titles from The Movie Database, and renames every episode file to
//! `<Show Name> SxxEyy <Episode Title>.<ext>`.

mod enricher;
mod metadata_retrieval;
mod parser;
mod rename;

use std::path::Path;
use thiserror::Error;
use tracing::info;

// Re-export error types
pub use metadata_retrieval::MetadataError;
pub use parser::ParseError;
pub use rename::RenameError;

// Re-export the pipeline building blocks for library users
pub use enricher::{EnrichedEpisode, EnrichedSeason, EnrichedShow, Enricher};
pub use metadata_retrieval::{MetadataProvider, TmdbProvider};
pub use parser::{Episode, Season, Show, parse};
pub use rename::run as rename_episodes;

/// Top-level error type for a renamer run
#[derive(Debug, Error)]
pub enum RenamerError {
    /// The show directory structure is malformed
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Metadata retrieval failed
    #[error("metadata retrieval error: {0}")]
    Metadata(#[from] MetadataError),

    /// Renaming a file failed
    #[error("rename error: {0}")]
    Rename(#[from] RenameError),
}

/// The full parse -> enrich -> rename pipeline behind one entry point.
///
/// Construct it with a [`MetadataProvider`] (normally [`TmdbProvider`]) and
/// call [`ShowRenamer::run`] once per show directory.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use tvtidy::{ShowRenamer, TmdbProvider};
///
/// let renamer = ShowRenamer::new(TmdbProvider::new("api-key".to_string()));
///
/// // Preview the plan first...
/// let planned = renamer.run(Path::new("/media/Breaking Bad (2008)"), true).unwrap();
/// println!("{planned} file(s) would be renamed");
///
/// // ...then commit.
/// renamer.run(Path::new("/media/Breaking Bad (2008)"), false).unwrap();
/// ```
pub struct ShowRenamer<P> {
    enricher: Enricher<P>,
}

impl<P: MetadataProvider> ShowRenamer<P> {
    /// Creates a renamer backed by the given metadata provider.
    pub fn new(provider: P) -> Self {
        Self {
            enricher: Enricher::new(provider),
        }
    }

    /// Parses the show directory, enriches it with episode titles and
    /// renames the episode files.
    ///
    /// With `dry_run` set, the full rename plan is computed and logged but
    /// the filesystem is left untouched. Any fatal error (malformed
    /// directory structure, unresolvable show, transport failure, failed
    /// move) aborts the run; files already moved before a mid-run failure
    /// are not rolled back, which is why dry-run-first usage is
    /// recommended.
    ///
    /// Returns the number of files renamed (or that would be renamed).
    pub fn run(&self, show_dir: &Path, dry_run: bool) -> Result<usize, RenamerError> {
        let show = parser::parse(show_dir)?;
        let enriched = self.enricher.enrich(&show)?;
        let rename_count = rename::run(&enriched, dry_run)?;

        info!("run complete, {rename_count} rename(s)");
        Ok(rename_count)
    }
}
