//! Rename planning and execution
//!
//! Derives the canonical `<Show> SxxEyy <Title>.<ext>` filename for every
//! enriched episode and either previews (dry run) or performs the moves.
//! All moves happen within the episode's own season directory.

use crate::enricher::{EnrichedEpisode, EnrichedSeason, EnrichedShow};
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// Characters that are illegal in filenames on common filesystems. They are
/// removed from episode titles, never substituted.
const ILLEGAL_PATH_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Errors that can occur while renaming episode files
#[derive(Debug, Error)]
pub enum RenameError {
    /// An episode file has no extension
    #[error("missing file extension for {0}")]
    MissingExtension(PathBuf),

    /// A computed target path already exists on disk; renaming would
    /// silently overwrite it, so the run is aborted instead
    #[error("target already exists, not overwriting: {to} (while renaming {from})")]
    TargetExists { from: PathBuf, to: PathBuf },

    /// Moving a file failed; the remaining run is aborted, already-performed
    /// moves are not rolled back
    #[error("failed to rename {from} -> {to}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

/// Renames every episode of the show to its canonical filename.
///
/// Processes seasons and episodes in order. Episodes already carrying their
/// canonical name are skipped and not counted, so running twice over the
/// same tree renames nothing the second time. With `dry_run` set, the full
/// plan is computed and logged but no file is moved.
///
/// Returns the number of files renamed (or, in a dry run, that would have
/// been renamed).
pub fn run(show: &EnrichedShow, dry_run: bool) -> Result<usize, RenameError> {
    let mut rename_count = 0;

    for season in &show.seasons {
        info!(
            "processing season {} ({} episode(s))",
            season.number,
            season.episodes.len()
        );

        for episode in &season.episodes {
            let target = target_path(show, season, episode)?;
            if episode.file == target {
                continue;
            }

            info!(
                "renaming: {} -> {}",
                episode.file.display(),
                target.display()
            );
            rename_count += 1;

            if !dry_run {
                // fs::rename silently replaces an existing destination on
                // Linux; refuse instead so a colliding target (e.g. a
                // sibling episode already carrying that name) is never
                // destroyed.
                let target_exists =
                    target.try_exists().map_err(|e| RenameError::Rename {
                        from: episode.file.clone(),
                        to: target.clone(),
                        source: e,
                    })?;
                if target_exists {
                    return Err(RenameError::TargetExists {
                        from: episode.file.clone(),
                        to: target,
                    });
                }
                fs::rename(&episode.file, &target).map_err(|e| RenameError::Rename {
                    from: episode.file.clone(),
                    to: target.clone(),
                    source: e,
                })?;
            }
        }
    }

    info!("renamed {rename_count} file(s)");
    if dry_run {
        info!("dry run, no files were moved. Please check the above output");
    }

    Ok(rename_count)
}

/// Computes the canonical target path for an episode, next to its current
/// file.
///
/// Season and episode numbers are zero-padded to two digits; numbers of
/// three or more digits render at natural width (documented limitation).
/// The title segment is omitted entirely for episodes without a resolved
/// title.
fn target_path(
    show: &EnrichedShow,
    season: &EnrichedSeason,
    episode: &EnrichedEpisode,
) -> Result<PathBuf, RenameError> {
    let extension = episode
        .file
        .extension()
        .and_then(OsStr::to_str)
        .ok_or_else(|| RenameError::MissingExtension(episode.file.clone()))?;

    let title_segment = episode
        .title
        .as_deref()
        .map(|title| format!(" {}", strip_illegal_chars(title)))
        .unwrap_or_default();

    let file_name = format!(
        "{} S{:02}E{:02}{}.{}",
        show.name, season.number, episode.number, title_segment, extension
    );

    Ok(episode.file.with_file_name(file_name))
}

/// Removes every illegal path character from a title.
fn strip_illegal_chars(title: &str) -> String {
    title
        .chars()
        .filter(|c| !ILLEGAL_PATH_CHARS.contains(c))
        .collect()
}
