//! Directory parser for TV show folders
//!
//! Builds the [`Show`] model from a show root directory laid out as
//! `<Show Name> (<Year>)/Season <NN>/<video files>`. Episode numbers are
//! assigned purely by the sorted position of the video files within each
//! season directory; no numbers are ever parsed out of filenames.

use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, info};

static SHOW_DIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?) \((\d{4})\)$").unwrap());

static SEASON_DIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Season (\d{2})$").unwrap());

/// Recognized video file extensions. Anything else in a season directory is
/// ignored (subtitles, artwork, samples, ...).
static VIDEO_FILE_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi"];

/// Errors that can occur while parsing a show directory
#[derive(Debug, Error)]
pub enum ParseError {
    /// The show root path is not a directory
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    /// The show root directory name doesn't match `<Show Name> (<Year>)`
    #[error("directory name {name:?} doesn't match `<show name> (<4-digit year>)`")]
    MalformedShowDirectory { name: String },

    /// A season directory name doesn't match `Season <NN>`
    #[error("directory name {name:?} doesn't match `Season <2-digit number>`")]
    MalformedSeasonDirectory { name: String },

    /// The show root contains no season directories
    #[error("no season directories found in {0}")]
    NoSeasons(PathBuf),

    /// A season directory contains no video files
    #[error("no video files found in {0}")]
    EmptySeason(PathBuf),

    /// Failed to read a directory during the walk
    #[error("failed to read directory {path}: {source}")]
    ReadDirectory { path: PathBuf, source: io::Error },
}

/// A parsed TV show.
///
/// Invariants: `name` is non-blank, `year` is a 4-digit calendar year and
/// `seasons` is non-empty. Built once per run from a live filesystem
/// snapshot by [`parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Show {
    /// The show name, taken from the root directory name
    pub name: String,
    /// The show's first-air year, taken from the root directory name
    pub year: u16,
    /// Seasons in lexical directory-name order
    pub seasons: Vec<Season>,
}

/// A season of a parsed show.
///
/// Season numbers are keyed from the directory name, not positional, so a
/// show may skip seasons. Season 0 is legal and holds specials/bonus
/// content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Season {
    /// The season number parsed from the `Season NN` directory name
    pub number: u32,
    /// The season directory
    pub directory: PathBuf,
    /// Episodes in lexical file-name order, numbered 1..N (non-empty)
    pub episodes: Vec<Episode>,
}

/// A single episode file within a season.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    /// The 1-based episode number, assigned by sort position
    pub number: u32,
    /// The video file
    pub file: PathBuf,
}

/// Parses a show root directory into a [`Show`].
///
/// The directory must be named `<Show Name> (<Year>)` and contain one or
/// more `Season <NN>` subdirectories, each with at least one video file.
/// Non-directory entries in the root and non-video files in the seasons are
/// ignored. Any structural violation aborts the parse; there are no partial
/// results.
pub fn parse(show_dir: &Path) -> Result<Show, ParseError> {
    info!("parsing directory: {}", show_dir.display());

    if !show_dir.is_dir() {
        return Err(ParseError::NotADirectory(show_dir.to_path_buf()));
    }

    let dir_name = show_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let captures =
        SHOW_DIR_RE
            .captures(&dir_name)
            .ok_or_else(|| ParseError::MalformedShowDirectory {
                name: dir_name.clone(),
            })?;

    let name = captures[1].to_string();
    // The pattern guarantees exactly four digits.
    let year: u16 = captures[2].parse().unwrap();

    let seasons = parse_seasons(show_dir)?;
    if seasons.is_empty() {
        return Err(ParseError::NoSeasons(show_dir.to_path_buf()));
    }

    let show = Show { name, year, seasons };
    debug!("parsed show: {show:?}");
    Ok(show)
}

fn parse_seasons(show_dir: &Path) -> Result<Vec<Season>, ParseError> {
    let mut season_dirs = list_entries(show_dir)?
        .into_iter()
        .filter(|path| path.is_dir())
        .collect::<Vec<_>>();
    // read_dir order is platform-dependent; sort by name so season order is
    // deterministic (2-digit names keep lexical = numeric up to season 99).
    season_dirs.sort();
    info!("detected {} season(s)", season_dirs.len());

    season_dirs
        .into_iter()
        .map(|season_dir| {
            let dir_name = season_dir
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let captures = SEASON_DIR_RE.captures(&dir_name).ok_or_else(|| {
                ParseError::MalformedSeasonDirectory {
                    name: dir_name.clone(),
                }
            })?;
            let number: u32 = captures[1].parse().unwrap();

            let episodes = parse_episodes(&season_dir)?;
            info!("detected season {number} with {} episode(s)", episodes.len());

            Ok(Season {
                number,
                directory: season_dir,
                episodes,
            })
        })
        .collect()
}

fn parse_episodes(season_dir: &Path) -> Result<Vec<Episode>, ParseError> {
    let mut files = list_entries(season_dir)?
        .into_iter()
        .filter(|path| path.is_file() && is_video_file(path))
        .collect::<Vec<_>>();

    if files.is_empty() {
        return Err(ParseError::EmptySeason(season_dir.to_path_buf()));
    }

    // Episode numbers are assigned by sorted position. Sources named with
    // unpadded numbers ("Episode 9" vs "Episode 10") sort wrong; that is a
    // documented limitation, not something we try to fix here.
    files.sort();

    Ok(files
        .into_iter()
        .enumerate()
        .map(|(index, file)| Episode {
            number: index as u32 + 1,
            file,
        })
        .collect())
}

fn list_entries(dir: &Path) -> Result<Vec<PathBuf>, ParseError> {
    let read_dir = fs::read_dir(dir).map_err(|e| ParseError::ReadDirectory {
        path: dir.to_path_buf(),
        source: e,
    })?;

    read_dir
        .map(|entry| {
            entry
                .map(|e| e.path())
                .map_err(|e| ParseError::ReadDirectory {
                    path: dir.to_path_buf(),
                    source: e,
                })
        })
        .collect()
}

fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| VIDEO_FILE_EXTENSIONS.contains(&ext))
}
