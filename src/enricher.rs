//! Metadata enrichment for parsed shows
//!
//! Combines a parsed [`Show`] with episode titles from a
//! [`MetadataProvider`], producing an [`EnrichedShow`] where every episode
//! optionally carries a resolved title. Seasons are looked up concurrently;
//! the provider's show-id cache makes same-show resolutions coalesce onto a
//! single remote call.

use crate::metadata_retrieval::{MetadataError, MetadataProvider};
use crate::parser::{Season, Show};
use std::path::PathBuf;
use std::thread;
use tracing::{debug, info, warn};

/// An episode with its optionally resolved title.
///
/// `title: None` means the remote source had no title for this episode
/// number. That is a valid terminal state, not an error; the rename step
/// simply omits the title segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedEpisode {
    /// The 1-based episode number
    pub number: u32,
    /// The video file
    pub file: PathBuf,
    /// The resolved episode title, if any
    pub title: Option<String>,
}

/// A season whose episodes have been through title resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedSeason {
    /// The season number
    pub number: u32,
    /// The season directory
    pub directory: PathBuf,
    /// The enriched episodes, in episode order
    pub episodes: Vec<EnrichedEpisode>,
}

/// A show whose seasons have been through title resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedShow {
    /// The show name
    pub name: String,
    /// The show's first-air year
    pub year: u16,
    /// The enriched seasons, in the parser's season order
    pub seasons: Vec<EnrichedSeason>,
}

/// Enriches parsed show data with episode titles from a metadata provider.
pub struct Enricher<P> {
    provider: P,
}

impl<P: MetadataProvider> Enricher<P> {
    /// Creates a new enricher backed by the given provider.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Enriches a [`Show`] with episode titles.
    ///
    /// Performs one provider lookup per season, all seasons concurrently.
    /// A remote/local episode count mismatch and individually missing
    /// titles only produce warnings; a provider error (notably
    /// [`MetadataError::NoMatchFound`]) aborts the whole enrichment.
    pub fn enrich(&self, show: &Show) -> Result<EnrichedShow, MetadataError> {
        info!("enriching data for show: {} ({})", show.name, show.year);

        let seasons = thread::scope(|scope| {
            let handles: Vec<_> = show
                .seasons
                .iter()
                .map(|season| scope.spawn(move || self.enrich_season(show, season)))
                .collect();

            // Joining in spawn order keeps season order deterministic.
            handles
                .into_iter()
                .map(|handle| handle.join().expect("season lookup thread panicked"))
                .collect::<Result<Vec<_>, _>>()
        })?;

        let enriched = EnrichedShow {
            name: show.name.clone(),
            year: show.year,
            seasons,
        };
        debug!("enriched show: {enriched:?}");
        Ok(enriched)
    }

    fn enrich_season(&self, show: &Show, season: &Season) -> Result<EnrichedSeason, MetadataError> {
        let titles = self
            .provider
            .episode_titles(&show.name, show.year, season.number)?;

        if titles.len() != season.episodes.len() {
            warn!(
                "provider found {} episode(s) for {} ({}) season {} but parser parsed {} episode(s)",
                titles.len(),
                show.name,
                show.year,
                season.number,
                season.episodes.len()
            );
        }

        let episodes = season
            .episodes
            .iter()
            .map(|episode| {
                let title = titles.get(&episode.number).cloned();
                if title.is_none() {
                    warn!(
                        "provider did not find an episode title for {} ({}) season {} episode {}",
                        show.name, show.year, season.number, episode.number
                    );
                }
                EnrichedEpisode {
                    number: episode.number,
                    file: episode.file.clone(),
                    title,
                }
            })
            .collect();

        Ok(EnrichedSeason {
            number: season.number,
            directory: season.directory.clone(),
            episodes,
        })
    }
}
