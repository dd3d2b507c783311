/// Traits and error types for TV show metadata retrieval.
///
/// The core pipeline only consumes the [`MetadataProvider`] contract; the
/// concrete remote client lives in a submodule and can be swapped out (or
/// faked in tests) freely.
mod tmdb;
mod tmdb_types;

pub use tmdb::TmdbProvider;

use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during metadata retrieval operations.
///
/// `Clone` is required so the provider's show-id cache can hand the same
/// failure to every caller that coalesced onto one in-flight resolution.
#[derive(Debug, Clone, Error)]
pub enum MetadataError {
    /// The remote search returned zero results for the show
    #[error("no search results for {show_name} ({show_year})")]
    NoMatchFound { show_name: String, show_year: u16 },

    /// Request to the metadata provider failed
    #[error("request to {endpoint} failed: {reason}")]
    Request { endpoint: String, reason: String },

    /// Failed to parse the provider's JSON response
    #[error("failed to parse response from {endpoint}: {reason}")]
    Parse { endpoint: String, reason: String },
}

/// Trait for providers that can resolve episode titles for a show season.
///
/// Implementations must be shareable across the enricher's per-season
/// lookup threads.
pub trait MetadataProvider: Sync {
    /// Fetches the episode titles of one season.
    ///
    /// # Arguments
    ///
    /// * `show_name` - The show name, as parsed from the show directory
    /// * `show_year` - The show's first-air year
    /// * `season` - The season number (0 for specials)
    ///
    /// # Returns
    ///
    /// A map of episode number to episode title. The map may cover fewer or
    /// more episodes than exist locally; callers must treat missing keys as
    /// "no title", not as an error.
    fn episode_titles(
        &self,
        show_name: &str,
        show_year: u16,
        season: u32,
    ) -> Result<HashMap<u32, String>, MetadataError>;
}
