/// The Movie Database API response types for deserialization.
///
/// These structures mirror the JSON response format of TMDB API v3.
use serde::Deserialize;

/// Response from the `/search/tv` endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TvShowSearchResponse {
    /// Search results, best match first
    pub results: Vec<TvShowSearchResult>,
}

/// A single TV show search result.
#[derive(Debug, Deserialize)]
pub(super) struct TvShowSearchResult {
    /// TMDB show id
    pub id: u64,
    /// Show name
    pub name: String,
    /// First air date as `YYYY-MM-DD` (may be absent)
    #[serde(default)]
    pub first_air_date: Option<String>,
    /// Show overview (may be absent)
    #[serde(default)]
    pub overview: Option<String>,
}

/// Response from the `/tv/{id}/season/{number}` endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TvSeasonDetailsResponse {
    /// Episodes of the season
    pub episodes: Vec<TvSeasonEpisode>,
}

/// A single episode in a season details response.
#[derive(Debug, Deserialize)]
pub(super) struct TvSeasonEpisode {
    /// Episode number within the season
    pub episode_number: u32,
    /// Episode title
    pub name: String,
}
