//! The Movie Database metadata provider implementation.
//!
//! Uses TMDB API v3: https://developer.themoviedb.org/docs

use super::tmdb_types::{TvSeasonDetailsResponse, TvShowSearchResponse, TvShowSearchResult};
use super::{MetadataError, MetadataProvider};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::{debug, info, warn};

const BASE_URL: &str = "https://api.themoviedb.org/3";

/// Metadata provider for The Movie Database.
///
/// Resolves the show id once per `(show name, show year)` via the search
/// endpoint, then fetches episode titles per season. The id resolution is
/// cached for the lifetime of the provider and coalesces concurrent
/// lookups of the same show onto a single remote call.
pub struct TmdbProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    id_cache: ShowIdCache,
}

impl TmdbProvider {
    /// Creates a new TMDB provider using the given API key.
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: BASE_URL.to_string(),
            api_key,
            id_cache: ShowIdCache::default(),
        }
    }

    /// Performs a GET request against the API and decodes the JSON response.
    ///
    /// The API key is sent as a query parameter and never becomes part of
    /// the endpoint string used in logs and error messages.
    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, MetadataError> {
        let endpoint = format!("{}{path}", self.base_url);
        debug!("TMDB request: {endpoint}");

        let mut all_params = vec![("api_key", self.api_key.as_str())];
        all_params.extend_from_slice(params);

        let response = self
            .client
            .get(&endpoint)
            .query(&all_params)
            .send()
            .map_err(|e| MetadataError::Request {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MetadataError::Request {
                endpoint,
                reason: format!(
                    "HTTP {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            });
        }

        response.json().map_err(|e| MetadataError::Parse {
            endpoint,
            reason: e.to_string(),
        })
    }

    fn resolve_show_id(&self, show_name: &str, show_year: u16) -> Result<u64, MetadataError> {
        debug!("resolving show id for {show_name} ({show_year})");

        let year = show_year.to_string();
        let response: TvShowSearchResponse = self.get_json(
            "/search/tv",
            &[("query", show_name), ("first_air_date_year", year.as_str())],
        )?;

        pick_search_result(show_name, show_year, response.results)
    }
}

impl MetadataProvider for TmdbProvider {
    fn episode_titles(
        &self,
        show_name: &str,
        show_year: u16,
        season: u32,
    ) -> Result<HashMap<u32, String>, MetadataError> {
        debug!("episode_titles(show_name={show_name}, show_year={show_year}, season={season})");

        let show_id = self
            .id_cache
            .get_or_resolve(show_name, show_year, || {
                self.resolve_show_id(show_name, show_year)
            })?;

        let response: TvSeasonDetailsResponse =
            self.get_json(&format!("/tv/{show_id}/season/{season}"), &[])?;

        Ok(response
            .episodes
            .into_iter()
            .map(|episode| (episode.episode_number, episode.name))
            .collect())
    }
}

/// Picks the show id out of a list of search results.
///
/// An empty list is fatal. Multiple results are not: the first result as
/// returned by the API is used deterministically and a warning is logged,
/// so repeated runs always resolve the same show.
fn pick_search_result(
    show_name: &str,
    show_year: u16,
    results: Vec<TvShowSearchResult>,
) -> Result<u64, MetadataError> {
    if results.is_empty() {
        return Err(MetadataError::NoMatchFound {
            show_name: show_name.to_string(),
            show_year,
        });
    }

    if results.len() > 1 {
        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        warn!(
            "{} search results for {show_name} ({show_year}), taking the first one: {names:?}",
            results.len()
        );
    }

    let result = &results[0];
    info!(
        "using data for show: {}. First aired: {}. Overview: {}",
        result.name,
        result.first_air_date.as_deref().unwrap_or("unknown"),
        result.overview.as_deref().unwrap_or("")
    );
    Ok(result.id)
}

/// Per-run cache of resolved show ids, keyed by `(show name, show year)`.
///
/// Guarantees at most one in-flight resolution per key: the first caller
/// runs the resolver inside the key's `OnceLock`, concurrent callers for
/// the same key block on it and share the stored result, success or
/// failure. The outer mutex is only held while looking up the cell, never
/// during resolution.
#[derive(Default)]
struct ShowIdCache {
    entries: Mutex<HashMap<(String, u16), Arc<OnceLock<Result<u64, MetadataError>>>>>,
}

impl ShowIdCache {
    fn get_or_resolve(
        &self,
        show_name: &str,
        show_year: u16,
        resolve: impl FnOnce() -> Result<u64, MetadataError>,
    ) -> Result<u64, MetadataError> {
        let cell = {
            let mut entries = self.entries.lock().expect("show id cache lock poisoned");
            entries
                .entry((show_name.to_string(), show_year))
                .or_default()
                .clone()
        };

        cell.get_or_init(resolve).clone()
    }
}
