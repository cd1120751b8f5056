//! Radarr (movie backend) client.

use super::arr::{ArrHttp, BackendDefaults};
use super::Backend;
use crate::models::media::{Candidate, ExistingEntryState, MediaKind, SeasonPolicy};
use crate::models::request::MAX_CANDIDATES;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Movie as returned by lookup and library endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarrMovie {
    /// Library id, absent or zero for lookup results not yet added.
    #[serde(default)]
    pub id: Option<u64>,
    pub tmdb_id: u64,
    pub title: String,
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub title_slug: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub images: Vec<serde_json::Value>,
    #[serde(default)]
    pub has_file: bool,
}

impl From<RadarrMovie> for Candidate {
    fn from(movie: RadarrMovie) -> Self {
        let title_slug = movie
            .title_slug
            .unwrap_or_else(|| movie.tmdb_id.to_string());
        Candidate {
            external_id: movie.tmdb_id,
            title: movie.title,
            year: movie.year.filter(|y| *y > 0),
            title_slug,
            overview: movie.overview,
            images: movie.images,
            seasons: Vec::new(),
        }
    }
}

/// Body of `POST /movie`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddMovie<'a> {
    title: &'a str,
    tmdb_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    year: Option<u16>,
    title_slug: &'a str,
    images: &'a [serde_json::Value],
    quality_profile_id: u32,
    root_folder_path: &'a str,
    monitored: bool,
    minimum_availability: &'a str,
    add_options: MovieAddOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MovieAddOptions {
    search_for_movie: bool,
}

/// Body of `POST /command` for a movie search.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MoviesSearchCommand {
    name: &'static str,
    movie_ids: Vec<u64>,
}

/// Radarr API client.
pub struct RadarrClient {
    http: ArrHttp,
    defaults: BackendDefaults,
    minimum_availability: String,
}

impl RadarrClient {
    /// Create a new Radarr client.
    pub fn new(http: ArrHttp, defaults: BackendDefaults, minimum_availability: &str) -> Self {
        Self {
            http,
            defaults,
            minimum_availability: minimum_availability.to_string(),
        }
    }
}

#[async_trait]
impl Backend for RadarrClient {
    fn kind(&self) -> MediaKind {
        MediaKind::Movie
    }

    async fn lookup(&self, term: &str) -> Result<Vec<Candidate>> {
        let path = format!("movie/lookup?term={}", urlencoding::encode(term));
        let movies: Vec<RadarrMovie> = self.http.get_json("movie lookup", &path).await?;
        tracing::debug!("Movie lookup '{}' returned {} results", term, movies.len());

        Ok(movies
            .into_iter()
            .take(MAX_CANDIDATES)
            .map(Candidate::from)
            .collect())
    }

    async fn find_existing(&self, candidate: &Candidate) -> Result<ExistingEntryState> {
        let path = format!("movie?tmdbId={}", candidate.external_id);
        let movies: Vec<RadarrMovie> = self.http.get_json("movie by tmdb id", &path).await?;

        let existing = movies
            .into_iter()
            .find(|m| m.tmdb_id == candidate.external_id && m.id.unwrap_or(0) > 0);

        Ok(match existing {
            None => ExistingEntryState::Absent,
            Some(movie) => {
                let id = movie.id.unwrap_or_default();
                if movie.has_file {
                    ExistingEntryState::PresentComplete { id }
                } else {
                    ExistingEntryState::PresentIncomplete { id }
                }
            }
        })
    }

    async fn add_entry(&self, candidate: &Candidate, _policy: Option<SeasonPolicy>) -> Result<()> {
        let body = AddMovie {
            title: &candidate.title,
            tmdb_id: candidate.external_id,
            year: candidate.year,
            title_slug: &candidate.title_slug,
            images: &candidate.images,
            quality_profile_id: self.defaults.quality_profile_id,
            root_folder_path: &self.defaults.root_folder_path,
            monitored: true,
            minimum_availability: &self.minimum_availability,
            add_options: MovieAddOptions {
                search_for_movie: true,
            },
        };
        self.http.post_json("add movie", "movie", &body).await?;
        tracing::info!("Added movie {} (tmdb {})", candidate.display_name(), candidate.external_id);
        Ok(())
    }

    async fn trigger_search(&self, id: u64) -> Result<()> {
        let command = MoviesSearchCommand {
            name: "MoviesSearch",
            movie_ids: vec![id],
        };
        self.http.post_json("movie search", "command", &command).await?;
        tracing::info!("Triggered search for movie {}", id);
        Ok(())
    }

    async fn delete_entry(&self, id: u64) -> Result<()> {
        let path = format!("movie/{}?deleteFiles=false", id);
        self.http.delete("delete movie", &path).await?;
        tracing::info!("Deleted movie {}", id);
        Ok(())
    }
}
