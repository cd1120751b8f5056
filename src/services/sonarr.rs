//! Sonarr (series backend) client.

use super::arr::{ArrHttp, BackendDefaults};
use super::Backend;
use crate::models::media::{Candidate, ExistingEntryState, MediaKind, Season, SeasonPolicy};
use crate::models::request::MAX_CANDIDATES;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Series as returned by lookup and library endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SonarrSeries {
    #[serde(default)]
    pub id: Option<u64>,
    pub tvdb_id: u64,
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
    pub seasons: Vec<Season>,
    #[serde(default)]
    pub statistics: Option<SeriesStatistics>,
}

/// Episode counters of a library series.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesStatistics {
    #[serde(default)]
    pub episode_file_count: u32,
    #[serde(default)]
    pub episode_count: u32,
}

impl SonarrSeries {
    fn is_complete(&self) -> bool {
        self.statistics
            .as_ref()
            .map(|s| s.episode_count > 0 && s.episode_file_count >= s.episode_count)
            .unwrap_or(false)
    }
}

impl From<SonarrSeries> for Candidate {
    fn from(series: SonarrSeries) -> Self {
        let title_slug = series
            .title_slug
            .unwrap_or_else(|| series.tvdb_id.to_string());
        Candidate {
            external_id: series.tvdb_id,
            title: series.title,
            year: series.year.filter(|y| *y > 0),
            title_slug,
            overview: series.overview,
            images: series.images,
            seasons: series.seasons,
        }
    }
}

/// Body of `POST /series`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddSeries<'a> {
    title: &'a str,
    tvdb_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    year: Option<u16>,
    title_slug: &'a str,
    images: &'a [serde_json::Value],
    seasons: Vec<Season>,
    quality_profile_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    language_profile_id: Option<u32>,
    root_folder_path: &'a str,
    season_folder: bool,
    monitored: bool,
    add_options: SeriesAddOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SeriesAddOptions {
    monitor: SeasonPolicy,
    search_for_missing_episodes: bool,
}

/// Body of `POST /command` for a series search.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SeriesSearchCommand {
    name: &'static str,
    series_id: u64,
}

/// Sonarr API client.
pub struct SonarrClient {
    http: ArrHttp,
    defaults: BackendDefaults,
    language_profile_id: Option<u32>,
}

impl SonarrClient {
    /// Create a new Sonarr client.
    pub fn new(http: ArrHttp, defaults: BackendDefaults, language_profile_id: Option<u32>) -> Self {
        Self {
            http,
            defaults,
            language_profile_id,
        }
    }
}

#[async_trait]
impl Backend for SonarrClient {
    fn kind(&self) -> MediaKind {
        MediaKind::Series
    }

    async fn lookup(&self, term: &str) -> Result<Vec<Candidate>> {
        let path = format!("series/lookup?term={}", urlencoding::encode(term));
        let series: Vec<SonarrSeries> = self.http.get_json("series lookup", &path).await?;
        tracing::debug!("Series lookup '{}' returned {} results", term, series.len());

        Ok(series
            .into_iter()
            .take(MAX_CANDIDATES)
            .map(Candidate::from)
            .collect())
    }

    /// Scans the whole library in one call; the series endpoint has no
    /// filter by TVDB id.
    async fn find_existing(&self, candidate: &Candidate) -> Result<ExistingEntryState> {
        let library: Vec<SonarrSeries> = self.http.get_json("list series", "series").await?;
        tracing::debug!("Scanning {} library series for tvdb {}", library.len(), candidate.external_id);

        let existing = library
            .into_iter()
            .find(|s| s.tvdb_id == candidate.external_id && s.id.unwrap_or(0) > 0);

        Ok(match existing {
            None => ExistingEntryState::Absent,
            Some(series) => {
                let id = series.id.unwrap_or_default();
                if series.is_complete() {
                    ExistingEntryState::PresentComplete { id }
                } else {
                    ExistingEntryState::PresentIncomplete { id }
                }
            }
        })
    }

    /// Without a policy every season is monitored.
    async fn add_entry(&self, candidate: &Candidate, policy: Option<SeasonPolicy>) -> Result<()> {
        let policy = policy.unwrap_or(SeasonPolicy::All);
        let body = AddSeries {
            title: &candidate.title,
            tvdb_id: candidate.external_id,
            year: candidate.year,
            title_slug: &candidate.title_slug,
            images: &candidate.images,
            seasons: policy.apply(&candidate.seasons),
            quality_profile_id: self.defaults.quality_profile_id,
            language_profile_id: self.language_profile_id,
            root_folder_path: &self.defaults.root_folder_path,
            season_folder: true,
            monitored: true,
            add_options: SeriesAddOptions {
                monitor: policy,
                search_for_missing_episodes: true,
            },
        };
        self.http.post_json("add series", "series", &body).await?;
        tracing::info!(
            "Added series {} (tvdb {}) monitoring {}",
            candidate.display_name(),
            candidate.external_id,
            policy
        );
        Ok(())
    }

    async fn trigger_search(&self, id: u64) -> Result<()> {
        let command = SeriesSearchCommand {
            name: "SeriesSearch",
            series_id: id,
        };
        self.http.post_json("series search", "command", &command).await?;
        tracing::info!("Triggered search for series {}", id);
        Ok(())
    }

    async fn delete_entry(&self, id: u64) -> Result<()> {
        let path = format!("series/{}?deleteFiles=false", id);
        self.http.delete("delete series", &path).await?;
        tracing::info!("Deleted series {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(json: &str) -> SonarrSeries {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_completeness_from_statistics() {
        let complete = series(
            r#"{"id": 3, "tvdbId": 78874, "title": "Firefly",
                "statistics": {"episodeFileCount": 14, "episodeCount": 14}}"#,
        );
        assert!(complete.is_complete());

        let partial = series(
            r#"{"id": 3, "tvdbId": 78874, "title": "Firefly",
                "statistics": {"episodeFileCount": 2, "episodeCount": 14}}"#,
        );
        assert!(!partial.is_complete());

        let empty = series(r#"{"id": 3, "tvdbId": 78874, "title": "Firefly"}"#);
        assert!(!empty.is_complete());
    }

    #[test]
    fn test_lookup_item_keeps_seasons() {
        let candidate = Candidate::from(series(
            r#"{"tvdbId": 78874, "title": "Firefly", "year": 2002,
                "titleSlug": "firefly",
                "seasons": [{"seasonNumber": 0, "monitored": false},
                            {"seasonNumber": 1, "monitored": true}]}"#,
        ));
        assert_eq!(candidate.external_id, 78874);
        assert_eq!(candidate.seasons.len(), 2);
        assert!(candidate.seasons[0].is_special());
    }
}
