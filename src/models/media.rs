//! Media-related data models.

use serde::{Deserialize, Serialize};

/// Which backend a request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Series,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Movie => write!(f, "movie"),
            MediaKind::Series => write!(f, "series"),
        }
    }
}

/// A season of a series, as reported by the series backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub season_number: u32,
    #[serde(default)]
    pub monitored: bool,
}

impl Season {
    /// Season 0 holds specials.
    pub fn is_special(&self) -> bool {
        self.season_number == 0
    }
}

/// A title returned by a backend lookup.
///
/// `external_id` is the TMDB id for movies and the TVDB id for series.
/// Images are passed back to the backend untouched when adding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub external_id: u64,
    pub title: String,
    pub year: Option<u16>,
    pub title_slug: String,
    pub overview: Option<String>,
    pub images: Vec<serde_json::Value>,
    pub seasons: Vec<Season>,
}

impl Candidate {
    /// Title with year, e.g. `Inception (2010)`.
    pub fn display_name(&self) -> String {
        match self.year {
            Some(year) if year > 0 => format!("{} ({})", self.title, year),
            _ => self.title.clone(),
        }
    }
}

/// Which seasons of a series get monitored.
///
/// The serialized form is the literal the series backend expects in
/// `addOptions.monitor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SeasonPolicy {
    All,
    FirstSeason,
    LastSeason,
}

impl SeasonPolicy {
    pub const ALL: [SeasonPolicy; 3] = [
        SeasonPolicy::All,
        SeasonPolicy::FirstSeason,
        SeasonPolicy::LastSeason,
    ];

    /// Backend monitor directive.
    pub fn as_monitor(&self) -> &'static str {
        match self {
            SeasonPolicy::All => "all",
            SeasonPolicy::FirstSeason => "firstSeason",
            SeasonPolicy::LastSeason => "lastSeason",
        }
    }

    /// Human label for prompts.
    pub fn label(&self) -> &'static str {
        match self {
            SeasonPolicy::All => "All seasons",
            SeasonPolicy::FirstSeason => "First season",
            SeasonPolicy::LastSeason => "Latest season",
        }
    }

    /// Parse user input: the monitor literal, a short alias or a 1-based menu number.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "1" | "all" => Some(SeasonPolicy::All),
            "2" | "first" | "firstseason" => Some(SeasonPolicy::FirstSeason),
            "3" | "last" | "latest" | "lastseason" => Some(SeasonPolicy::LastSeason),
            _ => None,
        }
    }

    /// Mark seasons monitored according to this policy.
    ///
    /// Specials are never monitored. `LastSeason` picks the highest
    /// numbered regular season, regardless of input order.
    pub fn apply(&self, seasons: &[Season]) -> Vec<Season> {
        let last = seasons
            .iter()
            .filter(|s| !s.is_special())
            .map(|s| s.season_number)
            .max();

        seasons
            .iter()
            .map(|s| {
                let monitored = !s.is_special()
                    && match self {
                        SeasonPolicy::All => true,
                        SeasonPolicy::FirstSeason => s.season_number == 1,
                        SeasonPolicy::LastSeason => Some(s.season_number) == last,
                    };
                Season {
                    season_number: s.season_number,
                    monitored,
                }
            })
            .collect()
    }
}

impl std::fmt::Display for SeasonPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_monitor())
    }
}

/// State of a candidate in a backend library, with the backend's internal id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistingEntryState {
    Absent,
    PresentComplete { id: u64 },
    PresentIncomplete { id: u64 },
}

impl ExistingEntryState {
    pub fn internal_id(&self) -> Option<u64> {
        match self {
            ExistingEntryState::Absent => None,
            ExistingEntryState::PresentComplete { id }
            | ExistingEntryState::PresentIncomplete { id } => Some(*id),
        }
    }
}

/// Result of reconciling a candidate against a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    AlreadyComplete,
    ResearchTriggered,
    Added,
    Failed(String),
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::AlreadyComplete => write!(f, "already complete"),
            Outcome::ResearchTriggered => write!(f, "re-search triggered"),
            Outcome::Added => write!(f, "added"),
            Outcome::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}
