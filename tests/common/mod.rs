//! Shared test fixtures: an in-memory backend that records every call.

#![allow(dead_code)]

use async_trait::async_trait;
use grabarr::models::media::{Candidate, ExistingEntryState, MediaKind, Season, SeasonPolicy};
use grabarr::services::Backend;
use grabarr::{Error, Result};
use std::sync::Mutex;

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Lookup(String),
    FindExisting(u64),
    Add(u64, Option<SeasonPolicy>),
    Search(u64),
    Delete(u64),
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        matches!(self, Call::Add(..) | Call::Search(_) | Call::Delete(_))
    }
}

/// Library id given to entries added through the mock.
pub const ADDED_ID: u64 = 900;

/// Backend double with a scripted library state.
pub struct MockBackend {
    kind: MediaKind,
    candidates: Vec<Candidate>,
    existing: Mutex<ExistingEntryState>,
    lookup_fails: bool,
    add_fails: bool,
    search_fails: bool,
    calls: Mutex<Vec<Call>>,
}

impl MockBackend {
    pub fn new(kind: MediaKind) -> Self {
        Self {
            kind,
            candidates: Vec::new(),
            existing: Mutex::new(ExistingEntryState::Absent),
            lookup_fails: false,
            add_fails: false,
            search_fails: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_candidates(mut self, candidates: Vec<Candidate>) -> Self {
        self.candidates = candidates;
        self
    }

    pub fn with_existing(self, state: ExistingEntryState) -> Self {
        *self.existing.lock().unwrap() = state;
        self
    }

    pub fn failing_lookup(mut self) -> Self {
        self.lookup_fails = true;
        self
    }

    pub fn failing_add(mut self) -> Self {
        self.add_fails = true;
        self
    }

    pub fn failing_search(mut self) -> Self {
        self.search_fails = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn rejected(operation: &str) -> Error {
    Error::BackendRejected {
        operation: operation.to_string(),
        status: 500,
    }
}

#[async_trait]
impl Backend for MockBackend {
    fn kind(&self) -> MediaKind {
        self.kind
    }

    async fn lookup(&self, term: &str) -> Result<Vec<Candidate>> {
        self.record(Call::Lookup(term.to_string()));
        if self.lookup_fails {
            return Err(Error::BackendUnavailable {
                operation: "lookup".to_string(),
                reason: "timed out".to_string(),
            });
        }
        Ok(self.candidates.clone())
    }

    async fn find_existing(&self, candidate: &Candidate) -> Result<ExistingEntryState> {
        self.record(Call::FindExisting(candidate.external_id));
        Ok(*self.existing.lock().unwrap())
    }

    async fn add_entry(&self, candidate: &Candidate, policy: Option<SeasonPolicy>) -> Result<()> {
        self.record(Call::Add(candidate.external_id, policy));
        if self.add_fails {
            return Err(rejected("add"));
        }
        *self.existing.lock().unwrap() = ExistingEntryState::PresentIncomplete { id: ADDED_ID };
        Ok(())
    }

    async fn trigger_search(&self, id: u64) -> Result<()> {
        self.record(Call::Search(id));
        if self.search_fails {
            return Err(rejected("search"));
        }
        Ok(())
    }

    async fn delete_entry(&self, id: u64) -> Result<()> {
        self.record(Call::Delete(id));
        *self.existing.lock().unwrap() = ExistingEntryState::Absent;
        Ok(())
    }
}

/// Movie candidate fixture.
pub fn movie(tmdb_id: u64, title: &str, year: u16) -> Candidate {
    Candidate {
        external_id: tmdb_id,
        title: title.to_string(),
        year: Some(year),
        title_slug: format!("{}-{}", title.to_lowercase().replace(' ', "-"), tmdb_id),
        overview: Some(format!("Overview of {}", title)),
        images: vec![serde_json::json!({"coverType": "poster", "url": "/poster.jpg"})],
        seasons: Vec::new(),
    }
}

/// Series candidate fixture with seasons 0..=seasons.
pub fn series(tvdb_id: u64, title: &str, year: u16, seasons: u32) -> Candidate {
    Candidate {
        seasons: (0..=seasons)
            .map(|n| Season {
                season_number: n,
                monitored: false,
            })
            .collect(),
        ..movie(tvdb_id, title, year)
    }
}
