//! Backend clients.
//!
//! The movie and series backends expose the same capabilities with
//! different wire shapes. The reconciliation engine is written once
//! against [`Backend`].

pub mod arr;
pub mod radarr;
pub mod sonarr;

use crate::models::media::{Candidate, ExistingEntryState, MediaKind, SeasonPolicy};
use crate::Result;
use async_trait::async_trait;

/// Capabilities of one media-manager backend.
///
/// Every call is a single attempt bounded by the client timeout. A
/// transport failure or timeout is `Error::BackendUnavailable`, a status
/// outside 200..400 is `Error::BackendRejected`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Which kind of media this backend manages.
    fn kind(&self) -> MediaKind;

    /// Search by free text. At most ten results, in backend order.
    async fn lookup(&self, term: &str) -> Result<Vec<Candidate>>;

    /// Check whether the candidate is already in the library.
    async fn find_existing(&self, candidate: &Candidate) -> Result<ExistingEntryState>;

    /// Add a monitored entry and ask the backend to search for it.
    async fn add_entry(&self, candidate: &Candidate, policy: Option<SeasonPolicy>) -> Result<()>;

    /// Re-search an entry that already exists.
    async fn trigger_search(&self, id: u64) -> Result<()>;

    /// Remove an entry, keeping its files on disk.
    async fn delete_entry(&self, id: u64) -> Result<()>;
}
