//! Reconciliation engine.
//!
//! Decides whether a chosen candidate is added, re-searched or left
//! alone, and performs at most one mutating call:
//! - movie: complete -> nothing, incomplete -> search, absent -> add
//! - series: present (complete or not) -> search, absent -> add
//!
//! Existence is always checked first, so repeating a request re-searches
//! instead of adding a duplicate. Errors never escape; they become
//! `Outcome::Failed` after being logged.

use crate::models::media::{Candidate, ExistingEntryState, MediaKind, Outcome, SeasonPolicy};
use crate::services::Backend;
use crate::Error;

/// Reconcile `candidate` against `backend`.
pub async fn reconcile(
    backend: &dyn Backend,
    candidate: &Candidate,
    policy: Option<SeasonPolicy>,
) -> Outcome {
    let kind = backend.kind();

    let state = match backend.find_existing(candidate).await {
        Ok(state) => state,
        Err(e) => return failed(kind, candidate, "find existing", e),
    };
    tracing::debug!("{} {} is {:?}", kind, candidate.display_name(), state);

    match (kind, state) {
        (MediaKind::Movie, ExistingEntryState::PresentComplete { .. }) => {
            tracing::info!("Movie {} already downloaded", candidate.display_name());
            Outcome::AlreadyComplete
        }
        (_, ExistingEntryState::PresentComplete { id } | ExistingEntryState::PresentIncomplete { id }) => {
            match backend.trigger_search(id).await {
                Ok(()) => Outcome::ResearchTriggered,
                Err(e) => failed(kind, candidate, "trigger search", e),
            }
        }
        (_, ExistingEntryState::Absent) => match backend.add_entry(candidate, policy).await {
            Ok(()) => Outcome::Added,
            Err(e) => failed(kind, candidate, "add entry", e),
        },
    }
}

fn failed(kind: MediaKind, candidate: &Candidate, operation: &str, err: Error) -> Outcome {
    tracing::error!(
        "Reconcile {} '{}' (external id {}): {} failed: {}",
        kind,
        candidate.title,
        candidate.external_id,
        operation,
        err
    );
    Outcome::Failed(err.to_string())
}
