//! Request data model and its selection state machine.
//!
//! A request moves strictly forward:
//!
//! ```text
//! Searching -> Selecting -> [SeasonSelecting] -> Confirming -> Completed(outcome)
//!                                                           -> Cancelled
//! (any non-terminal) -> Expired
//! ```
//!
//! Transitions are plain method calls so the workflow can be exercised
//! without any UI or network in the loop.

use super::media::{Candidate, MediaKind, Outcome, SeasonPolicy};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Lookups never offer more than this many candidates.
pub const MAX_CANDIDATES: usize = 10;

/// Failure reason used when a lookup yields nothing.
pub const NO_MATCH: &str = "no match";

/// Request state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState {
    Searching,
    Selecting,
    SeasonSelecting,
    Confirming,
    Completed(Outcome),
    Cancelled,
    Expired,
    Failed(String),
}

impl RequestState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequestState::Completed(_)
                | RequestState::Cancelled
                | RequestState::Expired
                | RequestState::Failed(_)
        )
    }

    fn name(&self) -> &'static str {
        match self {
            RequestState::Searching => "searching",
            RequestState::Selecting => "selecting",
            RequestState::SeasonSelecting => "selecting a season policy",
            RequestState::Confirming => "confirming",
            RequestState::Completed(_) => "completed",
            RequestState::Cancelled => "cancelled",
            RequestState::Expired => "expired",
            RequestState::Failed(_) => "failed",
        }
    }
}

impl std::fmt::Display for RequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One user-initiated request.
#[derive(Debug, Clone)]
pub struct Request {
    /// Request ID, used for log correlation.
    pub id: String,
    /// Identity of the requesting user as supplied by the host UI.
    pub requester: String,
    pub kind: MediaKind,
    /// Raw query text.
    pub query: String,
    candidates: Vec<Candidate>,
    selected: Option<Candidate>,
    season_policy: Option<SeasonPolicy>,
    state: RequestState,
    pub created_at: DateTime<Utc>,
}

impl Request {
    /// Create a request in the `Searching` state.
    pub fn new(requester: impl Into<String>, kind: MediaKind, query: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            requester: requester.into(),
            kind,
            query: query.into(),
            candidates: Vec::new(),
            selected: None,
            season_policy: None,
            state: RequestState::Searching,
            created_at: Utc::now(),
        }
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Set from `Confirming` onward.
    pub fn selected(&self) -> Option<&Candidate> {
        self.selected.as_ref()
    }

    /// Set from `Confirming` onward, series only.
    pub fn season_policy(&self) -> Option<SeasonPolicy> {
        self.season_policy
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    fn invalid(&self, signal: &str) -> Error {
        Error::InvalidTransition {
            state: self.state.to_string(),
            signal: signal.to_string(),
        }
    }

    /// Store lookup results. Keeps the first `MAX_CANDIDATES` in backend
    /// order; an empty list fails the request with "no match".
    pub fn receive_candidates(&mut self, mut candidates: Vec<Candidate>) -> Result<()> {
        if self.state != RequestState::Searching {
            return Err(self.invalid("candidates"));
        }
        if candidates.is_empty() {
            self.state = RequestState::Failed(NO_MATCH.to_string());
            return Ok(());
        }
        candidates.truncate(MAX_CANDIDATES);
        self.candidates = candidates;
        self.state = RequestState::Selecting;
        Ok(())
    }

    /// Pick a candidate by index. Series continue to season selection,
    /// movies go straight to confirmation.
    pub fn choose(&mut self, index: usize) -> Result<()> {
        if self.state != RequestState::Selecting {
            return Err(self.invalid("choose"));
        }
        let candidate = self
            .candidates
            .get(index)
            .cloned()
            .ok_or(Error::SelectionOutOfRange {
                index,
                len: self.candidates.len(),
            })?;

        self.selected = Some(candidate);
        self.state = match self.kind {
            MediaKind::Movie => RequestState::Confirming,
            MediaKind::Series => RequestState::SeasonSelecting,
        };
        Ok(())
    }

    /// Record the season policy of a series request.
    pub fn choose_season(&mut self, policy: SeasonPolicy) -> Result<()> {
        if self.state != RequestState::SeasonSelecting {
            return Err(self.invalid("season"));
        }
        self.season_policy = Some(policy);
        self.state = RequestState::Confirming;
        Ok(())
    }

    /// What a confirmation would reconcile.
    pub fn confirmation(&self) -> Result<(&Candidate, Option<SeasonPolicy>)> {
        match (&self.state, &self.selected) {
            (RequestState::Confirming, Some(candidate)) => Ok((candidate, self.season_policy)),
            _ => Err(self.invalid("confirm")),
        }
    }

    /// Store the reconciliation outcome.
    pub fn complete(&mut self, outcome: Outcome) -> Result<()> {
        if self.state != RequestState::Confirming {
            return Err(self.invalid("complete"));
        }
        self.state = RequestState::Completed(outcome);
        Ok(())
    }

    /// Cancel before reconciliation starts.
    pub fn cancel(&mut self) -> Result<()> {
        if self.state != RequestState::Confirming {
            return Err(self.invalid("cancel"));
        }
        self.state = RequestState::Cancelled;
        Ok(())
    }

    /// Give up waiting. A no-op once terminal.
    pub fn expire(&mut self) {
        if !self.is_terminal() {
            self.state = RequestState::Expired;
        }
    }

    /// End the request with a failure. A no-op once terminal.
    pub fn fail(&mut self, reason: impl Into<String>) {
        if !self.is_terminal() {
            self.state = RequestState::Failed(reason.into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: u64) -> Candidate {
        Candidate {
            external_id: id,
            title: format!("Title {}", id),
            year: Some(2000 + id as u16),
            title_slug: format!("title-{}", id),
            overview: None,
            images: Vec::new(),
            seasons: Vec::new(),
        }
    }

    #[test]
    fn test_candidates_keep_order_and_cap() {
        for n in 1..=12u64 {
            let mut request = Request::new("alice", MediaKind::Movie, "q");
            request.receive_candidates((0..n).map(candidate).collect()).unwrap();

            assert_eq!(request.state(), &RequestState::Selecting);
            let ids: Vec<u64> = request.candidates().iter().map(|c| c.external_id).collect();
            let expected: Vec<u64> = (0..n.min(MAX_CANDIDATES as u64)).collect();
            assert_eq!(ids, expected);
        }
    }

    #[test]
    fn test_empty_lookup_fails_with_no_match() {
        let mut request = Request::new("alice", MediaKind::Movie, "nothing");
        request.receive_candidates(Vec::new()).unwrap();
        assert_eq!(request.state(), &RequestState::Failed(NO_MATCH.to_string()));
        assert!(request.choose(0).is_err());
    }

    #[test]
    fn test_movie_skips_season_selection() {
        let mut request = Request::new("alice", MediaKind::Movie, "q");
        request.receive_candidates(vec![candidate(1), candidate(2)]).unwrap();
        assert!(request.selected().is_none());

        request.choose(1).unwrap();
        assert_eq!(request.state(), &RequestState::Confirming);
        assert_eq!(request.selected().unwrap().external_id, 2);
        assert!(request.season_policy().is_none());
        assert!(request.choose_season(SeasonPolicy::All).is_err());
    }

    #[test]
    fn test_series_goes_through_season_selection() {
        let mut request = Request::new("bob", MediaKind::Series, "q");
        request.receive_candidates(vec![candidate(7)]).unwrap();
        request.choose(0).unwrap();
        assert_eq!(request.state(), &RequestState::SeasonSelecting);
        assert!(request.confirmation().is_err());

        request.choose_season(SeasonPolicy::LastSeason).unwrap();
        let (selected, policy) = request.confirmation().unwrap();
        assert_eq!(selected.external_id, 7);
        assert_eq!(policy, Some(SeasonPolicy::LastSeason));
    }

    #[test]
    fn test_out_of_range_choice_is_rejected() {
        let mut request = Request::new("alice", MediaKind::Movie, "q");
        request.receive_candidates(vec![candidate(1)]).unwrap();
        let err = request.choose(1).unwrap_err();
        assert!(matches!(err, Error::SelectionOutOfRange { index: 1, len: 1 }));
        assert_eq!(request.state(), &RequestState::Selecting);
    }

    #[test]
    fn test_cancel_only_while_confirming() {
        let mut request = Request::new("alice", MediaKind::Movie, "q");
        request.receive_candidates(vec![candidate(1)]).unwrap();
        assert!(request.cancel().is_err());
        request.choose(0).unwrap();
        request.cancel().unwrap();
        assert_eq!(request.state(), &RequestState::Cancelled);
        assert!(request.complete(Outcome::Added).is_err());
    }

    #[test]
    fn test_expire_is_final() {
        let mut request = Request::new("alice", MediaKind::Movie, "q");
        request.receive_candidates(vec![candidate(1)]).unwrap();
        request.expire();
        assert_eq!(request.state(), &RequestState::Expired);
        assert!(request.choose(0).is_err());

        request.fail("late");
        assert_eq!(request.state(), &RequestState::Expired);
    }
}
