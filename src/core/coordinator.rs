//! Workflow coordinator.
//!
//! Drives one [`Request`] from lookup to a terminal state. The host UI
//! talks to a running request through two channels: it sends [`Signal`]s
//! (a chosen candidate, a season policy, confirm or cancel) and receives
//! [`Prompt`]s describing what to show next. Every request owns its own
//! channels and state; the only thing shared between requests is the
//! read-only backend clients.

use super::reconciler;
use crate::models::config::WorkflowConfig;
use crate::models::media::{Candidate, MediaKind, Outcome, SeasonPolicy};
use crate::models::request::{Request, RequestState, NO_MATCH};
use crate::services::Backend;
use crate::Error;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::Instrument;

const CHANNEL_CAPACITY: usize = 8;

/// Message shown for every backend failure.
pub const TRY_AGAIN_LATER: &str = "could not be completed right now. Please try again later.";

/// Input from the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Index into the offered candidates.
    Choose(usize),
    Season(SeasonPolicy),
    Confirm,
    Cancel,
}

/// Output to the host UI.
#[derive(Debug, Clone, PartialEq)]
pub enum Prompt {
    /// Pick one of these.
    Candidates(Vec<Candidate>),
    /// Pick a season policy for this series.
    SeasonPolicy(Candidate),
    /// Confirm or cancel.
    Confirm {
        candidate: Candidate,
        policy: Option<SeasonPolicy>,
    },
    /// The request is over.
    Finished { state: RequestState, message: String },
}

/// How long to wait for the next signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitWindows {
    /// Candidate choice and confirmation.
    pub selection: Duration,
    /// Season policy choice.
    pub season: Duration,
}

impl Default for WaitWindows {
    fn default() -> Self {
        Self::from(&WorkflowConfig::default())
    }
}

impl From<&WorkflowConfig> for WaitWindows {
    fn from(config: &WorkflowConfig) -> Self {
        Self {
            selection: Duration::from_secs(config.selection_timeout_secs),
            season: Duration::from_secs(config.season_timeout_secs),
        }
    }
}

/// Host-side ends of a running request.
pub struct RequestHandle {
    pub signals: mpsc::Sender<Signal>,
    pub prompts: mpsc::Receiver<Prompt>,
    /// Resolves to the finished request.
    pub task: JoinHandle<Request>,
}

/// Binds host signals to request transitions.
#[derive(Clone)]
pub struct Coordinator {
    movies: Arc<dyn Backend>,
    series: Arc<dyn Backend>,
    windows: WaitWindows,
}

impl Coordinator {
    /// Create a coordinator over the movie and series backends.
    pub fn new(movies: Arc<dyn Backend>, series: Arc<dyn Backend>, windows: WaitWindows) -> Self {
        Self {
            movies,
            series,
            windows,
        }
    }

    fn backend(&self, kind: MediaKind) -> &dyn Backend {
        match kind {
            MediaKind::Movie => self.movies.as_ref(),
            MediaKind::Series => self.series.as_ref(),
        }
    }

    /// Spawn a new request and return the host's ends of it.
    pub fn start(&self, requester: &str, kind: MediaKind, query: &str) -> RequestHandle {
        let (signal_tx, signal_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (prompt_tx, prompt_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let request = Request::new(requester, kind, query);
        let coordinator = self.clone();

        let task = tokio::spawn(async move { coordinator.run(request, signal_rx, prompt_tx).await });

        RequestHandle {
            signals: signal_tx,
            prompts: prompt_rx,
            task,
        }
    }

    /// Run `request` to a terminal state.
    ///
    /// The signal receiver is closed before the final prompt goes out,
    /// so signals sent after the request ends are rejected.
    pub async fn run(
        &self,
        request: Request,
        mut signals: mpsc::Receiver<Signal>,
        prompts: mpsc::Sender<Prompt>,
    ) -> Request {
        let span = tracing::info_span!(
            "request",
            id = %request.id,
            requester = %request.requester,
            kind = %request.kind
        );

        async move {
            let mut request = request;
            self.search(&mut request, &prompts).await;

            while !request.is_terminal() {
                let window = match request.state() {
                    RequestState::SeasonSelecting => self.windows.season,
                    _ => self.windows.selection,
                };

                match tokio::time::timeout(window, signals.recv()).await {
                    Err(_) => {
                        tracing::warn!("No answer within {:?} while {}, expiring", window, request.state());
                        request.expire();
                    }
                    Ok(None) => {
                        tracing::debug!("Host closed the signal channel");
                        request.expire();
                    }
                    Ok(Some(signal)) => self.apply(&mut request, signal, &prompts).await,
                }
            }

            signals.close();
            drop(signals);

            tracing::info!("Request '{}' finished: {:?}", request.query, request.state());
            publish(
                &prompts,
                Prompt::Finished {
                    state: request.state().clone(),
                    message: outcome_message(&request),
                },
            )
            .await;

            request
        }
        .instrument(span)
        .await
    }

    async fn search(&self, request: &mut Request, prompts: &mpsc::Sender<Prompt>) {
        let candidates = match self.backend(request.kind).lookup(&request.query).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::error!("Lookup for '{}' failed: {}", request.query, e);
                Vec::new()
            }
        };

        if let Err(e) = request.receive_candidates(candidates) {
            tracing::error!("{}", e);
            request.fail(e.to_string());
            return;
        }

        match request.state() {
            RequestState::Selecting => {
                publish(prompts, Prompt::Candidates(request.candidates().to_vec())).await;
            }
            RequestState::Failed(_) => {
                tracing::info!("{}", Error::LookupEmpty(request.query.clone()));
            }
            _ => {}
        }
    }

    async fn apply(&self, request: &mut Request, signal: Signal, prompts: &mpsc::Sender<Prompt>) {
        tracing::debug!("Signal {:?} while {}", signal, request.state());

        let result = match signal {
            Signal::Choose(index) => request.choose(index),
            Signal::Season(policy) => request.choose_season(policy),
            Signal::Cancel => request.cancel(),
            Signal::Confirm => {
                let target = request
                    .confirmation()
                    .map(|(candidate, policy)| (candidate.clone(), policy));
                match target {
                    Ok((candidate, policy)) => {
                        let outcome =
                            reconciler::reconcile(self.backend(request.kind), &candidate, policy)
                                .await;
                        request.complete(outcome)
                    }
                    Err(e) => Err(e),
                }
            }
        };

        match result {
            Ok(()) => {}
            Err(e @ Error::SelectionOutOfRange { .. }) => {
                tracing::error!("Host sent an invalid selection: {}", e);
                request.fail(e.to_string());
                return;
            }
            Err(e) => {
                tracing::warn!("Ignoring signal: {}", e);
                return;
            }
        }

        let next = match (request.state(), request.selected()) {
            (RequestState::SeasonSelecting, Some(candidate)) => {
                Some(Prompt::SeasonPolicy(candidate.clone()))
            }
            (RequestState::Confirming, Some(candidate)) => Some(Prompt::Confirm {
                candidate: candidate.clone(),
                policy: request.season_policy(),
            }),
            _ => None,
        };
        if let Some(prompt) = next {
            publish(prompts, prompt).await;
        }
    }
}

async fn publish(prompts: &mpsc::Sender<Prompt>, prompt: Prompt) {
    if prompts.send(prompt).await.is_err() {
        tracing::debug!("Host is gone, dropping prompt");
    }
}

/// Human-readable text for a finished request.
pub fn outcome_message(request: &Request) -> String {
    let user = &request.requester;
    let name = request
        .selected()
        .map(Candidate::display_name)
        .unwrap_or_else(|| request.query.clone());

    match request.state() {
        RequestState::Completed(Outcome::Added) => {
            format!("{} your request for {} is being processed.", user, name)
        }
        RequestState::Completed(Outcome::AlreadyComplete) => format!(
            "{} your request for {} was not processed because this {} has already been downloaded.",
            user, name, request.kind
        ),
        RequestState::Completed(Outcome::ResearchTriggered) => format!(
            "{} {} is already in the library, a new search has been started.",
            user, name
        ),
        RequestState::Completed(Outcome::Failed(_)) => {
            format!("{} your request for {} {}", user, name, TRY_AGAIN_LATER)
        }
        RequestState::Failed(reason) if reason == NO_MATCH => format!(
            "{} no {} matching the following title was found: {}",
            user, request.kind, request.query
        ),
        RequestState::Failed(_) => format!("{} your request for {} {}", user, name, TRY_AGAIN_LATER),
        RequestState::Cancelled => "Cancelled the request.".to_string(),
        RequestState::Expired => format!("{} your request for {} timed out.", user, request.query),
        state => format!("{} your request for {} is still {}.", user, name, state),
    }
}
