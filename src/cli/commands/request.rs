//! Request command implementation.
//!
//! Terminal front end for one request: shows the prompts a running
//! request publishes and turns typed answers into signals.

use crate::core::coordinator::{Coordinator, Prompt, RequestHandle, Signal, WaitWindows};
use crate::models::config;
use crate::models::media::{Candidate, MediaKind, SeasonPolicy};
use crate::models::request::RequestState;
use crate::preflight;
use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Request a movie or show by title.
pub async fn request(
    config_path: Option<&Path>,
    kind: MediaKind,
    title: &str,
    requester: Option<&str>,
) -> Result<()> {
    let config = config::load_config(config_path)?;
    let backends = preflight::connect(&config).await?;

    let coordinator = Coordinator::new(
        backends.radarr,
        backends.sonarr,
        WaitWindows::from(&config.workflow),
    );

    let requester = requester
        .map(str::to_string)
        .unwrap_or_else(whoami::username);

    println!("{} {} '{}'", "[SEARCH]".bold().cyan(), kind, title);
    let handle = coordinator.start(&requester, kind, title);
    let state = interact(handle).await?;

    if !matches!(state, RequestState::Completed(_) | RequestState::Cancelled) {
        anyhow::bail!("Request ended: {}", state);
    }
    Ok(())
}

async fn interact(handle: RequestHandle) -> Result<RequestState> {
    let RequestHandle {
        signals,
        mut prompts,
        task,
    } = handle;
    let mut signals = Some(signals);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut awaiting: Option<Prompt> = None;

    loop {
        tokio::select! {
            prompt = prompts.recv() => match prompt {
                None => break,
                Some(Prompt::Finished { state, message }) => {
                    print_finished(&state, &message);
                    break;
                }
                Some(prompt) => {
                    render(&prompt);
                    awaiting = Some(prompt);
                }
            },
            line = lines.next_line(), if awaiting.is_some() && signals.is_some() => {
                let Some(line) = line? else {
                    // stdin closed: let the request expire
                    signals = None;
                    continue;
                };
                let Some(prompt) = awaiting.as_ref() else { continue };
                match parse_answer(prompt, &line) {
                    Some(signal) => {
                        awaiting = None;
                        if let Some(tx) = &signals {
                            if tx.send(signal).await.is_err() {
                                signals = None;
                            }
                        }
                    }
                    None => println!("{}", "Invalid answer, try again.".yellow()),
                }
            }
        }
    }

    drop(signals);
    let request = task.await?;
    Ok(request.state().clone())
}

/// Turn a typed answer into a signal for the prompt being shown.
///
/// Candidate numbers are 1-based and checked here, so the request only
/// ever sees valid indices.
pub fn parse_answer(prompt: &Prompt, input: &str) -> Option<Signal> {
    let input = input.trim();
    match prompt {
        Prompt::Candidates(candidates) => {
            let number: usize = input.parse().ok()?;
            (1..=candidates.len())
                .contains(&number)
                .then(|| Signal::Choose(number - 1))
        }
        Prompt::SeasonPolicy(_) => SeasonPolicy::parse(input).map(Signal::Season),
        Prompt::Confirm { .. } => match input.to_lowercase().as_str() {
            "y" | "yes" | "r" | "request" => Some(Signal::Confirm),
            "n" | "no" | "c" | "cancel" => Some(Signal::Cancel),
            _ => None,
        },
        Prompt::Finished { .. } => None,
    }
}

fn render(prompt: &Prompt) {
    match prompt {
        Prompt::Candidates(candidates) => {
            println!("{}", "Select a title to grab:".bold());
            for (idx, candidate) in candidates.iter().enumerate() {
                println!("  {}. {}", idx + 1, candidate.display_name());
            }
            print_question(&format!("Number [1-{}]", candidates.len()));
        }
        Prompt::SeasonPolicy(candidate) => {
            println!("{} {}", "Which seasons of".bold(), candidate.display_name().bold());
            for (idx, policy) in SeasonPolicy::ALL.iter().enumerate() {
                println!("  {}. {}", idx + 1, policy.label());
            }
            print_question("Number [1-3]");
        }
        Prompt::Confirm { candidate, policy } => {
            print_confirmation(candidate, *policy);
            print_question("Request? [y/n]");
        }
        Prompt::Finished { state, message } => print_finished(state, message),
    }
}

fn print_confirmation(candidate: &Candidate, policy: Option<SeasonPolicy>) {
    println!();
    println!("{}", "Please confirm that you would like to grab:".bold());
    println!("  {} {}", "Title:".bold(), candidate.title);
    println!(
        "  {} {}",
        "Year:".bold(),
        candidate
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    );
    if let Some(policy) = policy {
        println!("  {} {}", "Seasons:".bold(), policy.label());
    }
    if let Some(overview) = &candidate.overview {
        println!("  {} {}", "Overview:".bold(), overview);
    }
}

fn print_question(question: &str) {
    println!("{} ", format!("{}:", question).cyan());
}

fn print_finished(state: &RequestState, message: &str) {
    match state {
        RequestState::Completed(crate::models::media::Outcome::Failed(_))
        | RequestState::Failed(_) => println!("{} {}", "[FAIL]".red(), message),
        RequestState::Completed(_) => println!("{} {}", "[OK]".green(), message),
        _ => println!("{} {}", "[INFO]".yellow(), message),
    }
}
