//! Grabarr Library
//!
//! Guided requests for movies and TV shows, reconciled against Radarr
//! and Sonarr.

pub mod cli;
pub mod core;
pub mod error;
pub mod models;
pub mod preflight;
pub mod services;

pub use error::{Error, Result};
