//! Core business logic modules.

pub mod coordinator;
pub mod reconciler;
