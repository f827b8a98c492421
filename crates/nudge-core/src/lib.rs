//! # nudge-core
//!
//! Core types, collaborator traits, configuration, and error handling for Nudge.

pub mod config;
pub mod error;
pub mod message;
pub mod traits;

pub use config::shellexpand;
