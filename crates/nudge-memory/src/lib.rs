//! # nudge-memory
//!
//! Persistent identity and action history store for Nudge (SQLite-backed).

pub mod store;

pub use store::{format_action_context, Store};
