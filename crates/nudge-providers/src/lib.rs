//! # nudge-providers
//!
//! Reply generator implementations for Nudge.

pub mod openai;

pub use openai::OpenAiGenerator;
