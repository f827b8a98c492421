//! # nudge-channels
//!
//! Chat platform transports for Nudge.

pub mod onebot;

pub use onebot::OneBotTransport;
