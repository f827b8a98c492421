//! OneBot v11 HTTP API transport.
//!
//! Text goes through `send_msg`; `SEND_POKE` maps to `group_poke` or
//! `friend_poke` depending on the session kind.
//! Docs: <https://github.com/botuniverse/onebot-11>

mod send;
pub(crate) mod types;

#[cfg(test)]
mod tests;

pub use types::Session;

use nudge_core::{config::TransportConfig, traits::ActionHistory};
use std::sync::Arc;
use std::time::Duration;

/// Transport that talks to a OneBot v11 implementation over HTTP.
pub struct OneBotTransport {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
    /// Where commands flagged `store_in_history` are recorded.
    history: Option<Arc<dyn ActionHistory>>,
}

impl OneBotTransport {
    /// Create a new transport from config.
    pub fn new(config: &TransportConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
            history: None,
        }
    }

    /// Record history-flagged commands into `history`.
    pub fn with_history(mut self, history: Arc<dyn ActionHistory>) -> Self {
        self.history = Some(history);
        self
    }
}
