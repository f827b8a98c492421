use serde::{Deserialize, Serialize};

use super::defaults::*;

/// OneBot HTTP transport config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    #[serde(default = "default_transport_url")]
    pub base_url: String,
    /// Bearer token for the OneBot HTTP API. Empty = no auth.
    #[serde(default)]
    pub access_token: String,
    #[serde(default = "default_transport_timeout")]
    pub timeout_secs: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: default_transport_url(),
            access_token: String::new(),
            timeout_secs: default_transport_timeout(),
        }
    }
}

/// OpenAI-compatible reply generator config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_generator_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_generator_model")]
    pub model: String,
    /// Persona prompt sent as the system message.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    #[serde(default = "default_generator_timeout")]
    pub timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: default_generator_url(),
            api_key: String::new(),
            model: default_generator_model(),
            system_prompt: default_system_prompt(),
            timeout_secs: default_generator_timeout(),
        }
    }
}
