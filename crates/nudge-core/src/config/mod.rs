mod defaults;
mod services;


pub use services::*;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::NudgeError;
use defaults::*;

/// Built-in decision guidance for the proactive poke action.
pub const DEFAULT_ACTION_REQUIRE: &[&str] = &[
    "Use it when you want to interact with someone through a poke",
    "Use it when you want to express an emotion",
    "Use it when you want to get someone's attention or remind them of something",
    "Use it when someone asks you to poke them",
    "Note: a poke is not a reply and does not affect reply frequency. You may reply and poke at the same time",
];

/// Top-level Nudge configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub poke: PokeConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

impl Config {
    /// Check settings the pipeline cannot run without.
    pub fn validate(&self) -> Result<(), NudgeError> {
        if self.bot.account.trim().is_empty() {
            return Err(NudgeError::Config(
                "bot.account is empty; pokes can never match the agent".to_string(),
            ));
        }
        if self.bot.platform.trim().is_empty() {
            return Err(NudgeError::Config("bot.platform is empty".to_string()));
        }
        Ok(())
    }
}

/// The agent's own identity on the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// The agent's own account handle. Pokes are accepted only when aimed at it.
    #[serde(default)]
    pub account: String,
    /// Name the agent goes by in display strings.
    #[serde(default = "default_nickname")]
    pub nickname: String,
    /// Platform scope used for identity lookups.
    #[serde(default = "default_platform")]
    pub platform: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            account: String::new(),
            nickname: default_nickname(),
            platform: default_platform(),
        }
    }
}

/// Poke feature toggles and prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokeConfig {
    /// Poke back when the agent gets poked.
    #[serde(default = "default_true")]
    pub enable_poke_back: bool,
    /// Send a generated text reply when the agent gets poked.
    #[serde(default = "default_true")]
    pub enable_poke_reply: bool,
    /// Extra prompt handed to the reply generator.
    #[serde(default = "default_poke_reply_prompt")]
    pub poke_reply_prompt: String,
    /// Decision guidance for the proactive action, one entry per line.
    #[serde(default = "default_action_require")]
    pub action_require: String,
    /// Pause between consecutive reply fragments, in milliseconds.
    /// Keeps the transport from delivering fragments out of order.
    #[serde(default = "default_fragment_pause_ms")]
    pub fragment_pause_ms: u64,
}

impl Default for PokeConfig {
    fn default() -> Self {
        Self {
            enable_poke_back: true,
            enable_poke_reply: true,
            poke_reply_prompt: default_poke_reply_prompt(),
            action_require: default_action_require(),
            fragment_pause_ms: default_fragment_pause_ms(),
        }
    }
}

impl PokeConfig {
    /// Split `action_require` into guidance lines.
    ///
    /// Blank lines are dropped. A blank block falls back to the built-in list.
    pub fn action_require_lines(&self) -> Vec<String> {
        let lines: Vec<String> = self
            .action_require
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        if lines.is_empty() {
            DEFAULT_ACTION_REQUIRE.iter().map(|s| s.to_string()).collect()
        } else {
            lines
        }
    }
}

/// Memory (identity + action history) config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
    /// How many recent actions to render as context.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            history_limit: default_history_limit(),
        }
    }
}

/// Logging config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for rolling log files. `None` = stderr only.
    #[serde(default)]
    pub dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
        }
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, NudgeError> {
    let path = Path::new(path);
    if !path.exists() {
        info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| NudgeError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    parse(&content)
}

/// Parse configuration from TOML text.
pub fn parse(content: &str) -> Result<Config, NudgeError> {
    toml::from_str(content).map_err(|e| NudgeError::Config(format!("failed to parse config: {e}")))
}
