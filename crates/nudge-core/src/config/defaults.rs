//! Default values referenced by `#[serde(default = ...)]` attributes.

pub(super) fn default_true() -> bool {
    true
}

pub(super) fn default_nickname() -> String {
    "Nudge".to_string()
}

pub(super) fn default_platform() -> String {
    "qq".to_string()
}

pub(super) fn default_poke_reply_prompt() -> String {
    "This is the platform's \"poke\" feature, a friendly way to interact with someone. \
     Write a reply to this poke, and do not repeat anything you have already said."
        .to_string()
}

pub(super) fn default_action_require() -> String {
    super::DEFAULT_ACTION_REQUIRE.join("\n")
}

pub(super) fn default_fragment_pause_ms() -> u64 {
    200
}

pub(super) fn default_db_path() -> String {
    "~/.nudge/data/nudge.db".to_string()
}

pub(super) fn default_history_limit() -> usize {
    20
}

pub(super) fn default_log_level() -> String {
    "info".to_string()
}

pub(super) fn default_transport_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

pub(super) fn default_transport_timeout() -> u64 {
    10
}

pub(super) fn default_generator_url() -> String {
    "https://api.openai.com/v1".to_string()
}

pub(super) fn default_generator_model() -> String {
    "gpt-4o-mini".to_string()
}

pub(super) fn default_system_prompt() -> String {
    "You are a friendly member of a group chat. Keep replies short and casual, \
     one or two sentences at most."
        .to_string()
}

pub(super) fn default_generator_timeout() -> u64 {
    60
}
