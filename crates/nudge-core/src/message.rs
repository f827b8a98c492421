use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One event from the host's generic "message received" channel.
///
/// `raw_message` is the platform's opaque notification payload; it is absent for
/// ordinary chat traffic. The remaining fields come from the message envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InboundEnvelope {
    #[serde(default)]
    pub raw_message: Option<String>,
    /// Platform-specific ID of the user who triggered the event.
    /// Platforms send it as a string or a bare number.
    #[serde(default, deserialize_with = "string_or_number")]
    pub user_id: Option<String>,
    /// Free-form display text attached to the event.
    #[serde(default)]
    pub plain_text: String,
    /// Session (chat stream) the event arrived on; replies are routed here.
    #[serde(default)]
    pub stream_id: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Id>::deserialize(deserializer)? {
        Some(Id::Text(text)) => Some(text),
        Some(Id::Number(n)) => Some(n.to_string()),
        None => None,
    })
}

/// A request for the reply generator. Built fresh for every response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyIntent {
    pub session_id: String,
    /// Why the agent is replying (display name plus event text).
    pub reason_text: String,
    /// Extra prompt text appended to the generator's instructions.
    pub auxiliary_prompt: String,
    pub timestamp: DateTime<Utc>,
}

impl ReplyIntent {
    pub fn new(session_id: &str, reason_text: String, auxiliary_prompt: String) -> Self {
        Self {
            session_id: session_id.to_string(),
            reason_text,
            auxiliary_prompt,
            timestamp: Utc::now(),
        }
    }
}

/// Ordered reply fragments. Each fragment is sent as one outbound message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyFragmentSet {
    pub fragments: Vec<String>,
}

impl ReplyFragmentSet {
    pub fn new(fragments: Vec<String>) -> Self {
        Self { fragments }
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().map(String::as_str)
    }
}

/// Typed outbound command kinds understood by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandKind {
    SendPoke,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SendPoke => "SEND_POKE",
        }
    }
}

/// An outbound command for the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundCommand {
    pub kind: CommandKind,
    /// Platform handle of the user the command acts on.
    pub target_handle: String,
    /// Human-readable text shown in history in place of the command.
    pub display_text: String,
    /// Whether the transport itself should record the command in history.
    pub store_in_history: bool,
}

impl OutboundCommand {
    /// Build a `SEND_POKE` command.
    pub fn send_poke(target_handle: &str, display_text: String, store_in_history: bool) -> Self {
        Self {
            kind: CommandKind::SendPoke,
            target_handle: target_handle.to_string(),
            display_text,
            store_in_history,
        }
    }
}

/// A recorded agent action, kept as context for later conversation turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub action_name: String,
    pub display_text: String,
    /// Whether the action actually went out.
    pub done: bool,
    /// Parameters the action was invoked with.
    pub parameters: serde_json::Value,
    pub session_id: String,
    /// Whether the record should be rendered into later prompts.
    pub build_into_prompt: bool,
    pub created_at: DateTime<Utc>,
}

impl ActionRecord {
    pub fn new(
        action_name: &str,
        display_text: &str,
        done: bool,
        parameters: serde_json::Value,
        session_id: &str,
    ) -> Self {
        Self {
            action_name: action_name.to_string(),
            display_text: display_text.to_string(),
            done,
            parameters,
            session_id: session_id.to_string(),
            build_into_prompt: true,
            created_at: Utc::now(),
        }
    }
}

/// Fields the identity resolver can return for a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonField {
    /// Display name.
    PersonName,
    /// Platform handle.
    UserId,
}

impl PersonField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PersonName => "person_name",
            Self::UserId => "user_id",
        }
    }
}
