//! Poke notification classifier.
//!
//! Pure function over one inbound envelope. The notification semantics come from
//! the decoded `raw_message`; the poking user comes from the envelope itself.

use nudge_core::message::InboundEnvelope;
use serde_json::Value;

/// A poke aimed at the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PokeEvent {
    /// Handle of the user who poked. Empty when the envelope carried none.
    pub source_handle: String,
    /// Handle of the poked user, as found in the payload.
    pub target_handle: String,
}

/// Why an event is not a poke for the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotApplicable {
    /// No raw payload on the envelope (ordinary chat traffic).
    NoPayload,
    /// Payload decoded but is not a JSON object.
    NotAnObject,
    /// `post_type` is not `"notice"`.
    NotNotice,
    /// `sub_type` is not `"poke"`.
    NotPoke,
    /// The poke targets someone other than the agent.
    OtherTarget,
}

/// Result of classifying one inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Poke(PokeEvent),
    NotApplicable(NotApplicable),
    /// The payload is not valid JSON.
    Malformed(String),
}

impl Classification {
    pub fn is_poke(&self) -> bool {
        matches!(self, Self::Poke(_))
    }

    /// Short reason for log lines when the event is passed through.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Poke(_) => "poke event",
            Self::NotApplicable(NotApplicable::OtherTarget) => "poke target is not the agent",
            Self::NotApplicable(_) => "not a poke event",
            Self::Malformed(_) => "not a poke event (undecodable payload)",
        }
    }
}

/// Classify an inbound envelope against the agent's own account handle.
pub fn classify(envelope: &InboundEnvelope, bot_account: &str) -> Classification {
    let raw = match envelope.raw_message.as_deref().map(str::trim) {
        Some(r) if !r.is_empty() => r,
        _ => return Classification::NotApplicable(NotApplicable::NoPayload),
    };

    let value: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => return Classification::Malformed(e.to_string()),
    };

    let Some(obj) = value.as_object() else {
        return Classification::NotApplicable(NotApplicable::NotAnObject);
    };

    if obj.get("post_type").and_then(Value::as_str) != Some("notice") {
        return Classification::NotApplicable(NotApplicable::NotNotice);
    }
    if obj.get("sub_type").and_then(Value::as_str) != Some("poke") {
        return Classification::NotApplicable(NotApplicable::NotPoke);
    }

    let target_handle = match obj.get("target_id").and_then(stringify_id) {
        Some(t) if t == bot_account => t,
        _ => return Classification::NotApplicable(NotApplicable::OtherTarget),
    };

    let source_handle = envelope
        .user_id
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    Classification::Poke(PokeEvent {
        source_handle,
        target_handle,
    })
}

/// Platform ids arrive as either JSON numbers or strings.
fn stringify_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
