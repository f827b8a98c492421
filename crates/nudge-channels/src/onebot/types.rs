//! OneBot v11 request/response types and session addressing.

use nudge_core::error::NudgeError;
use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// A chat session: `group:<id>` or `private:<id>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Group(String),
    Private(String),
}

impl FromStr for Session {
    type Err = NudgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s
            .split_once(':')
            .ok_or_else(|| NudgeError::Transport(format!("malformed session id: {s}")))?;
        let id = id.trim();
        if id.is_empty() {
            return Err(NudgeError::Transport(format!("session id without target: {s}")));
        }
        match kind {
            "group" => Ok(Self::Group(id.to_string())),
            "private" => Ok(Self::Private(id.to_string())),
            other => Err(NudgeError::Transport(format!(
                "unknown session kind {other:?} in {s}"
            ))),
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Group(id) => write!(f, "group:{id}"),
            Self::Private(id) => write!(f, "private:{id}"),
        }
    }
}

/// OneBot ids are numeric; keep anything else verbatim.
pub(crate) fn id_value(id: &str) -> Value {
    id.parse::<i64>().map(Value::from).unwrap_or_else(|_| json!(id))
}

/// Endpoint and body for a text message.
pub(crate) fn send_msg_request(session: &Session, text: &str) -> (&'static str, Value) {
    let body = match session {
        Session::Group(id) => json!({
            "message_type": "group",
            "group_id": id_value(id),
            "message": text,
        }),
        Session::Private(id) => json!({
            "message_type": "private",
            "user_id": id_value(id),
            "message": text,
        }),
    };
    ("send_msg", body)
}

/// Endpoint and body for a poke.
pub(crate) fn poke_request(session: &Session, target: &str) -> (&'static str, Value) {
    match session {
        Session::Group(id) => (
            "group_poke",
            json!({ "group_id": id_value(id), "user_id": id_value(target) }),
        ),
        Session::Private(_) => ("friend_poke", json!({ "user_id": id_value(target) })),
    }
}

/// Common OneBot response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct ObResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub retcode: i64,
    #[serde(default)]
    pub wording: Option<String>,
}

impl ObResponse {
    pub(crate) fn is_ok(&self) -> bool {
        self.status == "ok" && self.retcode == 0
    }
}
