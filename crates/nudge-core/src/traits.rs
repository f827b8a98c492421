//! Collaborator traits. The poke pipeline talks to the outside world only through these.

use crate::{
    error::NudgeError,
    message::{ActionRecord, OutboundCommand, PersonField, ReplyFragmentSet, ReplyIntent},
};
use async_trait::async_trait;

/// Identity resolver: maps platform handles and display names to internal person ids.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Look up the internal person id for a platform-scoped handle.
    async fn person_id(&self, platform: &str, user_id: &str) -> Result<Option<String>, NudgeError>;

    /// Look up the internal person id for a display name.
    async fn person_id_by_name(&self, name: &str) -> Result<Option<String>, NudgeError>;

    /// Read one field of a person.
    async fn person_value(
        &self,
        person_id: &str,
        field: PersonField,
    ) -> Result<Option<String>, NudgeError>;
}

/// Reply generator — turns a reply intent into text fragments.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    /// Human-readable generator name.
    fn name(&self) -> &str;

    /// Produce reply fragments for the intent. An `Err` means generation failed.
    async fn generate(&self, intent: &ReplyIntent) -> Result<ReplyFragmentSet, NudgeError>;
}

/// Command/message transport towards the chat platform.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Human-readable transport name.
    fn name(&self) -> &str;

    /// Send a text message to a session.
    async fn send_text(&self, session_id: &str, text: &str) -> Result<(), NudgeError>;

    /// Deliver a typed command to a session. Returns the platform's success flag.
    async fn send_command(
        &self,
        session_id: &str,
        command: &OutboundCommand,
    ) -> Result<bool, NudgeError>;
}

/// Durable record of actions the agent took.
#[async_trait]
pub trait ActionHistory: Send + Sync {
    async fn store_action(&self, record: &ActionRecord) -> Result<(), NudgeError>;
}
