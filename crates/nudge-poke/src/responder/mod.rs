//! Reactive pipeline: answer a poke aimed at the agent.
//!
//! Steps run in a fixed order: gate, classify, resolve, reply, poke back.
//! Reply fragments always go out before the poke-back command. Every
//! collaborator failure is caught here and turned into a log line plus a
//! diagnostic; nothing is returned to the host as an error.


use crate::classify::{classify, Classification, PokeEvent};
use crate::gate::Gate;
use crate::resolve::{IdentityAdapter, ResolvedIdentity};
use crate::Collaborators;
use nudge_core::{
    config::{BotConfig, PokeConfig},
    message::{InboundEnvelope, OutboundCommand, ReplyIntent},
};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// How one step of the reactive pipeline ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Disabled by configuration.
    Skipped,
    Done,
    Failed,
}

/// Per-step report for an event the agent responded to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseReport {
    pub reply: StepStatus,
    pub fragments_sent: usize,
    pub poke_back: StepStatus,
}

/// Result of handling one inbound event.
///
/// Every variant means the event was consumed by this handler; none asks the
/// host to retry. Only `Failed` counts as an unsuccessful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PokeOutcome {
    /// Both toggles are off.
    Disabled,
    /// The event is not a poke aimed at the agent.
    Inert(&'static str),
    /// Identity resolution failed; nothing was sent.
    Failed(String),
    Responded(ResponseReport),
}

impl PokeOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    /// Diagnostic for operational logs.
    pub fn message(&self) -> String {
        match self {
            Self::Disabled => "poke reply and poke back are both disabled".to_string(),
            Self::Inert(reason) => (*reason).to_string(),
            Self::Failed(reason) => format!("poke response failed: {reason}"),
            Self::Responded(_) => "poke answered".to_string(),
        }
    }
}

/// Answers pokes aimed at the agent.
#[derive(Clone)]
pub struct PokeResponder {
    bot: BotConfig,
    poke: PokeConfig,
    identities: IdentityAdapter,
    collaborators: Collaborators,
}

impl PokeResponder {
    pub fn new(bot: BotConfig, poke: PokeConfig, collaborators: Collaborators) -> Self {
        let identities = IdentityAdapter::new(collaborators.resolver.clone(), &bot.platform);
        Self {
            bot,
            poke,
            identities,
            collaborators,
        }
    }

    /// Run the reactive pipeline for one inbound event.
    pub async fn handle(&self, envelope: &InboundEnvelope) -> PokeOutcome {
        // --- 1. GATE ---
        let gate = Gate::should_process(&self.poke);
        if !gate.is_open() {
            return PokeOutcome::Disabled;
        }

        // --- 2. CLASSIFY ---
        let event = match classify(envelope, &self.bot.account) {
            Classification::Poke(event) => event,
            other => {
                if let Classification::Malformed(ref e) = other {
                    debug!("poke: undecodable raw payload on {}: {e}", envelope.stream_id);
                }
                return PokeOutcome::Inert(other.describe());
            }
        };

        // --- 3. RESOLVE ---
        let identity = match self.identities.identity_for_handle(&event.source_handle).await {
            Ok(identity) => identity,
            Err(e) => {
                warn!("poke: cannot resolve poker on {}: {e}", envelope.stream_id);
                return PokeOutcome::Failed(e.to_string());
            }
        };

        info!(
            "poke: {} ({}) poked the agent on {}",
            identity.display_name, event.source_handle, envelope.stream_id
        );

        // --- 4. REPLY ---
        let (reply, fragments_sent) = if gate.reply_enabled {
            self.reply(envelope, &identity).await
        } else {
            (StepStatus::Skipped, 0)
        };

        // --- 5. POKE BACK ---
        let poke_back = if gate.poke_back_enabled {
            self.poke_back(&envelope.stream_id, &event, &identity).await
        } else {
            StepStatus::Skipped
        };

        PokeOutcome::Responded(ResponseReport {
            reply,
            fragments_sent,
            poke_back,
        })
    }

    /// Generate a reply and send its fragments in order.
    async fn reply(
        &self,
        envelope: &InboundEnvelope,
        identity: &ResolvedIdentity,
    ) -> (StepStatus, usize) {
        let intent = self.reply_intent(envelope, identity);

        let fragments = match self.collaborators.generator.generate(&intent).await {
            Ok(f) => f,
            Err(e) => {
                warn!(
                    "poke: reply generation via {} failed, skipping reply: {e}",
                    self.collaborators.generator.name()
                );
                return (StepStatus::Failed, 0);
            }
        };

        let pause = Duration::from_millis(self.poke.fragment_pause_ms);
        let mut sent = 0;
        for (i, fragment) in fragments.iter().enumerate() {
            // The transport reorders messages sent back-to-back.
            if i > 0 {
                tokio::time::sleep(pause).await;
            }
            if let Err(e) = self
                .collaborators
                .transport
                .send_text(&envelope.stream_id, fragment)
                .await
            {
                error!(
                    "poke: reply fragment {}/{} failed, dropping the rest: {e}",
                    i + 1,
                    fragments.len()
                );
                return (StepStatus::Failed, sent);
            }
            sent += 1;
        }

        (StepStatus::Done, sent)
    }

    fn reply_intent(&self, envelope: &InboundEnvelope, identity: &ResolvedIdentity) -> ReplyIntent {
        let text = envelope.plain_text.trim();
        let reason = if text.is_empty() {
            identity.display_name.clone()
        } else {
            format!("{} {text}", identity.display_name)
        };
        let auxiliary = format!("{reason}. {}", self.poke.poke_reply_prompt);
        ReplyIntent::new(&envelope.stream_id, reason, auxiliary)
    }

    /// Poke the poker back. Failures are logged only.
    async fn poke_back(
        &self,
        session_id: &str,
        event: &PokeEvent,
        identity: &ResolvedIdentity,
    ) -> StepStatus {
        let display = format!(
            "[Poke: {} poked {}]",
            self.bot.nickname, identity.display_name
        );
        let command = OutboundCommand::send_poke(&identity.platform_handle, display, true);

        match self
            .collaborators
            .transport
            .send_command(session_id, &command)
            .await
        {
            Ok(true) => {
                debug!("poke: poked back {}", event.source_handle);
                StepStatus::Done
            }
            Ok(false) => {
                error!("poke: poke back failed: transport rejected SEND_POKE");
                StepStatus::Failed
            }
            Err(e) => {
                error!("poke: poke back failed: {e}");
                StepStatus::Failed
            }
        }
    }
}
