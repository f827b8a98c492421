//! Proactive poke: the agent decides on its own to poke someone by name.


use crate::resolve::IdentityAdapter;
use crate::Collaborators;
use nudge_core::{
    config::{BotConfig, PokeConfig},
    message::{ActionRecord, OutboundCommand},
};
use serde::Deserialize;
use tracing::{debug, error, info, warn};

/// Parameters the planner passes to the poke action.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PokeParams {
    /// Display name of the person to poke (not a platform handle).
    #[serde(default)]
    pub name: Option<String>,
}

/// When the planner may pick the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationType {
    Always,
}

/// Planner-facing description of an action.
#[derive(Debug, Clone)]
pub struct ActionInfo {
    pub name: &'static str,
    pub description: &'static str,
    /// Parameter name and what to put in it.
    pub parameters: Vec<(&'static str, &'static str)>,
    /// Situations in which the action fits.
    pub require: Vec<String>,
    /// Can run alongside a normal reply.
    pub parallel: bool,
    pub activation: ActivationType,
}

impl ActionInfo {
    /// Render as a prompt block for the planner.
    pub fn render(&self) -> String {
        let mut out = format!("Action: {}\n{}\n", self.name, self.description);
        if !self.parameters.is_empty() {
            out.push_str("Parameters:\n");
            for (key, desc) in &self.parameters {
                out.push_str(&format!("- {key}: {desc}\n"));
            }
        }
        if !self.require.is_empty() {
            out.push_str("When to use:\n");
            for line in &self.require {
                out.push_str(&format!("- {line}\n"));
            }
        }
        out
    }
}

/// Outcome of one proactive poke: whether the command went out, and why not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,
}

impl ActionOutcome {
    fn failed(reason: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            message: format!("[poke failed] {reason}"),
        }
    }
}

/// The proactive poke action.
#[derive(Clone)]
pub struct PokeAction {
    bot: BotConfig,
    identities: IdentityAdapter,
    collaborators: Collaborators,
}

impl PokeAction {
    pub const NAME: &'static str = "poke";

    pub fn new(bot: BotConfig, collaborators: Collaborators) -> Self {
        let identities = IdentityAdapter::new(collaborators.resolver.clone(), &bot.platform);
        Self {
            bot,
            identities,
            collaborators,
        }
    }

    /// Description handed to the planner. `require` honors the `action_require` override.
    pub fn info(config: &PokeConfig) -> ActionInfo {
        ActionInfo {
            name: Self::NAME,
            description: "Poke someone in a friendly way. Sends no message text, \
                          only a light notification.",
            parameters: vec![("name", "name of the person to poke")],
            require: config.action_require_lines(),
            parallel: true,
            activation: ActivationType::Always,
        }
    }

    /// Run the action with raw planner parameters.
    pub async fn execute(&self, session_id: &str, params: &serde_json::Value) -> ActionOutcome {
        let parsed = match PokeParams::deserialize(params) {
            Ok(p) => p,
            Err(e) => {
                warn!("poke action: bad parameters {params}: {e}");
                PokeParams::default()
            }
        };
        let name = parsed.name.unwrap_or_default();
        self.poke(session_id, name.trim(), params.clone()).await
    }

    /// Poke the person known as `target_name` on `session_id`.
    pub async fn poke(
        &self,
        session_id: &str,
        target_name: &str,
        parameters: serde_json::Value,
    ) -> ActionOutcome {
        if target_name.is_empty() {
            return ActionOutcome::failed("name is missing from the action parameters");
        }

        let identity = match self.identities.handle_for_name(target_name).await {
            Ok(identity) => identity,
            Err(e) => {
                warn!("poke action: cannot resolve {target_name}: {e}");
                return ActionOutcome::failed(e);
            }
        };

        debug!("poke action: user_id={}", identity.platform_handle);

        let display = format!("[Poke: {} (you) poked {target_name}]", self.bot.nickname);
        // History is written below, so the transport must not record it again.
        let command = OutboundCommand::send_poke(&identity.platform_handle, display.clone(), false);

        let done = match self
            .collaborators
            .transport
            .send_command(session_id, &command)
            .await
        {
            Ok(true) => true,
            Ok(false) => {
                error!("poke action: transport rejected SEND_POKE to {target_name}");
                false
            }
            Err(e) => {
                error!("poke action: SEND_POKE to {target_name} failed: {e}");
                false
            }
        };

        let record = ActionRecord::new(Self::NAME, &display, done, parameters, session_id);
        if let Err(e) = self.collaborators.history.store_action(&record).await {
            warn!("poke action: failed to record action: {e}");
        }

        if done {
            info!("poke action: poked {target_name} on {session_id}");
            ActionOutcome {
                success: true,
                message: "poke done".to_string(),
            }
        } else {
            ActionOutcome::failed("SEND_POKE command failed")
        }
    }
}
