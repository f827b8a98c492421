//! # nudge-poke
//!
//! Reacts to "poke" notifications aimed at the agent and lets the agent poke
//! people on its own initiative.
//!
//! - `classify` — decides whether an inbound event is a poke aimed at the agent
//! - `gate` — feature toggles checked before any collaborator call
//! - `resolve` — handle → display name and name → handle lookups, fail-fast
//! - `responder` — the reactive pipeline (reply, then poke back)
//! - `action` — the proactive poke action and its planner-facing description

pub mod action;
pub mod classify;
pub mod gate;
pub mod resolve;
pub mod responder;

#[cfg(test)]
pub(crate) mod testing;

pub use action::{ActionInfo, ActionOutcome, PokeAction, PokeParams};
pub use classify::{classify, Classification, NotApplicable, PokeEvent};
pub use gate::Gate;
pub use resolve::{IdentityAdapter, ResolveError, ResolvedIdentity};
pub use responder::{PokeOutcome, PokeResponder, ResponseReport, StepStatus};

use nudge_core::traits::{ActionHistory, IdentityResolver, ReplyGenerator, Transport};
use std::sync::Arc;

/// External systems the poke pipeline calls into.
#[derive(Clone)]
pub struct Collaborators {
    pub resolver: Arc<dyn IdentityResolver>,
    pub generator: Arc<dyn ReplyGenerator>,
    pub transport: Arc<dyn Transport>,
    pub history: Arc<dyn ActionHistory>,
}
