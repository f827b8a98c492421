//! Feature toggles checked before any collaborator is called.

use nudge_core::config::PokeConfig;

/// Which reactive steps are switched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gate {
    pub reply_enabled: bool,
    pub poke_back_enabled: bool,
}

impl Gate {
    /// Read the two toggles.
    pub fn should_process(config: &PokeConfig) -> Self {
        Self {
            reply_enabled: config.enable_poke_reply,
            poke_back_enabled: config.enable_poke_back,
        }
    }

    /// `false` when every step is disabled and the event can be dropped untouched.
    pub fn is_open(&self) -> bool {
        self.reply_enabled || self.poke_back_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_open_if_any_toggle_on() {
        let cases = [
            (true, true, true),
            (true, false, true),
            (false, true, true),
            (false, false, false),
        ];
        for (reply, back, open) in cases {
            let cfg = PokeConfig {
                enable_poke_reply: reply,
                enable_poke_back: back,
                ..Default::default()
            };
            let gate = Gate::should_process(&cfg);
            assert_eq!(gate.reply_enabled, reply);
            assert_eq!(gate.poke_back_enabled, back);
            assert_eq!(gate.is_open(), open, "reply={reply} back={back}");
        }
    }
}
