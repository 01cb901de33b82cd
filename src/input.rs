//! Player input
//!
//! Input is a point-in-time snapshot of which direction keys are held. The
//! platform layer keeps a [`KeyState`] up to date from key events and polls it
//! once per tick through the configured bindings.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::PlayerControls;

/// Direction keys held by one player this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
}

impl HeldKeys {
    pub const NONE: Self = Self {
        left: false,
        right: false,
    };

    pub const fn left() -> Self {
        Self {
            left: true,
            right: false,
        }
    }

    pub const fn right() -> Self {
        Self {
            left: false,
            right: true,
        }
    }

    /// Any direction key held
    pub fn any(&self) -> bool {
        self.left || self.right
    }

    /// -1, 0 or +1. Right wins when both are held.
    pub fn direction(&self) -> f32 {
        if self.right {
            1.0
        } else if self.left {
            -1.0
        } else {
            0.0
        }
    }

    /// Read one player's bindings from the current key state
    pub fn poll(keys: &KeyState, controls: &PlayerControls) -> Self {
        Self {
            left: keys.is_down(&controls.left),
            right: keys.is_down(&controls.right),
        }
    }
}

/// Input for a single tick, indexed by player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub players: [HeldKeys; 2],
}

impl TickInput {
    pub fn new(player1: HeldKeys, player2: HeldKeys) -> Self {
        Self {
            players: [player1, player2],
        }
    }

    /// Snapshot both players' bindings
    pub fn poll(keys: &KeyState, controls: &[PlayerControls; 2]) -> Self {
        Self::new(
            HeldKeys::poll(keys, &controls[0]),
            HeldKeys::poll(keys, &controls[1]),
        )
    }
}

/// Set of currently held keys, by name
///
/// Single-character names are case-insensitive (`"a"` and `"A"` are the same
/// key); named keys such as `"ArrowLeft"` match exactly.
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    down: HashSet<String>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: &str) {
        self.down.insert(normalize_key(key));
    }

    pub fn release(&mut self, key: &str) {
        self.down.remove(&normalize_key(key));
    }

    /// Drop everything (e.g. window lost focus)
    pub fn clear(&mut self) {
        self.down.clear();
    }

    pub fn is_down(&self, key: &str) -> bool {
        self.down.contains(&normalize_key(key))
    }
}

fn normalize_key(key: &str) -> String {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.to_uppercase().collect(),
        _ => key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn test_right_wins_tie() {
        let both = HeldKeys {
            left: true,
            right: true,
        };
        assert_eq!(both.direction(), 1.0);
        assert_eq!(HeldKeys::left().direction(), -1.0);
        assert_eq!(HeldKeys::NONE.direction(), 0.0);
        assert!(!HeldKeys::NONE.any());
    }

    #[test]
    fn test_poll_default_bindings() {
        let config = GameConfig::default();
        let mut keys = KeyState::new();
        keys.press("d");
        keys.press("ArrowLeft");

        let input = TickInput::poll(&keys, &config.controls);
        assert_eq!(input.players[0], HeldKeys::right());
        assert_eq!(input.players[1], HeldKeys::left());

        keys.release("D");
        keys.release("ArrowLeft");
        assert_eq!(TickInput::poll(&keys, &config.controls), TickInput::default());
    }

    #[test]
    fn test_named_keys_are_case_sensitive() {
        let mut keys = KeyState::new();
        keys.press("arrowleft");
        assert!(!keys.is_down("ArrowLeft"));
        keys.clear();
        keys.press("ArrowLeft");
        assert!(keys.is_down("ArrowLeft"));
    }
}
