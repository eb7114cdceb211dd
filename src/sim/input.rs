//! Keyboard input model
//!
//! Key events update a live held-key table from outside the simulation.
//! The table is sampled once at the start of every tick.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Gameplay actions a key can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Left,
    Right,
    Jump,
}

/// Live key identifier -> held table
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys: HashMap<String, bool>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: &str) {
        self.keys.insert(key.to_owned(), true);
    }

    pub fn key_up(&mut self, key: &str) {
        self.keys.insert(key.to_owned(), false);
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.keys.get(key).copied().unwrap_or(false)
    }

    /// Forget every held key (e.g. on window blur)
    pub fn release_all(&mut self) {
        self.keys.clear();
    }
}

/// Which key identifiers trigger which action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub jump: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: vec!["ArrowLeft".into(), "a".into()],
            right: vec!["ArrowRight".into(), "d".into()],
            jump: vec![" ".into(), "ArrowUp".into(), "w".into()],
        }
    }
}

impl KeyBindings {
    pub fn keys_for(&self, action: Action) -> &[String] {
        match action {
            Action::Left => &self.left,
            Action::Right => &self.right,
            Action::Jump => &self.jump,
        }
    }

    /// First action bound to `key`, if any
    pub fn action_for(&self, key: &str) -> Option<Action> {
        [Action::Left, Action::Right, Action::Jump]
            .into_iter()
            .find(|&action| self.keys_for(action).iter().any(|k| k == key))
    }

    /// Keys whose browser default (page scroll) must be suppressed
    pub fn prevents_default(key: &str) -> bool {
        matches!(key, " " | "ArrowUp")
    }

    fn is_active(&self, action: Action, input: &InputState) -> bool {
        self.keys_for(action).iter().any(|k| input.is_held(k))
    }
}

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl TickInput {
    /// Sample the held-key table through the bindings
    pub fn resolve(input: &InputState, bindings: &KeyBindings) -> Self {
        Self {
            left: bindings.is_active(Action::Left, input),
            right: bindings.is_active(Action::Right, input),
            jump: bindings.is_active(Action::Jump, input),
        }
    }
}
