//! Player preferences
//!
//! Persisted separately from the score history.

use serde::{Deserialize, Serialize};

use crate::persistence::{Storage, StoreError, load_json, save_json};
use crate::sim::KeyBindings;

/// Game settings/preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Keyboard controls
    #[serde(default)]
    pub bindings: KeyBindings,
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "jump_and_run_settings";

    /// Load settings, falling back to defaults when absent or unreadable
    pub fn load(storage: &impl Storage) -> Self {
        match load_json(storage, Self::STORAGE_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring unreadable settings: {e}");
                Self::default()
            }
        }
    }

    /// Write settings back. The game itself never edits bindings; players
    /// change the stored JSON directly.
    pub fn save(&self, storage: &mut impl Storage) -> Result<(), StoreError> {
        save_json(storage, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
