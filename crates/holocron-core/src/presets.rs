//! Ability Presets
//!
//! A preset is a named loadout: the subset of an agent's unlocked abilities
//! that is currently active. Unlocking and activation are separate; a newly
//! unlocked ability is activated in `"Default"` and in the current preset
//! only, so curated alternate loadouts are left untouched.

use crate::ids::AbilityId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::{debug, error, warn};

/// Name of the preset that always exists
pub const DEFAULT_PRESET: &str = "Default";

/// Refused preset operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum PresetError {
    /// Save target already exists
    #[error("preset '{0}' already exists")]
    AlreadyExists(String),
    /// No preset with that name
    #[error("preset '{0}' not found")]
    NotFound(String),
    /// Only one preset is left
    #[error("cannot delete the last remaining preset")]
    LastPreset,
    /// `"Default"` cannot be deleted while other presets exist
    #[error("the default preset cannot be deleted")]
    Protected,
    /// Empty or blank name
    #[error("preset name must not be blank")]
    InvalidName,
    /// Toggled ability is not unlocked
    #[error("ability '{0}' is not unlocked")]
    NotUnlocked(AbilityId),
}

/// Named set of active abilities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    /// Preset name (mirrors its key)
    #[serde(default)]
    pub name: String,
    /// Active ability ids
    #[serde(default)]
    pub active: BTreeSet<AbilityId>,
}

impl Preset {
    /// Empty preset
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: BTreeSet::new(),
        }
    }
}

/// Preset map plus the current selection
///
/// `"Default"` always exists and `current` always names an existing preset
/// once [`ensure_default_preset`](Self::ensure_default_preset) has run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetManager {
    #[serde(default)]
    presets: BTreeMap<String, Preset>,
    #[serde(default)]
    current: String,
}

impl Default for PresetManager {
    fn default() -> Self {
        let mut presets = BTreeMap::new();
        presets.insert(DEFAULT_PRESET.to_string(), Preset::new(DEFAULT_PRESET));
        Self {
            presets,
            current: DEFAULT_PRESET.to_string(),
        }
    }
}

impl PresetManager {
    /// Only `"Default"`, selected
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent repair of partial or corrupted state
    ///
    /// Returns `true` when anything had to change.
    pub fn ensure_default_preset(&mut self) -> bool {
        let mut repaired = false;

        for (key, preset) in self.presets.iter_mut() {
            if preset.name != *key {
                warn!(key = %key, name = %preset.name, "Repairing preset name");
                preset.name = key.clone();
                repaired = true;
            }
        }

        if !self.presets.contains_key(DEFAULT_PRESET) {
            warn!("Default preset missing, recreating");
            self.presets
                .insert(DEFAULT_PRESET.to_string(), Preset::new(DEFAULT_PRESET));
            repaired = true;
        }

        if !self.presets.contains_key(&self.current) {
            warn!(current = %self.current, "Current preset dangling, falling back to Default");
            self.current = DEFAULT_PRESET.to_string();
            repaired = true;
        }

        if !self.is_consistent() {
            error!("Preset state could not be repaired, rebuilding from scratch");
            *self = Self::default();
            repaired = true;
        }

        repaired
    }

    fn is_consistent(&self) -> bool {
        self.presets.contains_key(DEFAULT_PRESET)
            && self.presets.contains_key(&self.current)
            && self.presets.iter().all(|(key, preset)| preset.name == *key)
    }

    /// Name of the selected preset
    #[must_use]
    pub fn current_name(&self) -> &str {
        &self.current
    }

    /// The selected preset
    #[must_use]
    pub fn current(&self) -> Option<&Preset> {
        self.presets.get(&self.current)
    }

    /// Look up a preset
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets.get(name)
    }

    /// Whether a preset exists
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.presets.contains_key(name)
    }

    /// Preset names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    /// Number of presets
    #[must_use]
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Whether no presets exist (only before repair)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Copy the current preset's active set into a new preset and select it
    ///
    /// Returns `false` without touching anything when `name` already exists;
    /// callers check first.
    pub fn save_current_as(&mut self, name: &str) -> bool {
        if self.presets.contains_key(name) {
            return false;
        }

        let active = self
            .current()
            .map(|p| p.active.clone())
            .unwrap_or_default();
        self.presets.insert(
            name.to_string(),
            Preset {
                name: name.to_string(),
                active,
            },
        );
        self.current = name.to_string();
        debug!(preset = %name, "Preset saved");
        true
    }

    /// Select an existing preset
    pub fn load(&mut self, name: &str) -> bool {
        if !self.presets.contains_key(name) {
            return false;
        }
        self.current = name.to_string();
        true
    }

    /// Activate or deactivate an unlocked ability in the current preset
    pub fn toggle(&mut self, id: &AbilityId, active: bool, unlocked: &BTreeSet<AbilityId>) -> bool {
        if !unlocked.contains(id) {
            warn!(ability = %id, "Cannot toggle an ability that is not unlocked");
            return false;
        }

        let current = self.current.clone();
        let preset = self
            .presets
            .entry(current.clone())
            .or_insert_with(|| Preset::new(current));
        if active {
            preset.active.insert(id.clone());
        } else {
            preset.active.remove(id);
        }
        true
    }

    /// Remove a preset
    ///
    /// When the removed preset was selected, selection falls back to the
    /// first remaining preset, or to a recreated `"Default"` when none remain.
    /// This does not guard against deleting the last preset.
    pub fn delete(&mut self, name: &str) -> bool {
        if self.presets.remove(name).is_none() {
            return false;
        }

        if self.current == name {
            self.current = match self.presets.keys().next() {
                Some(first) => first.clone(),
                None => {
                    self.presets
                        .insert(DEFAULT_PRESET.to_string(), Preset::new(DEFAULT_PRESET));
                    DEFAULT_PRESET.to_string()
                }
            };
        }
        debug!(preset = %name, current = %self.current, "Preset deleted");
        true
    }

    /// Unlocked and active in the current preset
    #[must_use]
    pub fn is_active(&self, id: &AbilityId, unlocked: &BTreeSet<AbilityId>) -> bool {
        unlocked.contains(id) && self.current().is_some_and(|p| p.active.contains(id))
    }

    /// Active abilities of the current preset that are unlocked
    #[must_use]
    pub fn active_abilities(&self, unlocked: &BTreeSet<AbilityId>) -> BTreeSet<AbilityId> {
        self.current()
            .map(|p| p.active.intersection(unlocked).cloned().collect())
            .unwrap_or_default()
    }

    /// Force-activate a newly unlocked ability in the current preset and
    /// in `"Default"`
    pub fn activate_unlocked(&mut self, id: &AbilityId) {
        for name in [self.current.clone(), DEFAULT_PRESET.to_string()] {
            self.presets
                .entry(name.clone())
                .or_insert_with(|| Preset::new(name))
                .active
                .insert(id.clone());
        }
    }

    /// Drop ids that are no longer unlocked from every preset
    ///
    /// Returns how many entries were removed.
    pub fn prune(&mut self, unlocked: &BTreeSet<AbilityId>) -> usize {
        let mut removed = 0;
        for preset in self.presets.values_mut() {
            let before = preset.active.len();
            preset.active.retain(|id| unlocked.contains(id));
            removed += before - preset.active.len();
        }
        removed
    }
}

#[cfg(test)]
mod tests;
