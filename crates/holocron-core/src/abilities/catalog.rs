//! Ability catalog
//!
//! The engine only reads the catalog. [`AbilityTable`] is the in-memory
//! catalog loaded from TOML; hosts with their own registry implement
//! [`AbilityCatalog`] directly.

use super::{Requirement, RequirementMode};
use crate::alignment::AttunementAxis;
use crate::error::{Error, Result};
use crate::ids::AbilityId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Read-only ability registry
pub trait AbilityCatalog {
    /// Look up one ability
    fn ability(&self, id: &AbilityId) -> Option<&AbilityDef>;

    /// Every ability, in id order
    fn abilities(&self) -> Vec<&AbilityDef>;
}

/// Ability definition
///
/// `requirements == None` means no requirements block is attached;
/// such an ability can never be unlocked. `Some(vec![])` is unrestricted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityDef {
    /// Ability id
    pub id: AbilityId,
    /// Display label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Unlock gates
    #[serde(default)]
    pub requirements: Option<Vec<Requirement>>,
}

impl AbilityDef {
    /// Unrestricted ability
    #[must_use]
    pub fn new(id: impl Into<AbilityId>) -> Self {
        Self {
            id: id.into(),
            label: None,
            requirements: Some(Vec::new()),
        }
    }

    /// Ability without any requirements block
    #[must_use]
    pub fn unspecified(id: impl Into<AbilityId>) -> Self {
        Self {
            id: id.into(),
            label: None,
            requirements: None,
        }
    }

    /// Set the display label
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Append a requirement
    #[must_use]
    pub fn with_requirement(mut self, requirement: Requirement) -> Self {
        self.requirements
            .get_or_insert_with(Vec::new)
            .push(requirement);
        self
    }

    /// Require a minimum level
    #[must_use]
    pub fn requires_level(self, min: u32) -> Self {
        self.with_requirement(Requirement::Level { min })
    }

    /// Require prerequisite abilities
    #[must_use]
    pub fn requires_abilities<I, S>(self, ids: I, mode: RequirementMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<AbilityId>,
    {
        self.with_requirement(Requirement::Abilities {
            ids: ids.into_iter().map(Into::into).collect(),
            mode,
        })
    }

    /// Require host traits
    #[must_use]
    pub fn requires_traits<I, S>(self, ids: I, mode: RequirementMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_requirement(Requirement::Traits {
            ids: ids.into_iter().map(Into::into).collect(),
            mode,
        })
    }

    /// Require host conditions
    #[must_use]
    pub fn requires_conditions<I, S>(self, ids: I, mode: RequirementMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_requirement(Requirement::Conditions {
            ids: ids.into_iter().map(Into::into).collect(),
            mode,
        })
    }

    /// Require an attunement threshold
    #[must_use]
    pub fn requires_alignment(self, axis: AttunementAxis, min: f32) -> Self {
        self.with_requirement(Requirement::Alignment { axis, min })
    }

    /// Display label, falling back to the id
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or_else(|| self.id.as_str())
    }
}

#[derive(Debug, Default, Deserialize)]
struct AbilityTableFile {
    #[serde(default)]
    abilities: Vec<AbilityDef>,
}

/// In-memory ability catalog
#[derive(Debug, Clone, Default)]
pub struct AbilityTable {
    abilities: BTreeMap<AbilityId, AbilityDef>,
}

impl AbilityTable {
    /// Build from definitions; duplicate ids are rejected
    pub fn from_abilities(abilities: impl IntoIterator<Item = AbilityDef>) -> Result<Self> {
        let mut table = BTreeMap::new();
        for ability in abilities {
            let id = ability.id.clone();
            if table.insert(id.clone(), ability).is_some() {
                return Err(Error::InvalidConfig {
                    field: "abilities".to_string(),
                    message: format!("duplicate ability id '{}'", id),
                });
            }
        }

        let table = Self { abilities: table };
        for (ability, missing) in table.dangling_prerequisites() {
            warn!(ability = %ability, missing = %missing, "Ability references unknown prerequisite");
        }
        Ok(table)
    }

    /// Parse a TOML document with `[[abilities]]` entries
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: AbilityTableFile = toml::from_str(content)
            .map_err(|e| Error::Serialization(format!("Failed to parse ability table: {}", e)))?;
        Self::from_abilities(file.abilities)
    }

    /// Load a TOML ability table from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Internal(format!("Failed to read {:?}: {}", path, e)))?;
        let table = Self::from_toml_str(&content)?;
        debug!(path = ?path, count = table.len(), "Ability table loaded");
        Ok(table)
    }

    /// Number of abilities
    #[must_use]
    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    /// Whether the table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }

    /// `(ability, missing prerequisite)` pairs
    #[must_use]
    pub fn dangling_prerequisites(&self) -> Vec<(AbilityId, AbilityId)> {
        let mut dangling = Vec::new();
        for ability in self.abilities.values() {
            for requirement in ability.requirements.iter().flatten() {
                if let Requirement::Abilities { ids, .. } = requirement {
                    for id in ids {
                        if !self.abilities.contains_key(id) {
                            dangling.push((ability.id.clone(), id.clone()));
                        }
                    }
                }
            }
        }
        dangling
    }
}

impl AbilityCatalog for AbilityTable {
    fn ability(&self, id: &AbilityId) -> Option<&AbilityDef> {
        self.abilities.get(id)
    }

    fn abilities(&self) -> Vec<&AbilityDef> {
        self.abilities.values().collect()
    }
}

#[cfg(test)]
mod tests;
