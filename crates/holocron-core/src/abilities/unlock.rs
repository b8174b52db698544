//! Unlock evaluation

use super::{AbilityDef, RequirementKind};
use crate::alignment::Alignment;
use crate::host::ProgressionHost;
use crate::ids::{AbilityId, AgentId};
use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, warn};

/// Why an unlock was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum UnlockRejection {
    /// The ability is not in the catalog
    #[error("ability not found")]
    MissingAbility,
    /// No ability points left
    #[error("no ability points available")]
    NoAbilityPoints,
    /// Already unlocked
    #[error("ability already unlocked")]
    AlreadyUnlocked,
    /// The ability carries no requirements block
    #[error("ability has no requirements block")]
    NoRequirements,
    /// A requirement does not hold
    #[error("{0} requirement not met")]
    Unmet(RequirementKind),
}

/// Borrowed snapshot of one agent's unlock-relevant state
pub struct UnlockContext<'a> {
    /// Agent being evaluated
    pub agent: &'a AgentId,
    /// Current level
    pub level: u32,
    /// Available ability points
    pub ability_points: u32,
    /// Already unlocked abilities
    pub unlocked: &'a BTreeSet<AbilityId>,
    /// Attunement meters
    pub alignment: &'a Alignment,
    /// Trait and condition predicates
    pub host: &'a dyn ProgressionHost,
}

impl UnlockContext<'_> {
    /// Run every check in order and report the first failure
    pub fn check(&self, ability: Option<&AbilityDef>) -> Result<(), UnlockRejection> {
        let Some(ability) = ability else {
            warn!(agent = %self.agent, "Unlock requested for an unknown ability");
            return Err(UnlockRejection::MissingAbility);
        };

        if self.ability_points == 0 {
            return Err(self.reject(ability, UnlockRejection::NoAbilityPoints));
        }
        if self.unlocked.contains(&ability.id) {
            return Err(self.reject(ability, UnlockRejection::AlreadyUnlocked));
        }
        let Some(requirements) = ability.requirements.as_ref() else {
            return Err(self.reject(ability, UnlockRejection::NoRequirements));
        };

        let mut ordered: Vec<_> = requirements.iter().collect();
        ordered.sort_by_key(|r| r.kind());

        for requirement in ordered {
            if !requirement.is_satisfied_by(self) {
                return Err(self.reject(ability, UnlockRejection::Unmet(requirement.kind())));
            }
        }

        Ok(())
    }

    /// Whether `ability` may be unlocked right now
    #[must_use]
    pub fn can_unlock(&self, ability: Option<&AbilityDef>) -> bool {
        self.check(ability).is_ok()
    }

    fn reject(&self, ability: &AbilityDef, rejection: UnlockRejection) -> UnlockRejection {
        debug!(
            agent = %self.agent,
            ability = %ability.id,
            reason = %rejection,
            "Unlock rejected"
        );
        rejection
    }
}

#[cfg(test)]
mod tests;
