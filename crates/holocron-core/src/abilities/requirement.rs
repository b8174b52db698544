//! Requirement variants
//!
//! A closed set of gates; each is evaluated uniformly against an
//! [`UnlockContext`].

use super::UnlockContext;
use crate::alignment::AttunementAxis;
use crate::ids::AbilityId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether every member or at least one member of a set must hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementMode {
    /// Every member must hold
    #[default]
    All,
    /// At least one member must hold
    Any,
}

impl RequirementMode {
    /// Evaluate a membership test over `ids`
    ///
    /// The test returns `None` when the host has no registry to answer it;
    /// that fails the whole check. An empty set always passes.
    pub fn evaluate<'a, I, F>(&self, ids: I, mut test: F) -> bool
    where
        I: IntoIterator<Item = &'a str>,
        F: FnMut(&str) -> Option<bool>,
    {
        let mut ids = ids.into_iter().peekable();
        if ids.peek().is_none() {
            return true;
        }

        match self {
            Self::All => {
                for id in ids {
                    match test(id) {
                        Some(true) => {}
                        Some(false) | None => return false,
                    }
                }
                true
            }
            Self::Any => {
                for id in ids {
                    match test(id) {
                        Some(true) => return true,
                        Some(false) => {}
                        None => return false,
                    }
                }
                false
            }
        }
    }
}

/// Requirement variant discriminant, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementKind {
    /// Minimum level
    Level,
    /// Prerequisite abilities
    Abilities,
    /// Host traits
    Traits,
    /// Host conditions
    Conditions,
    /// Alignment threshold
    Alignment,
}

impl fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Level => "level",
            Self::Abilities => "abilities",
            Self::Traits => "traits",
            Self::Conditions => "conditions",
            Self::Alignment => "alignment",
        };
        f.write_str(name)
    }
}

/// A single unlock gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Requirement {
    /// Agent level must be at least `min`
    Level {
        /// Minimum level
        min: u32,
    },
    /// Prerequisite abilities must already be unlocked
    Abilities {
        /// Prerequisite ids
        ids: Vec<AbilityId>,
        /// ALL/ANY
        #[serde(default)]
        mode: RequirementMode,
    },
    /// Agent must carry host traits
    Traits {
        /// Trait ids
        ids: Vec<String>,
        /// ALL/ANY
        #[serde(default)]
        mode: RequirementMode,
    },
    /// Agent must be under host conditions
    Conditions {
        /// Condition ids
        ids: Vec<String>,
        /// ALL/ANY
        #[serde(default)]
        mode: RequirementMode,
    },
    /// Attunement on `axis` must be at least `min`
    Alignment {
        /// Axis checked
        axis: AttunementAxis,
        /// Minimum value
        min: f32,
    },
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list<'a>(ids: impl Iterator<Item = &'a str>, mode: RequirementMode) -> String {
            let joiner = match mode {
                RequirementMode::All => " + ",
                RequirementMode::Any => " | ",
            };
            ids.collect::<Vec<_>>().join(joiner)
        }

        match self {
            Self::Level { min } => write!(f, "level {}", min),
            Self::Abilities { ids, mode } => {
                write!(f, "abilities [{}]", list(ids.iter().map(AbilityId::as_str), *mode))
            }
            Self::Traits { ids, mode } => {
                write!(f, "traits [{}]", list(ids.iter().map(String::as_str), *mode))
            }
            Self::Conditions { ids, mode } => {
                write!(f, "conditions [{}]", list(ids.iter().map(String::as_str), *mode))
            }
            Self::Alignment { axis, min } => write!(f, "{} >= {:.0}", axis, min),
        }
    }
}

impl Requirement {
    /// Variant discriminant
    #[must_use]
    pub fn kind(&self) -> RequirementKind {
        match self {
            Self::Level { .. } => RequirementKind::Level,
            Self::Abilities { .. } => RequirementKind::Abilities,
            Self::Traits { .. } => RequirementKind::Traits,
            Self::Conditions { .. } => RequirementKind::Conditions,
            Self::Alignment { .. } => RequirementKind::Alignment,
        }
    }

    /// Check the gate against an agent snapshot
    #[must_use]
    pub fn is_satisfied_by(&self, ctx: &UnlockContext<'_>) -> bool {
        match self {
            Self::Level { min } => ctx.level >= *min,
            Self::Abilities { ids, mode } => mode.evaluate(ids.iter().map(AbilityId::as_str), |id| {
                Some(ctx.unlocked.contains(&AbilityId::from(id)))
            }),
            Self::Traits { ids, mode } => mode.evaluate(ids.iter().map(String::as_str), |id| {
                ctx.host.has_trait(ctx.agent, id)
            }),
            Self::Conditions { ids, mode } => {
                mode.evaluate(ids.iter().map(String::as_str), |id| {
                    ctx.host.has_condition(ctx.agent, id)
                })
            }
            Self::Alignment { axis, min } => ctx.alignment.get(*axis) >= *min,
        }
    }
}
