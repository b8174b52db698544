//! Host collaborators
//!
//! The engine reads stats and trait/condition membership from the host,
//! asks it to materialize or remove granted abilities, and reports events to
//! it. Everything the host owns stays behind this trait.

use crate::events::ProgressionEvent;
use crate::ids::{AbilityId, AgentId};
use serde::{Deserialize, Serialize};

/// Per-agent stats the engine queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostStat {
    /// Multiplier on experience gains
    ExperienceGain,
    /// Multiplier on the force pool maximum
    ForcePoolMax,
}

/// Status effects the engine applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusEffect {
    /// Mutual master/apprentice bond
    ApprenticeBond,
}

/// Everything the engine needs from the host
#[cfg_attr(test, mockall::automock)]
pub trait ProgressionHost {
    /// Numeric stat multiplier for the agent (1.0 = neutral)
    fn stat_multiplier(&self, agent: &AgentId, stat: HostStat) -> f32;

    /// Trait membership; `None` when the agent has no trait registry
    fn has_trait(&self, agent: &AgentId, trait_id: &str) -> Option<bool>;

    /// Condition membership; `None` when the agent has no condition registry
    fn has_condition(&self, agent: &AgentId, condition_id: &str) -> Option<bool>;

    /// Grant the ability on the underlying agent
    fn materialize_ability(&mut self, agent: &AgentId, ability: &AbilityId);

    /// Take the ability away from the underlying agent
    fn remove_ability(&mut self, agent: &AgentId, ability: &AbilityId);

    /// Whether the agent currently carries a status effect
    fn has_status(&self, agent: &AgentId, status: StatusEffect) -> bool;

    /// Apply a status effect to the agent
    fn apply_status(&mut self, agent: &AgentId, status: StatusEffect);

    /// Report an event
    fn notify(&mut self, event: ProgressionEvent);
}

/// Host that answers neutrally and discards everything
///
/// Numeric state is still applied when driving the engine with it; only the
/// side effects are dropped. Trait and condition requirements always fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl ProgressionHost for NullHost {
    fn stat_multiplier(&self, _agent: &AgentId, _stat: HostStat) -> f32 {
        1.0
    }

    fn has_trait(&self, _agent: &AgentId, _trait_id: &str) -> Option<bool> {
        None
    }

    fn has_condition(&self, _agent: &AgentId, _condition_id: &str) -> Option<bool> {
        None
    }

    fn materialize_ability(&mut self, _agent: &AgentId, _ability: &AbilityId) {}

    fn remove_ability(&mut self, _agent: &AgentId, _ability: &AbilityId) {}

    fn has_status(&self, _agent: &AgentId, _status: StatusEffect) -> bool {
        false
    }

    fn apply_status(&mut self, _agent: &AgentId, _status: StatusEffect) {}

    fn notify(&mut self, _event: ProgressionEvent) {}
}
