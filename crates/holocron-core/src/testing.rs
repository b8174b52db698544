//! Test doubles shared by the unit tests

use crate::events::ProgressionEvent;
use crate::host::{HostStat, ProgressionHost, StatusEffect};
use crate::ids::{AbilityId, AgentId};
use std::collections::{BTreeMap, BTreeSet};

/// In-memory host that records every side effect
#[derive(Debug, Default)]
pub(crate) struct RecordingHost {
    pub traits: BTreeMap<AgentId, BTreeSet<String>>,
    pub conditions: BTreeMap<AgentId, BTreeSet<String>>,
    pub multipliers: BTreeMap<(AgentId, HostStat), f32>,
    pub granted: BTreeMap<AgentId, BTreeSet<AbilityId>>,
    pub statuses: BTreeSet<(AgentId, StatusEffect)>,
    pub events: Vec<ProgressionEvent>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_traits(mut self, agent: &str, traits: &[&str]) -> Self {
        self.traits.insert(
            AgentId::from(agent),
            traits.iter().map(|t| t.to_string()).collect(),
        );
        self
    }

    pub fn with_conditions(mut self, agent: &str, conditions: &[&str]) -> Self {
        self.conditions.insert(
            AgentId::from(agent),
            conditions.iter().map(|c| c.to_string()).collect(),
        );
        self
    }

    pub fn with_multiplier(mut self, agent: &str, stat: HostStat, value: f32) -> Self {
        self.multipliers.insert((AgentId::from(agent), stat), value);
        self
    }

    pub fn granted(&self, agent: &str) -> BTreeSet<AbilityId> {
        self.granted
            .get(&AgentId::from(agent))
            .cloned()
            .unwrap_or_default()
    }

    pub fn count(&self, kind: &str) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }
}

impl ProgressionHost for RecordingHost {
    fn stat_multiplier(&self, agent: &AgentId, stat: HostStat) -> f32 {
        self.multipliers
            .get(&(agent.clone(), stat))
            .copied()
            .unwrap_or(1.0)
    }

    fn has_trait(&self, agent: &AgentId, trait_id: &str) -> Option<bool> {
        self.traits.get(agent).map(|t| t.contains(trait_id))
    }

    fn has_condition(&self, agent: &AgentId, condition_id: &str) -> Option<bool> {
        self.conditions.get(agent).map(|c| c.contains(condition_id))
    }

    fn materialize_ability(&mut self, agent: &AgentId, ability: &AbilityId) {
        self.granted
            .entry(agent.clone())
            .or_default()
            .insert(ability.clone());
    }

    fn remove_ability(&mut self, agent: &AgentId, ability: &AbilityId) {
        if let Some(granted) = self.granted.get_mut(agent) {
            granted.remove(ability);
        }
    }

    fn has_status(&self, agent: &AgentId, status: StatusEffect) -> bool {
        self.statuses.contains(&(agent.clone(), status))
    }

    fn apply_status(&mut self, agent: &AgentId, status: StatusEffect) {
        self.statuses.insert((agent.clone(), status));
    }

    fn notify(&mut self, event: ProgressionEvent) {
        self.events.push(event);
    }
}
