//! Roster of active force users
//!
//! The host owns one roster per game session. Records are keyed by agent id
//! and ordered, so iteration (and therefore the apprenticeship tick) is
//! deterministic.

use crate::config::ProgressionConfig;
use crate::error::{Error, Result};
use crate::force_user::{ForceUser, ProgressionRecord};
use crate::host::ProgressionHost;
use crate::ids::AgentId;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::debug;

/// Every active progression record
#[derive(Debug, Clone, Default)]
pub struct Roster {
    users: BTreeMap<AgentId, ForceUser>,
}

impl Roster {
    /// Empty roster
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from stored records, repairing each
    pub fn from_records(
        records: impl IntoIterator<Item = ProgressionRecord>,
        config: &ProgressionConfig,
    ) -> Self {
        let mut roster = Self::new();
        for record in records {
            roster.insert(ForceUser::from_record(record, config));
        }
        roster
    }

    /// Return the agent's record, creating a fresh one on first access
    pub fn activate(
        &mut self,
        agent: impl Into<AgentId>,
        name: impl Into<String>,
        config: &ProgressionConfig,
        host: &dyn ProgressionHost,
        rng: &mut impl Rng,
    ) -> &mut ForceUser {
        let agent = agent.into();
        self.users.entry(agent.clone()).or_insert_with(|| {
            debug!(agent = %agent, "Activating new force user");
            ForceUser::new(agent, name, config, host, rng)
        })
    }

    /// Insert or replace a record, returning the previous one
    pub fn insert(&mut self, user: ForceUser) -> Option<ForceUser> {
        self.users.insert(user.agent().clone(), user)
    }

    /// Remove a record outright
    ///
    /// Apprenticeship links pointing at it are left dangling; prefer
    /// [`ApprenticeshipCoordinator::remove_agent`](crate::apprenticeship::ApprenticeshipCoordinator::remove_agent).
    pub fn remove(&mut self, agent: &AgentId) -> Option<ForceUser> {
        self.users.remove(agent)
    }

    /// Look up a record
    #[must_use]
    pub fn get(&self, agent: &AgentId) -> Option<&ForceUser> {
        self.users.get(agent)
    }

    /// Look up a record mutably
    pub fn get_mut(&mut self, agent: &AgentId) -> Option<&mut ForceUser> {
        self.users.get_mut(agent)
    }

    /// Look up a record or fail with [`Error::UnknownAgent`]
    pub fn require(&self, agent: &AgentId) -> Result<&ForceUser> {
        self.users
            .get(agent)
            .ok_or_else(|| Error::UnknownAgent(agent.to_string()))
    }

    /// Mutable [`require`](Self::require)
    pub fn require_mut(&mut self, agent: &AgentId) -> Result<&mut ForceUser> {
        self.users
            .get_mut(agent)
            .ok_or_else(|| Error::UnknownAgent(agent.to_string()))
    }

    /// Whether the agent has a record
    #[must_use]
    pub fn contains(&self, agent: &AgentId) -> bool {
        self.users.contains_key(agent)
    }

    /// Agent ids in order
    #[must_use]
    pub fn ids(&self) -> Vec<AgentId> {
        self.users.keys().cloned().collect()
    }

    /// Records in agent order
    pub fn iter(&self) -> impl Iterator<Item = &ForceUser> {
        self.users.values()
    }

    /// Mutable records in agent order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ForceUser> {
        self.users.values_mut()
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the roster is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Serializable records in agent order
    #[must_use]
    pub fn records(&self) -> Vec<&ProgressionRecord> {
        self.users.values().map(ForceUser::record).collect()
    }
}

#[cfg(test)]
mod tests;
