//! Apprenticeship
//!
//! Masters train apprentices. On a randomized interval each apprentice gains
//! experience proportional to the level gap, graduating once it catches up;
//! on a fixed cooldown master and apprentice roll for a mutual bond. Links
//! are stored on both records: the master holds its apprentice set and
//! graduate count, the apprentice holds its master and tick counters.

use crate::alignment::{Alignment, AttunementAxis};
use crate::config::ProgressionConfig;
use crate::events::{BackstoryReason, ProgressionEvent, ReleaseReason};
use crate::force_user::ForceUser;
use crate::host::{ProgressionHost, StatusEffect};
use crate::ids::AgentId;
use crate::roster::Roster;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Title earned by a master after enough graduations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasterTitle {
    /// Light-leaning master
    GrandMaster,
    /// Dark-leaning master
    DarkLord,
}

impl MasterTitle {
    /// Title matching the dominant attunement
    #[must_use]
    pub fn for_alignment(alignment: &Alignment) -> Self {
        match alignment.dominant() {
            AttunementAxis::Light => Self::GrandMaster,
            AttunementAxis::Dark => Self::DarkLord,
        }
    }

    /// Human readable title
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GrandMaster => "Grand Master",
            Self::DarkLord => "Dark Lord",
        }
    }
}

impl std::fmt::Display for MasterTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Apprenticeship state stored on each record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprenticeshipLink {
    /// Current apprentices (master side)
    #[serde(default)]
    pub apprentices: BTreeSet<AgentId>,
    /// How many apprentices this master may train at once
    #[serde(default)]
    pub capacity: u32,
    /// Apprentices graduated so far
    #[serde(default)]
    pub graduated_count: u32,
    /// Title, once earned
    #[serde(default)]
    pub promotion: Option<MasterTitle>,
    /// Current master (apprentice side)
    #[serde(default)]
    pub master: Option<AgentId>,
    /// Ticks since the last experience grant
    #[serde(default)]
    pub ticks_since_experience: u32,
    /// Ticks between experience grants, rolled at assignment
    #[serde(default)]
    pub experience_interval_ticks: u32,
    /// Ticks since the last bond attempt
    #[serde(default)]
    pub ticks_since_bond_attempt: u32,
}

impl ApprenticeshipLink {
    /// Unlinked state with the given master capacity
    #[must_use]
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Whether this agent currently trains anyone
    #[must_use]
    pub fn is_master(&self) -> bool {
        !self.apprentices.is_empty()
    }

    /// Whether this agent currently has a master
    #[must_use]
    pub fn is_apprentice(&self) -> bool {
        self.master.is_some()
    }

    fn clear_master(&mut self) -> Option<AgentId> {
        self.ticks_since_experience = 0;
        self.experience_interval_ticks = 0;
        self.ticks_since_bond_attempt = 0;
        self.master.take()
    }
}

/// Rejected assignments
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignError {
    /// One of the agents has no progression record
    #[error("unknown agent: {0}")]
    UnknownAgent(AgentId),

    /// Master and apprentice are the same agent
    #[error("an agent cannot apprentice themselves")]
    SelfAssignment,

    /// The apprentice already has a master
    #[error("{apprentice} is already apprenticed to {master}")]
    AlreadyApprenticed {
        /// Apprentice id
        apprentice: AgentId,
        /// Existing master
        master: AgentId,
    },

    /// The master is at capacity
    #[error("master already trains {capacity} apprentice(s)")]
    CapacityReached {
        /// Capacity in effect
        capacity: u32,
    },

    /// The apprentice is the master's master, directly or transitively
    #[error("assignment would create a training cycle")]
    WouldCreateCycle,
}

/// What one tick did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Apprentices that received interval experience
    pub experience_grants: Vec<AgentId>,
    /// Apprentices that graduated
    pub graduations: Vec<AgentId>,
    /// Apprentices that newly bonded with their master
    pub bonds: Vec<AgentId>,
}

/// Drives every master/apprentice relationship in a roster
#[derive(Debug, Clone)]
pub struct ApprenticeshipCoordinator {
    config: ProgressionConfig,
}

impl ApprenticeshipCoordinator {
    /// Coordinator using `config` for intervals, rewards and promotion
    #[must_use]
    pub fn new(config: ProgressionConfig) -> Self {
        Self { config }
    }

    /// Configuration in effect
    #[must_use]
    pub fn config(&self) -> &ProgressionConfig {
        &self.config
    }

    /// Link `apprentice` to `master`
    ///
    /// The experience interval is rolled uniformly between the configured
    /// minimum and maximum number of days.
    pub fn assign(
        &self,
        roster: &mut Roster,
        master: &AgentId,
        apprentice: &AgentId,
        rng: &mut impl Rng,
    ) -> Result<(), AssignError> {
        if master == apprentice {
            return Err(AssignError::SelfAssignment);
        }
        let master_user = roster
            .get(master)
            .ok_or_else(|| AssignError::UnknownAgent(master.clone()))?;
        let apprentice_user = roster
            .get(apprentice)
            .ok_or_else(|| AssignError::UnknownAgent(apprentice.clone()))?;

        if let Some(existing) = &apprentice_user.apprenticeship().master {
            return Err(AssignError::AlreadyApprenticed {
                apprentice: apprentice.clone(),
                master: existing.clone(),
            });
        }

        let link = master_user.apprenticeship();
        // Idle masters pick up the current capacity setting
        let capacity = if link.is_master() {
            link.capacity
        } else {
            self.config.apprenticeship.capacity
        };
        if link.apprentices.len() >= capacity as usize {
            return Err(AssignError::CapacityReached { capacity });
        }

        if Self::trains(roster, apprentice, master) {
            return Err(AssignError::WouldCreateCycle);
        }

        let ap = &self.config.apprenticeship;
        let days = rng.gen_range(ap.experience_interval_min_days..=ap.experience_interval_max_days);
        let interval = days.saturating_mul(ap.ticks_per_day);

        if let Some(user) = roster.get_mut(master) {
            let link = user.apprenticeship_mut();
            link.capacity = capacity;
            link.apprentices.insert(apprentice.clone());
        }
        if let Some(user) = roster.get_mut(apprentice) {
            let link = user.apprenticeship_mut();
            link.clear_master();
            link.master = Some(master.clone());
            link.experience_interval_ticks = interval;
        }

        info!(master = %master, apprentice = %apprentice, interval_days = days, "Apprentice assigned");
        Ok(())
    }

    /// Whether `ancestor` sits anywhere above `agent` in the master chain
    fn trains(roster: &Roster, ancestor: &AgentId, agent: &AgentId) -> bool {
        let mut current = roster
            .get(agent)
            .and_then(|u| u.apprenticeship().master.clone());
        let mut steps = 0;
        while let Some(id) = current {
            if &id == ancestor {
                return true;
            }
            steps += 1;
            if steps > roster.len() {
                warn!(agent = %agent, "Master chain loops, stopping walk");
                return true;
            }
            current = roster
                .get(&id)
                .and_then(|u| u.apprenticeship().master.clone());
        }
        false
    }

    /// Advance every apprenticeship by `elapsed_ticks`
    ///
    /// Called on the host's simulation tick, after each record's preset
    /// repair has run.
    pub fn tick(
        &self,
        roster: &mut Roster,
        host: &mut dyn ProgressionHost,
        rng: &mut impl Rng,
        elapsed_ticks: u32,
    ) -> TickSummary {
        let mut summary = TickSummary::default();
        let apprentices: Vec<AgentId> = roster
            .iter()
            .filter(|u| u.apprenticeship().is_apprentice())
            .map(|u| u.agent().clone())
            .collect();

        for id in apprentices {
            self.tick_apprentice(roster, &id, host, rng, elapsed_ticks, &mut summary);
        }
        summary
    }

    fn tick_apprentice(
        &self,
        roster: &mut Roster,
        id: &AgentId,
        host: &mut dyn ProgressionHost,
        rng: &mut impl Rng,
        elapsed_ticks: u32,
        summary: &mut TickSummary,
    ) {
        let Some(mut apprentice) = roster.remove(id) else {
            return;
        };
        let Some(master_id) = apprentice.apprenticeship().master.clone() else {
            roster.insert(apprentice);
            return;
        };
        let Some(mut master) = roster.remove(&master_id) else {
            warn!(apprentice = %id, master = %master_id, "Master record missing, releasing apprentice");
            apprentice.apprenticeship_mut().clear_master();
            roster.insert(apprentice);
            return;
        };

        let link = apprentice.apprenticeship_mut();
        link.ticks_since_experience = link.ticks_since_experience.saturating_add(elapsed_ticks);
        link.ticks_since_bond_attempt = link.ticks_since_bond_attempt.saturating_add(elapsed_ticks);

        if link.ticks_since_experience >= link.experience_interval_ticks {
            link.ticks_since_experience = 0;
            if apprentice.level() < master.level() {
                let gap = master.level() - apprentice.level();
                let reward = gap as f32 * self.config.apprenticeship.experience_per_level_difference;
                debug!(apprentice = %id, master = %master_id, gap, reward, "Apprenticeship experience");
                apprentice.add_experience(reward, &self.config, host);
                summary.experience_grants.push(id.clone());
            }
            if apprentice.level() >= master.level() {
                self.graduate(&mut master, &mut apprentice, host);
                summary.graduations.push(id.clone());
            }
        }

        if apprentice.apprenticeship().is_apprentice() {
            let link = apprentice.apprenticeship_mut();
            if link.ticks_since_bond_attempt >= self.config.apprenticeship.bond_cooldown_ticks() {
                link.ticks_since_bond_attempt = 0;
                if rng.gen_bool(self.config.apprenticeship.bond_chance)
                    && Self::bond(&master, &apprentice, host)
                {
                    summary.bonds.push(id.clone());
                }
            }
        }

        roster.insert(master);
        roster.insert(apprentice);
    }

    fn graduate(
        &self,
        master: &mut ForceUser,
        apprentice: &mut ForceUser,
        host: &mut dyn ProgressionHost,
    ) {
        apprentice.apprenticeship_mut().clear_master();
        let link = master.apprenticeship_mut();
        link.apprentices.remove(apprentice.agent());
        link.graduated_count = link.graduated_count.saturating_add(1);
        let graduated_count = link.graduated_count;

        info!(
            master = %master.agent(),
            apprentice = %apprentice.agent(),
            graduated_count,
            "Apprentice graduated"
        );
        host.notify(ProgressionEvent::Graduated {
            master: master.agent().clone(),
            apprentice: apprentice.agent().clone(),
            graduated_count,
        });
        host.notify(ProgressionEvent::BackstoryPrompt {
            agent: apprentice.agent().clone(),
            reason: BackstoryReason::Graduation,
        });

        self.maybe_promote(master, host);
    }

    /// Award a title once graduate count and level allow it
    ///
    /// Idempotent: a master is promoted at most once.
    pub fn maybe_promote(&self, master: &mut ForceUser, host: &mut dyn ProgressionHost) -> bool {
        let ap = &self.config.apprenticeship;
        let level = master.level();
        let alignment = *master.alignment();
        let link = master.apprenticeship_mut();
        if link.promotion.is_some()
            || link.graduated_count < ap.promotion_graduates
            || level < ap.promotion_level
        {
            return false;
        }

        let title = MasterTitle::for_alignment(&alignment);
        link.promotion = Some(title);
        info!(agent = %master.agent(), title = %title, "Master promoted");
        host.notify(ProgressionEvent::Promoted {
            agent: master.agent().clone(),
            title,
        });
        true
    }

    fn bond(master: &ForceUser, apprentice: &ForceUser, host: &mut dyn ProgressionHost) -> bool {
        let status = StatusEffect::ApprenticeBond;
        let master_bonded = host.has_status(master.agent(), status);
        let apprentice_bonded = host.has_status(apprentice.agent(), status);
        if master_bonded && apprentice_bonded {
            return false;
        }
        if !master_bonded {
            host.apply_status(master.agent(), status);
        }
        if !apprentice_bonded {
            host.apply_status(apprentice.agent(), status);
        }
        info!(master = %master.agent(), apprentice = %apprentice.agent(), "Bond formed");
        host.notify(ProgressionEvent::Bonded {
            master: master.agent().clone(),
            apprentice: apprentice.agent().clone(),
        });
        true
    }

    /// End every apprenticeship of a master that died
    ///
    /// If `killer` is one of the master's apprentices and that apprentice's
    /// dark attunement exceeds its light attunement, the release counts as a
    /// betrayal and the host is asked for a backstory prompt. The master's own
    /// link to its master (if any) is dissolved as well.
    pub fn master_killed(
        &self,
        roster: &mut Roster,
        master: &AgentId,
        killer: Option<&AgentId>,
        host: &mut dyn ProgressionHost,
    ) -> usize {
        let Some(user) = roster.get_mut(master) else {
            return 0;
        };
        let apprentices = std::mem::take(&mut user.apprenticeship_mut().apprentices);
        let upstream = user.apprenticeship_mut().clear_master();

        let mut released = 0;
        for id in &apprentices {
            let Some(apprentice) = roster.get_mut(id) else {
                continue;
            };
            apprentice.apprenticeship_mut().clear_master();

            let alignment = apprentice.alignment();
            let betrayal = killer == Some(id) && alignment.dark() > alignment.light();
            let reason = if betrayal {
                ReleaseReason::Betrayal
            } else {
                ReleaseReason::MasterKilled
            };

            info!(master = %master, apprentice = %id, ?reason, "Apprenticeship ended by death");
            host.notify(ProgressionEvent::ApprenticeReleased {
                master: master.clone(),
                apprentice: id.clone(),
                reason,
            });
            if betrayal {
                host.notify(ProgressionEvent::BackstoryPrompt {
                    agent: id.clone(),
                    reason: BackstoryReason::Betrayal,
                });
            }
            released += 1;
        }

        if let Some(upstream) = upstream {
            if let Some(grand) = roster.get_mut(&upstream) {
                grand.apprenticeship_mut().apprentices.remove(master);
            }
        }
        released
    }

    /// Dismiss an apprentice from its master
    pub fn release(
        &self,
        roster: &mut Roster,
        apprentice: &AgentId,
        host: &mut dyn ProgressionHost,
    ) -> bool {
        let Some(master) = roster
            .get_mut(apprentice)
            .and_then(|u| u.apprenticeship_mut().clear_master())
        else {
            return false;
        };
        if let Some(user) = roster.get_mut(&master) {
            user.apprenticeship_mut().apprentices.remove(apprentice);
        }

        info!(master = %master, apprentice = %apprentice, "Apprentice dismissed");
        host.notify(ProgressionEvent::ApprenticeReleased {
            master,
            apprentice: apprentice.clone(),
            reason: ReleaseReason::Dismissed,
        });
        true
    }

    /// Drop an agent's record after dissolving every link it takes part in
    pub fn remove_agent(
        &self,
        roster: &mut Roster,
        agent: &AgentId,
        host: &mut dyn ProgressionHost,
    ) -> Option<ForceUser> {
        self.release(roster, agent, host);
        self.master_killed(roster, agent, None, host);
        roster.remove(agent)
    }

    /// Change the capacity setting and apply it to every current master
    ///
    /// Returns how many masters were updated. Masters already above the new
    /// capacity keep their apprentices but accept no more.
    pub fn change_capacity_setting(&mut self, roster: &mut Roster, capacity: u32) -> usize {
        self.config.apprenticeship.capacity = capacity;
        let mut updated = 0;
        for user in roster.iter_mut() {
            let link = user.apprenticeship_mut();
            if link.is_master() {
                link.capacity = capacity;
                updated += 1;
            }
        }
        info!(capacity, updated, "Apprentice capacity changed");
        updated
    }
}
