//! Force User - per-agent progression facade
//!
//! Owns one agent's progression record and exposes every operation external
//! callers use. A `ForceUser` can only be built through [`ForceUser::new`] or
//! [`ForceUser::from_record`]; both leave the record repaired, so callers
//! never have to remember to run the preset repair themselves.

use crate::abilities::{AbilityCatalog, UnlockContext};
use crate::alignment::{Alignment, AttunementAxis};
use crate::apprenticeship::ApprenticeshipLink;
use crate::config::ProgressionConfig;
use crate::events::ProgressionEvent;
use crate::experience::{ExperienceTracker, LevelUps};
use crate::force_pool::ForcePool;
use crate::host::{HostStat, ProgressionHost};
use crate::ids::{AbilityId, AgentId};
use crate::presets::{PresetError, PresetManager, DEFAULT_PRESET};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Most `LevelUp` events a single gain announces one by one
pub const LEVEL_UP_EVENT_LIMIT: u32 = 100;

/// Serializable progression state of one agent
///
/// Every field but `agent` defaults, so records written by older versions
/// still load; [`ForceUser::from_record`] repairs whatever is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionRecord {
    /// Owning agent
    pub agent: AgentId,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Level and experience
    #[serde(default)]
    pub experience: ExperienceTracker,
    /// Force points
    #[serde(default)]
    pub force_pool: ForcePool,
    /// Light/dark meters
    #[serde(default)]
    pub alignment: Alignment,
    /// Unlocked abilities
    #[serde(default)]
    pub unlocked: BTreeSet<AbilityId>,
    /// Unspent ability points
    #[serde(default)]
    pub ability_points: u32,
    /// Loadout presets
    #[serde(default)]
    pub presets: PresetManager,
    /// Master/apprentice state
    #[serde(default)]
    pub apprenticeship: ApprenticeshipLink,
}

/// Progression facade for one agent
#[derive(Debug, Clone, PartialEq)]
pub struct ForceUser {
    record: ProgressionRecord,
}

impl ForceUser {
    /// Fresh level-1 agent with a rolled alignment
    pub fn new(
        agent: impl Into<AgentId>,
        name: impl Into<String>,
        config: &ProgressionConfig,
        host: &dyn ProgressionHost,
        rng: &mut impl Rng,
    ) -> Self {
        let agent = agent.into();
        let pool_multiplier = host.stat_multiplier(&agent, HostStat::ForcePoolMax);
        let experience = ExperienceTracker::new(&config.experience);
        let force_pool = ForcePool::new(experience.level(), pool_multiplier, &config.force_pool);

        let record = ProgressionRecord {
            name: name.into(),
            experience,
            force_pool,
            alignment: Alignment::randomized(&config.alignment, rng),
            unlocked: BTreeSet::new(),
            ability_points: config.abilities.starting_points,
            presets: PresetManager::new(),
            apprenticeship: ApprenticeshipLink::with_capacity(config.apprenticeship.capacity),
            agent,
        };
        debug!(agent = %record.agent, "Force user activated");
        Self { record }
    }

    /// Rebuild from a stored record, repairing it first
    #[must_use]
    pub fn from_record(record: ProgressionRecord, config: &ProgressionConfig) -> Self {
        let mut user = Self { record };
        user.ensure_invariants(config);
        user
    }

    /// Repair partial or corrupted state; returns whether anything changed
    pub fn ensure_invariants(&mut self, config: &ProgressionConfig) -> bool {
        let r = &mut self.record;
        let presets = r.presets.ensure_default_preset();
        let experience = r.experience.normalize(&config.experience);
        let pool = r.force_pool.normalize();
        let alignment = r.alignment.normalize();

        let repaired = presets || experience || pool || alignment;
        if repaired {
            warn!(
                agent = %r.agent,
                presets,
                experience,
                pool,
                alignment,
                "Repaired progression record"
            );
        }
        repaired
    }

    /// Borrow the serializable record
    #[must_use]
    pub fn record(&self) -> &ProgressionRecord {
        &self.record
    }

    /// Take the serializable record
    #[must_use]
    pub fn into_record(self) -> ProgressionRecord {
        self.record
    }

    /// Agent id
    #[must_use]
    pub fn agent(&self) -> &AgentId {
        &self.record.agent
    }

    /// Display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.record.name
    }

    /// Current level
    #[must_use]
    pub fn level(&self) -> u32 {
        self.record.experience.level()
    }

    /// Level and experience
    #[must_use]
    pub fn experience(&self) -> &ExperienceTracker {
        &self.record.experience
    }

    /// Force points
    #[must_use]
    pub fn force_pool(&self) -> &ForcePool {
        &self.record.force_pool
    }

    /// Attunement meters
    #[must_use]
    pub fn alignment(&self) -> &Alignment {
        &self.record.alignment
    }

    /// Unlocked abilities
    #[must_use]
    pub fn unlocked(&self) -> &BTreeSet<AbilityId> {
        &self.record.unlocked
    }

    /// Unspent ability points
    #[must_use]
    pub fn ability_points(&self) -> u32 {
        self.record.ability_points
    }

    /// Loadout presets
    #[must_use]
    pub fn presets(&self) -> &PresetManager {
        &self.record.presets
    }

    /// Master/apprentice state
    #[must_use]
    pub fn apprenticeship(&self) -> &ApprenticeshipLink {
        &self.record.apprenticeship
    }

    pub(crate) fn apprenticeship_mut(&mut self) -> &mut ApprenticeshipLink {
        &mut self.record.apprenticeship
    }

    // ---- experience -------------------------------------------------------

    /// Gain experience, scaled by the global and per-agent multipliers
    pub fn add_experience(
        &mut self,
        amount: f32,
        config: &ProgressionConfig,
        host: &mut dyn ProgressionHost,
    ) -> LevelUps {
        let multiplier = config.experience.global_multiplier
            * host.stat_multiplier(&self.record.agent, HostStat::ExperienceGain);
        let ups = self
            .record
            .experience
            .add_experience(amount, multiplier, &config.experience);
        self.apply_level_ups(ups, config, host);
        ups
    }

    /// Grant levels outright (administrative)
    pub fn force_level_up(
        &mut self,
        levels: u32,
        config: &ProgressionConfig,
        host: &mut dyn ProgressionHost,
    ) -> LevelUps {
        let ups = self
            .record
            .experience
            .force_level_up(levels, &config.experience);
        self.apply_level_ups(ups, config, host);
        ups
    }

    fn apply_level_ups(
        &mut self,
        ups: LevelUps,
        config: &ProgressionConfig,
        host: &mut dyn ProgressionHost,
    ) {
        if ups.gained() == 0 {
            return;
        }

        self.record.ability_points = self.record.ability_points.saturating_add(ups.gained());
        self.refresh_force_pool(config, &*host);

        // Huge jumps announce only the level reached
        let first = if ups.gained() > LEVEL_UP_EVENT_LIMIT {
            info!(agent = %self.record.agent, from = ups.from, to = ups.to, "Level jump");
            ups.to
        } else {
            ups.from + 1
        };
        for level in first..=ups.to {
            info!(agent = %self.record.agent, level, "Level up");
            host.notify(ProgressionEvent::LevelUp {
                agent: self.record.agent.clone(),
                name: self.record.name.clone(),
                level,
            });
        }
    }

    /// Grant ability points (quest rewards, debug tools)
    pub fn add_ability_points(&mut self, amount: u32) {
        self.record.ability_points = self.record.ability_points.saturating_add(amount);
    }

    // ---- force pool -------------------------------------------------------

    /// Recompute the pool maximum from level and the host multiplier
    pub fn refresh_force_pool(&mut self, config: &ProgressionConfig, host: &dyn ProgressionHost) {
        let multiplier = host.stat_multiplier(&self.record.agent, HostStat::ForcePoolMax);
        self.record
            .force_pool
            .recalculate_max(self.level(), multiplier, &config.force_pool);
    }

    /// Spend force points; `false` when the pool is short
    pub fn spend_force_points(&mut self, amount: f32) -> bool {
        self.record.force_pool.spend(amount)
    }

    /// Recover force points up to the maximum
    pub fn recover_force_points(&mut self, amount: f32) {
        self.record.force_pool.recover(amount);
    }

    /// Periodic recovery; the host calls this every
    /// `force_pool.recovery_interval_ticks`
    pub fn tick_recovery(&mut self, config: &ProgressionConfig) {
        self.record
            .force_pool
            .recover(config.force_pool.regen_per_interval);
    }

    // ---- alignment --------------------------------------------------------

    /// Clamped write to one axis
    pub fn set_alignment(
        &mut self,
        axis: AttunementAxis,
        value: f32,
        host: &mut dyn ProgressionHost,
    ) -> bool {
        let changed = self.record.alignment.set(axis, value);
        self.announce_alignment(axis, changed, host)
    }

    /// Clamped increment of one axis
    pub fn add_alignment(
        &mut self,
        axis: AttunementAxis,
        delta: f32,
        host: &mut dyn ProgressionHost,
    ) -> bool {
        let changed = self.record.alignment.add(axis, delta);
        self.announce_alignment(axis, changed, host)
    }

    /// Clamped decrement of one axis
    pub fn remove_alignment(
        &mut self,
        axis: AttunementAxis,
        delta: f32,
        host: &mut dyn ProgressionHost,
    ) -> bool {
        let changed = self.record.alignment.remove(axis, delta);
        self.announce_alignment(axis, changed, host)
    }

    fn announce_alignment(
        &self,
        axis: AttunementAxis,
        changed: bool,
        host: &mut dyn ProgressionHost,
    ) -> bool {
        if changed {
            host.notify(ProgressionEvent::AlignmentChanged {
                agent: self.record.agent.clone(),
                axis,
                value: self.record.alignment.get(axis),
            });
        }
        changed
    }

    // ---- abilities --------------------------------------------------------

    /// Snapshot used by the unlock evaluator
    #[must_use]
    pub fn unlock_context<'a>(&'a self, host: &'a dyn ProgressionHost) -> UnlockContext<'a> {
        UnlockContext {
            agent: &self.record.agent,
            level: self.level(),
            ability_points: self.record.ability_points,
            unlocked: &self.record.unlocked,
            alignment: &self.record.alignment,
            host,
        }
    }

    /// Whether the ability may be unlocked right now
    #[must_use]
    pub fn can_unlock(
        &self,
        catalog: &dyn AbilityCatalog,
        id: &AbilityId,
        host: &dyn ProgressionHost,
    ) -> bool {
        self.unlock_context(host).can_unlock(catalog.ability(id))
    }

    /// Unlock an ability, spending exactly one point
    ///
    /// The ability becomes active in the current preset and in `"Default"`
    /// and is materialized on the host. Returns `false` (after notifying the
    /// host) when any check fails.
    pub fn try_unlock(
        &mut self,
        catalog: &dyn AbilityCatalog,
        id: &AbilityId,
        host: &mut dyn ProgressionHost,
    ) -> bool {
        let ability = catalog.ability(id);
        if let Err(reason) = self.unlock_context(&*host).check(ability) {
            host.notify(ProgressionEvent::UnlockFailed {
                agent: self.record.agent.clone(),
                ability: id.clone(),
                reason,
            });
            return false;
        }

        let r = &mut self.record;
        r.unlocked.insert(id.clone());
        r.ability_points -= 1;
        r.presets.activate_unlocked(id);

        info!(agent = %r.agent, ability = %id, points = r.ability_points, "Ability unlocked");
        host.materialize_ability(&r.agent, id);
        host.notify(ProgressionEvent::AbilityUnlocked {
            agent: r.agent.clone(),
            ability: id.clone(),
            points_remaining: r.ability_points,
        });
        true
    }

    /// Remove an unlocked ability and prune it from every preset
    pub fn forget_ability(&mut self, id: &AbilityId, host: &mut dyn ProgressionHost) -> bool {
        let r = &mut self.record;
        if !r.unlocked.remove(id) {
            return false;
        }
        r.presets.prune(&r.unlocked);
        host.remove_ability(&r.agent, id);
        info!(agent = %r.agent, ability = %id, "Ability forgotten");
        true
    }

    /// Re-grant active abilities and strip inactive ones on the host
    ///
    /// Run after loading a record, before any other engine call.
    pub fn resync_abilities(&self, host: &mut dyn ProgressionHost) {
        let r = &self.record;
        for id in &r.unlocked {
            if r.presets.is_active(id, &r.unlocked) {
                host.materialize_ability(&r.agent, id);
            } else {
                host.remove_ability(&r.agent, id);
            }
        }
    }

    // ---- presets ----------------------------------------------------------

    /// Unlocked and active in the current preset
    #[must_use]
    pub fn is_ability_active(&self, id: &AbilityId) -> bool {
        self.record.presets.is_active(id, &self.record.unlocked)
    }

    /// Abilities the host should currently grant
    #[must_use]
    pub fn active_abilities(&self) -> BTreeSet<AbilityId> {
        self.record.presets.active_abilities(&self.record.unlocked)
    }

    /// Save the current loadout under a new name and select it
    pub fn save_preset(
        &mut self,
        name: &str,
        host: &mut dyn ProgressionHost,
    ) -> Result<(), PresetError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(self.reject_preset(name, PresetError::InvalidName, host));
        }
        if self.record.presets.contains(name) {
            return Err(self.reject_preset(name, PresetError::AlreadyExists(name.to_string()), host));
        }
        self.record.presets.save_current_as(name);
        Ok(())
    }

    /// Select a preset and update granted abilities to match
    pub fn load_preset(
        &mut self,
        name: &str,
        host: &mut dyn ProgressionHost,
    ) -> Result<(), PresetError> {
        if !self.record.presets.load(name) {
            return Err(self.reject_preset(name, PresetError::NotFound(name.to_string()), host));
        }
        self.resync_abilities(host);
        Ok(())
    }

    /// Activate or deactivate an unlocked ability in the current preset
    pub fn toggle_ability(
        &mut self,
        id: &AbilityId,
        active: bool,
        host: &mut dyn ProgressionHost,
    ) -> Result<(), PresetError> {
        let r = &mut self.record;
        if !r.presets.toggle(id, active, &r.unlocked) {
            let current = r.presets.current_name().to_string();
            return Err(self.reject_preset(&current, PresetError::NotUnlocked(id.clone()), host));
        }
        if active {
            host.materialize_ability(&r.agent, id);
        } else {
            host.remove_ability(&r.agent, id);
        }
        Ok(())
    }

    /// Delete a preset; the last preset and `"Default"` are protected
    pub fn delete_preset(
        &mut self,
        name: &str,
        host: &mut dyn ProgressionHost,
    ) -> Result<(), PresetError> {
        let presets = &self.record.presets;
        let refusal = if !presets.contains(name) {
            Some(PresetError::NotFound(name.to_string()))
        } else if presets.len() <= 1 {
            Some(PresetError::LastPreset)
        } else if name == DEFAULT_PRESET {
            Some(PresetError::Protected)
        } else {
            None
        };
        if let Some(reason) = refusal {
            return Err(self.reject_preset(name, reason, host));
        }

        let was_current = presets.current_name() == name;
        self.record.presets.delete(name);
        if was_current {
            self.resync_abilities(host);
        }
        Ok(())
    }

    fn reject_preset(
        &self,
        name: &str,
        reason: PresetError,
        host: &mut dyn ProgressionHost,
    ) -> PresetError {
        debug!(agent = %self.record.agent, preset = %name, reason = %reason, "Preset operation refused");
        host.notify(ProgressionEvent::PresetRejected {
            agent: self.record.agent.clone(),
            preset: name.to_string(),
            reason: reason.clone(),
        });
        reason
    }

    // ---- administration ---------------------------------------------------

    /// Full progression reset
    ///
    /// Level 1, no experience, pool recalculated and refilled, every unlock
    /// cleared, a lone empty `"Default"` preset, and the starting ability
    /// points. Apprenticeship links are left alone.
    pub fn reset(&mut self, config: &ProgressionConfig, host: &mut dyn ProgressionHost) {
        for id in &self.record.unlocked {
            host.remove_ability(&self.record.agent, id);
        }

        let r = &mut self.record;
        r.experience.reset(&config.experience);
        r.unlocked.clear();
        r.presets = PresetManager::new();
        r.ability_points = config.abilities.starting_points;

        self.refresh_force_pool(config, &*host);
        self.record.force_pool.refill();
        info!(agent = %self.record.agent, "Progression reset");
    }
}
