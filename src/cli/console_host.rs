//! Terminal host
//!
//! Stands in for a game when driving the engine from the command line:
//! traits and conditions come from `--trait` / `--condition` flags, granted
//! abilities and events are printed. Resyncs after loading a record fill in
//! the granted set without printing.

use holocron_core::{
    AbilityId, AgentId, BackstoryReason, HostStat, ProgressionEvent, ProgressionHost,
    ReleaseReason, StatusEffect,
};
use std::collections::BTreeSet;

/// Host backed by command-line flags
#[derive(Debug, Default)]
pub struct ConsoleHost {
    traits: BTreeSet<String>,
    conditions: BTreeSet<String>,
    statuses: BTreeSet<(AgentId, StatusEffect)>,
    granted: BTreeSet<(AgentId, AbilityId)>,
    json: bool,
    quiet: bool,
}

impl ConsoleHost {
    pub fn new(traits: &[String], conditions: &[String], json: bool) -> Self {
        Self {
            traits: traits.iter().cloned().collect(),
            conditions: conditions.iter().cloned().collect(),
            json,
            ..Self::default()
        }
    }

    /// Run `f` without announcing granted or removed abilities
    pub fn silently(&mut self, f: impl FnOnce(&mut Self)) {
        self.quiet = true;
        f(self);
        self.quiet = false;
    }

    /// Whether the agent currently holds the ability
    pub fn is_granted(&self, agent: &AgentId, ability: &AbilityId) -> bool {
        self.granted.contains(&(agent.clone(), ability.clone()))
    }

    fn announces(&self) -> bool {
        !self.json && !self.quiet
    }
}

impl ProgressionHost for ConsoleHost {
    fn stat_multiplier(&self, _agent: &AgentId, _stat: HostStat) -> f32 {
        1.0
    }

    fn has_trait(&self, _agent: &AgentId, trait_id: &str) -> Option<bool> {
        Some(self.traits.contains(trait_id))
    }

    fn has_condition(&self, _agent: &AgentId, condition_id: &str) -> Option<bool> {
        Some(self.conditions.contains(condition_id))
    }

    fn materialize_ability(&mut self, agent: &AgentId, ability: &AbilityId) {
        let added = self.granted.insert((agent.clone(), ability.clone()));
        if added && self.announces() {
            println!("  ✨ {agent} can now use {ability}");
        }
    }

    fn remove_ability(&mut self, agent: &AgentId, ability: &AbilityId) {
        let removed = self.granted.remove(&(agent.clone(), ability.clone()));
        if removed && self.announces() {
            println!("  💤 {ability} set aside by {agent}");
        }
    }

    fn has_status(&self, agent: &AgentId, status: StatusEffect) -> bool {
        self.statuses.contains(&(agent.clone(), status))
    }

    fn apply_status(&mut self, agent: &AgentId, status: StatusEffect) {
        self.statuses.insert((agent.clone(), status));
    }

    fn notify(&mut self, event: ProgressionEvent) {
        if self.json {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!(error = %e, "Failed to serialize event"),
            }
        } else {
            println!("  {}", describe(&event));
        }
    }
}

/// One-line description of an event
pub fn describe(event: &ProgressionEvent) -> String {
    match event {
        ProgressionEvent::LevelUp { name, level, .. } => {
            format!("⬆️  {name} reached level {level}")
        }
        ProgressionEvent::AbilityUnlocked {
            agent,
            ability,
            points_remaining,
        } => format!("🔓 {agent} unlocked {ability} ({points_remaining} point(s) left)"),
        ProgressionEvent::UnlockFailed {
            agent,
            ability,
            reason,
        } => format!("🔒 {agent} cannot unlock {ability}: {reason}"),
        ProgressionEvent::AlignmentChanged { agent, axis, value } => {
            format!("☯️  {agent} {axis} attunement is now {value:.0}")
        }
        ProgressionEvent::PresetRejected {
            agent,
            preset,
            reason,
        } => format!("🗂️  {agent} preset '{preset}' refused: {reason}"),
        ProgressionEvent::Graduated {
            master,
            apprentice,
            graduated_count,
        } => format!(
            "🎓 {apprentice} graduated under {master} (graduate #{graduated_count})"
        ),
        ProgressionEvent::Bonded { master, apprentice } => {
            format!("🤝 {master} and {apprentice} formed a bond")
        }
        ProgressionEvent::Promoted { agent, title } => {
            format!("👑 {agent} is now a {title}")
        }
        ProgressionEvent::BackstoryPrompt { agent, reason } => {
            let why = match reason {
                BackstoryReason::Graduation => "after graduating",
                BackstoryReason::Betrayal => "after betraying their master",
            };
            format!("📖 {agent} may choose a new backstory {why}")
        }
        ProgressionEvent::ApprenticeReleased {
            master,
            apprentice,
            reason,
        } => {
            let why = match reason {
                ReleaseReason::MasterKilled => "their master fell",
                ReleaseReason::Betrayal => "they struck their master down",
                ReleaseReason::Dismissed => "they were dismissed",
            };
            format!("🕊️  {apprentice} left {master}: {why}")
        }
    }
}
