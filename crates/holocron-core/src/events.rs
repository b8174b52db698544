//! Progression events reported to the host
//!
//! The engine never formats user-facing text; it hands the host these
//! payloads with the interpolated values (agent, level, counts) and the host
//! decides how to present them.

use crate::abilities::UnlockRejection;
use crate::alignment::AttunementAxis;
use crate::apprenticeship::MasterTitle;
use crate::ids::{AbilityId, AgentId};
use crate::presets::PresetError;
use serde::Serialize;

/// Why the host should open the backstory prompt for an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackstoryReason {
    /// The apprentice caught up with their master
    Graduation,
    /// The apprentice struck down their master
    Betrayal,
}

/// Why an apprenticeship ended without graduation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseReason {
    /// The master died
    MasterKilled,
    /// The apprentice killed the master while leaning dark
    Betrayal,
    /// Explicit removal
    Dismissed,
}

/// Events emitted by the engine
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressionEvent {
    /// An agent reached a new level
    LevelUp {
        /// Agent id
        agent: AgentId,
        /// Agent display name
        name: String,
        /// Level reached
        level: u32,
    },
    /// An ability was unlocked
    AbilityUnlocked {
        /// Agent id
        agent: AgentId,
        /// Unlocked ability
        ability: AbilityId,
        /// Points left after the unlock
        points_remaining: u32,
    },
    /// An unlock attempt was rejected
    UnlockFailed {
        /// Agent id
        agent: AgentId,
        /// Requested ability
        ability: AbilityId,
        /// First failed check
        reason: UnlockRejection,
    },
    /// An attunement meter changed
    AlignmentChanged {
        /// Agent id
        agent: AgentId,
        /// Axis that changed
        axis: AttunementAxis,
        /// New value
        value: f32,
    },
    /// A preset operation was refused
    PresetRejected {
        /// Agent id
        agent: AgentId,
        /// Preset involved
        preset: String,
        /// Refusal reason
        reason: PresetError,
    },
    /// An apprentice graduated
    Graduated {
        /// Master id
        master: AgentId,
        /// Former apprentice id
        apprentice: AgentId,
        /// Master's graduate count after this graduation
        graduated_count: u32,
    },
    /// Master and apprentice formed a bond
    Bonded {
        /// Master id
        master: AgentId,
        /// Apprentice id
        apprentice: AgentId,
    },
    /// A master earned a title
    Promoted {
        /// Master id
        agent: AgentId,
        /// Title earned
        title: MasterTitle,
    },
    /// The host should let the player pick a new backstory
    BackstoryPrompt {
        /// Agent id
        agent: AgentId,
        /// Trigger
        reason: BackstoryReason,
    },
    /// An apprenticeship ended without graduation
    ApprenticeReleased {
        /// Master id
        master: AgentId,
        /// Apprentice id
        apprentice: AgentId,
        /// Why it ended
        reason: ReleaseReason,
    },
}

impl ProgressionEvent {
    /// Agent the event is primarily about
    #[must_use]
    pub fn agent(&self) -> &AgentId {
        match self {
            Self::LevelUp { agent, .. }
            | Self::AbilityUnlocked { agent, .. }
            | Self::UnlockFailed { agent, .. }
            | Self::AlignmentChanged { agent, .. }
            | Self::PresetRejected { agent, .. }
            | Self::Promoted { agent, .. }
            | Self::BackstoryPrompt { agent, .. } => agent,
            Self::Graduated { apprentice, .. }
            | Self::Bonded { apprentice, .. }
            | Self::ApprenticeReleased { apprentice, .. } => apprentice,
        }
    }

    /// Event type name as serialized
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LevelUp { .. } => "level_up",
            Self::AbilityUnlocked { .. } => "ability_unlocked",
            Self::UnlockFailed { .. } => "unlock_failed",
            Self::AlignmentChanged { .. } => "alignment_changed",
            Self::PresetRejected { .. } => "preset_rejected",
            Self::Graduated { .. } => "graduated",
            Self::Bonded { .. } => "bonded",
            Self::Promoted { .. } => "promoted",
            Self::BackstoryPrompt { .. } => "backstory_prompt",
            Self::ApprenticeReleased { .. } => "apprentice_released",
        }
    }
}
