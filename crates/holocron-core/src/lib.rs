//! Holocron Core - Force Progression Engine
//!
//! This crate provides the progression layer for force-sensitive agents in a
//! simulation, including:
//! - Experience: Levels, thresholds and multi-level overflow
//! - Force Pool: Spendable points scaled by level
//! - Alignment: Clamped light/dark attunement meters
//! - Abilities: Requirement lists and the unlock evaluator
//! - Presets: Named loadouts of active abilities
//! - Apprenticeship: Master/apprentice training, bonds and promotion
//! - Force User: The per-agent facade tying the above together
//! - Store: JSON persistence of progression records
//!
//! The engine is single-threaded and synchronous. Everything it needs from
//! the hosting simulation goes through [`ProgressionHost`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod abilities;
pub mod alignment;
pub mod apprenticeship;
pub mod config;
pub mod error;
pub mod events;
pub mod experience;
pub mod force_pool;
pub mod force_user;
pub mod host;
pub mod ids;
pub mod presets;
pub mod roster;
pub mod store;

#[cfg(test)]
mod testing;

pub use abilities::{
    AbilityCatalog, AbilityDef, AbilityTable, Requirement, RequirementKind, RequirementMode,
    UnlockContext, UnlockRejection,
};
pub use alignment::{Alignment, AttunementAxis, ATTUNEMENT_MAX};
pub use apprenticeship::{
    ApprenticeshipCoordinator, ApprenticeshipLink, AssignError, MasterTitle, TickSummary,
};
pub use config::{
    AbilityConfig, AlignmentConfig, ApprenticeshipConfig, ExperienceConfig, ForcePoolConfig,
    ProgressionConfig,
};
pub use error::{format_error_for_cli, Error, Result, UserFriendlyError};
pub use events::{BackstoryReason, ProgressionEvent, ReleaseReason};
pub use experience::{ExperienceTracker, LevelUps};
pub use force_pool::ForcePool;
pub use force_user::{ForceUser, ProgressionRecord, LEVEL_UP_EVENT_LIMIT};
pub use host::{HostStat, NullHost, ProgressionHost, StatusEffect};
pub use ids::{AbilityId, AgentId};
pub use presets::{Preset, PresetError, PresetManager, DEFAULT_PRESET};
pub use roster::Roster;
pub use store::RecordStore;
