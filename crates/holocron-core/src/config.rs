//! Engine configuration
//!
//! Every tunable of the progression engine lives here and is passed
//! explicitly into the components that need it. There is no process-wide
//! settings state; changing a setting for the live population goes through
//! an explicit mass-update such as
//! [`ApprenticeshipCoordinator::change_capacity_setting`](crate::ApprenticeshipCoordinator::change_capacity_setting).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressionConfig {
    /// Experience and leveling
    #[serde(default)]
    pub experience: ExperienceConfig,
    /// Force point pool
    #[serde(default)]
    pub force_pool: ForcePoolConfig,
    /// Alignment meters
    #[serde(default)]
    pub alignment: AlignmentConfig,
    /// Ability points
    #[serde(default)]
    pub abilities: AbilityConfig,
    /// Master/apprentice relationship
    #[serde(default)]
    pub apprenticeship: ApprenticeshipConfig,
}

/// Experience settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceConfig {
    /// Multiplier applied to every experience gain
    #[serde(default = "default_global_multiplier")]
    pub global_multiplier: f32,
    /// Threshold growth per level (`threshold = level * threshold_per_level`)
    #[serde(default = "default_threshold_per_level")]
    pub threshold_per_level: f32,
}

fn default_global_multiplier() -> f32 {
    1.0
}

fn default_threshold_per_level() -> f32 {
    100.0
}

impl Default for ExperienceConfig {
    fn default() -> Self {
        Self {
            global_multiplier: default_global_multiplier(),
            threshold_per_level: default_threshold_per_level(),
        }
    }
}

/// Force pool settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForcePoolConfig {
    /// Maximum force points granted per level
    #[serde(default = "default_points_per_level")]
    pub points_per_level: f32,
    /// Points recovered each recovery interval
    #[serde(default = "default_regen_per_interval")]
    pub regen_per_interval: f32,
    /// Host ticks between recovery calls
    #[serde(default = "default_recovery_interval_ticks")]
    pub recovery_interval_ticks: u32,
}

fn default_points_per_level() -> f32 {
    10.0
}

fn default_regen_per_interval() -> f32 {
    1.0
}

fn default_recovery_interval_ticks() -> u32 {
    60
}

impl Default for ForcePoolConfig {
    fn default() -> Self {
        Self {
            points_per_level: default_points_per_level(),
            regen_per_interval: default_regen_per_interval(),
            recovery_interval_ticks: default_recovery_interval_ticks(),
        }
    }
}

/// Alignment settings
///
/// The meters are always clamped to `0..=1000`; only the range new agents
/// are rolled from is configurable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentConfig {
    /// Lower bound of the initial roll
    #[serde(default)]
    pub initial_min: f32,
    /// Upper bound of the initial roll
    #[serde(default = "default_initial_max")]
    pub initial_max: f32,
}

fn default_initial_max() -> f32 {
    100.0
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            initial_min: 0.0,
            initial_max: default_initial_max(),
        }
    }
}

/// Ability point settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityConfig {
    /// Points a fresh (or fully reset) agent starts with
    #[serde(default = "default_starting_points")]
    pub starting_points: u32,
}

fn default_starting_points() -> u32 {
    1
}

impl Default for AbilityConfig {
    fn default() -> Self {
        Self {
            starting_points: default_starting_points(),
        }
    }
}

/// Apprenticeship settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprenticeshipConfig {
    /// Apprentices a master may train at once
    #[serde(default = "default_capacity")]
    pub capacity: u32,
    /// Shortest experience interval, in days
    #[serde(default = "default_interval_min_days")]
    pub experience_interval_min_days: u32,
    /// Longest experience interval, in days
    #[serde(default = "default_interval_max_days")]
    pub experience_interval_max_days: u32,
    /// Host ticks per in-game day
    #[serde(default = "default_ticks_per_day")]
    pub ticks_per_day: u32,
    /// Experience granted per level of difference
    #[serde(default = "default_experience_per_level_difference")]
    pub experience_per_level_difference: f32,
    /// Days between bond attempts
    #[serde(default = "default_bond_cooldown_days")]
    pub bond_cooldown_days: u32,
    /// Probability that a bond attempt succeeds
    #[serde(default = "default_bond_chance")]
    pub bond_chance: f64,
    /// Graduates a master needs before promotion
    #[serde(default = "default_promotion_graduates")]
    pub promotion_graduates: u32,
    /// Level a master needs before promotion
    #[serde(default = "default_promotion_level")]
    pub promotion_level: u32,
}

fn default_capacity() -> u32 {
    1
}

fn default_interval_min_days() -> u32 {
    2
}

fn default_interval_max_days() -> u32 {
    5
}

fn default_ticks_per_day() -> u32 {
    60_000
}

fn default_experience_per_level_difference() -> f32 {
    10.0
}

fn default_bond_cooldown_days() -> u32 {
    1
}

fn default_bond_chance() -> f64 {
    0.1
}

fn default_promotion_graduates() -> u32 {
    1
}

fn default_promotion_level() -> u32 {
    10
}

impl Default for ApprenticeshipConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            experience_interval_min_days: default_interval_min_days(),
            experience_interval_max_days: default_interval_max_days(),
            ticks_per_day: default_ticks_per_day(),
            experience_per_level_difference: default_experience_per_level_difference(),
            bond_cooldown_days: default_bond_cooldown_days(),
            bond_chance: default_bond_chance(),
            promotion_graduates: default_promotion_graduates(),
            promotion_level: default_promotion_level(),
        }
    }
}

impl ApprenticeshipConfig {
    /// Ticks between bond attempts
    #[must_use]
    pub fn bond_cooldown_ticks(&self) -> u32 {
        self.bond_cooldown_days.saturating_mul(self.ticks_per_day)
    }
}

impl ProgressionConfig {
    /// Parse configuration from a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::Serialization(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate value ranges
    pub fn validate(&self) -> Result<()> {
        fn invalid(field: &str, message: &str) -> Error {
            Error::InvalidConfig {
                field: field.to_string(),
                message: message.to_string(),
            }
        }

        if !(self.experience.global_multiplier.is_finite()
            && self.experience.global_multiplier >= 0.0)
        {
            return Err(invalid(
                "experience.global_multiplier",
                "must be a finite, non-negative number",
            ));
        }
        if !(self.experience.threshold_per_level > 0.0) {
            return Err(invalid("experience.threshold_per_level", "must be positive"));
        }
        if self.force_pool.points_per_level < 0.0 || self.force_pool.regen_per_interval < 0.0 {
            return Err(invalid("force_pool", "point values must be non-negative"));
        }
        if self.force_pool.recovery_interval_ticks == 0 {
            return Err(invalid("force_pool.recovery_interval_ticks", "must be positive"));
        }

        let a = &self.alignment;
        if a.initial_min < 0.0
            || a.initial_max > crate::alignment::ATTUNEMENT_MAX
            || a.initial_min > a.initial_max
        {
            return Err(invalid(
                "alignment.initial_min",
                "initial range must lie within 0..=1000 with min <= max",
            ));
        }

        let ap = &self.apprenticeship;
        if ap.experience_interval_min_days == 0
            || ap.experience_interval_min_days > ap.experience_interval_max_days
        {
            return Err(invalid(
                "apprenticeship.experience_interval_min_days",
                "must be positive and not exceed experience_interval_max_days",
            ));
        }
        if ap.ticks_per_day == 0 {
            return Err(invalid("apprenticeship.ticks_per_day", "must be positive"));
        }
        if !(0.0..=1.0).contains(&ap.bond_chance) {
            return Err(invalid(
                "apprenticeship.bond_chance",
                "must be within 0.0..=1.0",
            ));
        }
        if ap.experience_per_level_difference < 0.0 {
            return Err(invalid(
                "apprenticeship.experience_per_level_difference",
                "must be non-negative",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
