//! Experience and leveling

use crate::config::ExperienceConfig;
use serde::{Deserialize, Serialize};

/// Outcome of a leveling pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelUps {
    /// Level before the pass
    pub from: u32,
    /// Level after the pass
    pub to: u32,
}

impl LevelUps {
    /// Number of levels gained
    #[must_use]
    pub fn gained(&self) -> u32 {
        self.to.saturating_sub(self.from)
    }

    /// Each newly reached level, in order
    pub fn levels(&self) -> impl Iterator<Item = u32> {
        (self.from..self.to).map(|level| level + 1)
    }
}

/// Experience points and level of one agent
///
/// After every call `experience < threshold` holds; overflow rolls into the
/// next level and a single call may cross any number of thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceTracker {
    #[serde(default = "default_level")]
    level: u32,
    #[serde(default)]
    experience: f32,
    #[serde(default)]
    threshold: f32,
}

fn default_level() -> u32 {
    1
}

/// Level 1 with an unset threshold; `normalize` fills it in
impl Default for ExperienceTracker {
    fn default() -> Self {
        Self {
            level: default_level(),
            experience: 0.0,
            threshold: 0.0,
        }
    }
}

impl ExperienceTracker {
    /// Level 1 with no experience
    #[must_use]
    pub fn new(config: &ExperienceConfig) -> Self {
        let mut tracker = Self {
            level: 1,
            experience: 0.0,
            threshold: 0.0,
        };
        tracker.recompute_threshold(config);
        tracker
    }

    /// Current level (>= 1)
    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Experience accumulated towards the next level
    #[must_use]
    pub fn experience(&self) -> f32 {
        self.experience
    }

    /// Experience needed for the next level
    #[must_use]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Add `amount * multiplier` and level up as many times as it allows
    ///
    /// Negative or non-finite gains are ignored. The level stops at
    /// `u32::MAX`; experience that no longer fits below the threshold there
    /// is dropped.
    pub fn add_experience(
        &mut self,
        amount: f32,
        multiplier: f32,
        config: &ExperienceConfig,
    ) -> LevelUps {
        let from = self.level;
        let gain = amount * multiplier;
        let mut pool = f64::from(self.experience);
        if gain.is_finite() && gain > 0.0 {
            pool += f64::from(gain);
        }

        let per_level = f64::from(config.threshold_per_level);
        if per_level > 0.0 {
            let levels = affordable_levels(self.level, pool, per_level);
            pool -= levels_cost(self.level, levels, per_level);
            self.level += levels;
            self.recompute_threshold(config);
        }

        self.experience = pool.clamp(0.0, f64::from(f32::MAX)) as f32;
        if self.threshold > 0.0 && self.experience >= self.threshold {
            self.experience = 0.0;
        }

        LevelUps {
            from,
            to: self.level,
        }
    }

    /// Grant `levels` levels outright
    pub fn force_level_up(&mut self, levels: u32, config: &ExperienceConfig) -> LevelUps {
        let from = self.level;
        self.level = self.level.saturating_add(levels);
        self.recompute_threshold(config);
        if self.experience >= self.threshold {
            self.experience = 0.0;
        }
        LevelUps {
            from,
            to: self.level,
        }
    }

    /// Back to level 1 with no experience
    pub fn reset(&mut self, config: &ExperienceConfig) {
        self.level = 1;
        self.experience = 0.0;
        self.recompute_threshold(config);
    }

    /// Repair fields from a partial or corrupted record
    pub(crate) fn normalize(&mut self, config: &ExperienceConfig) -> bool {
        let before = self.clone();
        if self.level == 0 {
            self.level = 1;
        }
        if !self.experience.is_finite() || self.experience < 0.0 {
            self.experience = 0.0;
        }
        self.recompute_threshold(config);
        if self.experience >= self.threshold {
            self.experience = 0.0;
        }
        before != *self
    }

    fn recompute_threshold(&mut self, config: &ExperienceConfig) {
        self.threshold = self.level as f32 * config.threshold_per_level;
    }
}

/// Experience needed to climb `levels` levels starting at `level`
fn levels_cost(level: u32, levels: u32, per_level: f64) -> f64 {
    let n = f64::from(levels);
    per_level * (n * f64::from(level) + n * (n - 1.0) / 2.0)
}

/// Most levels `pool` pays for from `level`, never passing `u32::MAX`
fn affordable_levels(level: u32, pool: f64, per_level: f64) -> u32 {
    let headroom = u32::MAX - level;
    if headroom == 0 || !(pool >= levels_cost(level, 1, per_level)) {
        return 0;
    }

    // Root of levels_cost(level, n) == pool, then nudged past rounding
    let b = f64::from(level) - 0.5;
    let estimate = ((b * b + 2.0 * pool / per_level).sqrt() - b).floor();
    let mut n = estimate.clamp(0.0, f64::from(headroom)) as u32;
    while n > 0 && levels_cost(level, n, per_level) > pool {
        n -= 1;
    }
    while n < headroom && levels_cost(level, n + 1, per_level) <= pool {
        n += 1;
    }
    n
}

#[cfg(test)]
mod tests;
