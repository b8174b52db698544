//! Force point pool
//!
//! The spendable resource behind active abilities. The maximum scales with
//! level and a host-supplied multiplier; `current <= max` always holds.

use crate::config::ForcePoolConfig;
use serde::{Deserialize, Serialize};

/// Current and maximum force points
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ForcePool {
    #[serde(default)]
    current: f32,
    #[serde(default)]
    max: f32,
}

impl ForcePool {
    /// Full pool sized for `level`
    #[must_use]
    pub fn new(level: u32, multiplier: f32, config: &ForcePoolConfig) -> Self {
        let mut pool = Self::default();
        pool.recalculate_max(level, multiplier, config);
        pool.refill();
        pool
    }

    /// Points available
    #[must_use]
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Pool capacity
    #[must_use]
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Recompute the maximum; `current` is clamped to it
    pub fn recalculate_max(&mut self, level: u32, multiplier: f32, config: &ForcePoolConfig) {
        let multiplier = if multiplier.is_finite() && multiplier > 0.0 {
            multiplier
        } else {
            0.0
        };
        self.max = level as f32 * config.points_per_level * multiplier;
        self.current = self.current.clamp(0.0, self.max);
    }

    /// Spend points; fails without mutation when the pool is short
    pub fn spend(&mut self, amount: f32) -> bool {
        if !(amount.is_finite() && amount >= 0.0) || self.current < amount {
            return false;
        }
        self.current -= amount;
        true
    }

    /// Recover points, up to the maximum
    pub fn recover(&mut self, amount: f32) {
        if amount.is_finite() && amount > 0.0 {
            self.current = (self.current + amount).min(self.max);
        }
    }

    /// Fill to the maximum
    pub fn refill(&mut self) {
        self.current = self.max;
    }

    pub(crate) fn normalize(&mut self) -> bool {
        let before = *self;
        if !self.max.is_finite() || self.max < 0.0 {
            self.max = 0.0;
        }
        if !self.current.is_finite() {
            self.current = 0.0;
        }
        self.current = self.current.clamp(0.0, self.max);
        before != *self
    }
}
