//! Light/dark attunement meters
//!
//! The two axes are independent: an agent may be strongly attuned to both.
//! Every write, including the increment and decrement helpers, is clamped
//! to `0..=ATTUNEMENT_MAX`.

use crate::config::AlignmentConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound of each attunement meter
pub const ATTUNEMENT_MAX: f32 = 1000.0;

/// Alignment axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttunementAxis {
    /// Light side
    Light,
    /// Dark side
    Dark,
}

impl AttunementAxis {
    /// Lowercase name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for AttunementAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-agent alignment state
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Alignment {
    #[serde(default)]
    light: f32,
    #[serde(default)]
    dark: f32,
}

impl Alignment {
    /// Create with explicit values (clamped)
    #[must_use]
    pub fn new(light: f32, dark: f32) -> Self {
        Self {
            light: clamp_attunement(light),
            dark: clamp_attunement(dark),
        }
    }

    /// Roll both axes independently from the configured initial range
    pub fn randomized(config: &AlignmentConfig, rng: &mut impl Rng) -> Self {
        let mut roll = || {
            if config.initial_max > config.initial_min {
                rng.gen_range(config.initial_min..=config.initial_max)
            } else {
                config.initial_min
            }
        };
        let light = roll();
        let dark = roll();
        Self::new(light, dark)
    }

    /// Light attunement
    #[must_use]
    pub fn light(&self) -> f32 {
        self.light
    }

    /// Dark attunement
    #[must_use]
    pub fn dark(&self) -> f32 {
        self.dark
    }

    /// Value on the given axis
    #[must_use]
    pub fn get(&self, axis: AttunementAxis) -> f32 {
        match axis {
            AttunementAxis::Light => self.light,
            AttunementAxis::Dark => self.dark,
        }
    }

    /// Clamped write
    ///
    /// Returns `true` when the stored value actually changed, which is the
    /// signal observers use to redraw the meter.
    pub fn set(&mut self, axis: AttunementAxis, value: f32) -> bool {
        let clamped = clamp_attunement(value);
        let slot = match axis {
            AttunementAxis::Light => &mut self.light,
            AttunementAxis::Dark => &mut self.dark,
        };
        let changed = (*slot - clamped).abs() > f32::EPSILON;
        *slot = clamped;
        changed
    }

    /// Add to an axis (clamped)
    pub fn add(&mut self, axis: AttunementAxis, delta: f32) -> bool {
        self.set(axis, self.get(axis) + delta)
    }

    /// Subtract from an axis (clamped)
    pub fn remove(&mut self, axis: AttunementAxis, delta: f32) -> bool {
        self.set(axis, self.get(axis) - delta)
    }

    /// `(light - dark) / 100`
    #[must_use]
    pub fn balance(&self) -> f32 {
        (self.light - self.dark) / 100.0
    }

    /// Axis with the higher value; ties go to light
    #[must_use]
    pub fn dominant(&self) -> AttunementAxis {
        if self.dark > self.light {
            AttunementAxis::Dark
        } else {
            AttunementAxis::Light
        }
    }

    /// Re-clamp both axes, e.g. after loading an old record
    pub(crate) fn normalize(&mut self) -> bool {
        let before = *self;
        *self = Self::new(self.light, self.dark);
        before != *self
    }
}

fn clamp_attunement(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, ATTUNEMENT_MAX)
}
