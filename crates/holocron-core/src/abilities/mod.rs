//! Abilities - Unlock Tree
//!
//! Ability definitions, their requirement lists, and the evaluator that
//! decides whether an agent may unlock one.
//!
//! # Example
//!
//! ```rust,ignore
//! use holocron_core::abilities::{AbilityTable, AbilityCatalog};
//!
//! let table = AbilityTable::load("config/abilities.toml")?;
//! let push = table.ability(&"force_push".into()).unwrap();
//! println!("{} has {} requirements", push.id, push.requirements.as_ref().map_or(0, Vec::len));
//! ```

#![forbid(unsafe_code)]

mod catalog;
mod requirement;
mod unlock;

pub use catalog::{AbilityCatalog, AbilityDef, AbilityTable};
pub use requirement::{Requirement, RequirementKind, RequirementMode};
pub use unlock::{UnlockContext, UnlockRejection};
