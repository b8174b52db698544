//! Apprentice CLI commands
//!
//! `holocron apprentice` - master/apprentice relationships across all records

use super::{ApprenticeCommands, Session};
use anyhow::Result;
use holocron_core::{AgentId, ApprenticeshipCoordinator, Error};

/// Run apprentice command
pub fn run(session: &mut Session, cmd: &ApprenticeCommands) -> Result<()> {
    let mut roster = session.store.load_roster(&session.config.progression)?;
    let mut coordinator = ApprenticeshipCoordinator::new(session.config.progression.clone());

    match cmd {
        ApprenticeCommands::Assign { master, apprentice } => {
            coordinator
                .assign(
                    &mut roster,
                    &AgentId::from(master.as_str()),
                    &AgentId::from(apprentice.as_str()),
                    &mut session.rng,
                )
                .map_err(Error::from)?;
            println!("🎓 {apprentice} now trains under {master}");
        }
        ApprenticeCommands::Release { apprentice } => {
            let id = AgentId::from(apprentice.as_str());
            if !coordinator.release(&mut roster, &id, &mut session.host) {
                println!("  {apprentice} has no master");
            }
        }
        ApprenticeCommands::Tick { days, ticks } => {
            let elapsed = match ticks {
                Some(ticks) => *ticks,
                None => days.saturating_mul(session.config.progression.apprenticeship.ticks_per_day),
            };
            let summary = coordinator.tick(&mut roster, &mut session.host, &mut session.rng, elapsed);
            println!(
                "⏳ {} tick(s): {} experience grant(s), {} graduation(s), {} bond(s)",
                elapsed,
                summary.experience_grants.len(),
                summary.graduations.len(),
                summary.bonds.len()
            );
        }
        ApprenticeCommands::Killed { master, killer } => {
            let killer = killer.as_deref().map(AgentId::from);
            let released = coordinator.master_killed(
                &mut roster,
                &AgentId::from(master.as_str()),
                killer.as_ref(),
                &mut session.host,
            );
            println!("⚔️  {master} fell; {released} apprentice(s) released");
        }
        ApprenticeCommands::Capacity { capacity } => {
            let updated = coordinator.change_capacity_setting(&mut roster, *capacity);
            println!("🎓 Capacity {capacity} applied to {updated} master(s)");
            println!("   Set `progression.apprenticeship.capacity` in config/local.toml for new masters.");
        }
    }

    session.store.save_roster(&roster)?;
    Ok(())
}
