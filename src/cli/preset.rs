//! Preset CLI commands
//!
//! `holocron preset` - manage ability loadouts

use super::{PresetCommands, Session};
use anyhow::Result;
use holocron_core::{AbilityId, Error, ForceUser, PresetError};

/// Run preset command
pub fn run(session: &mut Session, cmd: &PresetCommands) -> Result<()> {
    match cmd {
        PresetCommands::List { agent } => list(session, agent),
        PresetCommands::Save { agent, name } => {
            apply(session, agent, |user, host| user.save_preset(name, host))
        }
        PresetCommands::Load { agent, name } => {
            apply(session, agent, |user, host| user.load_preset(name, host))
        }
        PresetCommands::Delete { agent, name } => {
            apply(session, agent, |user, host| user.delete_preset(name, host))
        }
        PresetCommands::Toggle {
            agent,
            ability,
            off,
        } => {
            let id = AbilityId::from(ability.as_str());
            apply(session, agent, |user, host| {
                user.toggle_ability(&id, !*off, host)
            })
        }
    }
}

/// List presets, marking the current one
fn list(session: &mut Session, agent: &str) -> Result<()> {
    let user = session.load_user(agent)?;
    let presets = user.presets();

    println!("\n🗂️  Presets of {}\n", user.name());
    for name in presets.names() {
        let marker = if name == presets.current_name() { "▶" } else { " " };
        let active: Vec<_> = presets
            .get(name)
            .map(|p| {
                p.active
                    .iter()
                    .filter(|id| user.unlocked().contains(*id))
                    .map(AbilityId::as_str)
                    .collect()
            })
            .unwrap_or_default();
        println!("  {marker} {name:16} {}", active.join(", "));
    }
    println!();
    Ok(())
}

fn apply<F>(session: &mut Session, agent: &str, op: F) -> Result<()>
where
    F: FnOnce(&mut ForceUser, &mut super::ConsoleHost) -> Result<(), PresetError>,
{
    let mut user = session.load_user(agent)?;
    op(&mut user, &mut session.host).map_err(Error::from)?;
    session.save_user(&user)?;
    println!(
        "🗂️  {} now uses preset '{}'",
        user.name(),
        user.presets().current_name()
    );
    Ok(())
}
