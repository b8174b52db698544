//! Ability CLI commands
//!
//! `holocron ability` - browse the catalog, unlock and forget abilities

use super::{AbilityCommands, Session};
use anyhow::Result;
use holocron_core::{AbilityCatalog, AbilityId, Error};

/// Run ability command
pub fn run(session: &mut Session, cmd: &AbilityCommands) -> Result<()> {
    match cmd {
        AbilityCommands::List { agent } => list(session, agent.as_deref()),
        AbilityCommands::Unlock { agent, ability } => unlock(session, agent, ability),
        AbilityCommands::Forget { agent, ability } => forget(session, agent, ability),
    }
}

/// List the catalog, marking what an agent has or could unlock
fn list(session: &mut Session, agent: Option<&str>) -> Result<()> {
    let user = agent.map(|a| session.load_user(a)).transpose()?;

    println!("\n📖 Abilities\n");
    for ability in session.catalog.abilities() {
        let status = match &user {
            None => "",
            Some(u) if u.unlocked().contains(&ability.id) => "✅",
            Some(u) => match u.unlock_context(&session.host).check(Some(ability)) {
                Ok(()) => "🔓",
                Err(_) => "🔒",
            },
        };

        let requirements = match &ability.requirements {
            None => "not available".to_string(),
            Some(reqs) if reqs.is_empty() => "no requirements".to_string(),
            Some(reqs) => reqs
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        };
        println!(
            "  {:2} {:20} {}",
            status,
            ability.display_name(),
            requirements
        );
    }
    println!();
    Ok(())
}

/// Unlock an ability
fn unlock(session: &mut Session, agent: &str, ability: &str) -> Result<()> {
    let id = AbilityId::from(ability);
    let mut user = session.load_user(agent)?;

    if user.try_unlock(&session.catalog, &id, &mut session.host) {
        session.save_user(&user)?;
    }
    Ok(())
}

/// Remove an unlocked ability
fn forget(session: &mut Session, agent: &str, ability: &str) -> Result<()> {
    let id = AbilityId::from(ability);
    let mut user = session.load_user(agent)?;

    if !user.forget_ability(&id, &mut session.host) {
        return Err(Error::UnknownAbility(ability.to_string()).into());
    }
    session.save_user(&user)?;
    println!("🌫️  {} forgot {}", user.name(), id);
    Ok(())
}
