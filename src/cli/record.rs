//! Record CLI commands
//!
//! `holocron create|show|list|xp|...` - per-agent progression

use super::{AlignOp, Session};
use anyhow::{bail, Result};
use holocron_core::{
    AbilityCatalog, AgentId, ApprenticeshipCoordinator, AttunementAxis, ForceUser,
};

/// Create a progression record
pub fn create(session: &mut Session, agent: &str, name: Option<&str>) -> Result<()> {
    let id = AgentId::from(agent);
    if session.store.exists(&id) {
        bail!("Agent '{agent}' already has a record");
    }

    let user = ForceUser::new(
        id,
        name.unwrap_or(agent),
        &session.config.progression,
        &session.host,
        &mut session.rng,
    );
    session.save_user(&user)?;

    println!("\n🌌 {} joins the Force\n", user.name());
    print_summary(&user);
    Ok(())
}

/// Show an agent's progression
pub fn show(session: &mut Session, agent: &str) -> Result<()> {
    let user = session.load_user(agent)?;

    println!("\n📜 {} ({})\n", user.name(), user.agent());
    print_summary(&user);

    println!("\n  Unlocked:");
    if user.unlocked().is_empty() {
        println!("    (none)");
    }
    for id in user.unlocked() {
        let mark = if user.is_ability_active(id) { "●" } else { "○" };
        let label = session
            .catalog
            .ability(id)
            .map_or(id.as_str(), |a| a.display_name());
        println!("    {mark} {label}");
    }

    let link = user.apprenticeship();
    if let Some(master) = &link.master {
        println!("\n  Apprentice of: {master}");
    }
    if link.is_master() {
        let names: Vec<_> = link.apprentices.iter().map(AgentId::as_str).collect();
        println!("\n  Apprentices: {} (capacity {})", names.join(", "), link.capacity);
    }
    if link.graduated_count > 0 || link.promotion.is_some() {
        let title = link
            .promotion
            .map(|t| format!(" | {t}"))
            .unwrap_or_default();
        println!("  Graduates: {}{title}", link.graduated_count);
    }
    println!();
    Ok(())
}

fn print_summary(user: &ForceUser) {
    let xp = user.experience();
    let pool = user.force_pool();
    let alignment = user.alignment();
    println!(
        "  Level {} | XP {:.0}/{:.0} | Ability points {}",
        user.level(),
        xp.experience(),
        xp.threshold(),
        user.ability_points()
    );
    println!("  Force {:.0}/{:.0}", pool.current(), pool.max());
    println!(
        "  Light {:.0} | Dark {:.0} | Balance {:+.2}",
        alignment.light(),
        alignment.dark(),
        alignment.balance()
    );
    println!("  Preset: {}", user.presets().current_name());
}

/// List stored agents
pub fn list(session: &Session) -> Result<()> {
    println!("\n🌌 Force users\n");

    let roster = session.store.load_roster(&session.config.progression)?;
    if roster.is_empty() {
        println!("  No records found.");
        println!();
        println!("  Create one:");
        println!("    holocron create kira --name \"Kira\"");
        println!();
        return Ok(());
    }

    for user in roster.iter() {
        let role = if user.apprenticeship().is_master() {
            "🧙"
        } else if user.apprenticeship().is_apprentice() {
            "🧑‍🎓"
        } else {
            "  "
        };
        println!(
            "  {} {:16} Lv{:<3} | {} abilities | {}",
            role,
            user.agent().as_str(),
            user.level(),
            user.unlocked().len(),
            user.alignment().dominant()
        );
    }
    println!();
    Ok(())
}

/// Delete a record after dissolving its apprenticeships
pub fn delete(session: &mut Session, agent: &str) -> Result<()> {
    let id = AgentId::from(agent);
    let mut roster = session.store.load_roster(&session.config.progression)?;
    let coordinator = ApprenticeshipCoordinator::new(session.config.progression.clone());

    if coordinator
        .remove_agent(&mut roster, &id, &mut session.host)
        .is_none()
    {
        bail!("Agent '{agent}' has no record");
    }
    session.store.save_roster(&roster)?;
    session.store.delete(&id)?;

    println!("🗑️  Deleted {agent}");
    Ok(())
}

/// Grant experience
pub fn add_experience(session: &mut Session, agent: &str, amount: f32) -> Result<()> {
    let mut user = session.load_user(agent)?;
    let ups = user.add_experience(amount, &session.config.progression, &mut session.host);
    session.save_user(&user)?;

    println!(
        "✨ {} gained experience: {:.0}/{:.0} at level {}{}",
        user.name(),
        user.experience().experience(),
        user.experience().threshold(),
        user.level(),
        if ups.gained() > 0 {
            format!(" (+{} level(s))", ups.gained())
        } else {
            String::new()
        }
    );
    Ok(())
}

/// Grant levels outright
pub fn level_up(session: &mut Session, agent: &str, levels: u32) -> Result<()> {
    let mut user = session.load_user(agent)?;
    user.force_level_up(levels, &session.config.progression, &mut session.host);
    session.save_user(&user)?;
    println!("⬆️  {} is now level {}", user.name(), user.level());
    Ok(())
}

/// Grant ability points
pub fn grant_points(session: &mut Session, agent: &str, points: u32) -> Result<()> {
    let mut user = session.load_user(agent)?;
    user.add_ability_points(points);
    session.save_user(&user)?;
    println!("🎁 {} has {} ability point(s)", user.name(), user.ability_points());
    Ok(())
}

/// Spend force points
pub fn spend(session: &mut Session, agent: &str, amount: f32) -> Result<()> {
    let mut user = session.load_user(agent)?;
    if !user.spend_force_points(amount) {
        bail!(
            "{} has only {:.0} force point(s)",
            user.name(),
            user.force_pool().current()
        );
    }
    session.save_user(&user)?;
    println!(
        "🌀 {} has {:.0}/{:.0} force points left",
        user.name(),
        user.force_pool().current(),
        user.force_pool().max()
    );
    Ok(())
}

/// Run force recovery intervals
pub fn recover(session: &mut Session, agent: &str, intervals: u32) -> Result<()> {
    let mut user = session.load_user(agent)?;
    for _ in 0..intervals {
        user.tick_recovery(&session.config.progression);
    }
    session.save_user(&user)?;
    println!(
        "🌀 {} recovered to {:.0}/{:.0}",
        user.name(),
        user.force_pool().current(),
        user.force_pool().max()
    );
    Ok(())
}

/// Reset all progression
pub fn reset(session: &mut Session, agent: &str) -> Result<()> {
    let mut user = session.load_user(agent)?;
    user.reset(&session.config.progression, &mut session.host);
    session.save_user(&user)?;
    println!("♻️  {} starts over at level 1", user.name());
    Ok(())
}

/// Change an attunement meter
pub fn align(
    session: &mut Session,
    agent: &str,
    axis: AttunementAxis,
    op: AlignOp,
    value: f32,
) -> Result<()> {
    let mut user = session.load_user(agent)?;
    let host = &mut session.host;
    let changed = match op {
        AlignOp::Set => user.set_alignment(axis, value, host),
        AlignOp::Add => user.add_alignment(axis, value, host),
        AlignOp::Remove => user.remove_alignment(axis, value, host),
    };
    if changed {
        session.save_user(&user)?;
    } else {
        println!("  {} {axis} attunement unchanged", user.name());
    }
    Ok(())
}
