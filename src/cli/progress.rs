//! XP, streak and badge commands

use anyhow::Result;

use blogportal::gamification::{BadgeId, BADGES};

use super::output::print_outcome;
use super::Context;

pub fn xp_command(ctx: &Context, amount: i64, reason: &str) -> Result<()> {
    let mut engine = ctx.engine()?;
    let change = engine.add_xp(amount, reason)?;
    print_outcome(&mut engine);
    println!("XP: {}  Level: {}", change.xp, change.level);
    Ok(())
}

pub fn streak_command(ctx: &Context) -> Result<()> {
    let mut engine = ctx.engine()?;
    let update = engine.update_streak()?;
    print_outcome(&mut engine);
    println!("Current streak: {} days", update.streak);
    Ok(())
}

pub fn badge_command(ctx: &Context, id: &str) -> Result<()> {
    let mut engine = ctx.engine()?;
    if BadgeId::from_str(id).is_none() {
        eprintln!("Unknown badge: {id}");
    }
    let held = engine.unlock_badge(id)?.len();
    print_outcome(&mut engine);
    println!("Badges held: {held}");
    Ok(())
}

/// List the catalog, marking unlocked badges
pub fn badges_command(ctx: &Context) -> Result<()> {
    let engine = ctx.engine()?;
    let progress = engine.progress();

    println!("Badges ({}/{}):\n", progress.badges.len(), BADGES.len());
    for badge in BADGES {
        let held = progress.badges.iter().find(|b| b.id == badge.id);
        let marker = if held.is_some() { "x" } else { " " };
        println!(
            "  [{marker}] {} {:<18} {:<10} {}",
            badge.icon,
            badge.name,
            badge.rarity.label(),
            badge.description
        );
        if let Some(unlocked) = held {
            println!("        unlocked {}", unlocked.unlocked_at.format("%Y-%m-%d"));
        }
    }
    Ok(())
}
