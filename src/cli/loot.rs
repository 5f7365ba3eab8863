//! Loot box commands

use anyhow::Result;
use clap::Subcommand;

use blogportal::gamification::{LootContent, LOOT_BOXES};

use super::output::print_outcome;
use super::Context;

#[derive(Subcommand)]
pub enum LootCommand {
    /// List loot boxes and whether they can be opened
    List,

    /// Open a loot box
    Open { id: String },
}

pub fn loot_command(ctx: &Context, command: LootCommand) -> Result<()> {
    let mut engine = ctx.engine()?;
    match command {
        LootCommand::List => {
            let progress = engine.progress();
            for loot in LOOT_BOXES {
                let state = if loot.unlocked_by_default || progress.has_loot_box(loot.id) {
                    "open"
                } else {
                    "locked"
                };
                let cost = loot
                    .cost
                    .map(|c| format!("{c} XP"))
                    .unwrap_or_else(|| "free".to_string());
                println!(
                    "  {:<18} {:<22} {:<10} {:<7} {}",
                    loot.id,
                    loot.name,
                    loot.rarity.label(),
                    cost,
                    state
                );
                let contents: Vec<String> = loot
                    .contents
                    .iter()
                    .map(|item| match item.content {
                        LootContent::Xp(xp) => format!("{xp} XP"),
                        LootContent::Badge(id) => format!("badge {id}"),
                        LootContent::Theme(name) => format!("theme {name}"),
                        LootContent::Avatar(name) => format!("avatar {name}"),
                    })
                    .collect();
                println!("      {}", contents.join(", "));
            }
        }
        LootCommand::Open { id } => {
            let opening = engine.open_loot_box(&id)?;
            print_outcome(&mut engine);
            for cosmetic in &opening.cosmetics {
                println!("New {:?}: {}", cosmetic.kind, cosmetic.name);
            }
            println!("XP: {}  Level: {}", opening.xp, opening.level);
        }
    }
    Ok(())
}
