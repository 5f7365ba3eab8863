//! Leaderboard command

use anyhow::{bail, Result};

use blogportal::leaderboard::{from_store, rank_of, LeaderboardCategory};

use super::Context;

pub fn leaderboard_command(ctx: &Context, by: &str) -> Result<()> {
    let Some(category) = LeaderboardCategory::from_str(by) else {
        bail!("Unknown leaderboard category: {by} (overall, posts, likes, trending, streak)");
    };

    let store = ctx.store()?;
    let ranked = from_store(store.as_ref(), category)?;

    if ranked.is_empty() {
        println!("No users yet.");
        return Ok(());
    }

    println!("Leaderboard ({}):\n", category.as_str());
    for row in &ranked {
        let entry = &row.entry;
        println!(
            "  #{:<3} {:<20} {:>7}  lvl {:<3} {} badges",
            row.rank,
            entry.name,
            entry.score(category),
            entry.level,
            entry.badges
        );
    }

    if let Some(identity) = &ctx.identity {
        if let Some(rank) = rank_of(&ranked, &identity.id) {
            println!("\nYou are #{rank}");
        }
    }
    Ok(())
}
