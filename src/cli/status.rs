//! Status command implementation

use anyhow::Result;

use blogportal::gamification::{is_active, Badge, LootBox, LOOT_BOXES};

use super::output::progress_bar;
use super::Context;

/// Show the active user's progression
pub fn status_command(ctx: &Context) -> Result<()> {
    let engine = ctx.engine()?;
    let progress = engine.progress();
    let level = engine.level_progress();
    let today = chrono::Local::now().date_naive();

    println!("{} ({})\n", engine.identity().name, engine.identity().id);
    println!(
        "  Level {}  {}  {} XP ({} to next level)",
        level.level,
        progress_bar(&level, 20),
        progress.xp,
        engine.next_level_xp()
    );

    let streak_state = if is_active(progress.last_active_date, today) {
        ""
    } else {
        " (inactive)"
    };
    println!(
        "  Streak: {} days{} - best {}",
        progress.streak, streak_state, progress.best_streak
    );
    println!(
        "  Badges: {}/{}",
        progress.badges.len(),
        Badge::total_count()
    );
    println!(
        "  Posts: {}  Likes: {}  Comments: {}  Trending: {}",
        progress.total_posts, progress.total_likes, progress.total_comments, progress.trending_posts
    );
    println!("  Quests completed: {}", progress.quests_completed);

    let claimable = engine.claimable_quests();
    if !claimable.is_empty() {
        println!("\nReady to claim:");
        for quest in claimable {
            println!("  {} - {} (+{} XP)", quest.id, quest.title, quest.reward.xp);
        }
    }

    let openable: Vec<&LootBox> = LOOT_BOXES
        .iter()
        .filter(|b| progress.has_loot_box(b.id))
        .collect();
    if !openable.is_empty() {
        println!("\nLoot boxes:");
        for loot in openable {
            println!("  {} - {}", loot.id, loot.name);
        }
    }

    Ok(())
}
