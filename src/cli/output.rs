//! Terminal rendering helpers

use blogportal::gamification::{GamificationEvent, LevelProgress, StreakChange};

use super::context::Engine;

/// Print the toast for the last operation plus level-ups and unlocks
pub fn print_outcome(engine: &mut Engine) {
    let events = engine.last_events().to_vec();

    if let Some(note) = engine.take_notification() {
        if note.xp_delta != 0 {
            println!("{:+} XP  {}", note.xp_delta, note.reason);
        }
    }

    for event in &events {
        match event {
            GamificationEvent::LevelUp(level_up) => {
                println!("Level up! {} -> {}", level_up.old_level, level_up.new_level);
            }
            GamificationEvent::BadgeUnlocked(unlocked) => {
                let badge = unlocked.badge();
                println!(
                    "Badge unlocked: {} {} ({})",
                    badge.icon,
                    badge.name,
                    badge.rarity.label()
                );
            }
            GamificationEvent::Streak { change, count } => match change {
                StreakChange::Extended => println!("Streak extended: {count} days"),
                StreakChange::Started => println!("Streak started: {count} day"),
                StreakChange::Unchanged => {}
            },
            GamificationEvent::QuestCompleted { quest_id } => {
                println!("Quest completed: {quest_id}");
            }
            GamificationEvent::LootBoxUnlocked { box_id } => {
                println!("Loot box unlocked: {box_id}");
            }
            _ => {}
        }
    }
}

pub fn progress_bar(progress: &LevelProgress, width: usize) -> String {
    let filled = ((progress.progress_to_next() * width as f32).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
