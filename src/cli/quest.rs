//! Quest commands

use anyhow::Result;
use clap::Subcommand;

use blogportal::gamification::{PuzzleOutcome, Quest, QuestCycle};

use super::output::print_outcome;
use super::Context;

#[derive(Subcommand)]
pub enum QuestCommand {
    /// Claim a quest's reward
    Complete { id: String },

    /// Answer a puzzle quest (option index, starting at 0)
    Answer { id: String, answer: usize },
}

pub fn quests_command(ctx: &Context, refresh: bool) -> Result<()> {
    let mut engine = ctx.engine()?;
    if refresh {
        let regenerated = engine.refresh_quests()?;
        if regenerated.is_empty() {
            println!("Quests are up to date.\n");
        } else {
            let names: Vec<_> = regenerated.iter().map(|c| c.as_str()).collect();
            println!("Regenerated {} quests.\n", names.join(", "));
        }
    }

    for cycle in QuestCycle::all() {
        let quests = engine.quests(*cycle);
        if quests.is_empty() {
            continue;
        }
        println!("{} quests:", cycle.as_str());
        for quest in quests {
            print_quest(quest);
        }
        println!();
    }
    Ok(())
}

fn print_quest(quest: &Quest) {
    let state = if quest.completed { "done" } else { "    " };
    println!(
        "  [{state}] {:<16} {} - {}/{} (+{} XP, {:?})",
        quest.id,
        quest.title,
        quest.current,
        quest.target,
        quest.reward.xp,
        quest.difficulty
    );
    println!("         {}", quest.description);
    if let Some(puzzle) = &quest.puzzle {
        println!("         {}", puzzle.question);
        for (i, option) in puzzle.options.iter().enumerate() {
            println!("           {i}) {option}");
        }
    }
    if let Some(expires) = quest.expires_at {
        println!("         expires {expires}");
    }
}

pub fn quest_command(ctx: &Context, command: QuestCommand) -> Result<()> {
    let mut engine = ctx.engine()?;
    match command {
        QuestCommand::Complete { id } => {
            let completion = engine.complete_quest(&id)?;
            print_outcome(&mut engine);
            println!("Completed: {}", completion.quest.title);
        }
        QuestCommand::Answer { id, answer } => match engine.answer_puzzle(&id, answer)? {
            PuzzleOutcome::Correct(completion) => {
                print_outcome(&mut engine);
                println!("Correct! Completed: {}", completion.quest.title);
            }
            PuzzleOutcome::Incorrect => println!("Not quite. Try again."),
        },
    }
    Ok(())
}
