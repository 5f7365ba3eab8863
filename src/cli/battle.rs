//! Battle Arena commands

use anyhow::{bail, Context as _, Result};
use chrono::Utc;
use clap::Subcommand;

use blogportal::arena::{Arena, BattleStatus};
use blogportal::gamification::ActivityEvent;
use blogportal::UserId;

use super::output::print_outcome;
use super::Context;

#[derive(Subcommand)]
pub enum BattleCommand {
    /// List battles
    List {
        /// Only show battles in this phase (upcoming, active, voting, completed)
        #[arg(long)]
        status: Option<String>,
    },

    /// Create the starter battles
    Seed {
        /// Replace existing battles
        #[arg(long)]
        force: bool,
    },

    /// Enter a battle
    Join {
        id: String,

        /// Post to enter with
        #[arg(long)]
        post: Option<String>,
    },

    /// Vote for a participant
    Vote { id: String, participant: String },

    /// Claim the prize of a battle you won
    Claim { id: String },
}

fn parse_status(s: &str) -> Option<BattleStatus> {
    match s.to_lowercase().as_str() {
        "upcoming" => Some(BattleStatus::Upcoming),
        "active" => Some(BattleStatus::Active),
        "voting" => Some(BattleStatus::Voting),
        "completed" => Some(BattleStatus::Completed),
        _ => None,
    }
}

pub fn battle_command(ctx: &Context, command: BattleCommand) -> Result<()> {
    let now = Utc::now();

    match command {
        BattleCommand::List { status } => {
            let filter = match status.as_deref() {
                Some(s) => match parse_status(s) {
                    Some(status) => Some(status),
                    None => bail!("Unknown battle status: {s}"),
                },
                None => None,
            };

            let arena = ctx.arena()?;
            let battles: Vec<_> = arena
                .battles
                .iter()
                .filter(|b| filter.is_none_or(|f| b.status(now) == f))
                .collect();
            if battles.is_empty() {
                println!("No battles found. Run `blogportal battle seed` to create some.");
                return Ok(());
            }

            for battle in battles {
                println!(
                    "#{} [{}] {} (+{} XP)",
                    battle.id,
                    battle.status(now),
                    battle.topic,
                    battle.prize.xp
                );
                println!(
                    "    {} - {}/{} participants",
                    battle.description,
                    battle.participants.len(),
                    battle.max_participants
                );
                for participant in &battle.participants {
                    println!(
                        "      {:<18} {:<20} {} votes",
                        participant.user_id, participant.name, participant.votes
                    );
                }
                if let Some(winner) = battle.winner(now) {
                    println!("    Winner: {}", winner.name);
                }
                println!();
            }
        }
        BattleCommand::Seed { force } => {
            let path = ctx.battles_path();
            if path.exists() && !force {
                bail!(
                    "Battles already exist at {}. Use --force to replace them.",
                    path.display()
                );
            }
            let arena = Arena::seed(now);
            ctx.save_arena(&arena)?;
            println!("Created {} battles.", arena.battles.len());
        }
        BattleCommand::Join { id, post } => {
            let mut engine = ctx.engine()?;
            // The battle file is only written once progress is saved
            let name = ctx.update_arena(|arena| {
                let name = arena.join(&id, engine.identity(), post, now)?.name.clone();
                engine.record(ActivityEvent::BattleJoined)?;
                Ok(name)
            })?;
            println!("Joined battle #{id} as {name}");
            print_outcome(&mut engine);
        }
        BattleCommand::Vote { id, participant } => {
            let mut engine = ctx.engine()?;
            let voter = engine.identity().id.clone();
            let votes = ctx.update_arena(|arena| {
                let votes = arena.vote(&id, &UserId::new(participant.as_str()), &voter, now)?;
                engine.record(ActivityEvent::BattleVoted)?;
                Ok(votes)
            })?;
            println!("Voted for {participant} ({votes} votes)");
            print_outcome(&mut engine);
        }
        BattleCommand::Claim { id } => {
            let mut engine = ctx.engine()?;
            let arena = ctx.arena()?;
            let battle = arena.get(&id)?;
            let claimed = engine
                .claim_battle_prize(battle)
                .context("Failed to claim battle prize")?;
            match claimed {
                Some(_) => print_outcome(&mut engine),
                None => println!("Nothing to claim for battle #{id}."),
            }
        }
    }

    Ok(())
}
