use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

use cli::battle::BattleCommand;
use cli::event::EventKind;
use cli::loot::LootCommand;
use cli::quest::QuestCommand;
use cli::Context;

#[derive(Parser)]
#[command(name = "blogportal")]
#[command(about = "BlogPortal - XP, levels, streaks, badges, quests and battles for writers")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.blogportal/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory for progress records and battles
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Act as this user instead of the configured one
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show level, XP, streak, badges and claimable quests
    Status,

    /// Add XP (negative amounts spend it)
    Xp {
        #[arg(allow_hyphen_values = true)]
        amount: i64,

        /// Reason shown in the notification
        #[arg(short, long, default_value = "Manual adjustment")]
        reason: String,
    },

    /// Record today as an active day
    Streak,

    /// Unlock a badge by id
    Badge { id: String },

    /// List the badge catalog
    Badges,

    /// Show active quests
    Quests {
        /// Regenerate quest sets whose day or week has ended
        #[arg(long)]
        refresh: bool,
    },

    /// Claim or answer a quest
    Quest {
        #[command(subcommand)]
        command: QuestCommand,
    },

    /// Record an activity event
    Event {
        #[arg(value_enum)]
        kind: EventKind,

        /// Post tags (for `post`)
        #[arg(short, long)]
        tag: Vec<String>,
    },

    /// List or open loot boxes
    Loot {
        #[command(subcommand)]
        command: LootCommand,
    },

    /// Show the leaderboard
    Leaderboard {
        /// overall, posts, likes, trending or streak
        #[arg(long, default_value = "overall")]
        by: String,
    },

    /// Battle Arena
    Battle {
        #[command(subcommand)]
        command: BattleCommand,
    },

    /// Create a config with a fresh user id
    Init {
        /// Display name for the new user
        #[arg(long)]
        name: Option<String>,

        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let ctx = || Context::new(cli.config.as_deref(), cli.data_dir.clone(), cli.user.clone());

    match cli.command.unwrap_or(Commands::Status) {
        Commands::Status => cli::status::status_command(&ctx()?)?,
        Commands::Xp { amount, reason } => cli::progress::xp_command(&ctx()?, amount, &reason)?,
        Commands::Streak => cli::progress::streak_command(&ctx()?)?,
        Commands::Badge { id } => cli::progress::badge_command(&ctx()?, &id)?,
        Commands::Badges => cli::progress::badges_command(&ctx()?)?,
        Commands::Quests { refresh } => cli::quest::quests_command(&ctx()?, refresh)?,
        Commands::Quest { command } => cli::quest::quest_command(&ctx()?, command)?,
        Commands::Event { kind, tag } => cli::event::event_command(&ctx()?, kind, tag)?,
        Commands::Loot { command } => cli::loot::loot_command(&ctx()?, command)?,
        Commands::Leaderboard { by } => cli::leaderboard::leaderboard_command(&ctx()?, &by)?,
        Commands::Battle { command } => cli::battle::battle_command(&ctx()?, command)?,
        Commands::Init { name, force } => {
            cli::init::init_command(cli.config.as_deref(), name, force)?;
        }
    }

    Ok(())
}
