//! Activity event command

use anyhow::Result;
use clap::ValueEnum;

use blogportal::gamification::ActivityEvent;

use super::output::print_outcome;
use super::Context;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EventKind {
    /// Published a post
    Post,
    /// Liked someone's post
    Like,
    /// One of your posts was liked
    LikeReceived,
    /// Commented on a post
    Comment,
    /// One of your posts is trending
    Trending,
}

impl EventKind {
    fn into_event(self, tags: Vec<String>) -> ActivityEvent {
        match self {
            Self::Post => ActivityEvent::PostPublished { tags },
            Self::Like => ActivityEvent::PostLiked,
            Self::LikeReceived => ActivityEvent::LikeReceived,
            Self::Comment => ActivityEvent::CommentPosted,
            Self::Trending => ActivityEvent::PostTrending,
        }
    }
}

pub fn event_command(ctx: &Context, kind: EventKind, tags: Vec<String>) -> Result<()> {
    let mut engine = ctx.engine()?;
    engine.record(kind.into_event(tags))?;
    print_outcome(&mut engine);
    Ok(())
}
