//! Implements the `/pause` command.
//!
//! The stream is suspended but the bot stays connected and the cursor does
//! not move, so `/play` picks up exactly where it stopped.

use tracing::instrument;

use crate::data::GetData;
use crate::Context;
use crate::MynahError;

/// Pause the current track.
#[instrument(skip(ctx))]
#[poise::command(slash_command, guild_only)]
pub async fn pause(ctx: Context<'_>) -> Result<(), MynahError> {
    let player = ctx.player().await?;
    player.lock().await.pause().await?;

    ctx.reply("Paused. `/play` resumes.").await?;
    Ok(())
}
