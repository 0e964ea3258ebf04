//! Implements the `/dc` command.
//!
//! Releases the voice connection. The queue and cursor stay as they are,
//! so a later `/play` picks up where the session left off.

use tracing::instrument;

use crate::data::GetData;
use crate::Context;
use crate::MynahError;

/// Leave the voice channel, keeping the queue.
#[instrument(skip(ctx))]
#[poise::command(slash_command, guild_only)]
pub async fn dc(ctx: Context<'_>) -> Result<(), MynahError> {
    let player = ctx.player().await?;
    player.lock().await.disconnect().await?;

    ctx.reply("Left the channel. The queue is still here.").await?;
    Ok(())
}
