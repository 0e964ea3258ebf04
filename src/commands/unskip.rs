//! Implements the `/unskip` command.
//!
//! Rewinds the cursor by one track and plays it. The tracks ahead of the
//! cursor stay queued; nothing is removed.

use tracing::instrument;

use crate::data::GetData;
use crate::voice;
use crate::Context;
use crate::MynahError;

/// Go back to the previous track.
#[instrument(skip(ctx))]
#[poise::command(slash_command, guild_only)]
pub async fn unskip(ctx: Context<'_>) -> Result<(), MynahError> {
    let channel = voice::author_channel(&ctx)?;
    let player = ctx.player().await?;

    let title = {
        let mut player = player.lock().await;
        // Reconnect first in case the bot idled out of the channel.
        player.connect(channel).await?;
        player.back().await?;
        player
            .current()
            .map(|track| track.to_string())
            .unwrap_or_default()
    };

    ctx.reply(format!("Going back to {title}")).await?;
    Ok(())
}
