//! Implements the `/skip` command.
//!
//! The bot will end the current track early and start playing the next one
//! in the queue (if there is one).

use tracing::instrument;

use crate::data::GetData;
use crate::Context;
use crate::MynahError;

/// Skips the current audio track.
#[instrument(skip(ctx))]
#[poise::command(slash_command, guild_only, guild_cooldown = 2)]
pub async fn skip(ctx: Context<'_>) -> Result<(), MynahError> {
    let player = ctx.player().await?;

    let next = {
        let mut player = player.lock().await;
        player.skip().await?
    };

    match next {
        Some(track) => {
            tracing::info!("Skipped to {title}", title = track.title);
            ctx.reply(format!("Skipped. Now playing {track}")).await?;
        }
        None => {
            ctx.reply("Skipped. That was the end of the queue.").await?;
        }
    }

    Ok(())
}
