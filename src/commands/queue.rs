//! Implements the `/queue` command.
//!
//! The bot responds with an embed displaying the queue, with a marker on
//! the track at the play cursor.

use poise::CreateReply;
use tracing::instrument;

use crate::data::GetData;
use crate::error::UserError;
use crate::player::Status;
use crate::serenity;
use crate::Context;
use crate::MynahError;

/// Show what's playing and what's coming up.
#[instrument(skip(ctx))]
#[poise::command(slash_command, guild_only, guild_cooldown = 2)]
pub async fn queue(ctx: Context<'_>) -> Result<(), MynahError> {
    let guild = ctx.guild().ok_or(UserError::GuildOnly)?.name.clone();
    let player = ctx.player().await?;

    let (description, thumbnail, footer) = {
        let player = player.lock().await;
        let thumbnail = player
            .current()
            .and_then(|track| track.thumbnail_url.clone());

        let size = player.queue_size();
        let footer = match (player.status(), player.queue().position()) {
            (Status::Playing, Some(position)) => format!("Playing track {position} of {size}"),
            (Status::Paused, Some(position)) => format!("Paused on track {position} of {size}"),
            _ => format!("{size} tracks"),
        };

        (player.queue().display_string(), thumbnail, footer)
    };

    let mut embed = serenity::CreateEmbed::default()
        .description(description)
        .title(format!("{guild} Queue"))
        .footer(serenity::CreateEmbedFooter::new(footer));

    // Add thumbnail if the current track has one.
    if let Some(url) = thumbnail {
        embed = embed.thumbnail(url)
    };

    let reply = CreateReply::default().embed(embed);

    ctx.send(reply).await?;

    Ok(())
}
