//! Implements the `/play` command.
//!
//! With no query the bot resumes playback of the current track. With a
//! query it resolves a link or search into one or more tracks, queues
//! them, and joins the author's voice channel to start playback when it
//! is not already connected.

use futures::TryFutureExt;
use rand::seq::SliceRandom;
use tracing::instrument;

use crate::data::GetData;
use crate::error::UserError;
use crate::player::track::QueuedTrack;
use crate::player::track::TrackOrigin;
use crate::player::AddOptions;
use crate::resolver;
use crate::voice;
use crate::Context;
use crate::MynahError;

/// Play from a link or search query, or resume paused playback.
#[instrument(skip(ctx))]
#[poise::command(slash_command, guild_only)]
pub async fn play(
    ctx: Context<'_>,
    #[description = "Link or search query. Leave empty to resume playback."] query: Option<String>,
    #[description = "Put the result at the front of the queue so it plays next."] immediate: Option<
        bool,
    >,
    #[description = "Shuffle the added tracks."] shuffle: Option<bool>,
) -> Result<(), MynahError> {
    let channel = voice::author_channel(&ctx)?;
    let player = ctx.player().await?;

    // Bare `/play` resumes whatever the cursor points at.
    let Some(query) = query else {
        {
            let mut player = player.lock().await;
            if player.current().is_none() {
                Err(UserError::EmptyQueue)?;
            }
            player.connect(channel).await?;
            player.play().await?;
        }
        ctx.say("Resuming playback.").await?;
        return Ok(());
    };

    // Resolution runs a subprocess and can be slow, so it happens before
    // the player lock is taken.
    ctx.defer().await?;
    let resolution = resolver::resolve(&query).await?;
    if resolution.tracks.is_empty() {
        Err(UserError::NoResults { query })?;
    }

    let immediate = immediate.unwrap_or(false);
    let mut new_tracks: Vec<_> = resolution
        .tracks
        .into_iter()
        .map(|track| track.requested_by(ctx.author().id, ctx.channel_id()))
        .collect();

    if shuffle.unwrap_or(false) {
        // Shuffles only the new batch, never the existing queue.
        new_tracks.shuffle(&mut rand::thread_rng());
    }

    let reply = ctx
        .say(summary(&new_tracks, immediate, resolution.not_found))
        .map_err(MynahError::from);
    let queue_tracks = async {
        let mut player = player.lock().await;
        let start_playback = !player.is_connected();
        for track in new_tracks {
            player.add(track, AddOptions { immediate });
        }
        if start_playback {
            player.connect(channel).await?;
            player.play().await?;
        }
        Ok::<(), MynahError>(())
    };

    // Concurrently send the reply & queue the tracks.
    let (_reply_handle, _) = tokio::try_join!(reply, queue_tracks)?;
    Ok(())
}

/// Build the reply describing what was added.
fn summary(tracks: &[QueuedTrack], immediate: bool, not_found: usize) -> String {
    let first = &tracks[0];
    let origin = if first.origin == TrackOrigin::Playlist {
        " from the playlist"
    } else {
        ""
    };

    let mut message = if tracks.len() == 1 {
        let front = if immediate { " front of the" } else { "" };
        format!("**{}**{origin} added to the{front} queue.", first.title)
    } else {
        let rest = tracks.len() - 1;
        let plural = if rest == 1 { "track" } else { "tracks" };
        format!(
            "**{}** and {rest} other {plural}{origin} added to the queue.",
            first.title
        )
    };

    if not_found == 1 {
        message.push_str(" (1 track was not found.)");
    } else if not_found > 1 {
        message.push_str(&format!(" ({not_found} tracks were not found.)"));
    }

    message
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::serenity;

    fn track(title: &str, origin: TrackOrigin) -> QueuedTrack {
        QueuedTrack {
            title: title.to_string(),
            url: "https://example.com/v".to_string(),
            duration: None,
            thumbnail_url: None,
            origin,
            requested_by: serenity::UserId::new(1),
            channel_id: serenity::ChannelId::new(2),
        }
    }

    #[test]
    fn single_track_summaries_mention_the_front() {
        let single = [track("Song", TrackOrigin::Single)];
        assert_eq!(summary(&single, false, 0), "**Song** added to the queue.");
        assert_eq!(
            summary(&single, true, 0),
            "**Song** added to the front of the queue."
        );
    }

    #[test]
    fn batch_summaries_count_the_rest_and_the_missing() {
        let batch = [
            track("Song", TrackOrigin::Playlist),
            track("Other", TrackOrigin::Playlist),
        ];
        assert_eq!(
            summary(&batch, false, 2),
            "**Song** and 1 other track from the playlist added to the queue. (2 tracks were not found.)"
        );
    }
}
