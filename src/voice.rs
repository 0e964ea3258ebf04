//! Songbird-backed implementation of the player's voice transport.
//!
//! A [SongbirdLink] wraps one guild's [songbird::Call] plus the handle of
//! whatever track is streaming on it. Track-end events are watched with a global
//! call event; only tracks that finish on their own fire the player's
//! auto-advance hook, a manual stop means the player replaced the track
//! itself.

use std::sync::Arc;

use async_trait::async_trait;
use songbird::input::YoutubeDl;
use songbird::tracks::PlayMode;
use songbird::tracks::TrackHandle;
use songbird::Event;
use songbird::EventContext;
use songbird::EventHandler;
use songbird::TrackEvent;
use tokio::sync::Mutex;

use crate::error::TransportError;
use crate::error::UserError;
use crate::player::track::QueuedTrack;
use crate::player::transport::TrackEndHook;
use crate::player::transport::VoiceLink;
use crate::player::transport::VoiceTransport;
use crate::serenity;
use crate::Context;

/// Convenience type alias for [songbird::Call].
pub type CallRef = Arc<Mutex<songbird::Call>>;

/// The real transport: joins calls through the songbird manager and streams
/// with yt-dlp-backed inputs.
pub struct SongbirdTransport {
    manager: Arc<songbird::Songbird>,
    http: reqwest::Client,
}

impl SongbirdTransport {
    pub fn new(manager: Arc<songbird::Songbird>, http: reqwest::Client) -> Self {
        Self { manager, http }
    }
}

#[async_trait]
impl VoiceTransport for SongbirdTransport {
    async fn connect(
        &self,
        guild: serenity::GuildId,
        channel: serenity::ChannelId,
        on_track_end: TrackEndHook,
    ) -> Result<Box<dyn VoiceLink>, TransportError> {
        let call = self
            .manager
            .join(guild, channel)
            .await
            .map_err(|error| TransportError::Join {
                reason: error.to_string(),
            })?;

        {
            // Re-registering on every connect keeps exactly one handler
            // alive per link.
            let mut call_lock = call.lock().await;
            call_lock.remove_all_global_events();
            call_lock.add_global_event(Event::Track(TrackEvent::End), AdvanceOnEnd { on_track_end });
        }

        Ok(Box::new(SongbirdLink {
            call,
            channel,
            http: self.http.clone(),
            track: None,
        }))
    }
}

/// One held voice connection.
struct SongbirdLink {
    call: CallRef,
    channel: serenity::ChannelId,
    http: reqwest::Client,
    /// Handle of the stream currently playing on the call.
    track: Option<TrackHandle>,
}

impl SongbirdLink {
    fn active_track(&self) -> Result<&TrackHandle, TransportError> {
        self.track.as_ref().ok_or(TransportError::NoStream)
    }
}

#[async_trait]
impl VoiceLink for SongbirdLink {
    fn channel(&self) -> serenity::ChannelId {
        self.channel
    }

    async fn play(&mut self, track: &QueuedTrack) -> Result<(), TransportError> {
        let input = YoutubeDl::new(self.http.clone(), track.url.clone());

        let handle = {
            let mut call = self.call.lock().await;
            // Stops whatever was streaming before; the ended track reports
            // a manual stop, so no auto-advance fires for it.
            call.play_only_input(input.into())
        };

        self.track = Some(handle);
        Ok(())
    }

    async fn pause(&mut self) -> Result<(), TransportError> {
        self.active_track()?
            .pause()
            .map_err(|error| TransportError::Control {
                reason: error.to_string(),
            })
    }

    async fn resume(&mut self) -> Result<(), TransportError> {
        self.active_track()?
            .play()
            .map_err(|error| TransportError::Control {
                reason: error.to_string(),
            })
    }

    async fn stop(&mut self) -> Result<(), TransportError> {
        if let Some(handle) = self.track.take() {
            handle.stop().map_err(|error| TransportError::Control {
                reason: error.to_string(),
            })?;
        }
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), TransportError> {
        if let Some(handle) = self.track.take() {
            // Best effort; the call is going away anyway.
            if let Err(error) = handle.stop() {
                tracing::debug!(%error, "failed to stop track before leaving");
            }
        }

        let mut call = self.call.lock().await;
        call.remove_all_global_events();
        call.leave().await.map_err(|error| TransportError::Control {
            reason: error.to_string(),
        })
    }
}

/// Fires the player's auto-advance hook for naturally finished tracks.
struct AdvanceOnEnd {
    on_track_end: TrackEndHook,
}

#[async_trait]
impl EventHandler for AdvanceOnEnd {
    async fn act(&self, ectx: &EventContext<'_>) -> Option<Event> {
        if let EventContext::Track(ended) = ectx {
            // A `Stop` means the player replaced or ended the track itself;
            // everything else (finished, errored) counts as ended on its
            // own.
            let finished = ended
                .iter()
                .any(|(state, _)| !matches!(state.playing, PlayMode::Stop));
            if finished {
                (self.on_track_end)();
            }
        }
        None
    }
}

/// Find the voice channel the command author is currently in.
pub fn author_channel(ctx: &Context<'_>) -> Result<serenity::ChannelId, UserError> {
    let author = ctx.author().id;
    let guild = ctx.guild().ok_or(UserError::GuildOnly)?;

    guild
        .voice_states
        .get(&author)
        .and_then(|vs| vs.channel_id)
        .ok_or(UserError::NotInVoice)
}
