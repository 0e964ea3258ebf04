//! The seam between the player state machine and the voice gateway.
//!
//! The player only ever talks to these traits; the songbird-backed
//! implementation lives in [crate::voice] and tests substitute an in-memory
//! fake. This keeps every state transition testable without a gateway.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::serenity;

use super::track::QueuedTrack;

/// Callback the transport fires every time an active stream finishes on its
/// own (not when the player replaces or stops it).
pub type TrackEndHook = Arc<dyn Fn() + Send + Sync>;

/// Opens exclusive voice links.
#[async_trait]
pub trait VoiceTransport: Send + Sync {
    /// Open the voice link for `guild` in `channel`.
    ///
    /// `on_track_end` must be invoked once per naturally finished stream for
    /// as long as the link is held.
    async fn connect(
        &self,
        guild: serenity::GuildId,
        channel: serenity::ChannelId,
        on_track_end: TrackEndHook,
    ) -> Result<Box<dyn VoiceLink>, TransportError>;
}

/// A held voice connection. At most one exists per guild at any time.
#[async_trait]
pub trait VoiceLink: Send + Sync {
    /// The channel this link is connected to.
    fn channel(&self) -> serenity::ChannelId;

    /// Begin streaming `track`, replacing any stream already running.
    async fn play(&mut self, track: &QueuedTrack) -> Result<(), TransportError>;

    /// Suspend the active stream, keeping the connection.
    async fn pause(&mut self) -> Result<(), TransportError>;

    /// Resume a suspended stream.
    async fn resume(&mut self) -> Result<(), TransportError>;

    /// End the active stream without touching the connection.
    async fn stop(&mut self) -> Result<(), TransportError>;

    /// Release the connection.
    async fn disconnect(&mut self) -> Result<(), TransportError>;
}
