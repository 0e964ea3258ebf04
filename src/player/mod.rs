//! The per-guild playback orchestrator.
//!
//! Every guild gets exactly one [Player], created lazily by the
//! [Registry](registry::Registry) and never destroyed while the process
//! runs. A player owns its [Queue], its playback status, and its voice
//! connection handle. All transitions on one player run behind one
//! [tokio::sync::Mutex], so concurrent commands against the same guild
//! never interleave their effects; players of different guilds share
//! nothing.

pub mod queue;
pub mod registry;
pub mod track;
pub mod transport;

use std::sync::Arc;
use std::sync::Weak;
use std::time::Duration;

use delegate::delegate;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::error::MynahError;
use crate::error::TransportError;
use crate::error::UserError;
use crate::serenity;

use queue::Queue;
use track::QueuedTrack;
use transport::TrackEndHook;
use transport::VoiceLink;
use transport::VoiceTransport;

/// Convenience type alias for a shared player handle.
pub type PlayerRef = Arc<Mutex<Player>>;

/// Playback status of a [Player].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Nothing advancing; a connection may or may not be held.
    Idle,
    /// Actively streaming the track at the cursor.
    Playing,
    /// Connection held, stream suspended, cursor unchanged.
    Paused,
}

/// Options for [Player::add].
#[derive(Debug, Clone, Copy, Default)]
pub struct AddOptions {
    /// Insert at cursor+1 so the track plays next, instead of appending.
    pub immediate: bool,
}

/// One guild's playback state machine.
pub struct Player {
    guild_id: serenity::GuildId,
    queue: Queue,
    status: Status,
    /// Present iff a voice link is held.
    link: Option<Box<dyn VoiceLink>>,
    /// Whether the track at the cursor ever started streaming. A failed
    /// start leaves this false, so a retried `play()` streams the same
    /// track instead of advancing past it.
    cursor_streamed: bool,
    transport: Arc<dyn VoiceTransport>,
    /// Releases the link after this long without an active stream.
    idle_timeout: Duration,
    idle_timer: Option<JoinHandle<()>>,
    /// Weak handle to this player's own mutex, for timers and hooks.
    this: Weak<Mutex<Player>>,
}

impl Player {
    /// Constructed only by the registry, which supplies the weak self
    /// handle via [Arc::new_cyclic].
    fn new(
        guild_id: serenity::GuildId,
        transport: Arc<dyn VoiceTransport>,
        idle_timeout: Duration,
        this: Weak<Mutex<Player>>,
    ) -> Self {
        Self {
            guild_id,
            queue: Queue::default(),
            status: Status::Idle,
            link: None,
            cursor_streamed: false,
            transport,
            idle_timeout,
            idle_timer: None,
            this,
        }
    }

    delegate! {
        to self.queue {
            /// Number of tracks in the queue, played and unplayed.
            #[call(len)]
            pub fn queue_size(&self) -> usize;
            /// The track at the play cursor, or `None` when nothing has
            /// ever played.
            pub fn current(&self) -> Option<&QueuedTrack>;
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Whether a voice link is currently held.
    pub fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    /// Read-only view of the queue, for display.
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Add a track to the queue. Never starts playback.
    pub fn add(&mut self, track: QueuedTrack, options: AddOptions) {
        tracing::debug!(
            guild = %self.guild_id,
            title = %track.title,
            requested_by = %track.requested_by,
            channel = %track.channel_id,
            immediate = options.immediate,
            "queueing track"
        );
        if options.immediate {
            self.queue.insert_next(track);
        } else {
            self.queue.push_back(track);
        }
    }

    /// Remove `count` tracks starting at 1-based `start_pos`.
    ///
    /// Rejections leave the queue untouched; see [Queue::remove_range] for
    /// cursor clamping. An active stream is never interrupted by removal.
    pub fn remove_range(&mut self, start_pos: usize, count: usize) -> Result<(), UserError> {
        self.queue.remove_range(start_pos, count)
    }

    /// Acquire or move the voice link. Idempotent; never changes status and
    /// never leaves two links open for one guild.
    pub async fn connect(&mut self, channel: serenity::ChannelId) -> Result<(), MynahError> {
        match self.link.take() {
            Some(link) if link.channel() == channel => {
                self.link = Some(link);
                return Ok(());
            }
            Some(mut link) => {
                // Held for a different channel: release before moving.
                link.disconnect().await?;
            }
            None => {}
        }

        tracing::info!(guild = %self.guild_id, %channel, "connecting to voice");
        let hook = self.track_end_hook();
        let link = self
            .transport
            .connect(self.guild_id, channel, hook)
            .await?;
        self.link = Some(link);

        if self.status == Status::Playing {
            // Moved mid-stream: pick the track back up in the new channel.
            self.start_stream().await?;
        } else {
            self.reset_idle_timer();
        }
        Ok(())
    }

    /// Start or resume playback.
    ///
    /// Paused playback resumes in place. Otherwise the cursor advances to
    /// the next unplayed track (or to the front when nothing has played
    /// yet) and streaming begins; with nothing unplayed ahead, the track at
    /// the cursor is streamed again.
    pub async fn play(&mut self) -> Result<(), MynahError> {
        if self.link.is_none() {
            Err(UserError::NotConnected)?;
        }

        match self.status {
            Status::Playing => Err(UserError::AlreadyPlaying)?,
            Status::Paused => {
                // Resume without moving the cursor.
                let link = self.link.as_mut().ok_or(UserError::NotConnected)?;
                if let Err(error) = link.resume().await {
                    return Err(self.fail_transport(error).await);
                }
                self.status = Status::Playing;
                self.reset_idle_timer();
                Ok(())
            }
            Status::Idle => {
                // Advance only past tracks that actually streamed; with
                // nothing unplayed ahead (or after a failed start), the
                // track at the cursor streams again.
                let needs_advance = match self.queue.current() {
                    None => true,
                    Some(_) => self.cursor_streamed && self.queue.has_next(),
                };
                if needs_advance && self.queue.advance().is_none() {
                    Err(UserError::EmptyQueue)?;
                }
                self.start_stream().await
            }
        }
    }

    /// Suspend the stream, keeping connection and cursor. No-op when
    /// already paused.
    pub async fn pause(&mut self) -> Result<(), MynahError> {
        match self.status {
            Status::Paused => Ok(()),
            Status::Idle => Err(UserError::NotPlaying.into()),
            Status::Playing => {
                let link = self.link.as_mut().ok_or(UserError::NotConnected)?;
                if let Err(error) = link.pause().await {
                    return Err(self.fail_transport(error).await);
                }
                self.status = Status::Paused;
                self.reset_idle_timer();
                Ok(())
            }
        }
    }

    /// Rewind the cursor one position and stream that track.
    pub async fn back(&mut self) -> Result<(), MynahError> {
        if self.link.is_none() {
            Err(UserError::NotConnected)?;
        }
        let title = self.queue.rewind()?.title.clone();
        tracing::info!(guild = %self.guild_id, %title, "rewinding");
        self.start_stream().await
    }

    /// End the current track early and apply the natural-advance rule.
    ///
    /// Returns the track now streaming, or `None` when the queue ran out
    /// and the player went idle.
    pub async fn skip(&mut self) -> Result<Option<QueuedTrack>, MynahError> {
        if self.link.is_none() {
            Err(UserError::NotConnected)?;
        }
        if self.queue.current().is_none() {
            Err(UserError::EmptyQueue)?;
        }

        if self.queue.advance().is_some() {
            self.start_stream().await?;
            Ok(self.queue.current().cloned())
        } else {
            let link = self.link.as_mut().ok_or(UserError::NotConnected)?;
            if let Err(error) = link.stop().await {
                return Err(self.fail_transport(error).await);
            }
            self.status = Status::Idle;
            self.reset_idle_timer();
            Ok(None)
        }
    }

    /// Release the voice link, keeping queue and cursor.
    pub async fn disconnect(&mut self) -> Result<(), MynahError> {
        let mut link = self.link.take().ok_or(UserError::NotConnected)?;
        tracing::info!(guild = %self.guild_id, "leaving voice");
        self.status = Status::Idle;
        self.cancel_idle_timer();
        link.disconnect().await?;
        Ok(())
    }

    /// Called (via [TrackEndHook]) when a stream finishes on its own:
    /// continue with the next queued track, or go idle with the cursor left
    /// on the last played position.
    pub async fn handle_track_end(&mut self) -> Result<(), MynahError> {
        if self.status != Status::Playing {
            // A stale end event; pause/stop already won the race.
            return Ok(());
        }

        if self.queue.advance().is_some() {
            tracing::debug!(guild = %self.guild_id, "track finished, advancing");
            self.start_stream().await
        } else {
            tracing::debug!(guild = %self.guild_id, "queue exhausted, going idle");
            self.status = Status::Idle;
            self.reset_idle_timer();
            Ok(())
        }
    }

    /// Stream the track at the cursor. Holds the caller's player lock for
    /// the whole transition so status and link stay consistent.
    async fn start_stream(&mut self) -> Result<(), MynahError> {
        let track = self
            .queue
            .current()
            .cloned()
            .ok_or(UserError::EmptyQueue)?;
        let link = self.link.as_mut().ok_or(UserError::NotConnected)?;

        if let Err(error) = link.play(&track).await {
            self.cursor_streamed = false;
            return Err(self.fail_transport(error).await);
        }

        tracing::info!(guild = %self.guild_id, title = %track.title, "streaming");
        self.cursor_streamed = true;
        self.status = Status::Playing;
        self.reset_idle_timer();
        Ok(())
    }

    /// Transport failure policy: release the (broken) link, fall back to
    /// idle, keep queue and cursor so a fresh `play()` can retry.
    async fn fail_transport(&mut self, error: TransportError) -> MynahError {
        tracing::warn!(guild = %self.guild_id, %error, "voice transport failed");
        if let Some(mut link) = self.link.take() {
            if let Err(error) = link.disconnect().await {
                tracing::debug!(guild = %self.guild_id, %error, "release after failure");
            }
        }
        self.status = Status::Idle;
        self.cancel_idle_timer();
        error.into()
    }

    fn track_end_hook(&self) -> TrackEndHook {
        let this = self.this.clone();
        Arc::new(move || {
            let this = this.clone();
            tokio::spawn(async move {
                let Some(player) = this.upgrade() else { return };
                let mut player = player.lock().await;
                if let Err(error) = player.handle_track_end().await {
                    tracing::error!(%error, "failed to advance after track end");
                }
            });
        })
    }

    /// Re-arm the idle-disconnect timer.
    ///
    /// The timer runs only while a link is held and nothing is streaming;
    /// every transition into Playing cancels it.
    fn reset_idle_timer(&mut self) {
        self.cancel_idle_timer();
        if self.status == Status::Playing || self.link.is_none() {
            return;
        }

        let this = self.this.clone();
        let timeout = self.idle_timeout;
        self.idle_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            let Some(player) = this.upgrade() else { return };
            let mut player = player.lock().await;
            player.disconnect_if_idle().await;
        }));
    }

    fn cancel_idle_timer(&mut self) {
        if let Some(timer) = self.idle_timer.take() {
            timer.abort();
        }
    }

    /// Timer body: release the link unless playback started in the
    /// meantime.
    async fn disconnect_if_idle(&mut self) {
        if self.status == Status::Playing {
            return;
        }
        let Some(mut link) = self.link.take() else { return };
        tracing::info!(guild = %self.guild_id, "idle timeout reached, leaving voice");
        if let Err(error) = link.disconnect().await {
            tracing::warn!(guild = %self.guild_id, %error, "failed to leave on idle");
        }
        self.status = Status::Idle;
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.cancel_idle_timer();
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("guild_id", &self.guild_id)
            .field("status", &self.status)
            .field("queue_size", &self.queue.len())
            .field("connected", &self.link.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::registry::Registry;
    use super::track::TrackOrigin;
    use super::*;

    const IDLE_TIMEOUT: Duration = Duration::from_secs(300);

    /// Records transport calls instead of touching a voice gateway.
    #[derive(Default)]
    struct FakeState {
        fail_play: AtomicBool,
        connects: AtomicUsize,
        ops: StdMutex<Vec<String>>,
    }

    impl FakeState {
        fn log(&self, op: impl Into<String>) {
            self.ops.lock().unwrap().push(op.into());
        }

        fn ops(&self) -> Vec<String> {
            self.ops.lock().unwrap().clone()
        }
    }

    #[derive(Default)]
    struct FakeTransport {
        state: Arc<FakeState>,
    }

    #[async_trait]
    impl VoiceTransport for FakeTransport {
        async fn connect(
            &self,
            _guild: serenity::GuildId,
            channel: serenity::ChannelId,
            _on_track_end: TrackEndHook,
        ) -> Result<Box<dyn VoiceLink>, TransportError> {
            self.state.connects.fetch_add(1, Ordering::SeqCst);
            self.state.log(format!("connect {channel}"));
            Ok(Box::new(FakeLink {
                channel,
                state: self.state.clone(),
            }))
        }
    }

    struct FakeLink {
        channel: serenity::ChannelId,
        state: Arc<FakeState>,
    }

    #[async_trait]
    impl VoiceLink for FakeLink {
        fn channel(&self) -> serenity::ChannelId {
            self.channel
        }

        async fn play(&mut self, track: &QueuedTrack) -> Result<(), TransportError> {
            if self.state.fail_play.load(Ordering::SeqCst) {
                return Err(TransportError::Stream {
                    reason: "fake failure".to_string(),
                });
            }
            self.state.log(format!("play {}", track.title));
            Ok(())
        }

        async fn pause(&mut self) -> Result<(), TransportError> {
            self.state.log("pause");
            Ok(())
        }

        async fn resume(&mut self) -> Result<(), TransportError> {
            self.state.log("resume");
            Ok(())
        }

        async fn stop(&mut self) -> Result<(), TransportError> {
            self.state.log("stop");
            Ok(())
        }

        async fn disconnect(&mut self) -> Result<(), TransportError> {
            self.state.log("disconnect");
            Ok(())
        }
    }

    fn track(title: &str) -> QueuedTrack {
        QueuedTrack {
            title: title.to_string(),
            url: format!("https://example.com/{title}"),
            duration: None,
            thumbnail_url: None,
            origin: TrackOrigin::Single,
            requested_by: serenity::UserId::new(1),
            channel_id: serenity::ChannelId::new(2),
        }
    }

    fn channel() -> serenity::ChannelId {
        serenity::ChannelId::new(10)
    }

    async fn player_with_fake() -> (PlayerRef, Arc<FakeState>) {
        let transport = FakeTransport::default();
        let state = transport.state.clone();
        let registry = Registry::new(Arc::new(transport), IDLE_TIMEOUT);
        let player = registry.get(serenity::GuildId::new(1)).await;
        (player, state)
    }

    fn assert_user_error(result: Result<(), MynahError>, expected: &UserError) {
        match result {
            Err(MynahError::User(actual)) => {
                assert_eq!(actual.to_string(), expected.to_string())
            }
            other => panic!("expected user error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn play_on_an_empty_queue_fails_and_stays_idle() {
        let (player, _) = player_with_fake().await;
        let mut player = player.lock().await;
        player.connect(channel()).await.unwrap();

        assert_user_error(player.play().await, &UserError::EmptyQueue);
        assert_eq!(player.status(), Status::Idle);
        assert_eq!(player.current(), None);
    }

    #[tokio::test]
    async fn play_without_a_connection_fails() {
        let (player, _) = player_with_fake().await;
        let mut player = player.lock().await;
        player.add(track("a"), AddOptions::default());

        assert_user_error(player.play().await, &UserError::NotConnected);
        assert_eq!(player.status(), Status::Idle);
    }

    #[tokio::test]
    async fn add_connect_play_streams_the_first_track() {
        let (player, state) = player_with_fake().await;
        let mut player = player.lock().await;
        player.add(track("a"), AddOptions::default());
        player.connect(channel()).await.unwrap();
        player.play().await.unwrap();

        assert_eq!(player.status(), Status::Playing);
        assert_eq!(player.current().map(|t| t.title.as_str()), Some("a"));
        assert_eq!(player.queue_size(), 1);
        assert_eq!(state.ops(), vec!["connect 10", "play a"]);
    }

    #[tokio::test]
    async fn pause_then_play_resumes_without_advancing() {
        let (player, state) = player_with_fake().await;
        let mut player = player.lock().await;
        player.add(track("a"), AddOptions::default());
        player.add(track("b"), AddOptions::default());
        player.connect(channel()).await.unwrap();
        player.play().await.unwrap();

        player.pause().await.unwrap();
        assert_eq!(player.status(), Status::Paused);
        let before = player.current().cloned();

        player.play().await.unwrap();
        assert_eq!(player.status(), Status::Playing);
        assert_eq!(player.current().cloned(), before);
        assert!(state.ops().contains(&"resume".to_string()));
    }

    #[tokio::test]
    async fn pause_while_idle_fails() {
        let (player, _) = player_with_fake().await;
        let mut player = player.lock().await;
        assert_user_error(player.pause().await, &UserError::NotPlaying);
    }

    #[tokio::test]
    async fn pause_twice_is_a_no_op() {
        let (player, _) = player_with_fake().await;
        let mut player = player.lock().await;
        player.add(track("a"), AddOptions::default());
        player.connect(channel()).await.unwrap();
        player.play().await.unwrap();

        player.pause().await.unwrap();
        player.pause().await.unwrap();
        assert_eq!(player.status(), Status::Paused);
    }

    #[tokio::test]
    async fn back_rewinds_and_keeps_the_queue() {
        let (player, _) = player_with_fake().await;
        let mut player = player.lock().await;
        for name in ["a", "b", "c"] {
            player.add(track(name), AddOptions::default());
        }
        player.connect(channel()).await.unwrap();
        player.play().await.unwrap();
        player.skip().await.unwrap(); // now on "b"
        assert_eq!(player.current().map(|t| t.title.as_str()), Some("b"));

        player.back().await.unwrap();
        assert_eq!(player.current().map(|t| t.title.as_str()), Some("a"));
        assert_eq!(player.queue_size(), 3);
        assert_eq!(player.status(), Status::Playing);
    }

    #[tokio::test]
    async fn back_at_the_front_fails_and_changes_nothing() {
        let (player, _) = player_with_fake().await;
        let mut player = player.lock().await;
        player.add(track("a"), AddOptions::default());
        player.connect(channel()).await.unwrap();

        // Cursor unset.
        assert_user_error(player.back().await, &UserError::NoHistory);

        player.play().await.unwrap();
        // Cursor at position 1.
        assert_user_error(player.back().await, &UserError::NoHistory);
        assert_eq!(player.current().map(|t| t.title.as_str()), Some("a"));
        assert_eq!(player.status(), Status::Playing);
    }

    #[tokio::test]
    async fn remove_all_then_play_fails() {
        let (player, _) = player_with_fake().await;
        let mut player = player.lock().await;
        player.add(track("a"), AddOptions::default());
        player.add(track("b"), AddOptions::default());
        player.connect(channel()).await.unwrap();

        player.remove_range(1, 2).unwrap();
        assert_eq!(player.queue_size(), 0);
        assert_user_error(player.play().await, &UserError::EmptyQueue);
    }

    #[tokio::test]
    async fn natural_end_advances_then_goes_idle() {
        let (player, state) = player_with_fake().await;
        let mut player = player.lock().await;
        player.add(track("a"), AddOptions::default());
        player.add(track("b"), AddOptions::default());
        player.connect(channel()).await.unwrap();
        player.play().await.unwrap();

        player.handle_track_end().await.unwrap();
        assert_eq!(player.status(), Status::Playing);
        assert_eq!(player.current().map(|t| t.title.as_str()), Some("b"));
        assert!(state.ops().contains(&"play b".to_string()));

        player.handle_track_end().await.unwrap();
        assert_eq!(player.status(), Status::Idle);
        // Cursor stays on the last played track.
        assert_eq!(player.current().map(|t| t.title.as_str()), Some("b"));
        assert!(player.is_connected());
    }

    #[tokio::test]
    async fn skip_past_the_last_track_stops_the_stream() {
        let (player, state) = player_with_fake().await;
        let mut player = player.lock().await;
        player.add(track("a"), AddOptions::default());
        player.connect(channel()).await.unwrap();
        player.play().await.unwrap();

        let next = player.skip().await.unwrap();
        assert_eq!(next, None);
        assert_eq!(player.status(), Status::Idle);
        assert!(state.ops().contains(&"stop".to_string()));
    }

    #[tokio::test]
    async fn connect_is_idempotent_for_the_same_channel() {
        let (player, state) = player_with_fake().await;
        let mut player = player.lock().await;
        player.connect(channel()).await.unwrap();
        player.connect(channel()).await.unwrap();
        assert_eq!(state.connects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn connect_to_another_channel_moves_the_link() {
        let (player, state) = player_with_fake().await;
        let mut player = player.lock().await;
        player.connect(serenity::ChannelId::new(10)).await.unwrap();
        player.connect(serenity::ChannelId::new(11)).await.unwrap();

        // The old link is released before the new one opens.
        assert_eq!(
            state.ops(),
            vec!["connect 10", "disconnect", "connect 11"]
        );
        assert!(player.is_connected());
    }

    #[tokio::test]
    async fn stream_failure_clears_the_link_and_preserves_the_queue() {
        let (player, state) = player_with_fake().await;
        let mut player = player.lock().await;
        player.add(track("a"), AddOptions::default());
        player.add(track("b"), AddOptions::default());
        player.connect(channel()).await.unwrap();
        state.fail_play.store(true, Ordering::SeqCst);

        let result = player.play().await;
        assert!(matches!(result, Err(MynahError::Transport(_))));
        assert_eq!(player.status(), Status::Idle);
        assert!(!player.is_connected());
        assert_eq!(player.queue_size(), 2);
        // The cursor stays where the failed attempt put it, so a retry
        // streams the same track.
        assert_eq!(player.current().map(|t| t.title.as_str()), Some("a"));

        // Retry works once the transport recovers, and streams the track
        // that never played rather than advancing past it.
        state.fail_play.store(false, Ordering::SeqCst);
        player.connect(channel()).await.unwrap();
        player.play().await.unwrap();
        assert_eq!(player.status(), Status::Playing);
        assert_eq!(player.current().map(|t| t.title.as_str()), Some("a"));
    }

    #[tokio::test]
    async fn play_after_exhaustion_restreams_the_current_track() {
        let (player, state) = player_with_fake().await;
        let mut player = player.lock().await;
        player.add(track("a"), AddOptions::default());
        player.connect(channel()).await.unwrap();
        player.play().await.unwrap();
        player.handle_track_end().await.unwrap();
        assert_eq!(player.status(), Status::Idle);

        player.play().await.unwrap();
        assert_eq!(player.status(), Status::Playing);
        assert_eq!(
            state
                .ops()
                .iter()
                .filter(|op| op.as_str() == "play a")
                .count(),
            2
        );
    }

    #[tokio::test(start_paused = true)]
    async fn idle_timeout_releases_the_link() {
        let (player, _) = player_with_fake().await;
        {
            let mut player = player.lock().await;
            player.add(track("a"), AddOptions::default());
            player.connect(channel()).await.unwrap();
        }

        tokio::time::sleep(IDLE_TIMEOUT + Duration::from_secs(1)).await;

        let player = player.lock().await;
        assert!(!player.is_connected());
        assert_eq!(player.status(), Status::Idle);
        // Queue and cursor survive the disconnect.
        assert_eq!(player.queue_size(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_timeout_never_fires_while_playing() {
        let (player, _) = player_with_fake().await;
        {
            let mut player = player.lock().await;
            player.add(track("a"), AddOptions::default());
            player.connect(channel()).await.unwrap();
            player.play().await.unwrap();
        }

        tokio::time::sleep(IDLE_TIMEOUT * 2).await;

        let player = player.lock().await;
        assert!(player.is_connected());
        assert_eq!(player.status(), Status::Playing);
    }
}
