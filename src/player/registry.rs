//! Lazy per-guild player lookup.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::serenity;

use super::transport::VoiceTransport;
use super::Player;
use super::PlayerRef;

/// Owns every [Player] in the process, one per guild.
///
/// Players are created on first access and never removed; their voice
/// connections come and go. The map lock is held only for lookup and
/// insertion, so a slow operation on one guild's player never blocks
/// another guild.
pub struct Registry {
    transport: Arc<dyn VoiceTransport>,
    idle_timeout: Duration,
    players: Mutex<HashMap<serenity::GuildId, PlayerRef>>,
}

impl Registry {
    pub fn new(transport: Arc<dyn VoiceTransport>, idle_timeout: Duration) -> Self {
        Self {
            transport,
            idle_timeout,
            players: Mutex::new(HashMap::new()),
        }
    }

    /// Return the guild's player, creating it on first access.
    ///
    /// Concurrent first access for one guild constructs exactly one player;
    /// the map lock serializes insertion. Cannot fail.
    pub async fn get(&self, guild_id: serenity::GuildId) -> PlayerRef {
        let mut map = self.players.lock().await;

        match map.get(&guild_id) {
            Some(player) => player.clone(),
            None => {
                tracing::debug!(guild = %guild_id, "creating player");
                let player = Arc::new_cyclic(|this| {
                    Mutex::new(Player::new(
                        guild_id,
                        self.transport.clone(),
                        self.idle_timeout,
                        this.clone(),
                    ))
                });
                map.insert(guild_id, player.clone());
                player
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::super::transport::TrackEndHook;
    use super::super::transport::VoiceLink;
    use super::*;
    use crate::error::TransportError;

    struct NoopTransport;

    #[async_trait]
    impl VoiceTransport for NoopTransport {
        async fn connect(
            &self,
            _guild: serenity::GuildId,
            _channel: serenity::ChannelId,
            _on_track_end: TrackEndHook,
        ) -> Result<Box<dyn VoiceLink>, TransportError> {
            Err(TransportError::Join {
                reason: "not a real transport".to_string(),
            })
        }
    }

    fn registry() -> Arc<Registry> {
        Arc::new(Registry::new(
            Arc::new(NoopTransport),
            Duration::from_secs(300),
        ))
    }

    #[tokio::test]
    async fn same_guild_returns_the_same_player() {
        let registry = registry();
        let first = registry.get(serenity::GuildId::new(1)).await;
        let second = registry.get(serenity::GuildId::new(1)).await;
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn different_guilds_get_independent_players() {
        let registry = registry();
        let first = registry.get(serenity::GuildId::new(1)).await;
        let second = registry.get(serenity::GuildId::new(2)).await;
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn concurrent_first_access_creates_exactly_one_player() {
        let registry = registry();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                registry.get(serenity::GuildId::new(7)).await
            }));
        }

        let mut players = Vec::new();
        for handle in handles {
            players.push(handle.await.expect("task finished"));
        }

        let first = &players[0];
        assert!(players.iter().all(|p| Arc::ptr_eq(first, p)));
    }
}
