//! This module contains everything relating to [Data].

use std::collections::HashSet;

use crate::error::UserError;
use crate::player::registry::Registry;
use crate::player::PlayerRef;
use crate::serenity;
use crate::Context;

/// The data kept between shards.
pub struct Data {
    /// List of users to send bug notifications.
    pub notify_list: HashSet<serenity::UserId>,
    /// One player per guild, created on first access.
    pub players: Registry,
}

/// Is able to get the player that belongs to the current guild.
pub trait GetData {
    /// Returns the guild's player. Errors outside a guild.
    async fn player(&self) -> Result<PlayerRef, UserError>;
}

impl GetData for Context<'_> {
    async fn player(&self) -> Result<PlayerRef, UserError> {
        let guild = self.guild_id().ok_or(UserError::GuildOnly)?;
        Ok(self.data().players.get(guild).await)
    }
}
