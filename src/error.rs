//! Error types for the bot.
//!
//! [UserError] covers everything a user can trigger through normal command
//! usage; these are shown as ephemeral replies and never logged as bugs.
//! [TransportError] covers failures of the voice link. [MynahError] is the
//! top-level type the command framework runs on.

use std::time::Duration;

use thiserror::Error;

/// Errors caused by ordinary user interaction.
///
/// Every variant has a message fit to show the user directly.
#[derive(Error, Debug)]
pub enum UserError {
    #[error("This command only works in a server.")]
    GuildOnly,
    #[error("You're not in a voice channel.")]
    NotInVoice,
    #[error("I'm not connected to a voice channel.")]
    NotConnected,
    #[error("Nothing to play.")]
    EmptyQueue,
    #[error("Nothing is playing.")]
    NotPlaying,
    #[error("Already playing. Give me a song name.")]
    AlreadyPlaying,
    #[error("No track to go back to.")]
    NoHistory,
    #[error("No results for '{query}'.")]
    NoResults { query: String },
    #[error("Position {position} is outside the queue (it has {size} tracks).")]
    OutOfRange { position: usize, size: usize },
    #[error("That range is backwards: {start}-{end}.")]
    BackwardsRange { start: usize, end: usize },
    #[error("'{input}' is not a queue position or range like `2` or `5-7`.")]
    BadPosition { input: String },
    #[error("Could not parse arguments{}.", fmt_opt(input))]
    BadArgs { input: Option<String> },
    #[error("Slow down, try again in {} seconds.", remaining_cooldown.as_secs())]
    OnCooldown { remaining_cooldown: Duration },
}

/// Failures of the voice transport layer.
///
/// Whenever one of these surfaces from a player operation, the player has
/// already released its connection handle and fallen back to idle; the queue
/// and cursor are untouched so a fresh `/play` can retry.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Failed to join the voice channel: {reason}")]
    Join { reason: String },
    #[error("Failed to start the stream: {reason}")]
    Stream { reason: String },
    #[error("Voice control failed: {reason}")]
    Control { reason: String },
    #[error("No active stream.")]
    NoStream,
}

/// Errors while reading or bootstrapping the config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{action_msg} Fill it in and restart the bot.")]
    MissingConfig { action_msg: String },
    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },
    #[error(transparent)]
    IoError(std::io::Error),
}

/// Top-level error type.
#[derive(Error, Debug)]
pub enum MynahError {
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Serenity(#[from] crate::serenity::Error),
    #[error("Missing from setup: {reason}")]
    MissingFromSetup { reason: String },
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    Utf8Error(#[from] std::string::FromUtf8Error),
    #[error("Command panicked{}.", fmt_opt(payload))]
    Panic { payload: Option<String> },
    #[error("Discord sent a command this bot no longer understands: {description}")]
    CommandStructureMismatch { description: String },
}

/// Render an optional detail as `: detail` or nothing.
fn fmt_opt(detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!(": {detail}"),
        None => String::new(),
    }
}
