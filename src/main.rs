//! A music bot with a per-guild playback orchestrator.
//!
//! Every guild gets one long-lived [player::Player] that owns its track
//! queue and voice connection; commands are thin glue over it.

mod commands;
mod data;
mod error;
mod log;
mod player;
mod resolver;
mod setup;
mod voice;

/// Convenient alias, serenity is only ever used through poise.
pub use poise::serenity_prelude as serenity;

pub use data::Data;
pub use error::MynahError;
pub use setup::Config;

/// Convenient type alias for [poise::Context].
type Context<'a> = poise::Context<'a, Data, MynahError>;

#[tokio::main]
async fn main() -> Result<(), MynahError> {
    let config = Config::read()?;

    // Keep the guard alive so file logs flush on shutdown.
    let _guard = log::install_tracing(&config);

    let mut client = setup::client(config).await?;
    client.start().await?;

    Ok(())
}
