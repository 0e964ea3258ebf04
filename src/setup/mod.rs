//! Defines and implements custom bot functionality.

mod config;
mod framework;

use songbird::SerenityInit;

use crate::serenity;
use crate::MynahError;

pub use config::Config;

/// Constructs a [serenity::Client] with [songbird] initialized.
pub(super) async fn client(config: Config) -> Result<serenity::Client, MynahError> {
    // Get discord token from config file
    let token = config.token()?.clone();

    // Intents we wish to use
    // See https://discord.com/developers/docs/topics/gateway#gateway-intents
    let intents = serenity::GatewayIntents::non_privileged();

    let client = serenity::ClientBuilder::new(token, intents)
        .framework(framework::framework(config))
        .register_songbird()
        .await?;

    Ok(client)
}
