//! Setup for [poise::Framework].

use std::sync::Arc;

use crate::commands;
use crate::player::registry::Registry;
use crate::serenity;
use crate::voice::SongbirdTransport;
use crate::Config;
use crate::Data;
use crate::MynahError;

/// Convenient type alias, only this [poise::Framework] type is used.
type Framework = poise::Framework<Data, MynahError>;

/// Construct a [poise::Framework].
pub(super) fn framework(config: Config) -> Framework {
    poise::Framework::builder()
        .options(framework_options())
        .setup(|ctx, rdy, fw| framework_setup(ctx, rdy, fw, config))
        .build()
}

/// Configure options for the [Framework].
fn framework_options() -> poise::FrameworkOptions<Data, MynahError> {
    poise::FrameworkOptions {
        // Add commands to the framework
        commands: commands::list(),
        // Handle framework errors
        on_error: |e| crate::log::handle_framework_error(e),
        // Log when commands start
        pre_command: |ctx| {
            Box::pin(async move {
                let cmd_name = &ctx.command().name;
                let user = &ctx.author();
                tracing::info!("Started '{cmd_name}' command from {user}.")
            })
        },
        // Log when finishing commands
        post_command: |ctx| {
            Box::pin(async move {
                let cmd_name = &ctx.command().name;
                let user = &ctx.author();
                tracing::info!("Finished '{cmd_name}' command from {user}.")
            })
        },
        ..Default::default()
    }
}

/// Construct future that runs on startup.
fn framework_setup<'a>(
    ctx: &'a serenity::Context,
    rdy: &'a serenity::Ready,
    fw: &'a Framework,
    config: Config,
) -> poise::BoxFuture<'a, Result<Data, MynahError>> {
    Box::pin(async move {
        // Register the commands
        let commands = &commands::list();
        let app_commands = poise::builtins::create_application_commands(commands);

        serenity::Command::set_global_commands(&ctx, app_commands.clone()).await?;
        if let Some(dev_guild) = config.dev_guild() {
            // This is faster than global registers, useful for development.
            tracing::info!("Registering commands on dev guild.");
            dev_guild.set_commands(ctx, app_commands).await?;
        }

        // Simple message that logs when the bot has initialized
        let bot_name = &rdy.user.name;
        tracing::info!("{bot_name} is ready!");

        // The voice manager registered on the client at setup.
        let manager = songbird::get(ctx)
            .await
            .ok_or(MynahError::MissingFromSetup {
                reason: "Expecting songbird manager.".to_string(),
            })?;
        let transport = SongbirdTransport::new(manager, reqwest::Client::new());

        let data = Data {
            notify_list: config.notify_list(fw),
            players: Registry::new(Arc::new(transport), config.idle_timeout()),
        };

        Ok(data)
    })
}
