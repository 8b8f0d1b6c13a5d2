//! Hamlet Bot
//!
//! Answers `/piiing2`, recites the soliloquy when someone writes
//! "To be or not to be", and passes direct messages and mentions to the
//! language model.
//!
//! Commands and event handlers come from three places:
//!
//! - functions in this crate marked `#[command]` / `#[event]`
//! - TOML manifests under `commands/` and `events/` (see `hamlet.toml`)
//! - the framework's built-in `ready`, `interactionCreate` and
//!   `messageCreate` handlers
//!
//! # Usage
//!
//! ```bash
//! export DISCORD_TOKEN=...
//! export OPENAI_API_KEY=...
//! cargo run --package hamlet-bot -- --config demos/hamlet_bot/hamlet.toml
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use hamlet::macros;
use hamlet::prelude::{
    CommandContext, DiscordAdapter, DiscordOptions, EventArgs, GatewayEvent, HamletRuntime,
    HandlerResult, OpenAiClient, OpenAiSettings, Secrets,
};
use hamlet::runtime::ConfigLoader;
use tracing::info;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Configuration file. Defaults to `hamlet.toml` in the working directory
    /// or the user config directory.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

// ============================================================================
// Handlers
// ============================================================================

#[macros::command(name = "piiing2", description = "Replies with Pooong!")]
async fn piiing2(ctx: CommandContext) -> HandlerResult {
    ctx.reply("Pooong!").await?;
    Ok(())
}

#[macros::event(name = "ready", once)]
async fn first_ready(args: EventArgs) -> HandlerResult {
    if let GatewayEvent::Ready(identity) = &args.event {
        info!(
            id = identity.id,
            commands = ?args.app.commands().names(),
            "First session established"
        );
    }
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let loader = ConfigLoader::new().with_current_dir().with_user_config_dir();
    let loader = match &args.config {
        Some(path) => loader.file(path),
        None => loader,
    };
    let config = loader.load().context("failed to load configuration")?;
    let secrets = Secrets::from_env(&config)?;

    let discord = DiscordAdapter::new(
        secrets.platform_token,
        DiscordOptions {
            register_commands: config.platform.register_commands,
        },
    );
    let openai = OpenAiClient::new(
        secrets.llm_api_key,
        OpenAiSettings {
            base_url: config.llm.base_url.clone(),
            model: config.llm.model.clone(),
            timeout: config.llm.timeout(),
        },
    )?;

    let runtime = HamletRuntime::builder()
        .config(config)
        .platform(Arc::new(discord))
        .completion(Arc::new(openai))
        .build()?;

    let reason = runtime.run().await?;
    info!(?reason, "Bot stopped");
    Ok(())
}
