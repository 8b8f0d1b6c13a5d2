//! Procedural macros for the Hamlet bot framework.
//!
//! This crate provides two attribute macros that register an `async fn` with
//! `hamlet-framework` at link time, so the runtime finds it without any
//! explicit wiring:
//!
//! - `#[command]` - a slash command
//! - `#[event]` - a gateway event handler
//!
//! ```rust,ignore
//! use hamlet::prelude::*;
//!
//! #[command(name = "ping", description = "Replies with Pong!")]
//! async fn ping(ctx: CommandContext) -> HandlerResult {
//!     ctx.reply("Pong!").await?;
//!     Ok(())
//! }
//!
//! #[event(name = "ready", once)]
//! async fn first_ready(args: EventArgs) -> HandlerResult {
//!     tracing::info!(event = ?args.event, "first session");
//!     Ok(())
//! }
//! ```

mod register;

use proc_macro::TokenStream;
use syn::{ItemFn, parse_macro_input};

use register::{Args, Kind};

/// Registers an `async fn(CommandContext) -> HandlerResult` as a slash command.
///
/// # Arguments
///
/// - `name = "..."` - command name (default: the function name)
/// - `description = "..."` - text shown in the platform's command picker
#[proc_macro_attribute]
pub fn command(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut args = Args::default();
    let parser = syn::meta::parser(|meta| args.parse(Kind::Command, meta));
    parse_macro_input!(attr with parser);
    let func = parse_macro_input!(item as ItemFn);
    register::expand(Kind::Command, args, func).into()
}

/// Registers an `async fn(EventArgs) -> HandlerResult` as an event handler.
///
/// # Arguments
///
/// - `name = "..."` - trigger name (default: the function name)
/// - `once` or `once = true` - unbind after the first invocation
#[proc_macro_attribute]
pub fn event(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut args = Args::default();
    let parser = syn::meta::parser(|meta| args.parse(Kind::Event, meta));
    parse_macro_input!(attr with parser);
    let func = parse_macro_input!(item as ItemFn);
    register::expand(Kind::Event, args, func).into()
}
