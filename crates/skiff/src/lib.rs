//! # Skiff
//!
//! A stateless, type-safe event-dispatch framework for chat-protocol
//! bots.
//!
//! ## Overview
//!
//! Skiff turns decrypted protocol envelopes into a closed union of typed
//! events and fans each one out to the handlers registered for its kind.
//! Handlers cause effects only through an abstract outbound contract, so
//! the dispatch core stays free of transport, crypto, and ledger
//! concerns — those are external collaborators.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐    ┌──────────┐    ┌────────────┐    ┌──────────────────────┐
//! │ Transport │───▶│  Router  │───▶│ Dispatcher │───▶│ Handler (own task)   │──▶ ActionClient
//! │ (decoded  │    │ (filter, │    │ (fan-out,  │───▶│ Handler (own task)   │──▶ ActionClient
//! │ envelope) │    │ classify)│    │  isolate)  │───▶│ Handler (own task)   │──▶ ActionClient
//! └───────────┘    └──────────┘    └────────────┘    └──────────────────────┘
//! ```
//!
//! - **Router**: self-filter + classification into exactly one event kind
//! - **Dispatcher**: concurrent per-event fan-out with failure isolation
//! - **Handlers**: user async functions or [`Handler`](skiff_framework::Handler) impls
//! - **ActionClient / KeyValueStore**: collaborator contracts the
//!   surrounding system implements
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use skiff::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let bot = Bot::builder(BotIdentity::new("bot-1"))
//!         .actions(transport_client)
//!         .command("ping", "Replies with pong")
//!         .build()?;
//!
//!     bot.on_message(into_handler(
//!         KeywordResponder::new().rule("gm", "gm!"),
//!     ))?;
//!
//!     let (tx, rx) = bot.envelope_channel();
//!     spawn_transport(tx); // external collaborator
//!     bot.run(rx).await;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config` *(default)*: TOML configuration files
//! - `json-log`: JSON log output

pub use skiff_core as core;
pub use skiff_framework as framework;
pub use skiff_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use skiff::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use skiff_runtime::{Bot, BotBuilder, BotIdentity, ServeReport};

    // Handler authoring
    pub use skiff_framework::{Handler, KeywordResponder, handler_fn, into_handler};

    // Event model - what handlers match on
    pub use skiff_core::{
        ChannelId, Event, EventId, EventKind, EventMeta, HandlerContext, HandlerError,
        HandlerResult, Mention, SpaceId, UserId,
    };

    // Collaborator contracts
    pub use skiff_core::{
        ActionClient, ActionError, ActionResult, KeyValueStore, Permission, SendOpts,
    };
}
