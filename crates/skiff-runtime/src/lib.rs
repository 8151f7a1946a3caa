//! # Skiff Runtime
//!
//! The bootstrap and serving layer of the Skiff bot framework.
//!
//! This crate assembles the pieces `skiff-core` and `skiff-framework`
//! define into a runnable bot:
//!
//! - **Configuration** ([`config`]): figment-layered settings from files,
//!   environment, and defaults.
//! - **Logging** ([`logging`]): tracing-subscriber setup driven by the
//!   loaded configuration.
//! - **Bot** ([`Bot`], [`BotBuilder`]): the setup-time registration
//!   surface (handlers + advertised commands) and the serving loop that
//!   consumes decoded envelopes from the transport collaborator.
//!
//! The transport itself (webhook server, authentication, decryption) is
//! not part of this workspace; it feeds the envelope channel from outside.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use skiff_runtime::{Bot, BotBuilder, config::load_config};
//! use skiff_framework::{KeywordResponder, into_handler};
//!
//! let config = load_config()?;
//! let bot = BotBuilder::from_config(&config)?
//!     .actions(transport_client)
//!     .command("ping", "Replies with pong")
//!     .build()?;
//!
//! bot.on_message(into_handler(KeywordResponder::new().rule("gm", "gm!")))?;
//!
//! let (tx, rx) = bot.envelope_channel();
//! spawn_transport(tx); // external collaborator
//! bot.run(rx).await;
//! ```

pub mod bot;
pub mod config;
pub mod error;
pub mod logging;

pub use bot::{Bot, BotBuilder, ServeReport};
pub use config::{ConfigError, ConfigLoader, ConfigResult, SkiffConfig, load_config};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::LoggingBuilder;

// The identity type shows up in every builder call; re-export it.
pub use skiff_core::BotIdentity;
