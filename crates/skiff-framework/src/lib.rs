//! # Skiff Framework
//!
//! The handler-authoring layer of the Skiff bot framework.
//!
//! `skiff-core` defines what a handler *is* (a boxed async callback over
//! a [`HandlerContext`](skiff_core::HandlerContext)); this crate provides
//! the pieces bot authors actually write against:
//!
//! - [`Handler`] and the [`handler_fn`]/[`into_handler`] adapters
//! - [`KeywordResponder`] — the canonical keyword-reply message handler
//! - [`CommandSet`] — the static slash-command advertisement list
//! - [`MemoryStore`] — the built-in volatile key-value store
//!
//! # Example
//!
//! ```rust,ignore
//! use skiff_framework::{KeywordResponder, handler_fn, into_handler};
//!
//! let keywords = into_handler(
//!     KeywordResponder::new()
//!         .rule("gm", "gm!")
//!         .rule("wen", "soon™"),
//! );
//!
//! let logger = handler_fn(|ctx| async move {
//!     tracing::info!(event = ?ctx.event().kind(), "inbound event");
//!     Ok(())
//! });
//! ```

pub mod command;
pub mod handler;
pub mod keyword;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use command::{CommandError, CommandSet, CommandSpec};
pub use handler::{Handler, handler_fn, into_handler};
pub use keyword::KeywordResponder;
pub use store::MemoryStore;
