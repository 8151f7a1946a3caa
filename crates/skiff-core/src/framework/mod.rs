//! Framework layer - classification and dispatch.
//!
//! This module contains the event processing pipeline:
//! - Router: classification rules (self-filter, exclusivity, totality)
//! - Registry: ordered per-kind handler registrations
//! - Dispatcher: concurrent fan-out with failure isolation
//! - Context: what a handler invocation receives

pub mod context;
pub mod dispatcher;
pub mod registry;
pub mod router;

pub use context::{BoxedHandler, HandlerContext};
pub use dispatcher::{DispatchResult, Dispatcher, HandlerFailure};
pub use registry::{HandlerRegistry, Registration, RegistrationHandle};
pub use router::{Classification, DropReason, classify};
