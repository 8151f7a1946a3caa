//! # Skiff Core
//!
//! The event classification and dispatch engine of the Skiff bot
//! framework.
//!
//! Skiff's core is stateless: each decrypted envelope the transport
//! delivers is an independent unit of work that is classified into exactly
//! one typed event and fanned out to the handlers registered for its kind.
//! Handlers cause effects only through the outbound [`ActionClient`]
//! contract and keep cross-event state only in the [`KeyValueStore`]
//! collaborator.
//!
//! ## Architecture Layers
//!
//! ### Foundation Layer
//!
//! Data model and decoding:
//! - **Identifiers**: opaque newtypes ([`UserId`], [`ChannelId`], …)
//! - **Event union**: closed tagged variants ([`Event`], [`EventKind`])
//! - **Envelope decoding**: total, never fails a delivery
//!   ([`decode_envelope`])
//! - **Identity**: the bot's own id for self-filtering ([`BotIdentity`])
//!
//! ### Framework Layer
//!
//! Classification and dispatch:
//! - **Router**: classification rules ([`classify`], [`Classification`])
//! - **Registry**: ordered handler registrations ([`HandlerRegistry`])
//! - **Dispatcher**: concurrent fan-out with failure isolation
//!   ([`Dispatcher`], [`DispatchResult`])
//!
//! ### Integration Layer
//!
//! Collaborator contracts implemented outside this crate:
//! - **Actions**: outbound effects ([`ActionClient`])
//! - **State**: namespaced key-value storage ([`KeyValueStore`])
//!
//! ## Data Flow
//!
//! ```text
//! ┌───────────┐    ┌──────────┐    ┌────────────┐    ┌───────────┐
//! │ Transport │───▶│  Router  │───▶│ Dispatcher │───▶│  Handler  │
//! │ (decoded  │    │ (filter, │    │ (fan-out,  │───▶│  Handler  │
//! │ envelope) │    │ classify)│    │  isolate)  │───▶│  Handler  │
//! └───────────┘    └──────────┘    └────────────┘    └─────┬─────┘
//!                                                          │
//!                                              ActionClient ▼ (outbound)
//! ```

// Architectural layers
pub mod foundation;
pub mod framework;
pub mod integration;

// Re-export foundation types
pub use foundation::{
    BotIdentity, ChannelId, CommandInvocation, DecodeError, EditPayload, Event, EventId, EventKind,
    EventMeta, HandlerError, HandlerResult, MembershipChange, MembershipPayload, Mention,
    MessagePayload, RawStreamPayload, ReactionPayload, RedactionPayload, RegistryError,
    RegistryResult, SlashCommandPayload, SpaceId, TipPayload, UserId, decode_envelope,
    normalize_command_name, parse_command_line, shell_split, try_decode,
};

// Re-export framework types
pub use framework::{
    BoxedHandler, Classification, DispatchResult, Dispatcher, DropReason, HandlerContext,
    HandlerFailure, HandlerRegistry, Registration, RegistrationHandle, classify,
};

// Re-export integration types
pub use integration::{
    ActionClient, ActionError, ActionResult, BoxedActionClient, BoxedStore, KeyValueStore,
    Permission, RejectReason, SendOpts, StoreError, StoreResult,
};

/// Prelude for common imports.
pub mod prelude {
    pub use super::foundation::{
        BotIdentity, ChannelId, Event, EventId, EventKind, EventMeta, HandlerError, HandlerResult,
        Mention, SpaceId, UserId,
    };
    pub use super::framework::{
        Classification, DispatchResult, Dispatcher, HandlerContext, HandlerRegistry, classify,
    };
    pub use super::integration::{
        ActionClient, ActionError, ActionResult, KeyValueStore, Permission, SendOpts,
    };
}
