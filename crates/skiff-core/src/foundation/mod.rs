//! Foundation layer - data model and decoding.
//!
//! This module contains the fundamental building blocks of the Skiff core:
//! - Opaque identifier newtypes
//! - The closed, typed event union
//! - Total envelope decoding
//! - The bot's own identity (self-filter input)
//! - Core error types

pub mod command;
pub mod envelope;
pub mod error;
pub mod event;
pub mod identity;
pub mod ids;

pub use command::{CommandInvocation, normalize_command_name, parse_command_line, shell_split};
pub use envelope::{decode_envelope, try_decode};
pub use error::{DecodeError, HandlerError, HandlerResult, RegistryError, RegistryResult};
pub use event::{
    EditPayload, Event, EventKind, EventMeta, MembershipChange, MembershipPayload, Mention,
    MessagePayload, RawStreamPayload, ReactionPayload, RedactionPayload, SlashCommandPayload,
    TipPayload,
};
pub use identity::BotIdentity;
pub use ids::{ChannelId, EventId, SpaceId, UserId};
