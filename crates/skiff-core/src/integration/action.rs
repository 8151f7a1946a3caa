//! Outbound action contract.
//!
//! Handlers cause effects exclusively through [`ActionClient`]. This core
//! defines the shape of the contract; the concrete implementation is the
//! transport/RPC collaborator. The core performs no retries — a failed
//! call surfaces as a typed error the handler may react to or ignore, and
//! retry policy (if any) belongs to the transport.
//!
//! When two handlers race on the same event (for example both attempt to
//! remove it), their calls reach the client unordered; the transport
//! arbitrates and the loser receives a rejection.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::foundation::event::Mention;
use crate::foundation::ids::{ChannelId, EventId, UserId};

// =============================================================================
// Permissions
// =============================================================================

/// Permissions the transport/permission collaborator can verify.
///
/// The source of truth lives outside this core; these are names, not
/// grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    Read,
    Write,
    React,
    Redact,
    Ban,
    Pin,
}

impl Permission {
    /// Returns the wire name of this permission.
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::Read => "read",
            Permission::Write => "write",
            Permission::React => "react",
            Permission::Redact => "redact",
            Permission::Ban => "ban",
            Permission::Pin => "pin",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Why an outbound action was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// The acting identity does not own the target event.
    #[error("acting identity does not own the target event")]
    NotAuthor,

    /// The required permission grant is missing.
    #[error("missing permission `{permission}`")]
    MissingPermission {
        /// The permission that was required.
        permission: Permission,
    },

    /// Transport-specific rejection.
    #[error("{0}")]
    Other(String),
}

/// Errors an [`ActionClient`] call can produce.
#[derive(Debug, Clone, Error)]
pub enum ActionError {
    /// The transport refused the action. Never a silent no-op.
    #[error("action rejected: {reason}")]
    Rejected {
        /// Why the action was refused.
        reason: RejectReason,
    },

    /// The outbound channel could not be reached. Not retried here.
    #[error("transport unavailable: {0}")]
    TransportUnavailable(String),
}

impl ActionError {
    /// Rejection because the caller does not own the target event.
    pub fn not_author() -> Self {
        Self::Rejected {
            reason: RejectReason::NotAuthor,
        }
    }

    /// Rejection because a permission grant is missing.
    pub fn missing_permission(permission: Permission) -> Self {
        Self::Rejected {
            reason: RejectReason::MissingPermission { permission },
        }
    }

    /// Transport-specific rejection with a free-form reason.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: RejectReason::Other(reason.into()),
        }
    }

    /// Returns `true` if this is a typed rejection (vs. unavailability).
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// Result type for outbound actions.
pub type ActionResult<T> = Result<T, ActionError>;

// =============================================================================
// Send options
// =============================================================================

/// Optional fields of an outbound message.
#[derive(Debug, Clone, Default)]
pub struct SendOpts {
    /// Event the message replies to.
    pub reply_id: Option<EventId>,
    /// Thread root the message belongs to.
    pub thread_id: Option<EventId>,
    /// Users to mention.
    pub mentions: Vec<Mention>,
}

impl SendOpts {
    /// Options for a direct reply to `event_id`.
    pub fn reply_to(event_id: EventId) -> Self {
        Self {
            reply_id: Some(event_id),
            ..Self::default()
        }
    }

    /// Options for a message inside the thread rooted at `event_id`.
    pub fn in_thread(event_id: EventId) -> Self {
        Self {
            thread_id: Some(event_id),
            ..Self::default()
        }
    }

    /// Adds a mention (builder pattern).
    pub fn mention(mut self, mention: Mention) -> Self {
        self.mentions.push(mention);
        self
    }
}

// =============================================================================
// The contract
// =============================================================================

/// The outbound-effects contract exposed to handlers.
///
/// Implemented by the transport collaborator. Two calls carry constraints
/// the implementation must enforce:
///
/// - [`remove_event`](Self::remove_event) is scoped to events the acting
///   identity authored; foreign targets are rejected with
///   [`RejectReason::NotAuthor`].
/// - [`admin_remove_event`](Self::admin_remove_event) requires an
///   externally verified [`Permission::Redact`] grant; callers without it
///   receive [`RejectReason::MissingPermission`], never a silent no-op.
#[async_trait]
pub trait ActionClient: Send + Sync {
    /// Sends a message to a channel, returning the new event's id.
    async fn send_message(
        &self,
        channel_id: &ChannelId,
        text: &str,
        opts: SendOpts,
    ) -> ActionResult<EventId>;

    /// Replaces the text of a previously sent message.
    async fn edit_message(
        &self,
        channel_id: &ChannelId,
        event_id: &EventId,
        text: &str,
    ) -> ActionResult<()>;

    /// Attaches a reaction to an event.
    async fn send_reaction(
        &self,
        channel_id: &ChannelId,
        event_id: &EventId,
        reaction: &str,
    ) -> ActionResult<()>;

    /// Removes an event the acting identity authored.
    async fn remove_event(&self, channel_id: &ChannelId, event_id: &EventId) -> ActionResult<()>;

    /// Removes any event; requires an externally verified redact grant.
    async fn admin_remove_event(
        &self,
        channel_id: &ChannelId,
        event_id: &EventId,
    ) -> ActionResult<()>;

    /// Asks the permission collaborator whether `user_id` holds
    /// `permission` in `channel_id`.
    async fn check_permission(
        &self,
        channel_id: &ChannelId,
        user_id: &UserId,
        permission: Permission,
    ) -> ActionResult<bool>;
}

/// A shared, type-erased action client.
pub type BoxedActionClient = Arc<dyn ActionClient>;
