//! Unified error types for the Skiff core.
//!
//! No error in this module terminates the hosting process; the failure
//! boundary is one inbound envelope. Runtime-level errors (config,
//! bootstrap) are defined in `skiff-runtime`.

use thiserror::Error;

use crate::integration::action::ActionError;

// =============================================================================
// Decode Errors
// =============================================================================

/// Why an envelope could not be decoded strictly.
///
/// Diagnostic only: the decoder's total wrapper classifies every failing
/// envelope as a raw-stream event instead of surfacing this error.
#[derive(Debug, Clone, Error)]
pub enum DecodeError {
    /// The envelope has no `kind` field.
    #[error("envelope is missing the `kind` discriminant")]
    MissingDiscriminant,

    /// The discriminant names no known event shape.
    #[error("unknown envelope discriminant `{kind}`")]
    UnknownDiscriminant {
        /// The unrecognized discriminant.
        kind: String,
    },

    /// The payload did not match its discriminant's shape.
    #[error("envelope payload for `{kind}` is malformed: {reason}")]
    MalformedPayload {
        /// The discriminant the payload claimed.
        kind: String,
        /// Reason for failure.
        reason: String,
    },

    /// A command-shaped envelope carried neither a command field nor a
    /// parsable `/command` text.
    #[error("command envelope carries no usable command")]
    MissingCommand,
}

// =============================================================================
// Handler Errors
// =============================================================================

/// Failure of one handler invocation.
///
/// Isolated per handler: a failing handler never aborts its siblings or
/// future events. Collected into `DispatchResult::failures`.
#[derive(Debug, Clone, Error)]
pub enum HandlerError {
    /// Handler-authored failure.
    #[error("handler failed: {0}")]
    Failed(String),

    /// An outbound action was refused or could not be delivered.
    #[error(transparent)]
    Action(#[from] ActionError),

    /// The handler task panicked.
    #[error("handler panicked: {0}")]
    Panicked(String),

    /// The handler was cancelled during shutdown; partial work discarded.
    #[error("handler cancelled before completion")]
    Cancelled,
}

impl HandlerError {
    /// Creates a handler-authored failure.
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}

// =============================================================================
// Registry Errors
// =============================================================================

/// Errors from the handler registry.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// Registration was attempted after serving started.
    #[error("registry is sealed; register handlers before serving starts")]
    Sealed,
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for handler invocations.
pub type HandlerResult = Result<(), HandlerError>;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
