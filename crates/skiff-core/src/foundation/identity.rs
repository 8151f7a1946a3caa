//! The bot's own identity.
//!
//! Carried by the router to suppress self-originated events: a bot that
//! reacts to its own output loops forever, so the self-filter runs before
//! any handler can see the event.

use super::ids::UserId;

/// The identity the bot acts under on the protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    user_id: UserId,
    display_name: Option<String>,
}

impl BotIdentity {
    /// Creates an identity from the bot's own user id.
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: None,
        }
    }

    /// Attaches a human-readable display name (presentation only).
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Returns the bot's user id.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the display name, if one was set.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Returns `true` if `user` is the bot itself.
    ///
    /// An empty identity never matches; half-formed envelopes with a
    /// missing author must not be mistaken for the bot's own events.
    pub fn is_self(&self, user: &UserId) -> bool {
        !self.user_id.is_empty() && self.user_id == *user
    }
}
