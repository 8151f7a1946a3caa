//! The typed event model.
//!
//! Every decrypted envelope the transport delivers becomes exactly one
//! [`Event`] variant. The union is closed on purpose: handlers match on a
//! known set of shapes instead of probing optional fields at runtime, and
//! anything the decoder does not recognize is preserved as
//! [`Event::RawStream`] rather than dropped.
//!
//! # Event shapes
//!
//! ```text
//! Event
//! ├── Message           text, reply/thread refs, mentions
//! ├── SlashCommand      command name + arguments (never also a Message)
//! ├── Reaction          reaction + target event
//! ├── Edit              replacement text for a prior event
//! ├── Redaction         removal of a prior event
//! ├── Tip               ledger transfer attached to an event
//! ├── MembershipChange  join / leave
//! └── RawStream         catch-all with the original payload
//! ```
//!
//! Each payload embeds [`EventMeta`] via `#[serde(flatten)]`, so base and
//! kind-specific fields deserialize from the envelope in a single pass.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ids::{ChannelId, EventId, SpaceId, UserId};

// ============================================================================
// Event kind classification
// ============================================================================

/// Category of an event, used as the handler-registry key.
///
/// Mirrors the variants of [`Event`] without carrying any payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Plain chat messages.
    Message,
    /// Slash-command invocations.
    SlashCommand,
    /// Reactions to prior events.
    Reaction,
    /// Edits of prior events.
    Edit,
    /// Redactions (removals) of prior events.
    Redaction,
    /// Ledger tips attached to prior events.
    Tip,
    /// Member join/leave notifications.
    MembershipChange,
    /// Anything the decoder did not recognize.
    RawStream,
}

impl EventKind {
    /// Returns the wire discriminant for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Message => "message",
            EventKind::SlashCommand => "slash_command",
            EventKind::Reaction => "reaction",
            EventKind::Edit => "edit",
            EventKind::Redaction => "redaction",
            EventKind::Tip => "tip",
            EventKind::MembershipChange => "membership_change",
            EventKind::RawStream => "raw_stream",
        }
    }
}

impl FromStr for EventKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "message" => EventKind::Message,
            "slash_command" | "command" => EventKind::SlashCommand,
            "reaction" => EventKind::Reaction,
            "edit" => EventKind::Edit,
            "redaction" => EventKind::Redaction,
            "tip" => EventKind::Tip,
            "membership_change" | "membership" => EventKind::MembershipChange,
            _ => EventKind::RawStream,
        })
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Shared payload pieces
// ============================================================================

/// Fields present on every event.
///
/// `event_id` is unique within a channel's stream; `created_at` is the
/// transport's creation timestamp in unix milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMeta {
    /// The acting user. For the bot's own events this equals the bot id.
    #[serde(default)]
    pub user_id: UserId,
    /// Space the channel belongs to.
    #[serde(default)]
    pub space_id: SpaceId,
    /// Channel the event was observed in.
    #[serde(default)]
    pub channel_id: ChannelId,
    /// Stream-unique event identifier.
    #[serde(default)]
    pub event_id: EventId,
    /// Creation timestamp (unix milliseconds).
    #[serde(default)]
    pub created_at: i64,
}

/// A user mentioned in a message.
///
/// `display_name` is a presentation hint only; `user_id` is the identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    pub user_id: UserId,
    #[serde(default)]
    pub display_name: String,
}

/// Direction of a membership change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipChange {
    Join,
    Leave,
}

// ============================================================================
// Per-kind payloads
// ============================================================================

/// A plain chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    #[serde(flatten)]
    pub meta: EventMeta,
    pub text: String,
    /// Event this message replies to, if any.
    #[serde(default)]
    pub reply_id: Option<EventId>,
    /// Thread root this message belongs to, if any.
    #[serde(default)]
    pub thread_id: Option<EventId>,
    /// Whether the bot itself was mentioned.
    #[serde(default)]
    pub is_mentioned: bool,
    #[serde(default)]
    pub mentions: Vec<Mention>,
}

/// A slash-command invocation.
///
/// Command-shaped envelopes decode to this variant and never to
/// [`MessagePayload`]; the two are mutually exclusive by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashCommandPayload {
    #[serde(flatten)]
    pub meta: EventMeta,
    /// Command name, lowercased, without the leading slash.
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub mentions: Vec<Mention>,
    #[serde(default)]
    pub reply_id: Option<EventId>,
    #[serde(default)]
    pub thread_id: Option<EventId>,
}

/// A reaction to a prior event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionPayload {
    #[serde(flatten)]
    pub meta: EventMeta,
    pub reaction: String,
    pub target_event_id: EventId,
}

/// An edit replacing the text of a prior event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditPayload {
    #[serde(flatten)]
    pub meta: EventMeta,
    pub target_event_id: EventId,
    pub text: String,
    #[serde(default)]
    pub reply_id: Option<EventId>,
    #[serde(default)]
    pub thread_id: Option<EventId>,
    #[serde(default)]
    pub is_mentioned: bool,
    #[serde(default)]
    pub mentions: Vec<Mention>,
}

/// A redaction removing a prior event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionPayload {
    #[serde(flatten)]
    pub meta: EventMeta,
    pub target_event_id: EventId,
}

/// A ledger tip attached to a prior event.
///
/// Addresses and the amount are opaque to this crate; the ledger
/// collaborator owns their interpretation. `amount` is a decimal string
/// because on-ledger amounts can exceed any machine integer width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipPayload {
    #[serde(flatten)]
    pub meta: EventMeta,
    pub target_event_id: EventId,
    pub sender_address: String,
    pub receiver_address: String,
    pub amount: String,
    pub currency_address: String,
}

/// A member joining or leaving the channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipPayload {
    #[serde(flatten)]
    pub meta: EventMeta,
    pub change: MembershipChange,
}

/// Catch-all for envelopes the decoder does not recognize.
///
/// `meta` holds whatever base fields were present (missing ones default to
/// empty); `payload` preserves the original envelope value for handlers
/// that want to inspect it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStreamPayload {
    pub meta: EventMeta,
    pub payload: serde_json::Value,
}

// ============================================================================
// The event union
// ============================================================================

/// A classified protocol event.
///
/// Produced exclusively by the router (`classify`); one envelope yields
/// exactly one variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Message(MessagePayload),
    SlashCommand(SlashCommandPayload),
    Reaction(ReactionPayload),
    Edit(EditPayload),
    Redaction(RedactionPayload),
    Tip(TipPayload),
    MembershipChange(MembershipPayload),
    RawStream(RawStreamPayload),
}

impl Event {
    /// Returns the category this event dispatches under.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Message(_) => EventKind::Message,
            Event::SlashCommand(_) => EventKind::SlashCommand,
            Event::Reaction(_) => EventKind::Reaction,
            Event::Edit(_) => EventKind::Edit,
            Event::Redaction(_) => EventKind::Redaction,
            Event::Tip(_) => EventKind::Tip,
            Event::MembershipChange(_) => EventKind::MembershipChange,
            Event::RawStream(_) => EventKind::RawStream,
        }
    }

    /// Returns the base fields shared by every variant.
    pub fn meta(&self) -> &EventMeta {
        match self {
            Event::Message(p) => &p.meta,
            Event::SlashCommand(p) => &p.meta,
            Event::Reaction(p) => &p.meta,
            Event::Edit(p) => &p.meta,
            Event::Redaction(p) => &p.meta,
            Event::Tip(p) => &p.meta,
            Event::MembershipChange(p) => &p.meta,
            Event::RawStream(p) => &p.meta,
        }
    }

    /// Returns the id of the user who authored this event.
    pub fn author(&self) -> &UserId {
        &self.meta().user_id
    }

    /// Returns the message payload if this is a [`Event::Message`].
    pub fn as_message(&self) -> Option<&MessagePayload> {
        match self {
            Event::Message(p) => Some(p),
            _ => None,
        }
    }

    /// Returns the command payload if this is a [`Event::SlashCommand`].
    pub fn as_slash_command(&self) -> Option<&SlashCommandPayload> {
        match self {
            Event::SlashCommand(p) => Some(p),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_wire_discriminants() {
        assert_eq!("message".parse(), Ok(EventKind::Message));
        assert_eq!("slash_command".parse(), Ok(EventKind::SlashCommand));
        assert_eq!("command".parse(), Ok(EventKind::SlashCommand));
        assert_eq!("membership".parse(), Ok(EventKind::MembershipChange));
        assert_eq!("TIP".parse(), Ok(EventKind::Tip));
    }

    #[test]
    fn unknown_discriminant_is_raw_stream() {
        assert_eq!("mystery".parse(), Ok(EventKind::RawStream));
        assert_eq!("".parse(), Ok(EventKind::RawStream));
    }

    #[test]
    fn message_payload_flattens_meta() {
        let payload: MessagePayload = serde_json::from_value(serde_json::json!({
            "user_id": "u1",
            "space_id": "s1",
            "channel_id": "c1",
            "event_id": "e1",
            "created_at": 1700000000000i64,
            "text": "hello",
        }))
        .unwrap();
        assert_eq!(payload.meta.user_id, UserId::new("u1"));
        assert_eq!(payload.text, "hello");
        assert!(payload.reply_id.is_none());
        assert!(payload.mentions.is_empty());
    }

    #[test]
    fn event_kind_matches_variant() {
        let event = Event::Redaction(RedactionPayload {
            meta: EventMeta::default(),
            target_event_id: EventId::new("e9"),
        });
        assert_eq!(event.kind(), EventKind::Redaction);
        assert_eq!(event.kind().as_str(), "redaction");
    }
}
