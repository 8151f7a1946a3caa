//! Event classification.
//!
//! The router is the sole producer of [`Event`] values: it decodes an
//! envelope and applies the rules that decide whether the event reaches
//! dispatch at all. It is a pure function of its inputs — no side effects,
//! no state.
//!
//! Rules, in order:
//! 1. **Self-filter** — events authored by the bot's own identity are
//!    dropped before any handler can see them (feedback-loop prevention).
//! 2. **Exclusivity** — command-shaped envelopes classify as
//!    [`Event::SlashCommand`], never also as a message (enforced by the
//!    decoder).
//! 3. **Totality** — unknown or malformed envelopes classify as
//!    [`Event::RawStream`] rather than failing.

use serde_json::Value;

use crate::foundation::envelope::decode_envelope;
use crate::foundation::event::Event;
use crate::foundation::identity::BotIdentity;

/// Outcome of classifying one envelope.
#[derive(Debug, Clone)]
pub enum Classification {
    /// The envelope produced an event to dispatch.
    Event(Event),
    /// The envelope was deliberately not dispatched.
    Dropped(DropReason),
}

impl Classification {
    /// Returns the event, if one was produced.
    pub fn into_event(self) -> Option<Event> {
        match self {
            Classification::Event(event) => Some(event),
            Classification::Dropped(_) => None,
        }
    }

    /// Returns `true` if the envelope was dropped.
    pub fn is_dropped(&self) -> bool {
        matches!(self, Classification::Dropped(_))
    }
}

/// Why an envelope was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The event was authored by the bot itself.
    SelfAuthored,
}

/// Classifies one decoded envelope.
///
/// Decoding is total (see [`decode_envelope`]); the only envelopes that do
/// not produce an event are the bot's own.
pub fn classify(envelope: Value, identity: &BotIdentity) -> Classification {
    let event = decode_envelope(envelope);
    if identity.is_self(event.author()) {
        return Classification::Dropped(DropReason::SelfAuthored);
    }
    Classification::Event(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::event::EventKind;
    use serde_json::json;

    fn identity() -> BotIdentity {
        BotIdentity::new("bot-1")
    }

    fn message(author: &str, text: &str) -> Value {
        json!({
            "kind": "message",
            "user_id": author,
            "space_id": "s",
            "channel_id": "c",
            "event_id": "e",
            "created_at": 0,
            "text": text,
        })
    }

    #[test]
    fn drops_self_authored_events() {
        let outcome = classify(message("bot-1", "I said this"), &identity());
        assert!(outcome.is_dropped());
        assert!(matches!(
            outcome,
            Classification::Dropped(DropReason::SelfAuthored)
        ));
    }

    #[test]
    fn drops_self_authored_reactions_too() {
        let envelope = json!({
            "kind": "reaction",
            "user_id": "bot-1",
            "channel_id": "c",
            "event_id": "e",
            "reaction": "👍",
            "target_event_id": "e0",
        });
        assert!(classify(envelope, &identity()).is_dropped());
    }

    #[test]
    fn passes_foreign_events() {
        let event = classify(message("user-1", "hi"), &identity())
            .into_event()
            .expect("not dropped");
        assert_eq!(event.kind(), EventKind::Message);
    }

    #[test]
    fn command_shaped_never_classifies_message() {
        let event = classify(message("user-1", "/ping now"), &identity())
            .into_event()
            .expect("not dropped");
        assert_eq!(event.kind(), EventKind::SlashCommand);
        assert!(event.as_message().is_none());
    }

    #[test]
    fn unknown_envelope_classifies_raw_not_error() {
        let event = classify(json!({ "kind": "wat", "user_id": "user-1" }), &identity())
            .into_event()
            .expect("not dropped");
        assert_eq!(event.kind(), EventKind::RawStream);
    }

    #[test]
    fn half_formed_self_envelope_still_drops() {
        // Even through the raw-stream fallback the author is honored.
        let event = classify(json!({ "kind": "wat", "user_id": "bot-1" }), &identity());
        assert!(event.is_dropped());
    }
}
