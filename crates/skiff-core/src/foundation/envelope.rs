//! Envelope decoding.
//!
//! The transport collaborator delivers each decrypted, authenticated record
//! as a JSON object with a `kind` discriminant plus the fields of the
//! matching payload. [`decode_envelope`] inspects the discriminant and
//! constructs the most specific [`Event`] variant it can; anything it
//! cannot understand falls back to [`Event::RawStream`], so decoding is
//! total and never fails an inbound delivery.
//!
//! Exclusivity rule: an envelope that carries a command discriminant — an
//! explicit `command` field, or a `/command` text on a message-kind
//! envelope — always decodes as [`Event::SlashCommand`] and never as
//! [`Event::Message`].

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::command::{normalize_command_name, parse_command_line};
use super::error::DecodeError;
use super::event::{
    EditPayload, Event, EventMeta, MembershipPayload, Mention, MessagePayload, RawStreamPayload,
    ReactionPayload, RedactionPayload, SlashCommandPayload, TipPayload,
};
use super::ids::EventId;

/// Decodes one envelope into exactly one [`Event`].
///
/// Never fails: envelopes with an unknown discriminant or a payload that
/// does not match it are preserved as [`Event::RawStream`] with whatever
/// base fields could be read.
pub fn decode_envelope(value: Value) -> Event {
    match try_decode(&value) {
        Ok(event) => event,
        Err(err) => {
            debug!(error = %err, "envelope fell back to raw stream");
            raw_stream(value)
        }
    }
}

/// Strict decoding half of [`decode_envelope`].
///
/// Exposed for diagnostics and tests; production callers want the total
/// wrapper.
pub fn try_decode(value: &Value) -> Result<Event, DecodeError> {
    let Some(kind) = value.get("kind").and_then(Value::as_str) else {
        return Err(DecodeError::MissingDiscriminant);
    };

    macro_rules! payload {
        ($variant:ident, $ty:ty) => {
            serde_json::from_value::<$ty>(value.clone())
                .map(Event::$variant)
                .map_err(|err| DecodeError::MalformedPayload {
                    kind: kind.to_owned(),
                    reason: err.to_string(),
                })
        };
    }

    match kind {
        "message" => {
            if is_command_shaped(value) {
                decode_command(kind, value)
            } else {
                payload!(Message, MessagePayload)
            }
        }
        "slash_command" | "command" => decode_command(kind, value),
        "reaction" => payload!(Reaction, ReactionPayload),
        "edit" => payload!(Edit, EditPayload),
        "redaction" => payload!(Redaction, RedactionPayload),
        "tip" => payload!(Tip, TipPayload),
        "membership_change" | "membership" => payload!(MembershipChange, MembershipPayload),
        other => Err(DecodeError::UnknownDiscriminant {
            kind: other.to_owned(),
        }),
    }
}

/// Returns `true` if a message-kind envelope carries a command discriminant.
fn is_command_shaped(value: &Value) -> bool {
    if value
        .get("command")
        .and_then(Value::as_str)
        .is_some_and(|c| !c.trim().is_empty())
    {
        return true;
    }
    value
        .get("text")
        .and_then(Value::as_str)
        .is_some_and(|text| parse_command_line(text).is_some())
}

/// Raw fields a command-shaped envelope may carry.
///
/// `command`/`args` take precedence; when absent they are derived from the
/// `/command …` text.
#[derive(Deserialize)]
struct CommandEnvelope {
    #[serde(flatten)]
    meta: EventMeta,
    #[serde(default)]
    command: String,
    #[serde(default)]
    args: Option<Vec<String>>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    mentions: Vec<Mention>,
    #[serde(default)]
    reply_id: Option<EventId>,
    #[serde(default)]
    thread_id: Option<EventId>,
}

fn decode_command(kind: &str, value: &Value) -> Result<Event, DecodeError> {
    let envelope: CommandEnvelope =
        serde_json::from_value(value.clone()).map_err(|err| DecodeError::MalformedPayload {
            kind: kind.to_owned(),
            reason: err.to_string(),
        })?;

    let parsed = parse_command_line(&envelope.text);
    let (command, args) = if !envelope.command.trim().is_empty() {
        let args = match envelope.args {
            Some(args) => args,
            None => parsed.map(|inv| inv.args).unwrap_or_default(),
        };
        (normalize_command_name(&envelope.command), args)
    } else if let Some(inv) = parsed {
        (inv.name, inv.args)
    } else {
        return Err(DecodeError::MissingCommand);
    };

    Ok(Event::SlashCommand(SlashCommandPayload {
        meta: envelope.meta,
        command,
        args,
        mentions: envelope.mentions,
        reply_id: envelope.reply_id,
        thread_id: envelope.thread_id,
    }))
}

/// Builds the catch-all variant, keeping whatever base fields were present.
fn raw_stream(value: Value) -> Event {
    let meta = serde_json::from_value::<EventMeta>(value.clone()).unwrap_or_default();
    Event::RawStream(RawStreamPayload {
        meta,
        payload: value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::event::{EventKind, MembershipChange};
    use serde_json::json;

    fn base(kind: &str) -> Value {
        json!({
            "kind": kind,
            "user_id": "user-1",
            "space_id": "space-1",
            "channel_id": "chan-1",
            "event_id": "evt-1",
            "created_at": 1700000000000i64,
        })
    }

    fn with(mut value: Value, fields: Value) -> Value {
        value
            .as_object_mut()
            .unwrap()
            .extend(fields.as_object().unwrap().clone());
        value
    }

    #[test]
    fn decodes_plain_message() {
        let event = decode_envelope(with(base("message"), json!({ "text": "hello there" })));
        let msg = event.as_message().expect("message variant");
        assert_eq!(msg.text, "hello there");
        assert_eq!(msg.meta.event_id.as_str(), "evt-1");
    }

    #[test]
    fn command_field_wins_over_message() {
        let event = decode_envelope(with(
            base("message"),
            json!({ "text": "/ban spammer", "command": "ban", "args": ["spammer"] }),
        ));
        let cmd = event.as_slash_command().expect("slash command variant");
        assert_eq!(cmd.command, "ban");
        assert_eq!(cmd.args, vec!["spammer"]);
        assert!(event.as_message().is_none());
    }

    #[test]
    fn command_shaped_text_never_becomes_message() {
        let event = decode_envelope(with(base("message"), json!({ "text": "/ping now" })));
        let cmd = event.as_slash_command().expect("slash command variant");
        assert_eq!(cmd.command, "ping");
        assert_eq!(cmd.args, vec!["now"]);
    }

    #[test]
    fn explicit_command_kind_derives_args_from_text() {
        let event = decode_envelope(with(
            base("slash_command"),
            json!({ "command": "/Echo", "text": "/echo \"two words\"" }),
        ));
        let cmd = event.as_slash_command().expect("slash command variant");
        assert_eq!(cmd.command, "echo");
        assert_eq!(cmd.args, vec!["two words"]);
    }

    #[test]
    fn decodes_reaction() {
        let event = decode_envelope(with(
            base("reaction"),
            json!({ "reaction": "👍", "target_event_id": "evt-0" }),
        ));
        assert_eq!(event.kind(), EventKind::Reaction);
    }

    #[test]
    fn decodes_tip() {
        let event = decode_envelope(with(
            base("tip"),
            json!({
                "target_event_id": "evt-0",
                "sender_address": "0xaaa",
                "receiver_address": "0xbbb",
                "amount": "1000000000000000000",
                "currency_address": "0xccc",
            }),
        ));
        match event {
            Event::Tip(tip) => assert_eq!(tip.amount, "1000000000000000000"),
            other => panic!("expected tip, got {other:?}"),
        }
    }

    #[test]
    fn decodes_membership_change() {
        let event = decode_envelope(with(base("membership_change"), json!({ "change": "join" })));
        match event {
            Event::MembershipChange(m) => assert_eq!(m.change, MembershipChange::Join),
            other => panic!("expected membership change, got {other:?}"),
        }
    }

    #[test]
    fn unknown_kind_is_raw_stream_with_meta() {
        let event = decode_envelope(with(base("telemetry_blob"), json!({ "blob": [1, 2, 3] })));
        match &event {
            Event::RawStream(raw) => {
                assert_eq!(raw.meta.user_id.as_str(), "user-1");
                assert_eq!(raw.payload["blob"], json!([1, 2, 3]));
            }
            other => panic!("expected raw stream, got {other:?}"),
        }
        assert_eq!(event.kind(), EventKind::RawStream);
    }

    #[test]
    fn malformed_payload_is_raw_stream() {
        // reaction without its required fields
        let event = decode_envelope(base("reaction"));
        assert_eq!(event.kind(), EventKind::RawStream);
    }

    #[test]
    fn non_object_payload_is_raw_stream() {
        let event = decode_envelope(json!("not an object"));
        assert_eq!(event.kind(), EventKind::RawStream);
        match event {
            Event::RawStream(raw) => assert_eq!(raw.payload, json!("not an object")),
            _ => unreachable!(),
        }
    }

    #[test]
    fn strict_decode_reports_the_reason() {
        let err = try_decode(&json!({ "kind": "reaction" })).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedPayload { .. }));
        let err = try_decode(&json!({})).unwrap_err();
        assert!(matches!(err, DecodeError::MissingDiscriminant));
    }
}
