//! Opaque identifier types shared by every event.
//!
//! All protocol identifiers are opaque strings minted by the transport
//! collaborator. Wrapping them in newtypes keeps channel, space, user, and
//! event handles from being mixed up at call sites; none of them carry any
//! structure this crate inspects.

use serde::{Deserialize, Serialize};

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps a raw identifier string.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the underlying identifier string.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns `true` if the identifier is empty.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

opaque_id! {
    /// Identifier of an acting user (the event author, a mention target, …).
    UserId
}

opaque_id! {
    /// Identifier of the space a channel belongs to.
    SpaceId
}

opaque_id! {
    /// Identifier of the channel an event was observed in.
    ChannelId
}

opaque_id! {
    /// Identifier of a single event in a channel's stream.
    ///
    /// Unique within the stream; this is the only safe handle for
    /// cross-references such as reply, thread, and redaction targets.
    EventId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_serde() {
        let id: EventId = serde_json::from_str("\"evt-1\"").unwrap();
        assert_eq!(id, EventId::new("evt-1"));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"evt-1\"");
    }

    #[test]
    fn distinct_id_types_do_not_compare() {
        let user = UserId::new("abc");
        let channel = ChannelId::new("abc");
        // Same backing string, different types; only the strings compare.
        assert_eq!(user.as_str(), channel.as_str());
    }

    #[test]
    fn default_id_is_empty() {
        assert!(UserId::default().is_empty());
        assert!(!UserId::new("u").is_empty());
    }
}
