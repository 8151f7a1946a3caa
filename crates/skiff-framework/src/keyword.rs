//! Keyword responder.
//!
//! The canonical message-handler pattern: a fixed keyword table checked
//! against incoming message text by case-insensitive substring
//! containment. The first matching rule performs exactly one outbound
//! reply and stops evaluating further rules for that event.
//!
//! First-match-wins applies *inside this handler only*. Registering the
//! responder alongside other handlers still fans the event out to all of
//! them — registry-level dispatch knows no such policy.

use async_trait::async_trait;
use skiff_core::{HandlerContext, HandlerResult};
use tracing::debug;

use crate::handler::Handler;

/// One keyword rule: a needle and the reply it triggers.
#[derive(Debug, Clone)]
struct KeywordRule {
    /// Lowercased needle; matching lowercases the haystack.
    keyword: String,
    reply: String,
}

/// A message handler replying to the first matching keyword.
///
/// # Example
///
/// ```rust,ignore
/// let responder = KeywordResponder::new()
///     .rule("hello", "Hi there!")
///     .rule("help", "Try /help for the command list.");
/// bot.on_message(into_handler(responder))?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct KeywordResponder {
    rules: Vec<KeywordRule>,
}

impl KeywordResponder {
    /// Creates a responder with no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule (builder pattern).
    ///
    /// Rules are evaluated in insertion order; the keyword is matched
    /// case-insensitively as a substring.
    pub fn rule(mut self, keyword: impl Into<String>, reply: impl Into<String>) -> Self {
        self.rules.push(KeywordRule {
            keyword: keyword.into().to_lowercase(),
            reply: reply.into(),
        });
        self
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if no rules are configured.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[async_trait]
impl Handler for KeywordResponder {
    async fn handle(&self, ctx: HandlerContext) -> HandlerResult {
        let Some(message) = ctx.event().as_message() else {
            return Ok(());
        };

        let haystack = message.text.to_lowercase();
        for rule in &self.rules {
            if haystack.contains(&rule.keyword) {
                debug!(keyword = %rule.keyword, "keyword matched, replying");
                ctx.reply(&rule.reply).await?;
                break;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::testing::NullClient;
    use skiff_core::{ChannelId, Event, EventId, EventMeta, MessagePayload, ReactionPayload};
    use std::sync::Arc;

    fn message(text: &str) -> Event {
        Event::Message(MessagePayload {
            meta: EventMeta {
                channel_id: ChannelId::new("chan-1"),
                event_id: EventId::new("evt-1"),
                ..EventMeta::default()
            },
            text: text.to_owned(),
            reply_id: None,
            thread_id: None,
            is_mentioned: false,
            mentions: Vec::new(),
        })
    }

    fn run(responder: &KeywordResponder, event: Event) -> Arc<NullClient> {
        let client = Arc::new(NullClient::default());
        let actions: skiff_core::BoxedActionClient = client.clone();
        let ctx = HandlerContext::new(
            event,
            actions,
            Arc::new(MemoryStore::new()),
        );
        tokio_test::block_on(responder.handle(ctx)).unwrap();
        client
    }

    fn responder() -> KeywordResponder {
        KeywordResponder::new()
            .rule("hello", "Hi!")
            .rule("help", "Try /help.")
    }

    #[test]
    fn matching_is_case_insensitive() {
        let upper = run(&responder(), message("HELLO there"));
        let lower = run(&responder(), message("hello there"));

        assert_eq!(upper.sent.lock().len(), 1);
        assert_eq!(lower.sent.lock().len(), 1);
        assert_eq!(upper.sent.lock()[0].text, "Hi!");
        assert_eq!(lower.sent.lock()[0].text, "Hi!");
    }

    #[test]
    fn first_match_acts_exactly_once() {
        // Both keywords occur; only the first rule fires.
        let client = run(&responder(), message("hello, I need help"));
        let sent = client.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].text, "Hi!");
    }

    #[test]
    fn replies_target_the_triggering_event() {
        let client = run(&responder(), message("hello"));
        let sent = client.sent.lock();
        assert_eq!(sent[0].channel_id, ChannelId::new("chan-1"));
        assert_eq!(sent[0].reply_id, Some(EventId::new("evt-1")));
    }

    #[test]
    fn no_match_sends_nothing() {
        let client = run(&responder(), message("completely unrelated"));
        assert!(client.sent.lock().is_empty());
    }

    #[test]
    fn non_message_events_are_ignored() {
        let event = Event::Reaction(ReactionPayload {
            meta: EventMeta::default(),
            reaction: "👍".to_owned(),
            target_event_id: EventId::new("evt-0"),
        });
        let client = run(&responder(), event);
        assert!(client.sent.lock().is_empty());
    }
}
