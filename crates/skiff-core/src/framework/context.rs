//! Execution context handed to handlers.
//!
//! Each handler invocation receives its own [`HandlerContext`] clone: the
//! classified event plus the two collaborator contracts (outbound actions
//! and key-value state). Cloning is cheap — everything inside is shared.

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::foundation::error::HandlerResult;
use crate::foundation::event::Event;
use crate::foundation::ids::EventId;
use crate::integration::action::{ActionClient, ActionResult, BoxedActionClient, SendOpts};
use crate::integration::store::{BoxedStore, KeyValueStore};

/// The context object passed to handlers during dispatch.
#[derive(Clone)]
pub struct HandlerContext {
    event: Arc<Event>,
    actions: BoxedActionClient,
    store: BoxedStore,
}

impl HandlerContext {
    /// Creates a context for one event.
    pub fn new(event: Event, actions: BoxedActionClient, store: BoxedStore) -> Self {
        Self {
            event: Arc::new(event),
            actions,
            store,
        }
    }

    pub(crate) fn from_parts(
        event: Arc<Event>,
        actions: BoxedActionClient,
        store: BoxedStore,
    ) -> Self {
        Self {
            event,
            actions,
            store,
        }
    }

    /// Returns the event being dispatched.
    pub fn event(&self) -> &Event {
        &self.event
    }

    /// Returns the outbound action client.
    pub fn actions(&self) -> &dyn ActionClient {
        self.actions.as_ref()
    }

    /// Returns a shared handle to the action client.
    pub fn actions_arc(&self) -> BoxedActionClient {
        Arc::clone(&self.actions)
    }

    /// Returns the key-value state collaborator.
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Sends a message into the event's channel as a direct reply.
    ///
    /// Convenience over [`ActionClient::send_message`] that fills channel
    /// and reply target from the event itself.
    pub async fn reply(&self, text: &str) -> ActionResult<EventId> {
        let meta = self.event.meta();
        self.actions
            .send_message(
                &meta.channel_id,
                text,
                SendOpts::reply_to(meta.event_id.clone()),
            )
            .await
    }
}

impl std::fmt::Debug for HandlerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerContext")
            .field("event_kind", &self.event.kind())
            .field("event_id", &self.event.meta().event_id)
            .finish()
    }
}

/// A type-erased handler stored in the registry.
///
/// Internally a closure returning a boxed future, so any async function or
/// closure over [`HandlerContext`] fits after boxing (see
/// `skiff-framework`'s `handler_fn`).
pub type BoxedHandler = Arc<dyn Fn(HandlerContext) -> BoxFuture<'static, HandlerResult> + Send + Sync>;
