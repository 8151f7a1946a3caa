//! The handler abstraction.
//!
//! A handler is user-supplied code registered against one event kind. Two
//! shapes are supported:
//!
//! - a type implementing [`Handler`], boxed with [`into_handler`] — for
//!   handlers that carry configuration (see `KeywordResponder`),
//! - a plain async function or closure over
//!   [`HandlerContext`](skiff_core::HandlerContext), boxed with
//!   [`handler_fn`].
//!
//! Both produce the [`BoxedHandler`] the registry stores.
//!
//! # Example
//!
//! ```rust,ignore
//! use skiff_framework::handler_fn;
//!
//! let handler = handler_fn(|ctx| async move {
//!     if let Some(msg) = ctx.event().as_message() {
//!         ctx.reply(&format!("you said: {}", msg.text)).await?;
//!     }
//!     Ok(())
//! });
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use skiff_core::{BoxedHandler, HandlerContext, HandlerResult};

/// User-supplied callback registered against one event kind.
///
/// Handlers must tolerate concurrent invocation: the dispatcher starts all
/// handlers for an event without waiting for one another, and unrelated
/// events may be in flight at the same time. State that must survive
/// across events belongs in the injected key-value store, never in
/// `&self` fields.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    /// Processes one event.
    async fn handle(&self, ctx: HandlerContext) -> HandlerResult;
}

/// Boxes a [`Handler`] implementation for registration.
pub fn into_handler<H: Handler>(handler: H) -> BoxedHandler {
    let handler = Arc::new(handler);
    Arc::new(move |ctx| {
        let handler = Arc::clone(&handler);
        Box::pin(async move { handler.handle(ctx).await })
    })
}

/// Boxes an async function or closure for registration.
pub fn handler_fn<F, Fut>(f: F) -> BoxedHandler
where
    F: Fn(HandlerContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    Arc::new(move |ctx| Box::pin(f(ctx)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::testing::NullClient;
    use skiff_core::{Event, EventMeta, HandlerError, RawStreamPayload};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn context() -> HandlerContext {
        HandlerContext::new(
            Event::RawStream(RawStreamPayload {
                meta: EventMeta::default(),
                payload: serde_json::Value::Null,
            }),
            Arc::new(NullClient::default()),
            Arc::new(MemoryStore::new()),
        )
    }

    #[tokio::test]
    async fn handler_fn_adapts_closures() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let handler = handler_fn(move |_ctx| {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        handler(context()).await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn into_handler_boxes_trait_impls() {
        struct Failing;

        #[async_trait]
        impl Handler for Failing {
            async fn handle(&self, _ctx: HandlerContext) -> HandlerResult {
                Err(HandlerError::failed("always"))
            }
        }

        let handler = into_handler(Failing);
        let err = handler(context()).await.unwrap_err();
        assert!(matches!(err, HandlerError::Failed(_)));
    }
}
