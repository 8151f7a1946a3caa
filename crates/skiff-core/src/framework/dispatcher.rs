//! Handler execution engine.
//!
//! The dispatcher resolves an event's kind, fetches the registered
//! handlers from the [`HandlerRegistry`], and invokes them all. Execution
//! is concurrent with failure isolation:
//!
//! - every handler for the event starts without waiting for its siblings
//!   (one task each, spawned in registration order),
//! - a failing or panicking handler never prevents the others from
//!   running,
//! - all failures are collected into the [`DispatchResult`] after the
//!   whole group has completed or been cancelled.
//!
//! Registration order is the spawn order — a scheduling hint, not an
//! ordering guarantee between the side effects of racing handlers.
//!
//! # Cancellation
//!
//! The dispatcher carries a [`CancellationToken`]. When the hosting
//! process shuts down, in-flight handler tasks are aborted, their partial
//! results discarded, and the aborted slots reported as
//! [`HandlerError::Cancelled`]. Nothing is resumed after cancellation.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Level, debug, span, warn};

use crate::foundation::error::HandlerError;
use crate::foundation::event::Event;
use crate::framework::context::HandlerContext;
use crate::framework::registry::HandlerRegistry;
use crate::integration::action::BoxedActionClient;
use crate::integration::store::BoxedStore;

/// Outcome of dispatching one event.
#[derive(Debug, Clone, Default)]
pub struct DispatchResult {
    /// Number of handler invocations started.
    pub invoked: usize,
    /// Failures, one entry per failing handler.
    pub failures: Vec<HandlerFailure>,
}

impl DispatchResult {
    /// Returns `true` if every invoked handler completed successfully.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One failed handler invocation.
#[derive(Debug, Clone)]
pub struct HandlerFailure {
    /// Registration index of the failing handler.
    pub index: usize,
    /// What went wrong.
    pub error: HandlerError,
}

/// The central handler executor.
///
/// # Thread Safety
///
/// `Dispatcher` is `Send + Sync`; each inbound event is an independent
/// unit of work and dispatch holds no mutable state.
pub struct Dispatcher {
    registry: Arc<HandlerRegistry>,
    actions: BoxedActionClient,
    store: BoxedStore,
    cancel: CancellationToken,
}

impl Dispatcher {
    /// Creates a dispatcher over a registry and the collaborator contracts.
    pub fn new(registry: Arc<HandlerRegistry>, actions: BoxedActionClient, store: BoxedStore) -> Self {
        Self {
            registry,
            actions,
            store,
            cancel: CancellationToken::new(),
        }
    }

    /// Uses an externally owned cancellation token (builder pattern).
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns a clone of the cancellation token.
    ///
    /// Cancelling it aborts in-flight handler invocations; their partial
    /// results are discarded.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Dispatches one event to every handler registered for its kind.
    ///
    /// A kind with zero registered handlers is a no-op (`invoked = 0`),
    /// not an error.
    pub async fn dispatch(&self, event: Event) -> DispatchResult {
        let span = span!(
            Level::DEBUG,
            "dispatch",
            kind = event.kind().as_str(),
            event_id = %event.meta().event_id
        );
        self.dispatch_inner(event).instrument(span).await
    }

    async fn dispatch_inner(&self, event: Event) -> DispatchResult {
        let registrations = self.registry.handlers_for(event.kind());
        if registrations.is_empty() {
            debug!("no handlers registered, dispatching as no-op");
            return DispatchResult::default();
        }

        let invoked = registrations.len();
        debug!(handler_count = invoked, "executing handlers");

        let event = Arc::new(event);
        let mut tasks = Vec::with_capacity(invoked);
        for registration in registrations {
            let ctx = HandlerContext::from_parts(
                Arc::clone(&event),
                Arc::clone(&self.actions),
                Arc::clone(&self.store),
            );
            let future = (registration.handler())(ctx);
            tasks.push((registration.index(), tokio::spawn(future)));
        }

        let mut failures = Vec::new();
        for (index, mut task) in tasks {
            let joined = tokio::select! {
                joined = &mut task => joined,
                () = self.cancel.cancelled() => {
                    task.abort();
                    failures.push(HandlerFailure {
                        index,
                        error: HandlerError::Cancelled,
                    });
                    continue;
                }
            };

            match joined {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    warn!(handler_index = index, error = %error, "handler failed");
                    failures.push(HandlerFailure { index, error });
                }
                Err(join_error) if join_error.is_cancelled() => {
                    failures.push(HandlerFailure {
                        index,
                        error: HandlerError::Cancelled,
                    });
                }
                Err(join_error) => {
                    let message = match join_error.try_into_panic() {
                        Ok(panic) => panic
                            .downcast_ref::<&str>()
                            .map(|s| (*s).to_owned())
                            .or_else(|| panic.downcast_ref::<String>().cloned())
                            .unwrap_or_else(|| "opaque panic payload".to_owned()),
                        Err(join_error) => join_error.to_string(),
                    };
                    warn!(handler_index = index, panic = %message, "handler panicked");
                    failures.push(HandlerFailure {
                        index,
                        error: HandlerError::Panicked(message),
                    });
                }
            }
        }

        DispatchResult { invoked, failures }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .finish()
    }
}
