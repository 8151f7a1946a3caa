//! Handler registry.
//!
//! Holds, per event kind, the ordered list of registered handlers. All
//! handlers registered for a kind are live for every matching event —
//! there is no first-match-wins here; that policy, where wanted, belongs
//! inside a handler's own logic.
//!
//! Registration is a setup-phase operation. The serving layer calls
//! [`HandlerRegistry::seal`] before accepting events; later registrations
//! are rejected rather than racing live dispatch.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::foundation::error::{RegistryError, RegistryResult};
use crate::foundation::event::EventKind;
use crate::framework::context::BoxedHandler;

/// One registered handler with its dispatch-order index.
///
/// Indices are process-monotonic across all kinds, so they double as a
/// stable identifier in dispatch failure reports.
#[derive(Clone)]
pub struct Registration {
    index: usize,
    handler: BoxedHandler,
}

impl Registration {
    /// Returns the registration index (dispatch order).
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the handler callback.
    pub fn handler(&self) -> &BoxedHandler {
        &self.handler
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("index", &self.index)
            .finish()
    }
}

/// Proof of a completed registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationHandle {
    kind: EventKind,
    index: usize,
}

impl RegistrationHandle {
    /// The kind the handler was registered under.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// The assigned registration index.
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Default)]
struct Inner {
    handlers: HashMap<EventKind, Vec<Registration>>,
    next_index: usize,
    sealed: bool,
}

/// Ordered, per-kind collection of handler registrations.
///
/// # Thread Safety
///
/// `HandlerRegistry` is `Send + Sync`. During serving the registry is
/// read-only (sealed); reads take a short shared lock and clone the
/// per-kind list of shared handles.
#[derive(Default)]
pub struct HandlerRegistry {
    inner: RwLock<Inner>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for one event kind.
    ///
    /// Handlers are appended: dispatch order is registration order.
    /// Fails with [`RegistryError::Sealed`] once serving has started.
    pub fn register(
        &self,
        kind: EventKind,
        handler: BoxedHandler,
    ) -> RegistryResult<RegistrationHandle> {
        let mut inner = self.inner.write();
        if inner.sealed {
            return Err(RegistryError::Sealed);
        }

        let index = inner.next_index;
        inner.next_index += 1;
        inner
            .handlers
            .entry(kind)
            .or_default()
            .push(Registration { index, handler });

        Ok(RegistrationHandle { kind, index })
    }

    /// Marks the end of the setup phase; all later registrations fail.
    pub fn seal(&self) {
        self.inner.write().sealed = true;
    }

    /// Returns `true` once [`seal`](Self::seal) has been called.
    pub fn is_sealed(&self) -> bool {
        self.inner.read().sealed
    }

    /// Returns the registrations for `kind` in registration order.
    ///
    /// A kind nobody registered for yields an empty list, not an error.
    pub fn handlers_for(&self, kind: EventKind) -> Vec<Registration> {
        self.inner
            .read()
            .handlers
            .get(&kind)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the total number of registrations across all kinds.
    pub fn len(&self) -> usize {
        self.inner.read().handlers.values().map(Vec::len).sum()
    }

    /// Returns `true` if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("HandlerRegistry")
            .field("registrations", &inner.next_index)
            .field("sealed", &inner.sealed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn noop() -> BoxedHandler {
        Arc::new(|_ctx| Box::pin(async { Ok(()) }))
    }

    #[test]
    fn registration_order_is_preserved() {
        let registry = HandlerRegistry::new();
        let a = registry.register(EventKind::Message, noop()).unwrap();
        let b = registry.register(EventKind::Message, noop()).unwrap();
        let c = registry.register(EventKind::Reaction, noop()).unwrap();

        assert!(a.index() < b.index());
        assert!(b.index() < c.index());

        let message_handlers = registry.handlers_for(EventKind::Message);
        assert_eq!(message_handlers.len(), 2);
        assert_eq!(message_handlers[0].index(), a.index());
        assert_eq!(message_handlers[1].index(), b.index());
    }

    #[test]
    fn unregistered_kind_is_empty_not_error() {
        let registry = HandlerRegistry::new();
        assert!(registry.handlers_for(EventKind::Tip).is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn sealed_registry_rejects_registration() {
        let registry = HandlerRegistry::new();
        registry.register(EventKind::Message, noop()).unwrap();
        registry.seal();
        assert!(registry.is_sealed());

        let err = registry.register(EventKind::Message, noop()).unwrap_err();
        assert!(matches!(err, RegistryError::Sealed));
        // The earlier registration is untouched.
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn len_counts_across_kinds() {
        let registry = HandlerRegistry::new();
        registry.register(EventKind::Message, noop()).unwrap();
        registry.register(EventKind::Reaction, noop()).unwrap();
        registry.register(EventKind::Redaction, noop()).unwrap();
        assert_eq!(registry.len(), 3);
    }
}
