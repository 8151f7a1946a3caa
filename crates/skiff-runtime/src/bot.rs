//! Bot assembly and the serving loop.
//!
//! [`BotBuilder`] is the setup surface: identity, collaborators, advertised
//! commands. The built [`Bot`] exposes the registration surface (`on_*`)
//! and [`Bot::serve`], which consumes decoded envelopes from an `mpsc`
//! channel — the integration point for the external transport collaborator
//! (webhook server, auth, decryption all live on the sending side).
//!
//! Serving seals the handler registry: registration is a setup-phase
//! operation and never races live dispatch.
//!
//! # Example
//!
//! ```rust,ignore
//! use skiff_runtime::{Bot, BotIdentity};
//! use skiff_framework::{KeywordResponder, into_handler};
//!
//! let bot = Bot::builder(BotIdentity::new("bot-1"))
//!     .actions(my_transport_client)
//!     .command("ping", "Replies with pong")
//!     .build()?;
//!
//! bot.on_message(into_handler(
//!     KeywordResponder::new().rule("gm", "gm!"),
//! ))?;
//!
//! let (tx, rx) = bot.envelope_channel();
//! // hand `tx` to the transport collaborator…
//! bot.serve(rx).await;
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use skiff_core::{
    ActionClient, BotIdentity, BoxedHandler, Classification, DispatchResult, Dispatcher, EventKind,
    HandlerRegistry, KeyValueStore, RegistrationHandle, RegistryResult, classify,
};
use skiff_framework::{CommandSet, MemoryStore};

use crate::config::{ConfigResult, SkiffConfig, validate};
use crate::error::{RuntimeError, RuntimeResult};
use crate::logging;

/// Counters from one serving session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeReport {
    /// Events dispatched (including no-op dispatches).
    pub processed: usize,
    /// Envelopes dropped before dispatch (self-filter).
    pub dropped: usize,
    /// Individual handler failures across all dispatches.
    pub handler_failures: usize,
}

/// Builder for a [`Bot`].
pub struct BotBuilder {
    identity: BotIdentity,
    actions: Option<Arc<dyn ActionClient>>,
    store: Arc<dyn KeyValueStore>,
    commands: Vec<(String, String)>,
    channel_capacity: usize,
    shutdown_grace: Duration,
}

impl BotBuilder {
    fn new(identity: BotIdentity) -> Self {
        Self {
            identity,
            actions: None,
            store: Arc::new(MemoryStore::new()),
            commands: Vec::new(),
            channel_capacity: 128,
            shutdown_grace: Duration::from_secs(5),
        }
    }

    /// Creates a builder from loaded configuration.
    ///
    /// Initializes logging from the config and validates it, so
    /// programmatically assembled configs get the same checks as loaded
    /// ones.
    pub fn from_config(config: &SkiffConfig) -> ConfigResult<Self> {
        validate(config)?;
        logging::init_from_config(&config.logging);

        let mut identity = BotIdentity::new(config.bot.user_id.as_str());
        if let Some(name) = &config.bot.display_name {
            identity = identity.with_display_name(name);
        }

        let mut builder = Self::new(identity);
        builder.channel_capacity = config.dispatch.channel_capacity;
        builder.shutdown_grace = Duration::from_millis(config.dispatch.shutdown_grace_ms);
        Ok(builder)
    }

    /// Sets the outbound action client (the transport collaborator).
    pub fn actions(mut self, client: impl ActionClient + 'static) -> Self {
        self.actions = Some(Arc::new(client));
        self
    }

    /// Sets the key-value store collaborator.
    ///
    /// Defaults to the volatile [`MemoryStore`]; anything that must
    /// survive a restart needs a durable implementation here.
    pub fn store(mut self, store: impl KeyValueStore + 'static) -> Self {
        self.store = Arc::new(store);
        self
    }

    /// Advertises a slash command. Validated at [`build`](Self::build).
    pub fn command(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.commands.push((name.into(), description.into()));
        self
    }

    /// Sets the inbound envelope channel capacity.
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Sets how long in-flight handlers may finish after shutdown.
    pub fn shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    /// Assembles the bot.
    pub fn build(self) -> RuntimeResult<Bot> {
        let actions = self.actions.ok_or(RuntimeError::MissingActionClient)?;

        let mut commands = CommandSet::new();
        for (name, description) in self.commands {
            commands.register(name, description)?;
        }

        let registry = Arc::new(HandlerRegistry::new());
        let handler_cancel = CancellationToken::new();
        let dispatcher = Arc::new(
            Dispatcher::new(Arc::clone(&registry), actions, self.store)
                .with_cancellation(handler_cancel.clone()),
        );

        Ok(Bot {
            identity: self.identity,
            registry,
            dispatcher,
            commands,
            shutdown: CancellationToken::new(),
            handler_cancel,
            channel_capacity: self.channel_capacity,
            shutdown_grace: self.shutdown_grace,
        })
    }
}

/// An assembled bot: identity, handlers, commands, dispatcher.
pub struct Bot {
    identity: BotIdentity,
    registry: Arc<HandlerRegistry>,
    dispatcher: Arc<Dispatcher>,
    commands: CommandSet,
    shutdown: CancellationToken,
    handler_cancel: CancellationToken,
    channel_capacity: usize,
    shutdown_grace: Duration,
}

impl Bot {
    /// Starts building a bot acting as `identity`.
    pub fn builder(identity: BotIdentity) -> BotBuilder {
        BotBuilder::new(identity)
    }

    /// Returns the bot's identity.
    pub fn identity(&self) -> &BotIdentity {
        &self.identity
    }

    /// Returns the advertised slash commands.
    pub fn commands(&self) -> &CommandSet {
        &self.commands
    }

    /// Registers a handler for an event kind.
    ///
    /// Fails once serving has started.
    pub fn on(&self, kind: EventKind, handler: BoxedHandler) -> RegistryResult<RegistrationHandle> {
        self.registry.register(kind, handler)
    }

    /// Registers a handler for chat messages.
    pub fn on_message(&self, handler: BoxedHandler) -> RegistryResult<RegistrationHandle> {
        self.on(EventKind::Message, handler)
    }

    /// Registers a handler for slash commands.
    pub fn on_slash_command(&self, handler: BoxedHandler) -> RegistryResult<RegistrationHandle> {
        self.on(EventKind::SlashCommand, handler)
    }

    /// Registers a handler for reactions.
    pub fn on_reaction(&self, handler: BoxedHandler) -> RegistryResult<RegistrationHandle> {
        self.on(EventKind::Reaction, handler)
    }

    /// Registers a handler for edits.
    pub fn on_edit(&self, handler: BoxedHandler) -> RegistryResult<RegistrationHandle> {
        self.on(EventKind::Edit, handler)
    }

    /// Registers a handler for redactions.
    pub fn on_redaction(&self, handler: BoxedHandler) -> RegistryResult<RegistrationHandle> {
        self.on(EventKind::Redaction, handler)
    }

    /// Registers a handler for ledger tips.
    pub fn on_tip(&self, handler: BoxedHandler) -> RegistryResult<RegistrationHandle> {
        self.on(EventKind::Tip, handler)
    }

    /// Registers a handler for membership changes.
    pub fn on_membership_change(&self, handler: BoxedHandler) -> RegistryResult<RegistrationHandle> {
        self.on(EventKind::MembershipChange, handler)
    }

    /// Registers a handler for unrecognized stream events.
    pub fn on_raw(&self, handler: BoxedHandler) -> RegistryResult<RegistrationHandle> {
        self.on(EventKind::RawStream, handler)
    }

    /// Creates the inbound envelope channel at the configured capacity.
    ///
    /// The sender goes to the transport collaborator; the receiver goes to
    /// [`serve`](Self::serve).
    pub fn envelope_channel(&self) -> (mpsc::Sender<Value>, mpsc::Receiver<Value>) {
        mpsc::channel(self.channel_capacity)
    }

    /// Returns a handle that stops [`serve`](Self::serve) when cancelled.
    pub fn shutdown_handle(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Serves decoded envelopes until the channel closes or shutdown is
    /// requested.
    ///
    /// Each envelope is an independent unit of work: it is classified,
    /// then its dispatch runs as its own task so a slow handler on one
    /// event never blocks processing of unrelated events. Envelopes are
    /// classified strictly in arrival order; the loop itself never
    /// reorders what the transport delivered.
    ///
    /// On shutdown, in-flight dispatches get the configured grace period
    /// to finish, then remaining handlers are cancelled and their partial
    /// results discarded.
    pub async fn serve(&self, mut envelopes: mpsc::Receiver<Value>) -> ServeReport {
        self.registry.seal();
        info!(
            bot = %self.identity.user_id(),
            handlers = self.registry.len(),
            commands = self.commands.len(),
            "bot serving"
        );

        let mut report = ServeReport::default();
        let mut inflight: JoinSet<DispatchResult> = JoinSet::new();

        loop {
            tokio::select! {
                maybe = envelopes.recv() => {
                    let Some(envelope) = maybe else { break };
                    match classify(envelope, &self.identity) {
                        Classification::Dropped(reason) => {
                            debug!(?reason, "envelope dropped");
                            report.dropped += 1;
                        }
                        Classification::Event(event) => {
                            let dispatcher = Arc::clone(&self.dispatcher);
                            inflight.spawn(async move { dispatcher.dispatch(event).await });
                        }
                    }
                }
                Some(finished) = inflight.join_next(), if !inflight.is_empty() => {
                    record(&mut report, finished);
                }
                () = self.shutdown.cancelled() => break,
            }
        }

        // Drain phase: let in-flight dispatches finish within the grace
        // period, then cancel whatever remains.
        let drained = tokio::time::timeout(self.shutdown_grace, async {
            while let Some(finished) = inflight.join_next().await {
                record(&mut report, finished);
            }
        })
        .await;

        if drained.is_err() {
            warn!(
                grace_ms = self.shutdown_grace.as_millis() as u64,
                "shutdown grace expired, cancelling in-flight handlers"
            );
            self.handler_cancel.cancel();
            while let Some(finished) = inflight.join_next().await {
                record(&mut report, finished);
            }
        }

        info!(
            processed = report.processed,
            dropped = report.dropped,
            failures = report.handler_failures,
            "bot stopped"
        );
        report
    }

    /// Like [`serve`](Self::serve), additionally stopping on ctrl-c.
    pub async fn run(&self, envelopes: mpsc::Receiver<Value>) -> ServeReport {
        let shutdown = self.shutdown_handle();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("ctrl-c received, shutting down");
                shutdown.cancel();
            }
        });
        self.serve(envelopes).await
    }
}

impl std::fmt::Debug for BotBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotBuilder")
            .field("identity", &self.identity)
            .field("has_actions", &self.actions.is_some())
            .field("commands", &self.commands.len())
            .field("channel_capacity", &self.channel_capacity)
            .field("shutdown_grace", &self.shutdown_grace)
            .finish()
    }
}

impl std::fmt::Debug for Bot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bot")
            .field("identity", &self.identity)
            .field("registry", &self.registry)
            .field("commands", &self.commands.len())
            .finish()
    }
}

fn record(report: &mut ServeReport, finished: Result<DispatchResult, JoinError>) {
    match finished {
        Ok(result) => {
            report.processed += 1;
            report.handler_failures += result.failures.len();
        }
        Err(err) => {
            warn!(error = %err, "dispatch task failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use skiff_core::{
        ActionResult, ChannelId, EventId, Permission, RegistryError, SendOpts, UserId,
    };
    use skiff_framework::{KeywordResponder, handler_fn, into_handler};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingClient {
        sends: AtomicUsize,
    }

    #[async_trait]
    impl ActionClient for CountingClient {
        async fn send_message(
            &self,
            _channel_id: &ChannelId,
            _text: &str,
            _opts: SendOpts,
        ) -> ActionResult<EventId> {
            let n = self.sends.fetch_add(1, Ordering::SeqCst);
            Ok(EventId::new(format!("sent-{n}")))
        }

        async fn edit_message(
            &self,
            _channel_id: &ChannelId,
            _event_id: &EventId,
            _text: &str,
        ) -> ActionResult<()> {
            Ok(())
        }

        async fn send_reaction(
            &self,
            _channel_id: &ChannelId,
            _event_id: &EventId,
            _reaction: &str,
        ) -> ActionResult<()> {
            Ok(())
        }

        async fn remove_event(
            &self,
            _channel_id: &ChannelId,
            _event_id: &EventId,
        ) -> ActionResult<()> {
            Ok(())
        }

        async fn admin_remove_event(
            &self,
            _channel_id: &ChannelId,
            _event_id: &EventId,
        ) -> ActionResult<()> {
            Ok(())
        }

        async fn check_permission(
            &self,
            _channel_id: &ChannelId,
            _user_id: &UserId,
            _permission: Permission,
        ) -> ActionResult<bool> {
            Ok(false)
        }
    }

    fn message_envelope(author: &str, text: &str) -> Value {
        json!({
            "kind": "message",
            "user_id": author,
            "space_id": "s",
            "channel_id": "c",
            "event_id": format!("evt-{author}-{}", text.len()),
            "created_at": 0,
            "text": text,
        })
    }

    fn bot() -> (Bot, Arc<CountingClient>) {
        let client = Arc::new(CountingClient::default());
        let bot = Bot::builder(BotIdentity::new("bot-1"))
            .actions(ForwardingClient(Arc::clone(&client)))
            .build()
            .unwrap();
        (bot, client)
    }

    /// Forwards to a shared counting client so tests can observe sends.
    struct ForwardingClient(Arc<CountingClient>);

    #[async_trait]
    impl ActionClient for ForwardingClient {
        async fn send_message(
            &self,
            channel_id: &ChannelId,
            text: &str,
            opts: SendOpts,
        ) -> ActionResult<EventId> {
            self.0.send_message(channel_id, text, opts).await
        }

        async fn edit_message(
            &self,
            channel_id: &ChannelId,
            event_id: &EventId,
            text: &str,
        ) -> ActionResult<()> {
            self.0.edit_message(channel_id, event_id, text).await
        }

        async fn send_reaction(
            &self,
            channel_id: &ChannelId,
            event_id: &EventId,
            reaction: &str,
        ) -> ActionResult<()> {
            self.0.send_reaction(channel_id, event_id, reaction).await
        }

        async fn remove_event(
            &self,
            channel_id: &ChannelId,
            event_id: &EventId,
        ) -> ActionResult<()> {
            self.0.remove_event(channel_id, event_id).await
        }

        async fn admin_remove_event(
            &self,
            channel_id: &ChannelId,
            event_id: &EventId,
        ) -> ActionResult<()> {
            self.0.admin_remove_event(channel_id, event_id).await
        }

        async fn check_permission(
            &self,
            channel_id: &ChannelId,
            user_id: &UserId,
            permission: Permission,
        ) -> ActionResult<bool> {
            self.0.check_permission(channel_id, user_id, permission).await
        }
    }

    #[test]
    fn build_requires_an_action_client() {
        let err = Bot::builder(BotIdentity::new("bot-1")).build().unwrap_err();
        assert!(matches!(err, RuntimeError::MissingActionClient));
    }

    #[test]
    fn build_validates_commands() {
        let err = Bot::builder(BotIdentity::new("bot-1"))
            .actions(CountingClient::default())
            .command("ping", "first")
            .command("ping", "duplicate")
            .build()
            .unwrap_err();
        assert!(matches!(err, RuntimeError::Command(_)));
    }

    #[tokio::test]
    async fn serve_classifies_dispatches_and_self_filters() {
        let (bot, client) = bot();
        bot.on_message(into_handler(KeywordResponder::new().rule("hello", "Hi!")))
            .unwrap();

        let (tx, rx) = bot.envelope_channel();
        tx.send(message_envelope("user-1", "hello there"))
            .await
            .unwrap();
        tx.send(message_envelope("bot-1", "my own message"))
            .await
            .unwrap();
        tx.send(json!({ "kind": "wat", "user_id": "user-1" }))
            .await
            .unwrap();
        drop(tx);

        let report = bot.serve(rx).await;

        assert_eq!(report.processed, 2); // keyword message + raw stream
        assert_eq!(report.dropped, 1); // the bot's own message
        assert_eq!(report.handler_failures, 0);
        assert_eq!(client.sends.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn registration_fails_after_serving() {
        let (bot, _client) = bot();
        let (tx, rx) = bot.envelope_channel();
        drop(tx);
        bot.serve(rx).await;

        let err = bot
            .on_message(handler_fn(|_ctx| async { Ok(()) }))
            .unwrap_err();
        assert!(matches!(err, RegistryError::Sealed));
    }

    #[tokio::test]
    async fn shutdown_handle_stops_serving() {
        let (bot, _client) = bot();
        let (tx, rx) = bot.envelope_channel();
        let shutdown = bot.shutdown_handle();

        let serving = tokio::spawn(async move { bot.serve(rx).await });
        shutdown.cancel();

        let report = tokio::time::timeout(Duration::from_secs(1), serving)
            .await
            .expect("serve did not stop on shutdown")
            .unwrap();
        assert_eq!(report, ServeReport::default());
        drop(tx);
    }

    #[tokio::test]
    async fn slow_handler_does_not_block_unrelated_events() {
        let (bot, _client) = bot();
        let gate = Arc::new(tokio::sync::Notify::new());

        let waiter = Arc::clone(&gate);
        bot.on_message(handler_fn(move |_ctx| {
            let waiter = Arc::clone(&waiter);
            async move {
                // Finishes only once the reaction handler has run.
                waiter.notified().await;
                Ok(())
            }
        }))
        .unwrap();

        let opener = Arc::clone(&gate);
        bot.on_reaction(handler_fn(move |_ctx| {
            let opener = Arc::clone(&opener);
            async move {
                opener.notify_one();
                Ok(())
            }
        }))
        .unwrap();

        let (tx, rx) = bot.envelope_channel();
        tx.send(message_envelope("user-1", "slow one")).await.unwrap();
        tx.send(json!({
            "kind": "reaction",
            "user_id": "user-2",
            "channel_id": "c",
            "event_id": "evt-r",
            "reaction": "👍",
            "target_event_id": "evt-0",
        }))
        .await
        .unwrap();
        drop(tx);

        let report = tokio::time::timeout(Duration::from_secs(1), bot.serve(rx))
            .await
            .expect("cross-event processing deadlocked");
        assert_eq!(report.processed, 2);
        assert_eq!(report.handler_failures, 0);
    }

    #[tokio::test]
    async fn grace_expiry_cancels_stuck_handlers() {
        let client = CountingClient::default();
        let bot = Bot::builder(BotIdentity::new("bot-1"))
            .actions(client)
            .shutdown_grace(Duration::from_millis(50))
            .build()
            .unwrap();

        bot.on_message(handler_fn(|_ctx| async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }))
        .unwrap();

        let (tx, rx) = bot.envelope_channel();
        tx.send(message_envelope("user-1", "stuck")).await.unwrap();
        drop(tx);

        let report = tokio::time::timeout(Duration::from_secs(2), bot.serve(rx))
            .await
            .expect("grace cancellation did not take effect");
        assert_eq!(report.processed, 1);
        assert_eq!(report.handler_failures, 1);
    }

    #[test]
    fn builder_from_config_checks_validity() {
        let err = BotBuilder::from_config(&SkiffConfig::default()).unwrap_err();
        assert!(matches!(err, crate::config::ConfigError::Invalid { .. }));

        let mut config = SkiffConfig::default();
        config.bot.user_id = "bot-cfg".to_owned();
        config.dispatch.channel_capacity = 4;
        let builder = BotBuilder::from_config(&config).unwrap();
        assert_eq!(builder.identity.user_id().as_str(), "bot-cfg");
        assert_eq!(builder.channel_capacity, 4);
    }
}
