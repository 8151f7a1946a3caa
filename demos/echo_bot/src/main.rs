//! Echo Bot Demo
//!
//! A self-contained demonstration of the Skiff framework. There is no real
//! transport here: a scripted feeder plays the role of the webhook
//! collaborator by pushing decoded envelopes into the bot's channel, and a
//! console-backed [`ActionClient`] prints what a real transport would send
//! out.
//!
//! Shown along the way:
//! - keyword replies (case-insensitive, first match wins)
//! - slash commands (`/ping`, `/echo …`) advertised on the builder
//! - membership greetings and tip acknowledgements
//! - the self-filter (the bot's own message is dropped, no feedback loop)
//! - raw-stream fallback for an unknown envelope kind
//!
//! # Usage
//!
//! ```bash
//! cargo run --package echo-bot
//! ```

use std::time::Duration;

use anyhow::Result;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

use skiff::core::MembershipChange;
use skiff::prelude::*;
use skiff::runtime::LoggingBuilder;

// ============================================================================
// Console Action Client
// ============================================================================

/// Prints outbound actions instead of calling a transport.
struct ConsoleClient;

#[async_trait::async_trait]
impl ActionClient for ConsoleClient {
    async fn send_message(
        &self,
        channel_id: &ChannelId,
        text: &str,
        opts: SendOpts,
    ) -> ActionResult<EventId> {
        info!(channel = %channel_id, reply_to = ?opts.reply_id, %text, "-> send_message");
        Ok(EventId::new(Uuid::new_v4().to_string()))
    }

    async fn edit_message(
        &self,
        channel_id: &ChannelId,
        event_id: &EventId,
        text: &str,
    ) -> ActionResult<()> {
        info!(channel = %channel_id, event = %event_id, %text, "-> edit_message");
        Ok(())
    }

    async fn send_reaction(
        &self,
        channel_id: &ChannelId,
        event_id: &EventId,
        reaction: &str,
    ) -> ActionResult<()> {
        info!(channel = %channel_id, event = %event_id, %reaction, "-> send_reaction");
        Ok(())
    }

    async fn remove_event(&self, channel_id: &ChannelId, event_id: &EventId) -> ActionResult<()> {
        info!(channel = %channel_id, event = %event_id, "-> remove_event");
        Ok(())
    }

    async fn admin_remove_event(
        &self,
        _channel_id: &ChannelId,
        _event_id: &EventId,
    ) -> ActionResult<()> {
        // The console world grants no permissions, so the typed rejection
        // path is what a handler would see.
        Err(ActionError::missing_permission(Permission::Redact))
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

// ============================================================================
// Handlers
// ============================================================================

/// Answers the advertised slash commands.
async fn command_handler(ctx: HandlerContext) -> HandlerResult {
    let Some(cmd) = ctx.event().as_slash_command() else {
        return Ok(());
    };

    match cmd.command.as_str() {
        "ping" => {
            ctx.reply("pong 🏓").await?;
        }
        "echo" => {
            let text = if cmd.args.is_empty() {
                "…nothing to echo".to_owned()
            } else {
                cmd.args.join(" ")
            };
            ctx.reply(&text).await?;
        }
        other => {
            ctx.reply(&format!("unknown command `/{other}`, try /ping or /echo"))
                .await?;
        }
    }
    Ok(())
}

/// Greets members as they join.
async fn greeter(ctx: HandlerContext) -> HandlerResult {
    if let Event::MembershipChange(change) = ctx.event()
        && change.change == MembershipChange::Join
    {
        ctx.reply(&format!("welcome, {}!", change.meta.user_id)).await?;
    }
    Ok(())
}

/// Thanks tippers.
async fn tip_thanks(ctx: HandlerContext) -> HandlerResult {
    if let Event::Tip(tip) = ctx.event() {
        ctx.reply(&format!("thanks for the {} tip!", tip.amount))
            .await?;
    }
    Ok(())
}

// ============================================================================
// Scripted envelope feed (plays the transport collaborator)
// ============================================================================

fn envelope(kind: &str, author: &str, extra: Value) -> Value {
    let mut value = json!({
        "kind": kind,
        "user_id": author,
        "space_id": "space-demo",
        "channel_id": "chan-demo",
        "event_id": Uuid::new_v4().to_string(),
        "created_at": 0,
    });
    if let (Some(object), Some(extra)) = (value.as_object_mut(), extra.as_object()) {
        object.extend(extra.clone());
    }
    value
}

async fn feed(tx: mpsc::Sender<Value>) {
    let script = vec![
        envelope("membership_change", "alice", json!({ "change": "join" })),
        envelope("message", "alice", json!({ "text": "GM everyone!" })),
        envelope("message", "bob", json!({ "text": "/ping" })),
        envelope("message", "bob", json!({ "text": "/echo hello \"wide world\"" })),
        // The bot's own message: dropped by the self-filter.
        envelope("message", "demo-bot", json!({ "text": "pong 🏓" })),
        envelope(
            "tip",
            "alice",
            json!({
                "target_event_id": "evt-tipped",
                "sender_address": "0xaaa",
                "receiver_address": "0xbbb",
                "amount": "1000000000000000000",
                "currency_address": "0xccc",
            }),
        ),
        // Unknown kind: classified as a raw stream event.
        envelope("space_settings_changed", "carol", json!({ "theme": "dark" })),
    ];

    for value in script {
        if tx.send(value).await.is_err() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    LoggingBuilder::new()
        .with_level(tracing::Level::DEBUG)
        .init();

    let bot = Bot::builder(BotIdentity::new("demo-bot").with_display_name("Skiff Demo"))
        .actions(ConsoleClient)
        .command("ping", "Replies with pong")
        .command("echo", "Echoes its arguments back")
        .build()?;

    bot.on_message(into_handler(
        KeywordResponder::new()
            .rule("gm", "gm! ☀️")
            .rule("help", "try /ping or /echo"),
    ))?;
    bot.on_slash_command(handler_fn(command_handler))?;
    bot.on_membership_change(handler_fn(greeter))?;
    bot.on_tip(handler_fn(tip_thanks))?;
    bot.on_raw(handler_fn(|ctx| async move {
        info!(event = ?ctx.event(), "unrecognized stream event");
        Ok(())
    }))?;

    for command in bot.commands().advertised() {
        info!(name = command.name(), description = command.description(), "advertising command");
    }

    let (tx, rx) = bot.envelope_channel();
    let feeder = tokio::spawn(feed(tx));

    let report = bot.run(rx).await;
    feeder.await?;

    info!(
        processed = report.processed,
        dropped = report.dropped,
        failures = report.handler_failures,
        "demo finished"
    );
    Ok(())
}
