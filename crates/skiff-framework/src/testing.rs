//! Test doubles shared by this crate's unit tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use skiff_core::{
    ActionClient, ActionResult, ChannelId, EventId, Permission, SendOpts, UserId,
};

/// Action client that accepts everything and records sends.
#[derive(Default)]
pub struct NullClient {
    pub sent: Mutex<Vec<SentMessage>>,
}

/// One recorded `send_message` call.
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub channel_id: ChannelId,
    pub text: String,
    pub reply_id: Option<EventId>,
}

#[async_trait]
impl ActionClient for NullClient {
    async fn send_message(
        &self,
        channel_id: &ChannelId,
        text: &str,
        opts: SendOpts,
    ) -> ActionResult<EventId> {
        let mut sent = self.sent.lock();
        sent.push(SentMessage {
            channel_id: channel_id.clone(),
            text: text.to_owned(),
            reply_id: opts.reply_id,
        });
        Ok(EventId::new(format!("sent-{}", sent.len())))
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

    async fn remove_event(&self, _channel_id: &ChannelId, _event_id: &EventId) -> ActionResult<()> {
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
