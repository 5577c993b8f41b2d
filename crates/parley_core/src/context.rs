use serde::Deserialize;

use crate::error::{ParleyError, Result};
use crate::key::ConversationKey;
use crate::message::IncomingMessage;

/// Everything the platform tells us about the event being answered.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConversationContext {
    pub platform: String,
    pub is_private: bool,
    /// The bot's own account id on the platform.
    pub self_id: String,
    pub group_id: Option<String>,
    /// Platform-unified origin string used for per-conversation settings.
    /// Falls back to the encoded conversation key when empty.
    pub origin: String,
    pub message: IncomingMessage,
}

impl ConversationContext {
    pub fn private(platform: impl Into<String>, message: IncomingMessage) -> Self {
        Self {
            platform: platform.into(),
            is_private: true,
            message,
            ..Default::default()
        }
    }

    pub fn group(
        platform: impl Into<String>,
        group_id: impl Into<String>,
        message: IncomingMessage,
    ) -> Self {
        Self {
            platform: platform.into(),
            is_private: false,
            group_id: Some(group_id.into()),
            message,
            ..Default::default()
        }
    }

    pub fn with_self_id(mut self, self_id: impl Into<String>) -> Self {
        self.self_id = self_id.into();
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Group id for group chats, the sender's id for private chats.
    pub fn chat_id(&self) -> Result<&str> {
        if self.is_private {
            return Ok(&self.message.sender.id);
        }
        self.group_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ParleyError::MissingChatId {
                platform: self.platform.clone(),
            })
    }

    pub fn conversation_key(&self) -> Result<ConversationKey> {
        Ok(ConversationKey::new(
            self.platform.clone(),
            self.is_private,
            self.chat_id()?,
        ))
    }

    pub fn origin(&self) -> Result<String> {
        if self.origin.is_empty() {
            Ok(self.conversation_key()?.encode())
        } else {
            Ok(self.origin.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Sender;

    #[test]
    fn test_private_chat_id_is_sender() {
        let ctx = ConversationContext::private(
            "telegram",
            IncomingMessage::new(Sender::new("42", "Alice")),
        );
        assert_eq!(ctx.chat_id().unwrap(), "42");
        assert_eq!(ctx.conversation_key().unwrap().encode(), "telegram:private:42");
    }

    #[test]
    fn test_group_chat_id() {
        let ctx = ConversationContext::group(
            "aiocqhttp",
            "9000",
            IncomingMessage::new(Sender::new("42", "Alice")),
        );
        assert_eq!(ctx.chat_id().unwrap(), "9000");
    }

    #[test]
    fn test_group_without_id_is_misuse() {
        let mut ctx = ConversationContext::group("aiocqhttp", "", IncomingMessage::default());
        assert!(matches!(
            ctx.chat_id(),
            Err(ParleyError::MissingChatId { .. })
        ));
        ctx.group_id = None;
        assert!(ctx.conversation_key().is_err());
    }

    #[test]
    fn test_origin_falls_back_to_key() {
        let ctx = ConversationContext::group("qq", "1", IncomingMessage::default());
        assert_eq!(ctx.origin().unwrap(), "qq:group:1");

        let ctx = ctx.with_origin("qq:GroupMessage:1");
        assert_eq!(ctx.origin().unwrap(), "qq:GroupMessage:1");
    }
}
