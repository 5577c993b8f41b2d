use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::component::{json_to_string, MessageComponent};

/// Opaque platform message identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl<'de> Deserialize<'de> for MessageId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self(json_to_string(&value)))
    }
}

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sender {
    #[serde(alias = "user_id", deserialize_with = "crate::component::lenient_string")]
    pub id: String,
    #[serde(alias = "nickname")]
    pub display_name: String,
}

impl Sender {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// One stored message of a conversation, as returned by the history store.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HistoryMessage {
    #[serde(alias = "message_id")]
    pub id: Option<MessageId>,
    pub sender: Sender,
    #[serde(with = "chrono::serde::ts_seconds_option")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(alias = "message")]
    pub components: Vec<MessageComponent>,
}

impl HistoryMessage {
    pub fn new(sender: Sender) -> Self {
        Self {
            sender,
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(MessageId::new(id));
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_component(mut self, component: MessageComponent) -> Self {
        self.components.push(component);
        self
    }

    pub fn has_id(&self, id: &MessageId) -> bool {
        self.id.as_ref() == Some(id)
    }
}

/// The message that triggered the current build.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct IncomingMessage {
    #[serde(alias = "message_id")]
    pub id: Option<MessageId>,
    pub sender: Sender,
    #[serde(alias = "message")]
    pub components: Vec<MessageComponent>,
    /// Plain-text outline supplied by the platform, used when there are no components.
    #[serde(alias = "message_str")]
    pub outline: String,
}

impl IncomingMessage {
    pub fn new(sender: Sender) -> Self {
        Self {
            sender,
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(MessageId::new(id));
        self
    }

    pub fn with_component(mut self, component: MessageComponent) -> Self {
        self.components.push(component);
        self
    }

    pub fn with_outline(mut self, outline: impl Into<String>) -> Self {
        self.outline = outline.into();
        self
    }
}
