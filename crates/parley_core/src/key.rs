//! Conversation identity shared by the call-state tracker and history lookups.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParleyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatKind {
    Private,
    Group,
}

impl ChatKind {
    pub fn from_private(is_private: bool) -> Self {
        if is_private {
            ChatKind::Private
        } else {
            ChatKind::Group
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChatKind::Private => "private",
            ChatKind::Group => "group",
        }
    }

    pub fn is_private(&self) -> bool {
        matches!(self, ChatKind::Private)
    }
}

impl FromStr for ChatKind {
    type Err = ParleyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(ChatKind::Private),
            "group" => Ok(ChatKind::Group),
            other => Err(ParleyError::InvalidKey(format!("unknown chat kind '{other}'"))),
        }
    }
}

/// Identifies one private or group chat on one platform.
///
/// The string form is `{platform}:{kind}:{chat_id}` with the platform
/// percent-encoded, so it never contains the `:` separator and the
/// encoding stays injective whatever the chat id contains.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationKey {
    platform: String,
    kind: ChatKind,
    chat_id: String,
}

impl ConversationKey {
    pub fn new(platform: impl Into<String>, is_private: bool, chat_id: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            kind: ChatKind::from_private(is_private),
            chat_id: chat_id.into(),
        }
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn kind(&self) -> ChatKind {
        self.kind
    }

    pub fn is_private(&self) -> bool {
        self.kind.is_private()
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    pub fn encode(&self) -> String {
        format!(
            "{}:{}:{}",
            urlencoding::encode(&self.platform),
            self.kind.as_str(),
            self.chat_id
        )
    }
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for ConversationKey {
    type Err = ParleyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let (Some(platform), Some(kind), Some(chat_id)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(ParleyError::InvalidKey(s.to_string()));
        };

        let platform = urlencoding::decode(platform)
            .map_err(|e| ParleyError::InvalidKey(format!("{s}: {e}")))?
            .into_owned();

        Ok(Self {
            platform,
            kind: kind.parse()?,
            chat_id: chat_id.to_string(),
        })
    }
}
