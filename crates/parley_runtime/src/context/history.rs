//! History window formatting.

use chrono::{DateTime, Local, Utc};
use parley_core::{HistoryMessage, MessageId};

use super::transcribe::MessageTranscriber;

/// Appended to the system prompt when no history survives formatting.
pub const NO_HISTORY: &str =
    "You haven't seen any chat history; it looks like there have been no recent messages.";

const DIVIDER: &str = "\n-\n";

/// The trailing `size` messages. `messages` is oldest first.
pub(crate) fn window(messages: &[HistoryMessage], size: usize) -> &[HistoryMessage] {
    &messages[messages.len().saturating_sub(size)..]
}

pub(crate) fn format_timestamp(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Renders the recent history of a conversation as sender/time/content blocks.
#[derive(Debug, Clone, Copy)]
pub struct HistoryFormatter<'a> {
    transcriber: &'a MessageTranscriber,
}

impl<'a> HistoryFormatter<'a> {
    pub fn new(transcriber: &'a MessageTranscriber) -> Self {
        Self { transcriber }
    }

    /// Format the last `max_messages` messages, minus the triggering one.
    ///
    /// With a trigger id, the message carrying that id is excluded. Without
    /// one, the newest message of the window is assumed to be the trigger and
    /// dropped. Returns `None` when nothing is left.
    pub async fn format(
        &self,
        messages: &[HistoryMessage],
        max_messages: usize,
        trigger: Option<&MessageId>,
    ) -> Option<String> {
        let window = window(messages, max_messages);

        let retained: Vec<&HistoryMessage> = match trigger {
            Some(id) => window.iter().filter(|m| !m.has_id(id)).collect(),
            None => window
                .split_last()
                .map(|(_, rest)| rest.iter().collect())
                .unwrap_or_default(),
        };

        if retained.is_empty() {
            return None;
        }

        let mut blocks = Vec::with_capacity(retained.len());
        for message in retained {
            blocks.push(self.format_message(message).await);
        }
        Some(blocks.join(DIVIDER))
    }

    async fn format_message(&self, message: &HistoryMessage) -> String {
        let name = non_empty(&message.sender.display_name).unwrap_or("unknown user");
        let id = non_empty(&message.sender.id).unwrap_or("unknown");
        let time = message
            .timestamp
            .map(format_timestamp)
            .unwrap_or_else(|| "unknown time".to_string());
        let content = self.transcriber.transcribe(&message.components).await;

        format!("Sender: {name} (ID: {id})\nTime: {time}\nContent: {content}")
    }
}

fn non_empty(s: &str) -> Option<&str> {
    Some(s).filter(|s| !s.is_empty())
}
