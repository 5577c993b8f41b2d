//! Common test fixtures.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parley_core::{
    ConversationContext, HistoryMessage, IncomingMessage, MessageComponent, Sender,
};
use parley_runtime::in_memory::{
    InMemoryHistoryStore, StaticCaptioner, StaticEnvironment, StaticPersonaSource,
};
use parley_runtime::PromptBuilder;

pub const PLATFORM: &str = "aiocqhttp";
pub const GROUP_ID: &str = "7000";
pub const SELF_ID: &str = "999";

#[allow(dead_code)]
/// Fixed timestamp so formatted history is stable within one run.
pub fn at(offset_secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000 + offset_secs, 0).unwrap_or_default()
}

#[allow(dead_code)]
/// `m1..=mN`, each a text message whose content is its id.
pub fn numbered_history(n: usize) -> Vec<HistoryMessage> {
    (1..=n)
        .map(|i| {
            HistoryMessage::new(Sender::new(format!("{}", 100 + i), format!("user{i}")))
                .with_id(format!("m{i}"))
                .with_timestamp(at(i as i64))
                .with_component(MessageComponent::text(format!("m{i}")))
        })
        .collect()
}

pub fn group_ctx(trigger_id: Option<&str>, components: Vec<MessageComponent>) -> ConversationContext {
    let mut message = IncomingMessage::new(Sender::new("101", "user1"));
    if let Some(id) = trigger_id {
        message = message.with_id(id);
    }
    message.components = components;
    ConversationContext::group(PLATFORM, GROUP_ID, message).with_self_id(SELF_ID)
}

#[allow(dead_code)]
pub fn builder_with(
    history: InMemoryHistoryStore,
    personas: StaticPersonaSource,
    captioner: StaticCaptioner,
) -> PromptBuilder {
    PromptBuilder::new(
        Arc::new(history),
        Arc::new(personas),
        Some(Arc::new(captioner)),
        Arc::new(
            StaticEnvironment::default()
                .with_group_name(GROUP_ID, "Rustaceans")
                .with_bot_name("Parley"),
        ),
    )
}

/// Lines of a formatted history block that carry message content.
#[allow(dead_code)]
pub fn history_contents(system_prompt: &str) -> Vec<String> {
    system_prompt
        .lines()
        .filter_map(|l| l.strip_prefix("Content: "))
        .map(str::to_string)
        .collect()
}
