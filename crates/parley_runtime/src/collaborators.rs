//! Capabilities the pipeline consumes from its host.
//!
//! Every call may suspend and may fail; the pipeline logs failures and
//! substitutes a default instead of propagating them.

use async_trait::async_trait;
use parley_core::{ConversationContext, ConversationKey, HistoryMessage, Persona, PromptRequest};
use serde::{Deserialize, Serialize};

pub type CollaboratorResult<T> = anyhow::Result<T>;

/// Raw message history of a conversation, oldest first.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn history(&self, key: &ConversationKey) -> CollaboratorResult<Vec<HistoryMessage>>;
}

#[async_trait]
pub trait PersonaSource: Send + Sync {
    /// Persona name pinned to one conversation origin, when the host supports overrides.
    async fn session_persona_name(&self, _origin: &str) -> CollaboratorResult<Option<String>> {
        Ok(None)
    }

    /// Persona whose name matches `name` exactly.
    async fn configured_persona(&self, name: &str) -> CollaboratorResult<Option<Persona>>;

    /// Host-level default for the conversation.
    async fn default_persona(
        &self,
        ctx: &ConversationContext,
    ) -> CollaboratorResult<Option<Persona>>;
}

#[async_trait]
pub trait ImageCaptioner: Send + Sync {
    /// `image` is a local path or a remote url.
    async fn caption(&self, image: &str) -> CollaboratorResult<Option<String>>;
}

/// Best-effort platform lookups.
#[async_trait]
pub trait EnvironmentLookup: Send + Sync {
    async fn group_display_name(&self, chat_id: &str) -> CollaboratorResult<Option<String>>;

    async fn bot_display_name(&self) -> CollaboratorResult<Option<String>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelResponse {
    pub text: String,
}

/// Issues the actual model call.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    async fn invoke(&self, request: PromptRequest) -> CollaboratorResult<ModelResponse>;
}
