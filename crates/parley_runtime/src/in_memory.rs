//! In-memory collaborators for tests, previews and embedding hosts without
//! their own storage.

use std::collections::HashMap;

use async_trait::async_trait;
use parley_core::{ConversationContext, ConversationKey, HistoryMessage, Persona};
use tokio::sync::RwLock;

use crate::collaborators::{
    CollaboratorResult, EnvironmentLookup, HistoryStore, ImageCaptioner, PersonaSource,
};

#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    conversations: RwLock<HashMap<ConversationKey, Vec<HistoryMessage>>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a conversation's history, oldest first.
    pub fn with_history(mut self, key: ConversationKey, messages: Vec<HistoryMessage>) -> Self {
        self.conversations.get_mut().insert(key, messages);
        self
    }

    pub async fn push(&self, key: &ConversationKey, message: HistoryMessage) {
        self.conversations
            .write()
            .await
            .entry(key.clone())
            .or_default()
            .push(message);
    }

    pub async fn len(&self, key: &ConversationKey) -> usize {
        self.conversations
            .read()
            .await
            .get(key)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn history(&self, key: &ConversationKey) -> CollaboratorResult<Vec<HistoryMessage>> {
        Ok(self
            .conversations
            .read()
            .await
            .get(key)
            .cloned()
            .unwrap_or_default())
    }
}

/// Fixed persona list with an optional default and per-origin overrides.
#[derive(Debug, Clone, Default)]
pub struct StaticPersonaSource {
    personas: Vec<Persona>,
    default_name: Option<String>,
    session_overrides: HashMap<String, String>,
}

impl StaticPersonaSource {
    pub fn new(personas: Vec<Persona>) -> Self {
        Self {
            personas,
            ..Default::default()
        }
    }

    pub fn with_persona(mut self, persona: Persona) -> Self {
        self.personas.push(persona);
        self
    }

    pub fn with_default(mut self, name: impl Into<String>) -> Self {
        self.default_name = Some(name.into());
        self
    }

    pub fn with_session_override(
        mut self,
        origin: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.session_overrides.insert(origin.into(), name.into());
        self
    }

    pub fn personas(&self) -> &[Persona] {
        &self.personas
    }

    pub fn default_name(&self) -> Option<&str> {
        self.default_name.as_deref()
    }

    fn find(&self, name: &str) -> Option<Persona> {
        self.personas.iter().find(|p| p.name == name).cloned()
    }
}

#[async_trait]
impl PersonaSource for StaticPersonaSource {
    async fn session_persona_name(&self, origin: &str) -> CollaboratorResult<Option<String>> {
        Ok(self.session_overrides.get(origin).cloned())
    }

    async fn configured_persona(&self, name: &str) -> CollaboratorResult<Option<Persona>> {
        Ok(self.find(name))
    }

    async fn default_persona(
        &self,
        _ctx: &ConversationContext,
    ) -> CollaboratorResult<Option<Persona>> {
        Ok(self.default_name.as_deref().and_then(|name| self.find(name)))
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticEnvironment {
    group_names: HashMap<String, String>,
    bot_name: Option<String>,
}

impl StaticEnvironment {
    pub fn with_group_name(mut self, chat_id: impl Into<String>, name: impl Into<String>) -> Self {
        self.group_names.insert(chat_id.into(), name.into());
        self
    }

    pub fn with_bot_name(mut self, name: impl Into<String>) -> Self {
        self.bot_name = Some(name.into());
        self
    }
}

#[async_trait]
impl EnvironmentLookup for StaticEnvironment {
    async fn group_display_name(&self, chat_id: &str) -> CollaboratorResult<Option<String>> {
        Ok(self.group_names.get(chat_id).cloned())
    }

    async fn bot_display_name(&self) -> CollaboratorResult<Option<String>> {
        Ok(self.bot_name.clone())
    }
}

/// Captions looked up by exact image reference.
#[derive(Debug, Clone, Default)]
pub struct StaticCaptioner {
    captions: HashMap<String, String>,
}

impl StaticCaptioner {
    pub fn with_caption(mut self, image: impl Into<String>, caption: impl Into<String>) -> Self {
        self.captions.insert(image.into(), caption.into());
        self
    }
}

#[async_trait]
impl ImageCaptioner for StaticCaptioner {
    async fn caption(&self, image: &str) -> CollaboratorResult<Option<String>> {
        Ok(self.captions.get(image).cloned())
    }
}
