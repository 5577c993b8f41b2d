//! Scenario files: everything a prompt build needs, captured as JSON.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use parley_core::{ConversationContext, HistoryMessage, Persona};
use parley_runtime::in_memory::{
    InMemoryHistoryStore, StaticCaptioner, StaticEnvironment, StaticPersonaSource,
};
use parley_runtime::{PipelineConfig, PromptBuilder};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub context: ConversationContext,
    /// Stored history of the conversation, oldest first
    pub history: Vec<HistoryMessage>,
    pub personas: Vec<Persona>,
    pub default_persona: Option<String>,
    /// origin → persona name
    pub session_personas: HashMap<String, String>,
    /// chat id → group display name
    pub group_names: HashMap<String, String>,
    pub bot_name: Option<String>,
    /// image reference → caption
    pub captions: HashMap<String, String>,
    pub config: Option<PipelineConfig>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("invalid scenario {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn persona_source(&self) -> StaticPersonaSource {
        let mut source = StaticPersonaSource::new(self.personas.clone());
        if let Some(name) = &self.default_persona {
            source = source.with_default(name.clone());
        }
        for (origin, name) in &self.session_personas {
            source = source.with_session_override(origin.clone(), name.clone());
        }
        source
    }

    /// Wire the scenario's data into in-memory collaborators.
    pub fn builder(&self) -> Result<PromptBuilder> {
        let key = self.context.conversation_key()?;
        let history = InMemoryHistoryStore::new().with_history(key, self.history.clone());

        let mut environment = StaticEnvironment::default();
        for (chat_id, name) in &self.group_names {
            environment = environment.with_group_name(chat_id.clone(), name.clone());
        }
        if let Some(bot) = &self.bot_name {
            environment = environment.with_bot_name(bot.clone());
        }

        let captioner = self
            .captions
            .iter()
            .fold(StaticCaptioner::default(), |c, (image, caption)| {
                c.with_caption(image.clone(), caption.clone())
            });

        Ok(PromptBuilder::new(
            Arc::new(history),
            Arc::new(self.persona_source()),
            Some(Arc::new(captioner)),
            Arc::new(environment),
        ))
    }
}
