//! Prompt request assembly.

use std::sync::Arc;
use std::time::Instant;

use parley_core::{ConversationContext, ConversationKey, PromptRequest};
use parley_observability::{build_span, record_duration};
use tracing::{debug, warn, Instrument, Span};

use crate::collaborators::{EnvironmentLookup, HistoryStore, ImageCaptioner, PersonaSource};
use crate::config::PipelineConfig;
use crate::context::{
    describe_environment, extract_images, guidance_lines, render_persona, HistoryFormatter,
    MessageTranscriber, PersonaResolver, NO_HISTORY,
};
use crate::error::Result;

/// Builds the [`PromptRequest`] for one triggering message.
///
/// Holds only shared collaborators; builds for different conversations can
/// run concurrently on the same builder.
#[derive(Clone)]
pub struct PromptBuilder {
    history: Arc<dyn HistoryStore>,
    personas: PersonaResolver,
    captioner: Option<Arc<dyn ImageCaptioner>>,
    lookup: Arc<dyn EnvironmentLookup>,
}

impl PromptBuilder {
    pub fn new(
        history: Arc<dyn HistoryStore>,
        personas: Arc<dyn PersonaSource>,
        captioner: Option<Arc<dyn ImageCaptioner>>,
        lookup: Arc<dyn EnvironmentLookup>,
    ) -> Self {
        Self {
            history,
            personas: PersonaResolver::new(personas),
            captioner,
            lookup,
        }
    }

    /// Assemble the request for `ctx`.
    ///
    /// Only an unresolvable conversation identity is an error. Every
    /// collaborator failure degrades the prompt instead.
    pub async fn build(
        &self,
        ctx: &ConversationContext,
        config: &PipelineConfig,
    ) -> Result<PromptRequest> {
        let key = ctx.conversation_key()?;
        let origin = ctx.origin()?;

        let span = build_span!(key);
        Ok(self.assemble(ctx, config, &key, &origin).instrument(span).await)
    }

    async fn assemble(
        &self,
        ctx: &ConversationContext,
        config: &PipelineConfig,
        key: &ConversationKey,
        origin: &str,
    ) -> PromptRequest {
        let start = Instant::now();
        let mut request = PromptRequest {
            use_tools: config.use_tools,
            ..Default::default()
        };

        if let Some(persona) = self
            .personas
            .resolve(ctx, origin, &config.persona_name)
            .await
        {
            request.system_prompt = render_persona(&persona);
            request.seed_dialogs = persona.seed_dialogs;
        }

        request
            .system_prompt
            .push_str(&describe_environment(ctx, key.chat_id(), self.lookup.as_ref()).await);

        let messages = match self.history.history(key).await {
            Ok(messages) => messages,
            Err(e) => {
                warn!(error = %e, "History fetch failed, continuing without history");
                Vec::new()
            }
        };
        Span::current().record("history.messages", messages.len());

        let transcriber =
            MessageTranscriber::new(self.captioner.clone()).with_quote_limit(config.quote_limit);

        let history = HistoryFormatter::new(&transcriber)
            .format(&messages, config.history_limit, ctx.message.id.as_ref())
            .await;
        match history {
            Some(block) => {
                request.system_prompt.push_str("\n\nHere is the recent chat history:\n");
                request.system_prompt.push_str(&block);
            }
            None => {
                request.system_prompt.push_str("\n\n");
                request.system_prompt.push_str(NO_HISTORY);
            }
        }

        request.system_prompt.push_str(&guidance_lines(config));

        let images = extract_images(&messages, config.history_limit, config.max_images);
        Span::current().record("images", images.len());
        match images.len() {
            0 => {}
            1 => request
                .system_prompt
                .push_str("\n\n1 image from the chat history is attached."),
            n => request.system_prompt.push_str(&format!(
                "\n\n{n} images from the chat history are attached, ordered from newest to oldest."
            )),
        }
        request.image_references = images;

        request.user_prompt = if ctx.message.components.is_empty() {
            ctx.message.outline.clone()
        } else {
            transcriber.transcribe(&ctx.message.components).await
        };

        record_duration("duration_ms", start.elapsed());
        debug!(
            system_prompt_len = request.system_prompt.len(),
            seed_dialogs = request.seed_dialogs.len(),
            "Prompt request built"
        );

        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::in_memory::{
        InMemoryHistoryStore, StaticCaptioner, StaticEnvironment, StaticPersonaSource,
    };
    use crate::RuntimeError;
    use parley_core::{
        DialogTurn, HistoryMessage, IncomingMessage, MessageComponent, ParleyError, Persona,
        Sender,
    };

    fn builder(history: InMemoryHistoryStore, personas: StaticPersonaSource) -> PromptBuilder {
        PromptBuilder::new(
            Arc::new(history),
            Arc::new(personas),
            Some(Arc::new(StaticCaptioner::default())),
            Arc::new(StaticEnvironment::default().with_bot_name("Parley")),
        )
    }

    #[tokio::test]
    async fn test_build_without_history_or_persona() {
        let builder = builder(InMemoryHistoryStore::new(), StaticPersonaSource::default());
        let ctx = ConversationContext::private(
            "qq",
            IncomingMessage::new(Sender::new("42", "Alice"))
                .with_id("m1")
                .with_component(MessageComponent::text("hi there")),
        )
        .with_self_id("999");

        let request = builder.build(&ctx, &PipelineConfig::new()).await.unwrap();

        assert_eq!(request.user_prompt, "hi there");
        assert!(request.system_prompt.starts_with(
            "\n\nYou are browsing a chat app; your id there is 999, and your username is Parley"
        ));
        assert!(request.system_prompt.contains(NO_HISTORY));
        assert!(request.seed_dialogs.is_empty());
        assert!(request.image_references.is_empty());
        assert!(!request.use_tools);
    }

    #[tokio::test]
    async fn test_persona_leads_system_prompt() {
        let personas = StaticPersonaSource::default().with_persona(
            Persona::new("cat", "You are a cat.")
                .with_seed_dialog(DialogTurn::user("hello"))
                .with_seed_dialog(DialogTurn::assistant("meow")),
        );
        let builder = builder(InMemoryHistoryStore::new(), personas);
        let ctx = ConversationContext::group("qq", "7000", IncomingMessage::default())
            .with_self_id("999");
        let config = PipelineConfig::new().with_persona("cat").with_tools(true);

        let request = builder.build(&ctx, &config).await.unwrap();

        assert!(request.system_prompt.starts_with("You are a cat.\n\nYou are browsing"));
        assert_eq!(request.seed_dialogs.len(), 2);
        assert!(!request.system_prompt.contains("meow"));
        assert!(request.use_tools);
    }

    #[tokio::test]
    async fn test_outline_used_when_no_components() {
        let builder = builder(InMemoryHistoryStore::new(), StaticPersonaSource::default());
        let ctx = ConversationContext::group(
            "qq",
            "7000",
            IncomingMessage::new(Sender::new("1", "a")).with_outline("/help"),
        );

        let request = builder.build(&ctx, &PipelineConfig::new()).await.unwrap();
        assert_eq!(request.user_prompt, "/help");
    }

    #[tokio::test]
    async fn test_history_and_images_sections() {
        let ctx = ConversationContext::group(
            "qq",
            "7000",
            IncomingMessage::new(Sender::new("1", "a"))
                .with_id("m3")
                .with_component(MessageComponent::text("what is this?")),
        );
        let key = ctx.conversation_key().unwrap();

        let history = InMemoryHistoryStore::new();
        history
            .push(
                &key,
                HistoryMessage::new(Sender::new("2", "Bob"))
                    .with_id("m1")
                    .with_component(MessageComponent::image_url("https://img/1.png")),
            )
            .await;
        history
            .push(
                &key,
                HistoryMessage::new(Sender::new("2", "Bob"))
                    .with_id("m2")
                    .with_component(MessageComponent::text("look")),
            )
            .await;
        history
            .push(
                &key,
                HistoryMessage::new(Sender::new("1", "a"))
                    .with_id("m3")
                    .with_component(MessageComponent::text("what is this?")),
            )
            .await;

        let builder = builder(history, StaticPersonaSource::default());
        let config = PipelineConfig::new().with_max_images(2);
        let request = builder.build(&ctx, &config).await.unwrap();

        assert!(request
            .system_prompt
            .contains("Here is the recent chat history:\nSender: Bob (ID: 2)"));
        assert!(request.system_prompt.contains("Content: look"));
        assert_eq!(
            request.system_prompt.matches("Content: what is this?").count(),
            0
        );
        assert_eq!(request.image_references, vec!["https://img/1.png"]);
        assert!(request
            .system_prompt
            .ends_with("1 image from the chat history is attached."));
    }

    #[tokio::test]
    async fn test_group_without_id_is_an_error() {
        let builder = builder(InMemoryHistoryStore::new(), StaticPersonaSource::default());
        let mut ctx = ConversationContext::group("qq", "", IncomingMessage::default());
        ctx.group_id = None;

        let err = builder.build(&ctx, &PipelineConfig::new()).await.unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::Core(ParleyError::MissingChatId { .. })
        ));
    }
}
