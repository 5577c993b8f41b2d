//! Persona resolution.

use std::sync::Arc;

use parley_core::{ConversationContext, Persona};
use tracing::{debug, warn};

use crate::collaborators::PersonaSource;

pub const STYLE_INSTRUCTION: &str =
    "Imitate the conversational style of the following examples (a is the user, b is you)";

/// Persona prompt followed by the style instruction and examples, when present.
pub fn render_persona(persona: &Persona) -> String {
    let mut text = persona.prompt.clone();
    if let Some(examples) = persona.style_examples() {
        text.push('\n');
        text.push_str(STYLE_INSTRUCTION);
        text.push('\n');
        text.push_str(examples);
    }
    text
}

/// Picks at most one persona per build.
///
/// Order: per-conversation override, configured name, host default. Any
/// lookup failure is logged and resolution moves to the next source.
#[derive(Clone)]
pub struct PersonaResolver {
    source: Arc<dyn PersonaSource>,
}

impl PersonaResolver {
    pub fn new(source: Arc<dyn PersonaSource>) -> Self {
        Self { source }
    }

    pub async fn resolve(
        &self,
        ctx: &ConversationContext,
        origin: &str,
        configured_name: &str,
    ) -> Option<Persona> {
        match self.source.session_persona_name(origin).await {
            Ok(Some(name)) if !name.is_empty() => {
                if let Some(persona) = self.by_name(&name, "session").await {
                    return Some(persona);
                }
            }
            Ok(_) => {}
            Err(e) => warn!(origin, error = %e, "Session persona lookup failed"),
        }

        if !configured_name.is_empty() {
            if let Some(persona) = self.by_name(configured_name, "config").await {
                return Some(persona);
            }
        }

        match self.source.default_persona(ctx).await {
            Ok(persona) => persona,
            Err(e) => {
                warn!(error = %e, "Default persona lookup failed");
                None
            }
        }
    }

    async fn by_name(&self, name: &str, via: &str) -> Option<Persona> {
        match self.source.configured_persona(name).await {
            Ok(Some(persona)) => {
                debug!(persona = name, via, "Resolved persona");
                Some(persona)
            }
            Ok(None) => {
                debug!(persona = name, via, "Persona not found");
                None
            }
            Err(e) => {
                warn!(persona = name, via, error = %e, "Persona lookup failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::CollaboratorResult;
    use async_trait::async_trait;
    use parley_core::{DialogTurn, IncomingMessage};

    #[derive(Default)]
    struct FakeSource {
        session: Option<String>,
        known: Vec<Persona>,
        default: Option<Persona>,
        broken_lookup: bool,
    }

    #[async_trait]
    impl PersonaSource for FakeSource {
        async fn session_persona_name(&self, _origin: &str) -> CollaboratorResult<Option<String>> {
            Ok(self.session.clone())
        }

        async fn configured_persona(&self, name: &str) -> CollaboratorResult<Option<Persona>> {
            if self.broken_lookup {
                anyhow::bail!("persona store offline");
            }
            Ok(self.known.iter().find(|p| p.name == name).cloned())
        }

        async fn default_persona(
            &self,
            _ctx: &ConversationContext,
        ) -> CollaboratorResult<Option<Persona>> {
            Ok(self.default.clone())
        }
    }

    fn ctx() -> ConversationContext {
        ConversationContext::private("test", IncomingMessage::default())
    }

    fn resolver(source: FakeSource) -> PersonaResolver {
        PersonaResolver::new(Arc::new(source))
    }

    #[tokio::test]
    async fn test_session_override_wins() {
        let resolver = resolver(FakeSource {
            session: Some("pirate".into()),
            known: vec![Persona::new("pirate", "Arr."), Persona::new("cat", "Meow.")],
            ..Default::default()
        });

        let persona = resolver.resolve(&ctx(), "origin", "cat").await.unwrap();
        assert_eq!(persona.name, "pirate");
    }

    #[tokio::test]
    async fn test_unknown_override_falls_back_to_config() {
        let resolver = resolver(FakeSource {
            session: Some("ghost".into()),
            known: vec![Persona::new("cat", "Meow.")],
            ..Default::default()
        });

        let persona = resolver.resolve(&ctx(), "origin", "cat").await.unwrap();
        assert_eq!(persona.name, "cat");
    }

    #[tokio::test]
    async fn test_name_match_is_exact() {
        let resolver = resolver(FakeSource {
            known: vec![Persona::new("Cat", "Meow.")],
            ..Default::default()
        });
        assert!(resolver.resolve(&ctx(), "origin", "cat").await.is_none());
    }

    #[tokio::test]
    async fn test_lookup_failure_falls_through_to_default() {
        let resolver = resolver(FakeSource {
            known: vec![Persona::new("cat", "Meow.")],
            default: Some(Persona::new("default", "Be helpful.")),
            broken_lookup: true,
            ..Default::default()
        });

        let persona = resolver.resolve(&ctx(), "origin", "cat").await.unwrap();
        assert_eq!(persona.name, "default");
    }

    #[tokio::test]
    async fn test_nothing_configured() {
        let resolver = resolver(FakeSource::default());
        assert!(resolver.resolve(&ctx(), "origin", "").await.is_none());
    }

    #[test]
    fn test_render_persona_with_style() {
        let persona = Persona::new("cat", "You are a cat.")
            .with_style_examples("a: hi\nb: meow")
            .with_seed_dialog(DialogTurn::user("hello"));

        assert_eq!(
            render_persona(&persona),
            format!("You are a cat.\n{STYLE_INSTRUCTION}\na: hi\nb: meow")
        );
    }

    #[test]
    fn test_render_persona_blank_style_ignored() {
        let persona = Persona::new("cat", "You are a cat.").with_style_examples("  ");
        assert_eq!(render_persona(&persona), "You are a cat.");
    }
}
