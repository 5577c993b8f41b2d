//! Message transcription.
//!
//! Turns a component list into one space-joined line that a text-only
//! model can read. A component that fails to render is logged and replaced
//! with [`UNRENDERABLE`]; the rest of the line still renders.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::DateTime;
use futures::future::{BoxFuture, FutureExt};
use parley_core::{Image, Mention, MessageComponent, Reply, SharedCard, StructuredCard};
use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::warn;

use super::history::format_timestamp;
use super::uri::{resolve_image_reference, ImageRef, ImageRefError};
use crate::collaborators::ImageCaptioner;

pub const UNRENDERABLE: &str = "[unrenderable component]";

const DEFAULT_QUOTE_LIMIT: usize = 30;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("component '{kind}' could not be decoded: {reason}")]
    Malformed { kind: String, reason: String },

    #[error(transparent)]
    ImageRef(#[from] ImageRefError),

    #[error("could not probe image file {}: {source}", path.display())]
    ImageProbe {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Clone)]
pub struct MessageTranscriber {
    captioner: Option<Arc<dyn ImageCaptioner>>,
    quote_limit: usize,
}

impl std::fmt::Debug for MessageTranscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageTranscriber")
            .field("captioner", &self.captioner.is_some())
            .field("quote_limit", &self.quote_limit)
            .finish()
    }
}

impl MessageTranscriber {
    pub fn new(captioner: Option<Arc<dyn ImageCaptioner>>) -> Self {
        Self {
            captioner,
            quote_limit: DEFAULT_QUOTE_LIMIT,
        }
    }

    /// Characters of quoted content kept before the `...` marker.
    pub fn with_quote_limit(mut self, limit: usize) -> Self {
        self.quote_limit = limit;
        self
    }

    /// Render every component and join the pieces with single spaces.
    ///
    /// Boxed because quoted replies transcribe their nested chain.
    pub fn transcribe<'a>(&'a self, components: &'a [MessageComponent]) -> BoxFuture<'a, String> {
        async move {
            let mut parts = Vec::with_capacity(components.len());
            for component in components {
                match self.render(component).await {
                    Ok(text) => parts.push(text),
                    Err(e) => {
                        warn!(kind = component.kind(), error = %e, "Failed to render message component");
                        parts.push(UNRENDERABLE.to_string());
                    }
                }
            }
            parts.join(" ")
        }
        .boxed()
    }

    async fn render(&self, component: &MessageComponent) -> Result<String, RenderError> {
        let text = match component {
            MessageComponent::Text(text) => text.text.clone(),
            MessageComponent::Image(image) => self.render_image(image).await?,
            MessageComponent::Mention(mention) => render_mention(mention),
            MessageComponent::Reply(reply) => self.render_reply(reply).await,
            MessageComponent::Voice => "[voice]".to_string(),
            MessageComponent::Video => "[video]".to_string(),
            MessageComponent::Link(card) => render_shared("link", card),
            MessageComponent::Location(card) => render_shared("location", card),
            MessageComponent::Music(card) => render_shared("music", card),
            MessageComponent::Contact(contact) => format!("[contact: {}]", contact.id),
            MessageComponent::Poke(poke) => format!("[poke: {}]", poke.target_id),
            MessageComponent::Forward => "[forwarded messages]".to_string(),
            MessageComponent::Card(card) => render_card(card),
            MessageComponent::Gesture(gesture) => format!("[{}]", gesture.as_str()),
            MessageComponent::File(file) => format!("[file: {}]", file.name),
            MessageComponent::Emoji { id } => format!("[emoji: {id}]"),
            MessageComponent::Sticker => "[sticker]".to_string(),
            MessageComponent::Other { kind } => render_other(kind),
            MessageComponent::Malformed { kind, reason } => {
                return Err(RenderError::Malformed {
                    kind: kind.clone(),
                    reason: reason.clone(),
                })
            }
        };
        Ok(text)
    }

    async fn render_image(&self, image: &Image) -> Result<String, RenderError> {
        let Some(raw) = image.reference() else {
            return Ok("[image]".to_string());
        };

        let resolved = resolve_image_reference(raw)?;
        if let ImageRef::File(path) = &resolved {
            let exists = tokio::fs::try_exists(path)
                .await
                .map_err(|source| RenderError::ImageProbe {
                    path: path.clone(),
                    source,
                })?;
            if !exists {
                return Ok("[image: missing]".to_string());
            }
        }

        let Some(captioner) = &self.captioner else {
            return Ok("[image]".to_string());
        };

        let reference = resolved.to_reference();
        match captioner.caption(&reference).await {
            Ok(Some(caption)) if !caption.trim().is_empty() => {
                Ok(format!("[image: {}]", caption.trim()))
            }
            Ok(_) => Ok("[image]".to_string()),
            Err(e) => {
                warn!(image = %reference, error = %e, "Image caption failed");
                Ok("[image]".to_string())
            }
        }
    }

    async fn render_reply(&self, reply: &Reply) -> String {
        let content = if reply.chain.is_empty() {
            reply.fallback_text.clone().unwrap_or_default()
        } else {
            self.transcribe(&reply.chain).await
        };

        // Cut on the raw text so leading whitespace counts toward the limit.
        let content = if content.trim().is_empty() {
            "[content unavailable]".to_string()
        } else {
            truncate_chars(&content, self.quote_limit).trim().to_string()
        };

        let sender = match (reply.sender_nickname.as_deref(), reply.sender_id.as_str()) {
            (Some(nick), id) if !nick.is_empty() && !id.is_empty() => format!("'{nick}'({id})"),
            (Some(nick), _) if !nick.is_empty() => format!("'{nick}'"),
            (_, id) if !id.is_empty() => format!("'{id}'"),
            _ => "unknown user".to_string(),
        };

        let time = reply
            .time
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(format_timestamp);

        match time {
            Some(time) => format!("<quoted \"{time} {sender}: {content}\">"),
            None => format!("<quoted \"{sender}: {content}\">"),
        }
    }
}

fn render_mention(mention: &Mention) -> String {
    if mention.is_everyone() {
        return "@everyone".to_string();
    }
    match mention.display_name.as_deref().filter(|n| !n.is_empty()) {
        Some(name) => format!("@{name}({})", mention.target_id),
        None => format!("@{}", mention.target_id),
    }
}

fn render_shared(kind: &str, card: &SharedCard) -> String {
    match card.content.as_deref().filter(|c| !c.is_empty()) {
        Some(content) => format!("[{kind}: {}({content})]", card.title),
        None => format!("[{kind}: {}]", card.title),
    }
}

fn render_card(card: &StructuredCard) -> String {
    match &card.data {
        Some(JsonValue::String(raw)) => match serde_json::from_str::<JsonValue>(raw) {
            Ok(doc) => card_summary(&doc),
            Err(_) => "[card]".to_string(),
        },
        Some(doc @ JsonValue::Object(_)) => card_summary(doc),
        _ => "[card]".to_string(),
    }
}

fn card_summary(doc: &JsonValue) -> String {
    let field = |name: &str| {
        doc.get(name)
            .and_then(JsonValue::as_str)
            .filter(|s| !s.is_empty())
    };

    if let Some(prompt) = field("prompt") {
        format!("[card: {prompt}]")
    } else if let Some(app) = field("app") {
        format!("[mini program: {app}]")
    } else {
        "[card]".to_string()
    }
}

fn render_other(kind: &str) -> String {
    let label = match kind {
        "anonymous" => "anonymous",
        "redbag" => "red packet",
        "xml" => "xml message",
        "cardimage" => "card image",
        "tts" => "tts",
        other => other,
    };
    format!("[{label}]")
}

fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
