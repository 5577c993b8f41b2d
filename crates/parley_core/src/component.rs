//! Typed message components.
//!
//! Platforms deliver messages as a list of tagged components (`{"type": "plain", ...}`).
//! Every tag we know maps to one variant; anything else is kept as
//! [`MessageComponent::Other`] with its lowercased tag so it can still be rendered.
//! A known tag whose payload does not decode becomes [`MessageComponent::Malformed`]
//! instead of failing the whole message.

use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Text {
    pub text: String,
}

/// An image, either persisted locally (`file`, often a `file://` URI) or remote (`url`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Image {
    pub file: Option<String>,
    pub url: Option<String>,
}

impl Image {
    /// The reference to resolve: `file` first, then `url`. Empty strings count as absent.
    pub fn reference(&self) -> Option<&str> {
        self.file
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.url.as_deref().filter(|s| !s.is_empty()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Mention {
    #[serde(alias = "qq", deserialize_with = "lenient_string")]
    pub target_id: String,
    #[serde(alias = "name")]
    pub display_name: Option<String>,
}

impl Mention {
    /// Platforms encode "@all members" as the target id `all`.
    pub fn is_everyone(&self) -> bool {
        self.target_id.eq_ignore_ascii_case("all")
    }
}

/// A quoted reply to an earlier message.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Reply {
    #[serde(deserialize_with = "lenient_string")]
    pub sender_id: String,
    pub sender_nickname: Option<String>,
    /// Unix seconds of the quoted message.
    #[serde(alias = "timestamp", deserialize_with = "lenient_timestamp")]
    pub time: Option<i64>,
    #[serde(alias = "content")]
    pub chain: Vec<MessageComponent>,
    #[serde(alias = "message_str", alias = "text")]
    pub fallback_text: Option<String>,
}

/// Shared link, location and music cards all carry a title plus optional detail.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SharedCard {
    pub title: String,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Contact {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Poke {
    #[serde(alias = "qq", alias = "id", deserialize_with = "lenient_string")]
    pub target_id: String,
}

/// A JSON card. `data` is usually a JSON document encoded as a string.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StructuredCard {
    pub data: Option<JsonValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct File {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Rps,
    Dice,
    Shake,
}

impl Gesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gesture::Rps => "rps",
            Gesture::Dice => "dice",
            Gesture::Shake => "shake",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "JsonValue")]
pub enum MessageComponent {
    Text(Text),
    Image(Image),
    Mention(Mention),
    Reply(Reply),
    Voice,
    Video,
    Link(SharedCard),
    Location(SharedCard),
    Music(SharedCard),
    Contact(Contact),
    Poke(Poke),
    Forward,
    Card(StructuredCard),
    Gesture(Gesture),
    File(File),
    /// Platform emoji by id (`face`).
    Emoji { id: String },
    /// Sticker-style platform emoji without a usable id (`wechatemoji`).
    Sticker,
    Other { kind: String },
    /// A component that could not be decoded. Rendered as a placeholder.
    Malformed { kind: String, reason: String },
}

impl MessageComponent {
    pub fn text(text: impl Into<String>) -> Self {
        MessageComponent::Text(Text { text: text.into() })
    }

    pub fn image_file(file: impl Into<String>) -> Self {
        MessageComponent::Image(Image {
            file: Some(file.into()),
            url: None,
        })
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        MessageComponent::Image(Image {
            file: None,
            url: Some(url.into()),
        })
    }

    pub fn mention(target_id: impl Into<String>, display_name: Option<&str>) -> Self {
        MessageComponent::Mention(Mention {
            target_id: target_id.into(),
            display_name: display_name.map(str::to_string),
        })
    }

    pub fn everyone() -> Self {
        Self::mention("all", None)
    }

    pub fn other(kind: impl Into<String>) -> Self {
        MessageComponent::Other {
            kind: kind.into().to_lowercase(),
        }
    }

    /// Canonical tag of the component, used in logs.
    pub fn kind(&self) -> &str {
        match self {
            MessageComponent::Text(_) => "plain",
            MessageComponent::Image(_) => "image",
            MessageComponent::Mention(_) => "at",
            MessageComponent::Reply(_) => "reply",
            MessageComponent::Voice => "record",
            MessageComponent::Video => "video",
            MessageComponent::Link(_) => "share",
            MessageComponent::Location(_) => "location",
            MessageComponent::Music(_) => "music",
            MessageComponent::Contact(_) => "contact",
            MessageComponent::Poke(_) => "poke",
            MessageComponent::Forward => "forward",
            MessageComponent::Card(_) => "json",
            MessageComponent::Gesture(g) => g.as_str(),
            MessageComponent::File(_) => "file",
            MessageComponent::Emoji { .. } => "face",
            MessageComponent::Sticker => "wechatemoji",
            MessageComponent::Other { kind } => kind,
            MessageComponent::Malformed { kind, .. } => kind,
        }
    }

    pub fn as_image(&self) -> Option<&Image> {
        match self {
            MessageComponent::Image(image) => Some(image),
            _ => None,
        }
    }
}

impl TryFrom<JsonValue> for MessageComponent {
    type Error = serde_json::Error;

    /// Never fails: undecodable components degrade to [`MessageComponent::Malformed`].
    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        let kind = value
            .get("type")
            .and_then(JsonValue::as_str)
            .map(str::to_lowercase);

        let Some(kind) = kind else {
            warn!("Message component without a type tag");
            return Ok(MessageComponent::Malformed {
                kind: "unknown".to_string(),
                reason: "missing field `type`".to_string(),
            });
        };

        match decode(&kind, value) {
            Ok(component) => Ok(component),
            Err(e) => {
                warn!(kind = %kind, error = %e, "Malformed message component");
                Ok(MessageComponent::Malformed {
                    kind,
                    reason: e.to_string(),
                })
            }
        }
    }
}

fn decode(kind: &str, value: JsonValue) -> Result<MessageComponent, serde_json::Error> {
    let component = match kind {
        "plain" | "text" => MessageComponent::Text(serde_json::from_value(value)?),
        "image" => MessageComponent::Image(serde_json::from_value(value)?),
        "at" | "mention" => MessageComponent::Mention(serde_json::from_value(value)?),
        "reply" | "quote" => MessageComponent::Reply(serde_json::from_value(value)?),
        "record" | "voice" => MessageComponent::Voice,
        "video" => MessageComponent::Video,
        "share" | "link" => MessageComponent::Link(serde_json::from_value(value)?),
        "location" => MessageComponent::Location(serde_json::from_value(value)?),
        "music" => MessageComponent::Music(serde_json::from_value(value)?),
        "contact" => MessageComponent::Contact(serde_json::from_value(value)?),
        "poke" => MessageComponent::Poke(serde_json::from_value(value)?),
        "forward" | "node" | "nodes" => MessageComponent::Forward,
        "json" => MessageComponent::Card(serde_json::from_value(value)?),
        "rps" => MessageComponent::Gesture(Gesture::Rps),
        "dice" => MessageComponent::Gesture(Gesture::Dice),
        "shake" => MessageComponent::Gesture(Gesture::Shake),
        "file" => MessageComponent::File(serde_json::from_value(value)?),
        "face" => MessageComponent::Emoji {
            id: value.get("id").map(json_to_string).unwrap_or_default(),
        },
        "wechatemoji" => MessageComponent::Sticker,
        _ => MessageComponent::Other {
            kind: kind.to_string(),
        },
    };

    Ok(component)
}

/// Platform ids arrive as either strings or numbers.
pub(crate) fn json_to_string(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(json_to_string(&value))
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    let ts = match value {
        JsonValue::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        JsonValue::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    Ok(ts.filter(|ts| *ts > 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: JsonValue) -> MessageComponent {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_plain_aliases() {
        assert_eq!(
            parse(json!({"type": "Plain", "text": "hi"})),
            MessageComponent::text("hi")
        );
        assert_eq!(
            parse(json!({"type": "text", "text": "hi"})),
            MessageComponent::text("hi")
        );
    }

    #[test]
    fn test_mention_numeric_id() {
        let component = parse(json!({"type": "at", "qq": 10001, "name": "Alice"}));
        assert_eq!(component, MessageComponent::mention("10001", Some("Alice")));
    }

    #[test]
    fn test_everyone_mention() {
        let component = parse(json!({"type": "at", "qq": "ALL"}));
        match component {
            MessageComponent::Mention(m) => assert!(m.is_everyone()),
            other => panic!("expected mention, got {other:?}"),
        }
    }

    #[test]
    fn test_reply_with_nested_chain() {
        let component = parse(json!({
            "type": "reply",
            "sender_id": 7,
            "sender_nickname": "Bob",
            "time": "1700000000",
            "chain": [{"type": "plain", "text": "original"}]
        }));

        let MessageComponent::Reply(reply) = component else {
            panic!("expected reply");
        };
        assert_eq!(reply.sender_id, "7");
        assert_eq!(reply.time, Some(1_700_000_000));
        assert_eq!(reply.chain, vec![MessageComponent::text("original")]);
        assert!(reply.fallback_text.is_none());
    }

    #[test]
    fn test_reply_message_str_fallback() {
        let component = parse(json!({"type": "reply", "message_str": "quoted"}));
        let MessageComponent::Reply(reply) = component else {
            panic!("expected reply");
        };
        assert_eq!(reply.fallback_text.as_deref(), Some("quoted"));
        assert!(reply.chain.is_empty());
    }

    #[test]
    fn test_unknown_kind_is_kept() {
        let component = parse(json!({"type": "FooBar", "whatever": 1}));
        assert_eq!(component, MessageComponent::other("foobar"));
        assert_eq!(component.kind(), "foobar");
    }

    #[test]
    fn test_missing_type_degrades() {
        let component = parse(json!({"text": "hi"}));
        assert!(matches!(
            component,
            MessageComponent::Malformed { ref kind, .. } if kind == "unknown"
        ));
    }

    #[test]
    fn test_bad_payload_degrades_to_malformed() {
        let component = parse(json!({"type": "at", "qq": 1, "name": 5}));
        assert_eq!(component.kind(), "at");
        assert!(matches!(component, MessageComponent::Malformed { .. }));
    }

    #[test]
    fn test_forward_aliases() {
        for tag in ["forward", "node", "nodes"] {
            assert_eq!(parse(json!({"type": tag})), MessageComponent::Forward);
        }
    }

    #[test]
    fn test_image_reference_prefers_file() {
        let image = Image {
            file: Some("file:///tmp/a.png".into()),
            url: Some("https://example.com/a.png".into()),
        };
        assert_eq!(image.reference(), Some("file:///tmp/a.png"));

        let image = Image {
            file: Some(String::new()),
            url: Some("https://example.com/a.png".into()),
        };
        assert_eq!(image.reference(), Some("https://example.com/a.png"));

        assert_eq!(Image::default().reference(), None);
    }

    #[test]
    fn test_face_and_gestures() {
        assert_eq!(
            parse(json!({"type": "face", "id": 14})),
            MessageComponent::Emoji { id: "14".into() }
        );
        assert_eq!(
            parse(json!({"type": "dice"})),
            MessageComponent::Gesture(Gesture::Dice)
        );
    }
}
