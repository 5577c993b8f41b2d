use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogRole {
    User,
    Assistant,
}

/// One exchange of a persona's seed dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogTurn {
    pub role: DialogRole,
    pub content: String,
}

impl DialogTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: DialogRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: DialogRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Persona {
    pub name: String,
    /// Base system prompt, used verbatim.
    pub prompt: String,
    /// Example dialogs whose tone the model should imitate.
    #[serde(alias = "mood_imitation_dialogs", alias = "_mood_imitation_dialogs_processed")]
    pub style_examples: Option<String>,
    /// Exchanges prepended to the model context, kept out of the system prompt.
    #[serde(alias = "begin_dialogs", alias = "_begin_dialogs_processed")]
    pub seed_dialogs: Vec<DialogTurn>,
}

impl Persona {
    pub fn new(name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_style_examples(mut self, examples: impl Into<String>) -> Self {
        self.style_examples = Some(examples.into());
        self
    }

    pub fn with_seed_dialog(mut self, turn: DialogTurn) -> Self {
        self.seed_dialogs.push(turn);
        self
    }

    pub fn style_examples(&self) -> Option<&str> {
        self.style_examples.as_deref().filter(|s| !s.trim().is_empty())
    }
}
