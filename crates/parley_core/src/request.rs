use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::persona::DialogTurn;

/// The payload handed to the model invocation entrypoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptRequest {
    /// Transcription of the triggering message only.
    pub user_prompt: String,
    /// Persona, environment, history and image notes.
    pub system_prompt: String,
    pub seed_dialogs: Vec<DialogTurn>,
    /// Local paths or remote urls, newest first.
    pub image_references: Vec<String>,
    /// Whether the invocation should attach its tool manager.
    pub use_tools: bool,
}

/// Per-conversation model call state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallStatus {
    pub in_progress: bool,
    pub last_call_time: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_request_serialization() {
        let request = PromptRequest {
            user_prompt: "hi".into(),
            system_prompt: "be nice".into(),
            seed_dialogs: vec![DialogTurn::user("hello")],
            image_references: vec!["/tmp/a.png".into()],
            use_tools: true,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["user_prompt"], "hi");
        assert_eq!(json["image_references"][0], "/tmp/a.png");
        assert_eq!(json["seed_dialogs"][0]["role"], "user");
        assert_eq!(json["use_tools"], true);
    }
}
