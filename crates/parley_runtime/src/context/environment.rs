//! Environment description: who the bot is and where it is talking.

use parley_core::ConversationContext;
use tracing::warn;

use crate::collaborators::EnvironmentLookup;
use crate::config::PipelineConfig;

const REPLY_FORMAT_GUIDANCE: &str =
    "(If you want to reply to someone, do not use a format like [At:id(nickname)])";

const READ_AIR_INSTRUCTION: &str = "You just received a new message. Your reaction:\n(If you want to send a message, output its content directly; if you choose to ignore it, output <NO_RESPONSE>)";

const REPLY_INSTRUCTION: &str =
    "You just received a new message and decided to reply (your output will be sent as a message)";

/// Identity line plus the private counterpart or group being talked in.
///
/// Lookups are best effort; a failed lookup only drops the name.
pub async fn describe_environment(
    ctx: &ConversationContext,
    chat_id: &str,
    lookup: &dyn EnvironmentLookup,
) -> String {
    let mut text = format!(
        "\n\nYou are browsing a chat app; your id there is {}",
        ctx.self_id
    );

    match lookup.bot_display_name().await {
        Ok(Some(name)) if !name.is_empty() => {
            text.push_str(&format!(", and your username is {name}"));
        }
        Ok(_) => {}
        Err(e) => warn!(error = %e, "Bot name lookup failed"),
    }

    if ctx.is_private {
        let sender = &ctx.message.sender;
        let counterpart = if sender.display_name.is_empty() {
            format!("the person with ID {}", sender.id)
        } else {
            sender.display_name.clone()
        };
        text.push_str(&format!(", and you are in a private chat with {counterpart}."));
    } else {
        let name = match lookup.group_display_name(chat_id).await {
            Ok(name) => name.filter(|n| !n.is_empty()),
            Err(e) => {
                warn!(group = chat_id, error = %e, "Group name lookup failed");
                None
            }
        };
        match name {
            Some(name) => {
                text.push_str(&format!(", and you are in the group chat {name}({chat_id})."))
            }
            None => text.push_str(&format!(", and you are in the group chat {chat_id}.")),
        }
    }

    text
}

/// Behavioural guidance and the closing instruction.
pub fn guidance_lines(config: &PipelineConfig) -> String {
    let closing = if config.read_air {
        READ_AIR_INSTRUCTION
    } else {
        REPLY_INSTRUCTION
    };

    format!(
        "\n(In the chat history your username is replaced by {})\n{REPLY_FORMAT_GUIDANCE}\n\n{closing}",
        config.self_alias
    )
}
