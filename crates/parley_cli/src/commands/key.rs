use anyhow::Result;
use parley_core::ConversationKey;

use crate::output;

pub fn handle(platform: &str, chat_id: &str, private: bool) -> Result<()> {
    let key = ConversationKey::new(platform, private, chat_id);
    output::kv("key", &key.encode());
    Ok(())
}
