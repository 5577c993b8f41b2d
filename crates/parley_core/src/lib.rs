pub mod component;
pub mod context;
pub mod error;
pub mod key;
pub mod message;
pub mod persona;
pub mod request;

pub use component::{
    Contact, File, Gesture, Image, Mention, MessageComponent, Poke, Reply, SharedCard,
    StructuredCard, Text,
};
pub use context::ConversationContext;
pub use error::{ParleyError, Result};
pub use key::{ChatKind, ConversationKey};
pub use message::{HistoryMessage, IncomingMessage, MessageId, Sender};
pub use persona::{DialogRole, DialogTurn, Persona};
pub use request::{CallStatus, PromptRequest};
