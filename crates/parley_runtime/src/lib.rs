pub mod builder;
pub mod call_state;
pub mod collaborators;
pub mod config;
pub mod context;
pub mod error;
pub mod in_memory;
pub mod respond;

pub use builder::PromptBuilder;
pub use call_state::{CallGuard, CallStateTracker};
pub use collaborators::{
    CollaboratorResult, EnvironmentLookup, HistoryStore, ImageCaptioner, ModelInvoker,
    ModelResponse, PersonaSource,
};
pub use config::PipelineConfig;
pub use context::{HistoryFormatter, MessageTranscriber, PersonaResolver};
pub use error::{Result, RuntimeError};
pub use respond::respond;
