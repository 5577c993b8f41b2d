//! Prompt context assembly.
//!
//! Split into focused submodules:
//! - **transcribe**: message components to one descriptive line
//! - **history**: bounded history window rendered as text blocks
//! - **images**: image references collected from the history window
//! - **persona**: persona resolution and system prompt seeding
//! - **environment**: identity, counterpart and behavioural guidance text
//! - **uri**: `file:` URI normalization shared by transcription and images

mod environment;
mod history;
mod images;
mod persona;
mod transcribe;
mod uri;

pub use environment::{describe_environment, guidance_lines};
pub use history::{HistoryFormatter, NO_HISTORY};
pub use images::extract_images;
pub use persona::{render_persona, PersonaResolver, STYLE_INSTRUCTION};
pub use transcribe::{MessageTranscriber, RenderError, UNRENDERABLE};
pub use uri::{resolve_image_reference, ImageRef, ImageRefError};

