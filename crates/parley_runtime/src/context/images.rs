//! Image references from the history window.

use parley_core::HistoryMessage;
use tracing::warn;

use super::history::window;
use super::uri::resolve_image_reference;

/// Collect up to `max_images` image references from the last `window_size`
/// messages, newest message first. Within one message, components keep their
/// order. Never calls the captioner.
pub fn extract_images(
    messages: &[HistoryMessage],
    window_size: usize,
    max_images: usize,
) -> Vec<String> {
    if max_images == 0 {
        return Vec::new();
    }

    window(messages, window_size)
        .iter()
        .rev()
        .flat_map(|message| message.components.iter())
        .filter_map(|component| component.as_image()?.reference())
        .filter_map(|raw| match resolve_image_reference(raw) {
            Ok(resolved) => Some(resolved.to_reference()),
            Err(e) => {
                warn!(image = raw, error = %e, "Skipping unresolvable image reference");
                None
            }
        })
        .take(max_images)
        .collect()
}
