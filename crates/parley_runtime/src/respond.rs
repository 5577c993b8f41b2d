//! Guarded model invocation.

use std::time::Instant;

use parley_core::ConversationContext;
use parley_observability::{invoke_span, record_duration, record_error};
use tracing::{debug, Instrument};

use crate::builder::PromptBuilder;
use crate::call_state::CallStateTracker;
use crate::collaborators::{ModelInvoker, ModelResponse};
use crate::config::PipelineConfig;
use crate::error::{Result, RuntimeError};

/// Build a prompt for `ctx` and hand it to `invoker`, one call per conversation at a time.
///
/// Refuses with [`RuntimeError::CallInProgress`] while another call for the
/// same conversation is running. The in-progress flag is cleared when this
/// future completes, fails, or is dropped.
pub async fn respond(
    builder: &PromptBuilder,
    tracker: &CallStateTracker,
    invoker: &dyn ModelInvoker,
    ctx: &ConversationContext,
    config: &PipelineConfig,
) -> Result<ModelResponse> {
    let key = ctx.conversation_key()?;

    let Some(_guard) = tracker.begin(&key) else {
        debug!(conversation = %key, "Call already in progress, skipping");
        return Err(RuntimeError::CallInProgress(key.encode()));
    };

    let request = builder.build(ctx, config).await?;

    let span = invoke_span!(key);
    async move {
        let start = Instant::now();
        let result = invoker.invoke(request).await;
        record_duration("duration_ms", start.elapsed());

        result.map_err(|e| {
            record_error(&e);
            RuntimeError::InvocationFailed(format!("{e:#}"))
        })
    }
    .instrument(span)
    .await
}
