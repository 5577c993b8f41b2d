//! Span helpers

/// Create the span a prompt build runs in
///
/// `history.messages`, `images` and `duration_ms` start empty and are
/// recorded by the builder as it goes.
///
/// # Example
///
/// ```rust
/// use parley_observability::build_span;
///
/// let span = build_span!("qq:group:1000");
/// let _guard = span.enter();
/// ```
#[macro_export]
macro_rules! build_span {
    ($conversation:expr) => {
        $crate::__tracing::info_span!(
            "prompt.build",
            conversation = %$conversation,
            history.messages = $crate::__tracing::field::Empty,
            images = $crate::__tracing::field::Empty,
            duration_ms = $crate::__tracing::field::Empty,
        )
    };
}

/// Create the span a guarded model call runs in
#[macro_export]
macro_rules! invoke_span {
    ($conversation:expr) => {
        $crate::__tracing::info_span!(
            "model.invoke",
            conversation = %$conversation,
            error = $crate::__tracing::field::Empty,
            error.message = $crate::__tracing::field::Empty,
            duration_ms = $crate::__tracing::field::Empty,
        )
    };
}

/// Record an error on the current span
///
/// Sets the span's `error` and `error.message` fields (when declared) and
/// emits one error event.
pub fn record_error<E: std::fmt::Display + ?Sized>(error: &E) {
    let span = tracing::Span::current();
    span.record("error", true);
    span.record("error.message", error.to_string());
    tracing::error!(error = %error, "Operation failed");
}

/// Record latency/duration on the current span
///
/// ```rust
/// use parley_observability::record_duration;
/// use std::time::Instant;
///
/// let start = Instant::now();
/// record_duration("duration_ms", start.elapsed());
/// ```
pub fn record_duration(key: &str, duration: std::time::Duration) {
    let span = tracing::Span::current();
    span.record(key, duration.as_millis() as u64);
}
