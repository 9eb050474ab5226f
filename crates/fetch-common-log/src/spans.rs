//! Request spans and timing.

use std::future::Future;
use tracing::{debug_span, Instrument, Span};

/// Create a span for one outgoing HTTP request.
pub fn request_span(method: &str, url: &str) -> Span {
    debug_span!("http_request", method = %method, url = %url, status = tracing::field::Empty)
}

/// Instrument a future with a span.
pub fn instrument_future<F: Future>(future: F, span: Span) -> impl Future<Output = F::Output> {
    future.instrument(span)
}

/// Record a response status on a request span.
pub fn record_status(span: &Span, status: u16) {
    span.record("status", status);
}

/// Measures how long an operation took and logs it at debug level on finish.
pub struct Timer {
    start: std::time::Instant,
    operation: &'static str,
}

impl Timer {
    /// Start a new timer.
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: std::time::Instant::now(),
            operation,
        }
    }

    /// Time elapsed since [`Timer::start`].
    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }

    /// Complete the timer and record duration.
    pub fn finish(self) {
        tracing::debug!(
            operation = %self.operation,
            duration_ms = %self.elapsed().as_millis(),
            "operation completed"
        );
    }
}
