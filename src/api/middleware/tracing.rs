//! HTTP request/response tracing middleware.

use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Access log layer: one `INFO` span per request, and the status plus latency
/// in milliseconds when the response is produced.
///
/// Installed outside the request pipeline so that rate-limited, rejected and
/// recovered requests are logged as well.
///
/// # Example Logs
///
/// ```text
/// INFO request{method=POST uri=/v1/shortenings version=HTTP/1.1}: finished processing request latency=12 ms status=201
/// INFO request{method=GET uri=/nZ4LG7 version=HTTP/1.1}: finished processing request latency=3 ms status=301
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}
