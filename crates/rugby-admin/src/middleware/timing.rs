//! Request timing.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::{Duration, Instant};

/// Requests slower than this are logged as warnings.
pub const SLOW_REQUEST: Duration = Duration::from_millis(100);

/// Logs method, path, status and duration of every request.
///
/// Slow requests (exports over large result sets, mostly) log at `warn`,
/// the rest at `debug`.
///
/// # Example
///
/// ```ignore
/// let app = Router::new()
///     .route("/matches", get(list))
///     .layer(axum::middleware::from_fn(timing_layer));
/// ```
pub async fn timing_layer(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let elapsed = start.elapsed();
    let status = response.status().as_u16();
    let duration_ms = elapsed.as_millis() as u64;
    if elapsed > SLOW_REQUEST {
        tracing::warn!(%method, %path, status, duration_ms, "slow request");
    } else {
        tracing::debug!(%method, %path, status, duration_ms, "request");
    }

    response
}
