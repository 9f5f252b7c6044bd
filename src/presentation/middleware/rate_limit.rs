use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::Json;
use axum::extract::{Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::presentation::handlers::ErrorResponse;

/// Counter backend for the fixed-window limiter. Injected at startup so
/// deployments and tests can swap the backing store.
pub trait CounterStore: Send + Sync {
    /// Records a hit for `key`. Returns the hit count of the current
    /// window and the seconds remaining until it resets.
    fn hit(&self, key: &str) -> (u32, u64);
}

/// Fixed-window counters in process memory. Lapsed windows are pruned on
/// every hit, which bounds the map without a background task.
pub struct FixedWindowCounter {
    window: Duration,
    windows: Mutex<HashMap<String, (Instant, u32)>>,
}

impl FixedWindowCounter {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }
}

impl CounterStore for FixedWindowCounter {
    fn hit(&self, key: &str) -> (u32, u64) {
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        let window = self.window;
        windows.retain(|_, (start, _)| now.duration_since(*start) < window);

        let entry = windows.entry(key.to_string()).or_insert((now, 0));
        entry.1 += 1;
        let remaining = window.saturating_sub(now.duration_since(entry.0));
        (entry.1, remaining.as_secs().max(1))
    }
}

#[derive(Clone)]
pub struct RateLimit {
    pub max_requests: u32,
    pub counters: Arc<dyn CounterStore>,
}

impl RateLimit {
    pub fn new(max_requests: u32, counters: Arc<dyn CounterStore>) -> Self {
        Self {
            max_requests,
            counters,
        }
    }
}

pub async fn rate_limit_middleware(
    State(limit): State<RateLimit>,
    request: Request,
    next: Next,
) -> Response {
    let key = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("anonymous")
        .to_string();

    let (count, retry_after_secs) = limit.counters.hit(&key);
    if count > limit.max_requests {
        tracing::warn!(key = %key, count = count, "Rate limit exceeded");
        let mut response = (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorResponse {
                error: "rate limit exceeded".to_string(),
            }),
        )
            .into_response();
        if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
        return response;
    }

    next.run(request).await
}
