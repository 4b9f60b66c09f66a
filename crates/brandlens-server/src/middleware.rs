use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation id for one API call. Echoed in the response header and in the
/// `meta.request_id` of every JSON body.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

#[derive(Debug)]
struct Window {
    opened: Instant,
    admitted: usize,
}

/// Budget for `POST /analyze`, where each call fans out to the brand site
/// and every social profile it links. `/health` is never counted.
///
/// Sized from `BRANDLENS_RATE_LIMIT_PER_MINUTE` and shared by all clients.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    current: Arc<Mutex<Window>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            current: Arc::new(Mutex::new(Window {
                opened: Instant::now(),
                admitted: 0,
            })),
        }
    }

    #[must_use]
    pub fn per_minute(max_requests: u32) -> Self {
        Self::new(
            usize::try_from(max_requests).unwrap_or(usize::MAX),
            Duration::from_secs(60),
        )
    }

    /// Counts one analysis against the open window, rolling it over once it
    /// has elapsed. `false` means the budget is spent.
    async fn admit(&self) -> bool {
        let mut current = self.current.lock().await;
        if current.opened.elapsed() >= self.window {
            *current = Window {
                opened: Instant::now(),
                admitted: 0,
            };
        }
        if current.admitted >= self.max_requests {
            return false;
        }
        current.admitted += 1;
        true
    }
}

/// Tags the request with a [`RequestId`] taken from `x-request-id`, or a
/// fresh UUID when the header is missing, blank or not ASCII.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));
    let mut res = next.run(req).await;
    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, val);
    }
    res
}

/// Rejects an analysis with a `rate_limited` [`ApiError`] (429) once the
/// per-minute budget is spent, before any outbound fetch starts.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    if rate_limit.admit().await {
        return next.run(req).await;
    }

    let id = req
        .extensions()
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_default();
    tracing::warn!(
        request_id = %id,
        limit = rate_limit.max_requests,
        "analysis budget exhausted"
    );
    ApiError::new(
        id,
        "rate_limited",
        format!(
            "at most {} analyses per {}s",
            rate_limit.max_requests,
            rate_limit.window.as_secs()
        ),
    )
    .into_response()
}
