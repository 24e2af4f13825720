use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::AppState;

/// Fixed-window request counter keyed by arbitrary strings.
///
/// State lives in process memory, so limits apply per instance.
#[derive(Clone)]
pub struct RateLimitState {
    max_requests: u32,
    window: Duration,
    windows: Arc<Mutex<HashMap<String, Window>>>,
}

struct Window {
    count: u32,
    started: Instant,
}

impl RateLimitState {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// `Ok(remaining)` while under the limit, otherwise `Err(retry_after)`.
    pub async fn check(&self, key: &str) -> Result<u32, Duration> {
        let mut windows = self.windows.lock().await;
        let now = Instant::now();

        let current = windows.entry(key.to_string()).or_insert(Window {
            count: 0,
            started: now,
        });

        if now.duration_since(current.started) > self.window {
            current.count = 0;
            current.started = now;
        }

        if current.count >= self.max_requests {
            return Err(self
                .window
                .saturating_sub(now.duration_since(current.started)));
        }

        current.count += 1;
        Ok(self.max_requests - current.count)
    }

    /// Forgets keys whose window ended a while ago. Returns how many were removed.
    pub async fn cleanup(&self) -> usize {
        let mut windows = self.windows.lock().await;
        let now = Instant::now();
        let keep_for = self.window * 2;

        let before = windows.len();
        windows.retain(|_, w| now.duration_since(w.started) < keep_for);
        before - windows.len()
    }
}

/// Limits register/login attempts per client IP and path.
pub async fn rate_limit_auth(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = addr.ip().to_string();
    let path = req.uri().path().to_string();
    let key = format!("{}:{}", ip, path);

    match state.rate_limiter.check(&key).await {
        Ok(remaining) => {
            tracing::debug!(ip = %ip, path = %path, remaining, "Rate limit check passed");
            Ok(next.run(req).await)
        }
        Err(retry_after) => {
            tracing::warn!(
                ip = %ip,
                path = %path,
                retry_after_secs = retry_after.as_secs(),
                "Rate limit exceeded"
            );
            Err(AppError::RateLimited)
        }
    }
}
