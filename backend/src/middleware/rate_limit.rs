//! Fixed-window rate limiting
//!
//! Counts requests per client IP within a fixed window (default 100
//! requests / 15 minutes). The window resets as a whole rather than
//! sliding, matching the limiter the product originally shipped with.

use std::{
    collections::HashMap,
    net::{IpAddr, SocketAddr},
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{error::AppError, AppState};

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

/// Shared fixed-window counter keyed by client IP
#[derive(Clone, Debug)]
pub struct RateLimiter {
    window: Duration,
    limit: u32,
    clients: Arc<Mutex<HashMap<IpAddr, Window>>>,
}

impl RateLimiter {
    pub fn new(window: Duration, limit: u32) -> Self {
        Self {
            window,
            limit,
            clients: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Register one request for `ip`; returns false once the client has
    /// exhausted the current window.
    pub fn allow(&self, ip: IpAddr) -> bool {
        self.allow_at(ip, Instant::now())
    }

    fn allow_at(&self, ip: IpAddr, now: Instant) -> bool {
        let mut clients = self.clients.lock().expect("rate limiter lock");
        let window = clients.entry(ip).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(window.started) >= self.window {
            window.started = now;
            window.count = 0;
        }
        window.count += 1;
        window.count <= self.limit
    }
}

/// Axum middleware applying the limiter from application state
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    if !state.rate_limiter.allow(addr.ip()) {
        return AppError::RateLimited.into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::from([127, 0, 0, last])
    }

    #[test]
    fn allows_up_to_the_limit() {
        let limiter = RateLimiter::new(Duration::from_secs(900), 3);
        let now = Instant::now();
        assert!(limiter.allow_at(ip(1), now));
        assert!(limiter.allow_at(ip(1), now));
        assert!(limiter.allow_at(ip(1), now));
        assert!(!limiter.allow_at(ip(1), now));
    }

    #[test]
    fn clients_are_counted_separately() {
        let limiter = RateLimiter::new(Duration::from_secs(900), 1);
        let now = Instant::now();
        assert!(limiter.allow_at(ip(1), now));
        assert!(limiter.allow_at(ip(2), now));
        assert!(!limiter.allow_at(ip(1), now));
    }

    #[test]
    fn window_resets_after_expiry() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        let start = Instant::now();
        assert!(limiter.allow_at(ip(1), start));
        assert!(!limiter.allow_at(ip(1), start));
        assert!(limiter.allow_at(ip(1), start + Duration::from_secs(61)));
    }
}
