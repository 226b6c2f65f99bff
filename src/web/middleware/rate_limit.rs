//! Per-client rate limiting.
//!
//! Two quotas are kept per client IP: a tight one for credential endpoints
//! (`/login`, `/forgot-password`) and a wider one for the whole API.

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::{net::SocketAddr, num::NonZeroU32, sync::Arc, time::Duration};

use crate::web::error::ApiError;

/// Per-client limiter, keyed by client address.
pub type ClientRateLimiter = DefaultKeyedRateLimiter<String>;

/// How often fully replenished clients are forgotten.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// Which quota a request is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    /// Login and password-reset requests.
    Credential,
    /// Any API request.
    Api,
}

/// Shared rate-limit state.
#[derive(Clone)]
pub struct RateLimitState {
    credential_limiter: Arc<ClientRateLimiter>,
    api_limiter: Arc<ClientRateLimiter>,
}

fn per_minute_quota(per_minute: u32) -> Quota {
    Quota::per_minute(NonZeroU32::new(per_minute).unwrap_or(NonZeroU32::MIN))
}

impl RateLimitState {
    /// Create a state with per-minute quotas for each kind.
    pub fn new(credential_per_minute: u32, api_per_minute: u32) -> Self {
        Self {
            credential_limiter: Arc::new(RateLimiter::keyed(per_minute_quota(
                credential_per_minute,
            ))),
            api_limiter: Arc::new(RateLimiter::keyed(per_minute_quota(api_per_minute))),
        }
    }

    fn limiter(&self, kind: LimitKind) -> &ClientRateLimiter {
        match kind {
            LimitKind::Credential => &self.credential_limiter,
            LimitKind::Api => &self.api_limiter,
        }
    }

    /// Consume one request from `client`'s quota. Returns false when exhausted.
    pub fn check(&self, kind: LimitKind, client: &str) -> bool {
        self.limiter(kind).check_key(&client.to_string()).is_ok()
    }

    /// Forget clients whose quota has fully replenished. Clients still
    /// inside their window keep their state.
    pub fn cleanup(&self) {
        for limiter in [&self.credential_limiter, &self.api_limiter] {
            limiter.retain_recent();
            limiter.shrink_to_fit();
        }
    }

    /// Spawn the periodic cleanup task.
    pub fn start_cleanup_task(self: Arc<Self>) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
            interval.tick().await;
            loop {
                interval.tick().await;
                self.cleanup();
            }
        });
    }
}

/// Best-effort client address: proxy headers first, then the socket peer.
fn client_ip(req: &Request<Body>) -> String {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    if let Some(first) = header("X-Forwarded-For").and_then(|v| v.split(',').next()) {
        return first.trim().to_string();
    }
    if let Some(real_ip) = header("X-Real-IP") {
        return real_ip.to_string();
    }
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

async fn enforce(
    state: &RateLimitState,
    kind: LimitKind,
    req: Request<Body>,
    next: Next,
) -> Response {
    let ip = client_ip(&req);
    if !state.check(kind, &ip) {
        tracing::warn!(ip = %ip, kind = ?kind, "Rate limit exceeded");
        return ApiError::too_many_requests("Too many requests. Please try again later.")
            .into_response();
    }
    next.run(req).await
}

/// Rate limiting middleware for credential endpoints.
pub async fn credential_rate_limit(
    state: Arc<RateLimitState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    enforce(&state, LimitKind::Credential, req, next).await
}

/// Rate limiting middleware for the whole API.
pub async fn api_rate_limit(state: Arc<RateLimitState>, req: Request<Body>, next: Next) -> Response {
    enforce(&state, LimitKind::Api, req, next).await
}
