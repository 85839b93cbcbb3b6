//! Per-caller token-bucket throttling.
//!
//! Buckets are keyed by the authenticated principal when [`ApiKeyFilter`]
//! ran earlier in the chain, else by the forwarded client address.  Tokens
//! accrue continuously at the configured rate up to the burst size; a caller
//! with an empty bucket gets `429 Too Many Requests` and never reaches the
//! backend.
//!
//! [`ApiKeyFilter`]: super::ApiKeyFilter

use super::auth::AUTH_PRINCIPAL_ATTR;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use waygate_kernel::gateway::{
    FilterChain, FilterOrder, GatewayFilter, GatewayRequest, GatewayResponse, GatewayResult,
};

/// Wait advertised when the refill rate is zero.
const FALLBACK_RETRY: Duration = Duration::from_secs(1);

/// Minimum spacing between time-triggered prunes of idle buckets.
const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

/// Bucket count that triggers a prune regardless of [`PRUNE_INTERVAL`].
const PRUNE_HIGH_WATER: usize = 1024;

#[derive(Debug, Clone, Copy)]
struct Quota {
    per_second: f64,
    burst: f64,
}

struct Bucket {
    available: f64,
    stamped: Instant,
}

impl Bucket {
    fn full(quota: Quota, now: Instant) -> Self {
        Self {
            available: quota.burst,
            stamped: now,
        }
    }

    /// Whether the bucket would be back at `burst` by `now`.  Such a bucket
    /// is indistinguishable from a fresh one and can be dropped.
    fn is_idle(&self, quota: Quota, now: Instant) -> bool {
        let earned = now.saturating_duration_since(self.stamped).as_secs_f64() * quota.per_second;
        self.available + earned >= quota.burst
    }

    /// Spend one token at `now`, or report how long until one accrues.
    fn take(&mut self, quota: Quota, now: Instant) -> Result<(), Duration> {
        let earned = now.saturating_duration_since(self.stamped).as_secs_f64() * quota.per_second;
        self.available = (self.available + earned).min(quota.burst);
        self.stamped = now;

        if self.available >= 1.0 {
            self.available -= 1.0;
            return Ok(());
        }
        if quota.per_second > 0.0 {
            Err(Duration::from_secs_f64((1.0 - self.available) / quota.per_second))
        } else {
            Err(FALLBACK_RETRY)
        }
    }
}

/// Throttles each caller to `rate_per_second` with bursts of up to
/// `burst_capacity` requests.
pub struct RateLimitFilter {
    quota: Quota,
    limit: u32,
    buckets: Mutex<BucketMap>,
}

struct BucketMap {
    by_caller: HashMap<String, Bucket>,
    last_prune: Instant,
    next_prune_len: usize,
}

impl BucketMap {
    fn prune(&mut self, quota: Quota, now: Instant) -> usize {
        let before = self.by_caller.len();
        self.by_caller.retain(|_, bucket| !bucket.is_idle(quota, now));
        self.last_prune = now;
        self.next_prune_len = PRUNE_HIGH_WATER.max(self.by_caller.len() * 2);
        before - self.by_caller.len()
    }

    fn prune_due(&self, now: Instant) -> bool {
        self.by_caller.len() >= self.next_prune_len
            || now.saturating_duration_since(self.last_prune) >= PRUNE_INTERVAL
    }
}

impl RateLimitFilter {
    pub fn new(rate_per_second: u32, burst_capacity: u32) -> Self {
        Self {
            quota: Quota {
                per_second: f64::from(rate_per_second),
                burst: f64::from(burst_capacity),
            },
            limit: burst_capacity,
            buckets: Mutex::new(BucketMap {
                by_caller: HashMap::new(),
                last_prune: Instant::now(),
                next_prune_len: PRUNE_HIGH_WATER,
            }),
        }
    }

    fn caller_id(request: &GatewayRequest) -> String {
        if let Some(principal) = request.get_attr::<String>(AUTH_PRINCIPAL_ATTR) {
            return principal;
        }
        request
            .header("x-forwarded-for")
            .or_else(|| request.header("x-real-ip"))
            .unwrap_or("anonymous")
            .to_string()
    }

    /// Drop every bucket that has refilled to its burst size by `now`.
    /// Returns how many were dropped.
    pub async fn prune(&self, now: Instant) -> usize {
        self.buckets.lock().await.prune(self.quota, now)
    }

    /// Number of callers currently tracked.
    pub async fn tracked_callers(&self) -> usize {
        self.buckets.lock().await.by_caller.len()
    }

    async fn admit(&self, caller: &str, now: Instant) -> Result<(), Duration> {
        let mut map = self.buckets.lock().await;
        if let Some(bucket) = map.by_caller.get_mut(caller) {
            return bucket.take(self.quota, now);
        }

        if map.prune_due(now) {
            let dropped = map.prune(self.quota, now);
            debug!(dropped, tracked = map.by_caller.len(), "pruned idle rate-limit buckets");
        }
        let mut bucket = Bucket::full(self.quota, now);
        let outcome = bucket.take(self.quota, now);
        map.by_caller.insert(caller.to_string(), bucket);
        outcome
    }
}

/// Whole seconds for a `Retry-After` header, never below one.
fn retry_after_secs(wait: Duration) -> u64 {
    let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
    secs.max(1)
}

#[async_trait]
impl GatewayFilter for RateLimitFilter {
    fn name(&self) -> &str {
        "rate-limit"
    }

    fn order(&self) -> FilterOrder {
        FilterOrder::RATE_LIMIT
    }

    async fn filter(
        &self,
        request: &mut GatewayRequest,
        chain: FilterChain<'_>,
    ) -> GatewayResult<GatewayResponse> {
        let caller = Self::caller_id(request);
        if let Err(wait) = self.admit(&caller, Instant::now()).await {
            let secs = retry_after_secs(wait);
            warn!(
                request_id = %request.id,
                caller = %caller,
                retry_after = secs,
                "caller throttled"
            );
            return Ok(GatewayResponse::new(429)
                .with_header("retry-after", secs.to_string())
                .with_body("Too Many Requests"));
        }

        let limit = self.limit.to_string();
        chain
            .next(request)
            .await
            .map(|resp| resp.with_header("x-ratelimit-limit", limit))
    }
}
