//! Gateway filter trait and the filter-chain continuation.
//!
//! Filters are sorted by their declared [`FilterOrder`] and wrap the backend
//! call like the layers of an onion: pre-logic runs in ascending order, the
//! backend runs once in the middle, post-logic unwinds in descending order.
//!
//! ```text
//! Request  ──► PreAuth ──► Auth ──► RateLimit ──► Transform ──► Logging
//!                  (backend handler runs here)
//! Response ◄── PreAuth ◄── Auth ◄── RateLimit ◄── Transform ◄── Logging
//! ```
//!
//! A filter that returns without calling [`FilterChain::next`] short-circuits
//! the request: no inner filter and no backend runs, while the outer filters
//! still see the response on their way out.

use super::backend::BackendHandler;
use super::error::GatewayResult;
use super::types::{GatewayRequest, GatewayResponse};
use async_trait::async_trait;
use std::sync::Arc;

// ─────────────────────────────────────────────────────────────────────────────
// Filter ordering
// ─────────────────────────────────────────────────────────────────────────────

/// Numeric ordering slot for a filter in the chain.
///
/// The well-known slots below act as guidelines; any `i32` value is accepted
/// so implementors can slot in custom filters between the standard phases.
/// Filters with equal order values are executed in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FilterOrder(pub i32);

impl FilterOrder {
    /// Executes before all authentication logic (e.g. request ID injection).
    pub const PRE_AUTH: FilterOrder = FilterOrder(0);
    /// Authentication filter slot (API key, JWT, OAuth 2.0).
    pub const AUTH: FilterOrder = FilterOrder(100);
    /// Rate-limiting / throttling slot.
    pub const RATE_LIMIT: FilterOrder = FilterOrder(200);
    /// Request / response body transformation slot.
    pub const TRANSFORM: FilterOrder = FilterOrder(300);
    /// Audit logging slot, after all transformations.
    pub const LOGGING: FilterOrder = FilterOrder(400);
    /// Post-processing, metrics recording, etc.
    pub const POST_PROCESS: FilterOrder = FilterOrder(500);
}

impl From<i32> for FilterOrder {
    fn from(value: i32) -> Self {
        FilterOrder(value)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// GatewayFilter trait
// ─────────────────────────────────────────────────────────────────────────────

/// Kernel contract for a single filter in the gateway pipeline.
///
/// Implementations must be `Send + Sync` so one instance can serve concurrent
/// requests.  Per-call state belongs in locals of [`filter`](Self::filter) or
/// in the request context, never in the filter itself.
#[async_trait]
pub trait GatewayFilter: Send + Sync {
    /// Stable, human-readable identifier for this filter (used in logs).
    fn name(&self) -> &str;

    /// Position in the filter chain.  Lower values run first on the way in.
    fn order(&self) -> FilterOrder;

    /// Process `request`.
    ///
    /// A well-behaved filter calls `chain.next(request)` once to proceed
    /// inward and may post-process the returned result.  Returning without
    /// calling it short-circuits the rest of the chain.
    async fn filter(
        &self,
        request: &mut GatewayRequest,
        chain: FilterChain<'_>,
    ) -> GatewayResult<GatewayResponse>;
}

// ─────────────────────────────────────────────────────────────────────────────
// FilterChain
// ─────────────────────────────────────────────────────────────────────────────

/// Single-use, forward-only continuation over the remaining filters and the
/// backend handler.
///
/// A chain borrows the gateway's (already sorted) filter list and backend, so
/// building one per request is a pair of pointer copies.  [`next`](Self::next)
/// consumes the chain, which makes calling it twice a compile error.
pub struct FilterChain<'a> {
    filters: &'a [Arc<dyn GatewayFilter>],
    backend: &'a dyn BackendHandler,
}

impl<'a> FilterChain<'a> {
    /// Create the head continuation.  `filters` must already be in execution
    /// order.
    pub fn new(filters: &'a [Arc<dyn GatewayFilter>], backend: &'a dyn BackendHandler) -> Self {
        Self { filters, backend }
    }

    /// Number of filters still ahead of the backend.
    pub fn remaining(&self) -> usize {
        self.filters.len()
    }

    /// Advance to the next filter or, when none remain, to the backend.
    ///
    /// Failures from filters or the backend are returned as-is.
    pub async fn next(self, request: &mut GatewayRequest) -> GatewayResult<GatewayResponse> {
        match self.filters.split_first() {
            Some((head, rest)) => {
                let rest = FilterChain {
                    filters: rest,
                    backend: self.backend,
                };
                head.filter(request, rest).await
            }
            None => self.backend.handle(request).await,
        }
    }
}

impl std::fmt::Debug for FilterChain<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterChain")
            .field("remaining", &self.filters.iter().map(|x| x.name()).collect::<Vec<_>>())
            .finish()
    }
}
