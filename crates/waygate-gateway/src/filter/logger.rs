//! Structured access-logging filter.
//!
//! Emits `tracing` events on the way in and on the way out, recording method,
//! path, request id, matched route, response status and latency.  Because
//! the filter wraps the rest of the chain, the latency covers every inner
//! filter plus the backend.

use async_trait::async_trait;
use std::time::Instant;
use tracing::{error, info};
use waygate_kernel::gateway::{
    FilterChain, FilterOrder, GatewayFilter, GatewayRequest, GatewayResponse, GatewayResult,
};

/// Response header carrying the measured latency in milliseconds.
const LATENCY_HEADER: &str = "x-response-time-ms";

/// Records inbound requests and outbound responses.
pub struct LoggingFilter {
    order: FilterOrder,
}

impl Default for LoggingFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingFilter {
    pub fn new() -> Self {
        Self {
            order: FilterOrder::LOGGING,
        }
    }

    /// Run at a custom slot, e.g. [`FilterOrder::PRE_AUTH`] to also log
    /// requests rejected by authentication.
    pub fn with_order(mut self, order: FilterOrder) -> Self {
        self.order = order;
        self
    }
}

#[async_trait]
impl GatewayFilter for LoggingFilter {
    fn name(&self) -> &str {
        "access-log"
    }

    fn order(&self) -> FilterOrder {
        self.order
    }

    async fn filter(
        &self,
        request: &mut GatewayRequest,
        chain: FilterChain<'_>,
    ) -> GatewayResult<GatewayResponse> {
        info!(
            request_id = %request.id,
            method     = request.method.as_str(),
            path       = %request.path,
            route      = ?request.context.route_id,
            "→ inbound request"
        );
        let started = Instant::now();

        let result = chain.next(request).await;
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(resp) => {
                if resp.status >= 500 {
                    error!(
                        request_id = %request.id,
                        path       = %request.path,
                        status     = resp.status,
                        latency_ms,
                        "← upstream error response"
                    );
                } else {
                    info!(
                        request_id = %request.id,
                        path       = %request.path,
                        status     = resp.status,
                        latency_ms,
                        "← outbound response"
                    );
                }
                Ok(resp.with_header(LATENCY_HEADER, latency_ms.to_string()))
            }
            Err(err) => {
                error!(
                    request_id = %request.id,
                    path       = %request.path,
                    error      = %err,
                    latency_ms,
                    "← request failed"
                );
                Err(err)
            }
        }
    }
}
