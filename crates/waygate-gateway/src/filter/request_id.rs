//! Request-id propagation filter.
//!
//! Adopts the caller's `X-Request-Id` as the request id when one is present
//! and echoes the id back on the response, so a caller can correlate its
//! request with gateway logs.

use async_trait::async_trait;
use waygate_kernel::gateway::{
    FilterChain, FilterOrder, GatewayFilter, GatewayRequest, GatewayResponse, GatewayResult,
};

/// Header used to carry the request id in both directions.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Default)]
pub struct RequestIdFilter;

impl RequestIdFilter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl GatewayFilter for RequestIdFilter {
    fn name(&self) -> &str {
        "request-id"
    }

    fn order(&self) -> FilterOrder {
        FilterOrder::PRE_AUTH
    }

    async fn filter(
        &self,
        request: &mut GatewayRequest,
        chain: FilterChain<'_>,
    ) -> GatewayResult<GatewayResponse> {
        let incoming = request
            .header(REQUEST_ID_HEADER)
            .filter(|id| !id.trim().is_empty())
            .map(str::to_string);
        if let Some(id) = incoming {
            request.id = id;
        }
        let id = request.id.clone();
        chain
            .next(request)
            .await
            .map(|resp| resp.with_header(REQUEST_ID_HEADER, id))
    }
}
