//! API-key authentication filter.
//!
//! Accepts requests that carry a valid API key in either:
//! - `X-Api-Key: <key>` header
//! - `Authorization: Bearer <key>` header
//!
//! Requests without a valid key are answered with `401 Unauthorized` and never
//! reach the backend.

use async_trait::async_trait;
use std::collections::HashSet;
use tracing::warn;
use waygate_kernel::gateway::{
    FilterChain, FilterOrder, GatewayFilter, GatewayRequest, GatewayResponse, GatewayResult,
};

/// Request attribute holding the authenticated principal.
pub const AUTH_PRINCIPAL_ATTR: &str = "auth.principal";

/// Authentication filter that enforces API key validation.
pub struct ApiKeyFilter {
    /// Set of valid API keys.
    valid_keys: HashSet<String>,
}

impl ApiKeyFilter {
    /// Build the filter from a list of valid keys.
    pub fn new(valid_keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            valid_keys: valid_keys.into_iter().map(Into::into).collect(),
        }
    }

    fn extract_key(request: &GatewayRequest) -> Option<&str> {
        // Check `X-Api-Key` first (simpler, explicit).
        request.header("x-api-key").or_else(|| {
            request
                .header("authorization")
                .and_then(|auth| auth.strip_prefix("Bearer "))
        })
    }
}

#[async_trait]
impl GatewayFilter for ApiKeyFilter {
    fn name(&self) -> &str {
        "api-key-auth"
    }

    fn order(&self) -> FilterOrder {
        FilterOrder::AUTH
    }

    async fn filter(
        &self,
        request: &mut GatewayRequest,
        chain: FilterChain<'_>,
    ) -> GatewayResult<GatewayResponse> {
        let principal = match Self::extract_key(request) {
            Some(key) if self.valid_keys.contains(key) => key.to_string(),
            Some(_) => {
                warn!(request_id = %request.id, path = %request.path, "rejected request: invalid API key");
                return Ok(GatewayResponse::unauthorized("Invalid API key"));
            }
            None => {
                warn!(request_id = %request.id, path = %request.path, "rejected request: missing API key");
                return Ok(GatewayResponse::unauthorized(
                    "Missing authentication credentials",
                ));
            }
        };

        request.set_attr(AUTH_PRINCIPAL_ATTR, &principal);
        chain.next(request).await
    }
}
