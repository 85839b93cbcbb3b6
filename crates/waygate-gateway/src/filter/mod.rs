//! Filter module.

mod auth;
mod logger;
mod rate_limit;
mod request_id;

pub use auth::{ApiKeyFilter, AUTH_PRINCIPAL_ATTR};
pub use logger::LoggingFilter;
pub use rate_limit::RateLimitFilter;
pub use request_id::{RequestIdFilter, REQUEST_ID_HEADER};

use std::sync::Arc;
use waygate_kernel::gateway::{BackendHandler, FilterChain, GatewayFilter};

/// Ordered list of shared filters, fixed when the gateway is built.
///
/// Filters are sorted by [`FilterOrder`](waygate_kernel::gateway::FilterOrder)
/// in ascending order (lowest value runs first on the request path).  The
/// sort is stable, so equal orders keep registration order.  Each request
/// gets its own [`FilterChain`] over this list.
#[derive(Clone, Default)]
pub struct FilterPipeline {
    filters: Vec<Arc<dyn GatewayFilter>>,
}

impl FilterPipeline {
    /// Build a pipeline from a list of filters, sorted by their declared order.
    pub fn new(mut filters: Vec<Arc<dyn GatewayFilter>>) -> Self {
        filters.sort_by_key(|f| f.order());
        Self { filters }
    }

    /// Fresh head continuation for one request.
    pub fn chain<'a>(&'a self, backend: &'a dyn BackendHandler) -> FilterChain<'a> {
        FilterChain::new(&self.filters, backend)
    }

    /// Filter names in execution order.
    pub fn names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl std::fmt::Debug for FilterPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterPipeline")
            .field("filters", &self.names())
            .finish()
    }
}
