//! Request dispatcher.
//!
//! [`ApiGateway`] is the composition root: it owns the route table, the
//! sorted filter pipeline and the backend handler, all frozen at
//! [`build`](ApiGatewayBuilder::build) time.  Every call to
//! [`handle`](ApiGateway::handle):
//!
//! 1. selects a route (`404` straight away on a miss; no filter or backend
//!    runs),
//! 2. writes `route.id`, `route.targetUrl` and `route.pathParams` into the
//!    request context,
//! 3. runs a fresh filter chain around the backend and returns its result
//!    unchanged.

use crate::filter::FilterPipeline;
use crate::router::RouteTable;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::debug;
use waygate_kernel::gateway::{
    BackendHandler, GatewayConfig, GatewayError, GatewayFilter, GatewayRequest, GatewayResponse,
    GatewayResult, GatewayRouter, Route, RouteMatch,
};

// ─────────────────────────────────────────────────────────────────────────────
// ApiGateway
// ─────────────────────────────────────────────────────────────────────────────

/// Immutable, shareable gateway.  Cloning is cheap; clones share state.
#[derive(Clone)]
pub struct ApiGateway {
    routes: Arc<RouteTable>,
    pipeline: Arc<FilterPipeline>,
    backend: Arc<dyn BackendHandler>,
    recover_panics: bool,
}

impl ApiGateway {
    /// Start building a gateway.
    pub fn builder() -> ApiGatewayBuilder {
        ApiGatewayBuilder::default()
    }

    /// Route, enrich and dispatch one request.
    ///
    /// An unmatched path is a successful `404`.  Failures returned by filters
    /// or the backend are passed through verbatim.
    pub async fn handle(&self, request: &mut GatewayRequest) -> GatewayResult<GatewayResponse> {
        let Some(RouteMatch { route, path_params }) = self.routes.select(request) else {
            debug!(
                request_id = %request.id,
                method = request.method.as_str(),
                path = %request.path,
                "no route matched"
            );
            return Ok(GatewayResponse::not_found());
        };

        debug!(
            request_id = %request.id,
            route_id = route.id(),
            target_url = route.target_url(),
            "route selected"
        );
        request.context.route_id = Some(route.id().to_string());
        request.context.target_url = Some(route.target_url().to_string());
        request.context.path_params = Some(path_params);

        let chain = self.pipeline.chain(&*self.backend);
        if !self.recover_panics {
            return chain.next(request).await;
        }

        match AssertUnwindSafe(chain.next(request)).catch_unwind().await {
            Ok(result) => result,
            Err(payload) => Err(GatewayError::Panicked(panic_message(payload.as_ref()))),
        }
    }

    /// Select the route `request` would be dispatched to, without running it.
    pub fn select<'a>(&'a self, request: &GatewayRequest) -> Option<RouteMatch<'a>> {
        self.routes.select(request)
    }

    /// Registered routes in selection order.
    pub fn routes(&self) -> Vec<&Route> {
        self.routes.routes()
    }

    /// Filter names in execution order.
    pub fn filter_names(&self) -> Vec<&str> {
        self.pipeline.names()
    }
}

impl std::fmt::Debug for ApiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiGateway")
            .field("routes", &self.routes)
            .field("pipeline", &self.pipeline)
            .field("recover_panics", &self.recover_panics)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ApiGatewayBuilder
// ─────────────────────────────────────────────────────────────────────────────

/// Fluent builder for [`ApiGateway`].
///
/// Registration methods never fail; every problem (duplicate route id, bad
/// config entry, missing backend) is reported once by [`build`](Self::build).
#[derive(Default)]
pub struct ApiGatewayBuilder {
    routes: Vec<Route>,
    filters: Vec<Arc<dyn GatewayFilter>>,
    backend: Option<Arc<dyn BackendHandler>>,
    recover_panics: bool,
    deferred_error: Option<GatewayError>,
}

impl ApiGatewayBuilder {
    /// Register a route.  Registration order breaks priority ties.
    pub fn add_route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    /// Register several routes in order.
    pub fn add_routes(mut self, routes: impl IntoIterator<Item = Route>) -> Self {
        self.routes.extend(routes);
        self
    }

    /// Register every route of a validated [`GatewayConfig`].
    pub fn with_config(mut self, config: &GatewayConfig) -> Self {
        match config.compile_routes() {
            Ok(routes) => self.routes.extend(routes),
            Err(err) => {
                self.deferred_error.get_or_insert(err);
            }
        }
        self
    }

    /// Add a filter to the pipeline.
    pub fn add_filter(self, filter: impl GatewayFilter + 'static) -> Self {
        self.add_shared_filter(Arc::new(filter))
    }

    /// Add a filter instance that is also held elsewhere.
    pub fn add_shared_filter(mut self, filter: Arc<dyn GatewayFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set the backend handler.  Replaces any previously set handler.
    pub fn backend_handler(self, backend: impl BackendHandler + 'static) -> Self {
        self.shared_backend_handler(Arc::new(backend))
    }

    /// Set a backend handler that is also held elsewhere.
    pub fn shared_backend_handler(mut self, backend: Arc<dyn BackendHandler>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Convert panics raised by filters or the backend into
    /// [`GatewayError::Panicked`] instead of unwinding into the caller.
    /// Off by default.
    pub fn recover_panics(mut self, enabled: bool) -> Self {
        self.recover_panics = enabled;
        self
    }

    /// Validate and freeze the gateway.
    pub fn build(self) -> GatewayResult<ApiGateway> {
        if let Some(err) = self.deferred_error {
            return Err(err);
        }
        let backend = self.backend.ok_or(GatewayError::MissingBackend)?;
        let routes = RouteTable::from_routes(self.routes)?;
        let pipeline = FilterPipeline::new(self.filters);

        debug!(
            routes = routes.len(),
            filters = ?pipeline.names(),
            recover_panics = self.recover_panics,
            "gateway built"
        );

        Ok(ApiGateway {
            routes: Arc::new(routes),
            pipeline: Arc::new(pipeline),
            backend,
            recover_panics: self.recover_panics,
        })
    }
}
