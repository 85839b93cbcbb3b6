//! Priority route table implementing [`GatewayRouter`].
//!
//! Routes are kept sorted by ascending priority, with equal priorities left
//! in registration order.  Selection is a linear scan that returns the first
//! route whose method set and pattern accept the request, which is exactly
//! "smallest priority among all matches, earliest registered on a tie".

use tracing::trace;
use waygate_kernel::gateway::{
    GatewayError, GatewayRequest, GatewayResult, GatewayRouter, Route, RouteMatch,
};

/// [`GatewayRouter`] implementation using priority-sorted linear lookup.
#[derive(Debug, Default, Clone)]
pub struct RouteTable {
    /// Routes sorted by ascending priority (lowest value first).
    routes: Vec<Route>,
}

impl RouteTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from routes in registration order.
    pub fn from_routes(routes: impl IntoIterator<Item = Route>) -> GatewayResult<Self> {
        let mut table = Self::new();
        for route in routes {
            table.register(route)?;
        }
        Ok(table)
    }

    /// Look up a route by id.
    pub fn get(&self, route_id: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.id() == route_id)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Every route that matches `request`, in selection order, with its
    /// captured variables.  [`select`](GatewayRouter::select) returns the
    /// first of these.
    pub fn candidates(&self, request: &GatewayRequest) -> Vec<RouteMatch<'_>> {
        self.routes
            .iter()
            .filter_map(|route| {
                route.matches(request).map(|path_params| RouteMatch { route, path_params })
            })
            .collect()
    }
}

impl GatewayRouter for RouteTable {
    fn register(&mut self, route: Route) -> GatewayResult<()> {
        if self.routes.iter().any(|r| r.id() == route.id()) {
            return Err(GatewayError::DuplicateRoute(route.id().to_string()));
        }
        // Insert after every route with the same or better priority so ties
        // keep registration order.
        let pos = self
            .routes
            .partition_point(|r| r.priority() <= route.priority());
        self.routes.insert(pos, route);
        Ok(())
    }

    fn select(&self, request: &GatewayRequest) -> Option<RouteMatch<'_>> {
        self.routes.iter().find_map(|route| {
            let path_params = route.matches(request)?;
            trace!(
                route_id = route.id(),
                priority = route.priority(),
                path = %request.path,
                "route matched"
            );
            Some(RouteMatch { route, path_params })
        })
    }

    fn routes(&self) -> Vec<&Route> {
        self.routes.iter().collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
