//! Declarative gateway configuration and structural validation.
//!
//! [`GatewayConfig`] is the serde-friendly description of a routing table,
//! suitable for loading from TOML/YAML/JSON.  [`validate()`](GatewayConfig::validate)
//! checks every structural invariant *before* any route is handed to the
//! runtime, and [`RouteConfig::into_route`] turns an entry into a compiled
//! [`Route`].

use super::error::{GatewayError, GatewayResult};
use super::router::Route;
use super::types::HttpMethod;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ─────────────────────────────────────────────────────────────────────────────
// RouteConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration-file representation of a single route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteConfig {
    /// Unique stable identifier for this route.
    pub id: String,
    /// URL path template.  Must begin with `/`.
    pub path_pattern: String,
    /// Target the route forwards to.
    pub target_url: String,
    /// Routing priority: lower values win when several patterns match.
    #[serde(default)]
    pub priority: i32,
    /// Accepted HTTP method names.  Empty means *all* methods.
    #[serde(default)]
    pub methods: Vec<String>,
}

impl RouteConfig {
    /// Create a minimal route entry.
    pub fn new(
        id: impl Into<String>,
        path_pattern: impl Into<String>,
        target_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            path_pattern: path_pattern.into(),
            target_url: target_url.into(),
            priority: 0,
            methods: Vec::new(),
        }
    }

    /// Builder: set routing priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Builder: restrict to specific HTTP methods.
    pub fn with_methods(mut self, methods: impl IntoIterator<Item = HttpMethod>) -> Self {
        self.methods = methods.into_iter().map(|m| m.as_str().to_string()).collect();
        self
    }

    /// Compile this entry into a validated [`Route`].
    pub fn into_route(&self) -> GatewayResult<Route> {
        let methods = self
            .methods
            .iter()
            .map(|m| {
                HttpMethod::from_str_ci(m)
                    .ok_or_else(|| GatewayError::UnknownMethod(self.id.clone(), m.clone()))
            })
            .collect::<GatewayResult<Vec<_>>>()?;

        Route::builder()
            .id(&self.id)
            .path_pattern(&self.path_pattern)
            .target_url(&self.target_url)
            .priority(self.priority)
            .methods(methods)
            .build()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// GatewayConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Identifier for this gateway instance (used in logs).
    pub id: String,
    /// All route definitions, in registration order.
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

impl GatewayConfig {
    /// Construct an empty config with only a gateway id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            routes: Vec::new(),
        }
    }

    /// Builder: add a route.
    pub fn with_route(mut self, route: RouteConfig) -> Self {
        self.routes.push(route);
        self
    }

    /// Validate all structural invariants of this configuration.
    ///
    /// Returns the *first* detected [`GatewayError`].  Checks performed (in
    /// order):
    /// 1. Gateway id is non-empty.
    /// 2. At least one route is defined.
    /// 3. Each route compiles (id, target, pattern syntax, method names).
    /// 4. No two routes share the same id.
    pub fn validate(&self) -> GatewayResult<()> {
        self.compile_routes().map(|_| ())
    }

    /// Validate and compile every route, preserving registration order.
    pub fn compile_routes(&self) -> GatewayResult<Vec<Route>> {
        // ── 1. Gateway id ────────────────────────────────────────────────────
        if self.id.trim().is_empty() {
            return Err(GatewayError::EmptyGatewayId);
        }

        // ── 2. At least one route ────────────────────────────────────────────
        if self.routes.is_empty() {
            return Err(GatewayError::NoRoutes);
        }

        // ── 3 + 4. Compile each route, check for duplicates ──────────────────
        let mut route_ids: HashSet<&str> = HashSet::new();
        let mut compiled = Vec::with_capacity(self.routes.len());
        for route in &self.routes {
            let built = route.into_route()?;
            if !route_ids.insert(route.id.as_str()) {
                return Err(GatewayError::DuplicateRoute(route.id.clone()));
            }
            compiled.push(built);
        }
        Ok(compiled)
    }
}
