//! Gateway router trait and route definitions.
//!
//! The [`GatewayRouter`] trait is the single kernel-level abstraction for
//! request routing.  Implementations (the priority route table in
//! `waygate-gateway`) receive routes once at startup and are consulted on
//! every inbound request.

use super::error::{GatewayError, GatewayResult};
use super::pattern::PathPattern;
use super::types::{GatewayRequest, HttpMethod, PathParams};

// ─────────────────────────────────────────────────────────────────────────────
// Route
// ─────────────────────────────────────────────────────────────────────────────

/// A single routing rule mapping a path pattern to a target.
///
/// Routes are immutable once built.  When several routes match the same path
/// the one with the numerically *smallest* `priority` wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    id: String,
    pattern: PathPattern,
    target_url: String,
    priority: i32,
    methods: Vec<HttpMethod>,
}

impl Route {
    /// Start building a route.
    pub fn builder() -> RouteBuilder {
        RouteBuilder::default()
    }

    /// Unique stable identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The compiled path pattern.
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// The path pattern as written.
    pub fn path_pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    /// Lower values take precedence.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Accepted methods; empty means every method.
    pub fn methods(&self) -> &[HttpMethod] {
        &self.methods
    }

    /// Whether this route accepts `method`.
    pub fn accepts(&self, method: HttpMethod) -> bool {
        self.methods.is_empty() || self.methods.contains(&method)
    }

    /// Match a request against this route's method set and pattern.
    pub fn matches(&self, request: &GatewayRequest) -> Option<PathParams> {
        if !self.accepts(request.method) {
            return None;
        }
        self.pattern.matches(&request.path)
    }
}

/// Fluent builder for [`Route`].  Validation happens once, in
/// [`build`](Self::build).
#[derive(Debug, Default, Clone)]
pub struct RouteBuilder {
    id: String,
    path_pattern: String,
    target_url: String,
    priority: i32,
    methods: Vec<HttpMethod>,
}

impl RouteBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn path_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.path_pattern = pattern.into();
        self
    }

    pub fn target_url(mut self, url: impl Into<String>) -> Self {
        self.target_url = url.into();
        self
    }

    /// Routing priority (lower = evaluated first).  Defaults to `0`.
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Restrict to specific HTTP methods.
    pub fn methods(mut self, methods: impl IntoIterator<Item = HttpMethod>) -> Self {
        self.methods = methods.into_iter().collect();
        self
    }

    /// Validate and freeze the route.
    pub fn build(self) -> GatewayResult<Route> {
        if self.id.trim().is_empty() {
            return Err(GatewayError::EmptyRouteId);
        }
        if self.target_url.trim().is_empty() {
            return Err(GatewayError::EmptyTargetUrl(self.id));
        }
        let pattern = PathPattern::parse(&self.path_pattern)?;
        Ok(Route {
            id: self.id,
            pattern,
            target_url: self.target_url,
            priority: self.priority,
            methods: self.methods,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Route match
// ─────────────────────────────────────────────────────────────────────────────

/// The result of a successful route lookup: the selected route plus the
/// variables its pattern captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub path_params: PathParams,
}

// ─────────────────────────────────────────────────────────────────────────────
// Router trait
// ─────────────────────────────────────────────────────────────────────────────

/// Kernel contract for request routing.
///
/// The trait is intentionally synchronous: selection is a pure in-memory scan
/// with no I/O.
pub trait GatewayRouter: Send + Sync {
    /// Register a new route.  Returns [`GatewayError::DuplicateRoute`] if a
    /// route with the same `id` is already registered.
    fn register(&mut self, route: Route) -> GatewayResult<()>;

    /// Select the best matching route for `request`, or `None`.
    fn select(&self, request: &GatewayRequest) -> Option<RouteMatch<'_>>;

    /// All registered routes in selection order.
    fn routes(&self) -> Vec<&Route>;
}
