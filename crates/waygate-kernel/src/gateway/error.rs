//! Gateway error types for `waygate-kernel`.
//!
//! [`GatewayError`] covers two families of failure:
//!
//! - *definition time*: empty ids, duplicate registrations, malformed path
//!   patterns or a gateway built without a backend, detected before any
//!   request is served;
//! - *dispatch time*: a filter or backend returning a failed `Result`.  The
//!   dispatcher passes these through verbatim and never inspects them.
//!
//! A routing miss is **not** an error: it is a successful `404` response.

use thiserror::Error;

/// Error type shared by the gateway kernel contract and runtime.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GatewayError {
    // ── Identity ────────────────────────────────────────────────────────────
    /// The gateway configuration `id` field is empty or whitespace-only.
    #[error("gateway id cannot be empty")]
    EmptyGatewayId,

    // ── Routes ───────────────────────────────────────────────────────────────
    /// The configuration contains no routes.
    #[error("gateway config must define at least one route")]
    NoRoutes,

    /// A route `id` field is empty or whitespace-only.
    #[error("route id cannot be empty")]
    EmptyRouteId,

    /// A route with this id has already been registered.
    #[error("route '{0}' is already registered")]
    DuplicateRoute(String),

    /// A route was built without a target URL.
    #[error("route '{0}' has an empty target url")]
    EmptyTargetUrl(String),

    /// A path pattern is syntactically invalid.
    #[error("invalid path pattern '{0}': {1}")]
    InvalidPathPattern(String, String),

    /// A route lists a method name that is not a known HTTP verb.
    #[error("route '{0}' lists unknown HTTP method '{1}'")]
    UnknownMethod(String, String),

    // ── Backend ──────────────────────────────────────────────────────────────
    /// The gateway was built without a backend handler.
    #[error("gateway requires a backend handler")]
    MissingBackend,

    // ── Dispatch ─────────────────────────────────────────────────────────────
    /// The backend handler failed to produce a response.
    #[error("backend failure: {0}")]
    Backend(String),

    /// A filter failed while processing the request or response.
    #[error("filter '{filter}' failed: {message}")]
    Filter { filter: String, message: String },

    /// A filter or backend panicked and panic recovery was enabled.
    #[error("request handling panicked: {0}")]
    Panicked(String),
}

impl GatewayError {
    /// Convenience constructor for [`GatewayError::Filter`].
    pub fn filter(filter: impl Into<String>, message: impl Into<String>) -> Self {
        GatewayError::Filter {
            filter: filter.into(),
            message: message.into(),
        }
    }

    /// Whether the error was raised while dispatching a request, as opposed
    /// to while defining routes or building the gateway.
    pub fn is_dispatch_failure(&self) -> bool {
        matches!(
            self,
            GatewayError::Backend(_) | GatewayError::Filter { .. } | GatewayError::Panicked(_)
        )
    }
}

/// Result alias used throughout the gateway contract.
pub type GatewayResult<T> = Result<T, GatewayError>;
