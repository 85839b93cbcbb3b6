//! Gateway kernel contract.
//!
//! This module defines the *trait interfaces, value types and the filter
//! chain continuation* for the Waygate dispatch engine.  The route table and
//! the dispatcher that wire them together live in `waygate-gateway`.
//!
//! # Architecture mapping
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              waygate-kernel  (this module)                  │
//! │  PathPattern            Route / RouteBuilder / RouteMatch   │
//! │  GatewayRouter trait    GatewayFilter trait + FilterChain   │
//! │  BackendHandler trait   GatewayRequest/Response/Context     │
//! │  GatewayConfig + validate()          GatewayError           │
//! └──────────────────────────┬──────────────────────────────────┘
//!                            │  depends on
//! ┌──────────────────────────▼──────────────────────────────────┐
//! │              waygate-gateway  (runtime crate)               │
//! │  RouteTable: impl GatewayRouter                             │
//! │  FilterPipeline (sorted filters, one chain per call)        │
//! │  ApiKeyFilter / RateLimitFilter / LoggingFilter / RequestId │
//! │  ApiGateway (dispatcher)   FnBackend / StaticBackend        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust
//! use waygate_kernel::gateway::{GatewayRequest, HttpMethod, Route};
//!
//! let route = Route::builder()
//!     .id("users")
//!     .path_pattern("/api/users/{user_id}")
//!     .target_url("http://users.internal")
//!     .priority(10)
//!     .build()
//!     .unwrap();
//!
//! let request = GatewayRequest::builder()
//!     .method(HttpMethod::Get)
//!     .path("/api/users/42")
//!     .build();
//!
//! let params = route.pattern().matches(&request.path).unwrap();
//! assert_eq!(params["user_id"], "42");
//! ```

pub mod backend;
pub mod error;
pub mod filter;
pub mod pattern;
pub mod router;
pub mod types;
pub mod validation;

pub use backend::BackendHandler;
pub use error::{GatewayError, GatewayResult};
pub use filter::{FilterChain, FilterOrder, GatewayFilter};
pub use pattern::PathPattern;
pub use router::{GatewayRouter, Route, RouteBuilder, RouteMatch};
pub use types::{
    GatewayRequest, GatewayRequestBuilder, GatewayResponse, HttpMethod, PathParams,
    RequestContext, ROUTE_ID_ATTR, ROUTE_PATH_PARAMS_ATTR, ROUTE_TARGET_URL_ATTR,
};
pub use validation::{GatewayConfig, RouteConfig};
