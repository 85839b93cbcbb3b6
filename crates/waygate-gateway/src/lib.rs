//! `waygate-gateway`: Waygate routing and dispatch runtime.
//!
//! This crate provides the concrete implementations of the gateway kernel
//! contracts defined in `waygate-kernel::gateway`:
//!
//! | Kernel contract | Implementation |
//! |----------------|----------------|
//! | [`GatewayRouter`](gateway::GatewayRouter) | [`router::RouteTable`] |
//! | [`GatewayFilter`](gateway::GatewayFilter) | [`filter::ApiKeyFilter`], [`filter::RateLimitFilter`], [`filter::LoggingFilter`], [`filter::RequestIdFilter`] |
//! | [`BackendHandler`](gateway::BackendHandler) | [`backend::FnBackend`], [`backend::StaticBackend`] |
//!
//! The [`dispatcher::ApiGateway`] wires everything together: it selects a
//! route, enriches the request context, and runs the filter chain around the
//! backend.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use waygate_gateway::backend::FnBackend;
//! use waygate_gateway::dispatcher::ApiGateway;
//! use waygate_gateway::gateway::{GatewayRequest, GatewayResponse, HttpMethod, Route};
//!
//! #[tokio::main]
//! async fn main() {
//!     let gateway = ApiGateway::builder()
//!         .add_route(
//!             Route::builder()
//!                 .id("users")
//!                 .path_pattern("/api/users/{user_id}")
//!                 .target_url("http://users.internal")
//!                 .build()
//!                 .unwrap(),
//!         )
//!         .backend_handler(FnBackend::new(|req: &GatewayRequest| {
//!             Ok(GatewayResponse::ok(format!("user {}", req.path_param("user_id").unwrap_or("?"))))
//!         }))
//!         .build()
//!         .unwrap();
//!
//!     let mut request = GatewayRequest::builder()
//!         .method(HttpMethod::Get)
//!         .path("/api/users/42")
//!         .build();
//!     let response = gateway.handle(&mut request).await.unwrap();
//!     assert_eq!(response.body_str(), "user 42");
//! }
//! ```

pub mod backend;
pub mod dispatcher;
pub mod error;
pub mod filter;
pub mod logging;
pub mod router;

pub use dispatcher::{ApiGateway, ApiGatewayBuilder};

// Re-export the kernel gateway types for convenience.
pub use waygate_kernel::gateway;
