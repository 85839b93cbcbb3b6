//! `waygate-kernel`: contracts and value types for the Waygate dispatch
//! engine.
//!
//! The kernel owns everything a filter or backend author needs to compile
//! against: the request/response envelopes, compiled path patterns, routes,
//! the [`GatewayFilter`](gateway::GatewayFilter) and
//! [`BackendHandler`](gateway::BackendHandler) traits, and the per-call
//! [`FilterChain`](gateway::FilterChain) continuation.  Concrete routing and
//! dispatch live in `waygate-gateway`.

// gateway contracts
pub mod gateway;

// config loader
#[cfg(feature = "config")]
pub mod config;
