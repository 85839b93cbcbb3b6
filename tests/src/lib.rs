//! Waygate testing utilities
//!
//! Mock backends and instrumented filters for exercising an
//! [`ApiGateway`](waygate_gateway::ApiGateway) without a live upstream.

pub mod backend;

pub use backend::MockBackend;
pub use filters::{FailingFilter, RecordingFilter, ShortCircuitFilter, TraceLog};
