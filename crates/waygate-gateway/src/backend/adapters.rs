//! Ready-made [`BackendHandler`] adapters.
//!
//! Real deployments plug in their own handler (an HTTP proxy, a local
//! service, a cache).  These adapters cover the common in-process cases:
//! answering from a closure, or always returning the same response.

use async_trait::async_trait;
use waygate_kernel::gateway::{BackendHandler, GatewayRequest, GatewayResponse, GatewayResult};

/// Backend that delegates to a synchronous closure.
///
/// The closure sees the fully routed request, so it can read
/// `route.targetUrl` and path parameters from the context.
pub struct FnBackend<F> {
    f: F,
}

impl<F> FnBackend<F>
where
    F: Fn(&GatewayRequest) -> GatewayResult<GatewayResponse> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F> BackendHandler for FnBackend<F>
where
    F: Fn(&GatewayRequest) -> GatewayResult<GatewayResponse> + Send + Sync,
{
    async fn handle(&self, request: &mut GatewayRequest) -> GatewayResult<GatewayResponse> {
        (self.f)(request)
    }
}

/// Backend that answers every request with a clone of one response.
#[derive(Debug, Clone)]
pub struct StaticBackend {
    response: GatewayResponse,
}

impl StaticBackend {
    pub fn new(response: GatewayResponse) -> Self {
        Self { response }
    }
}

#[async_trait]
impl BackendHandler for StaticBackend {
    async fn handle(&self, _request: &mut GatewayRequest) -> GatewayResult<GatewayResponse> {
        Ok(self.response.clone())
    }
}
