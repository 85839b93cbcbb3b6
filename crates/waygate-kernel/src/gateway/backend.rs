//! Backend handler contract.

use super::error::GatewayResult;
use super::types::{GatewayRequest, GatewayResponse};
use async_trait::async_trait;
use std::sync::Arc;

/// Terminal handler invoked once the request has passed every filter.
///
/// The gateway places no constraints on what an implementation does (it may
/// proxy over the network, retry, read a cache); it only has to hand back a
/// response or a failure.  Implementations must be `Send + Sync` so one
/// handler can serve concurrent requests.
#[async_trait]
pub trait BackendHandler: Send + Sync {
    async fn handle(&self, request: &mut GatewayRequest) -> GatewayResult<GatewayResponse>;
}

#[async_trait]
impl<T: BackendHandler + ?Sized> BackendHandler for Arc<T> {
    async fn handle(&self, request: &mut GatewayRequest) -> GatewayResult<GatewayResponse> {
        (**self).handle(request).await
    }
}
