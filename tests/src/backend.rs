use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use waygate_kernel::gateway::{BackendHandler, GatewayRequest, GatewayResponse, GatewayResult};

/// A mock backend standing in for the upstream service.
///
/// Returns a stubbed outcome and records every request it receives, so tests
/// can assert whether (and how often) dispatch reached the backend.
#[derive(Clone)]
pub struct MockBackend {
    /// Outcome returned by every call. Replaceable at runtime.
    pub stubbed: Arc<RwLock<GatewayResult<GatewayResponse>>>,
    /// Snapshot of each request as the backend saw it
    pub call_history: Arc<RwLock<Vec<GatewayRequest>>>,
    /// Optional trace log the backend appends `handler,` to
    trace: Option<crate::TraceLog>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self::returning(GatewayResponse::ok("mock backend response"))
    }

    /// Backend that always answers with `response`.
    pub fn returning(response: GatewayResponse) -> Self {
        Self::with_outcome(Ok(response))
    }

    /// Backend that always fails with `err`.
    pub fn failing(err: waygate_kernel::gateway::GatewayError) -> Self {
        Self::with_outcome(Err(err))
    }

    fn with_outcome(outcome: GatewayResult<GatewayResponse>) -> Self {
        Self {
            stubbed: Arc::new(RwLock::new(outcome)),
            call_history: Arc::new(RwLock::new(Vec::new())),
            trace: None,
        }
    }

    /// Append `handler,` to `log` on every call.
    pub fn traced(mut self, log: crate::TraceLog) -> Self {
        self.trace = Some(log);
        self
    }

    /// Sets the outcome this backend will produce from now on.
    pub async fn set_outcome(&self, outcome: GatewayResult<GatewayResponse>) {
        *self.stubbed.write().await = outcome;
    }

    /// Requests received so far, oldest first.
    pub async fn history(&self) -> Vec<GatewayRequest> {
        self.call_history.read().await.clone()
    }

    /// Paths received so far, oldest first.
    pub async fn paths(&self) -> Vec<String> {
        self.call_history
            .read()
            .await
            .iter()
            .map(|r| r.path.clone())
            .collect()
    }

    /// Number of times the backend was invoked.
    pub async fn call_count(&self) -> usize {
        self.call_history.read().await.len()
    }
}

#[async_trait]
impl BackendHandler for MockBackend {
    async fn handle(&self, request: &mut GatewayRequest) -> GatewayResult<GatewayResponse> {
        if let Some(log) = &self.trace {
            log.push("handler");
        }
        self.call_history.write().await.push(request.clone());
        self.stubbed.read().await.clone()
    }
}

#[macro_export]
macro_rules! assert_backend_called {
    ($backend:expr, $expected_count:expr) => {
        let count = $backend.call_count().await;
        assert_eq!(
            count, $expected_count,
            "Expected backend to be called {} times, but was called {} times",
            $expected_count, count
        );
    };
}
