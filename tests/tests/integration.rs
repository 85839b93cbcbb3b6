use std::collections::HashMap;
use std::sync::Arc;
use waygate_gateway::ApiGateway;
use waygate_gateway::filter::{ApiKeyFilter, LoggingFilter, RateLimitFilter, RequestIdFilter};
use waygate_gateway::gateway::{
    GatewayError, GatewayRequest, GatewayResponse, HttpMethod, Route, ROUTE_ID_ATTR,
    ROUTE_PATH_PARAMS_ATTR, ROUTE_TARGET_URL_ATTR,
};
use waygate_testing::{FailingFilter, MockBackend, RecordingFilter, ShortCircuitFilter, TraceLog};

fn route(id: &str, pattern: &str, target: &str, priority: i32) -> Route {
    Route::builder()
        .id(id)
        .path_pattern(pattern)
        .target_url(target)
        .priority(priority)
        .build()
        .unwrap()
}

fn get(path: &str) -> GatewayRequest {
    GatewayRequest::new(HttpMethod::Get, path)
}

#[tokio::test]
async fn wildcard_route_reaches_backend() {
    let backend = MockBackend::new();
    let gateway = ApiGateway::builder()
        .add_route(route("users", "/api/users/**", "http://users.internal", 0))
        .backend_handler(backend.clone())
        .build()
        .unwrap();

    let resp = gateway.handle(&mut get("/api/users/123")).await.unwrap();

    assert_eq!(resp.status, 200);
    waygate_testing::assert_backend_called!(backend, 1);
    assert_eq!(backend.paths().await, vec!["/api/users/123".to_string()]);
}

#[tokio::test]
async fn unmatched_path_is_404_and_skips_backend() {
    let backend = MockBackend::new();
    let log = TraceLog::new();
    let gateway = ApiGateway::builder()
        .add_route(route("users", "/api/users/**", "http://users.internal", 0))
        .add_filter(RecordingFilter::new("1", 1, log.clone()))
        .backend_handler(backend.clone())
        .build()
        .unwrap();

    let resp = gateway.handle(&mut get("/api/orders/1")).await.unwrap();

    assert_eq!(resp.status, 404);
    waygate_testing::assert_backend_called!(backend, 0);
    assert_eq!(log.snapshot(), "");
}

#[tokio::test]
async fn lower_priority_value_wins() {
    let backend = MockBackend::new();
    let gateway = ApiGateway::builder()
        .add_route(route("general", "/api/users/**", "http://general", 10))
        .add_route(route("specific", "/api/users/admin", "http://admin", 1))
        .backend_handler(backend.clone())
        .build()
        .unwrap();

    let mut req = get("/api/users/admin");
    gateway.handle(&mut req).await.unwrap();
    assert_eq!(req.get_attr::<String>(ROUTE_ID_ATTR).as_deref(), Some("specific"));

    let mut req = get("/api/users/42");
    gateway.handle(&mut req).await.unwrap();
    assert_eq!(req.get_attr::<String>(ROUTE_ID_ATTR).as_deref(), Some("general"));
}

#[tokio::test]
async fn equal_priority_prefers_first_registered() {
    let gateway = ApiGateway::builder()
        .add_route(route("first", "/api/**", "http://first", 5))
        .add_route(route("second", "/api/{name}", "http://second", 5))
        .backend_handler(MockBackend::new())
        .build()
        .unwrap();

    let req = get("/api/anything");
    assert_eq!(gateway.select(&req).unwrap().route.id(), "first");
}

#[tokio::test]
async fn filters_run_in_order_and_unwind_in_reverse() {
    let log = TraceLog::new();
    let backend = MockBackend::new().traced(log.clone());
    // Registered out of order on purpose; execution follows `order`.
    let gateway = ApiGateway::builder()
        .add_route(route("any", "/**", "http://upstream", 0))
        .add_filter(RecordingFilter::new("2", 2, log.clone()))
        .add_filter(RecordingFilter::new("1", 1, log.clone()))
        .backend_handler(backend)
        .build()
        .unwrap();

    gateway.handle(&mut get("/x")).await.unwrap();

    assert_eq!(log.snapshot(), "1-pre,2-pre,handler,2-post,1-post,");
    assert_eq!(gateway.filter_names(), vec!["1", "2"]);
}

#[tokio::test]
async fn equal_order_filters_keep_registration_order() {
    let log = TraceLog::new();
    let gateway = ApiGateway::builder()
        .add_route(route("any", "/**", "http://upstream", 0))
        .add_filter(RecordingFilter::new("b", 7, log.clone()))
        .add_filter(RecordingFilter::new("a", 7, log.clone()))
        .backend_handler(MockBackend::new().traced(log.clone()))
        .build()
        .unwrap();

    gateway.handle(&mut get("/x")).await.unwrap();

    assert_eq!(log.snapshot(), "b-pre,a-pre,handler,a-post,b-post,");
}

#[tokio::test]
async fn short_circuit_stops_the_chain() {
    let log = TraceLog::new();
    let backend = MockBackend::new().traced(log.clone());
    let gateway = ApiGateway::builder()
        .add_route(route("any", "/**", "http://upstream", 0))
        .add_filter(RecordingFilter::new("outer", 0, log.clone()))
        .add_filter(ShortCircuitFilter::unauthorized(10))
        .add_filter(RecordingFilter::new("inner", 20, log.clone()))
        .backend_handler(backend.clone())
        .build()
        .unwrap();

    let resp = gateway.handle(&mut get("/secret")).await.unwrap();

    assert_eq!(resp.status, 401);
    waygate_testing::assert_backend_called!(backend, 0);
    assert_eq!(log.snapshot(), "outer-pre,outer-post,");
}

#[tokio::test]
async fn matched_route_is_written_into_context() {
    let backend = MockBackend::new();
    let gateway = ApiGateway::builder()
        .add_route(route(
            "test-route",
            "/api/users/{userId}",
            "http://users.internal",
            0,
        ))
        .backend_handler(backend.clone())
        .build()
        .unwrap();

    let mut req = get("/api/users/123");
    gateway.handle(&mut req).await.unwrap();

    assert_eq!(req.get_attr::<String>(ROUTE_ID_ATTR).as_deref(), Some("test-route"));
    assert_eq!(
        req.get_attr::<String>(ROUTE_TARGET_URL_ATTR).as_deref(),
        Some("http://users.internal")
    );
    let params: HashMap<String, String> = req.get_attr(ROUTE_PATH_PARAMS_ATTR).unwrap();
    assert_eq!(params.get("userId").map(String::as_str), Some("123"));

    // The backend sees the same enrichment.
    let seen = backend.history().await;
    assert_eq!(seen[0].path_param("userId"), Some("123"));
    assert_eq!(seen[0].context.route_id.as_deref(), Some("test-route"));
}

#[tokio::test]
async fn select_has_no_side_effects() {
    let gateway = ApiGateway::builder()
        .add_route(route("users", "/api/users/{id}", "http://users", 0))
        .backend_handler(MockBackend::new())
        .build()
        .unwrap();
    let req = get("/api/users/9");

    let first = gateway.select(&req).unwrap();
    let second = gateway.select(&req).unwrap();

    assert_eq!(first.route.id(), second.route.id());
    assert_eq!(first.path_params, second.path_params);
    assert!(req.context.route_id.is_none());
}

#[tokio::test]
async fn backend_failure_is_passed_through() {
    let backend = MockBackend::failing(GatewayError::Backend("upstream down".into()));
    let log = TraceLog::new();
    let gateway = ApiGateway::builder()
        .add_route(route("any", "/**", "http://upstream", 0))
        .add_filter(RecordingFilter::new("1", 1, log.clone()))
        .backend_handler(backend.clone())
        .build()
        .unwrap();

    let err = gateway.handle(&mut get("/x")).await.unwrap_err();

    assert_eq!(err, GatewayError::Backend("upstream down".into()));
    assert_eq!(log.snapshot(), "1-pre,1-post,");
    waygate_testing::assert_backend_called!(backend, 1);
}

#[tokio::test]
async fn filter_failure_is_passed_through() {
    let log = TraceLog::new();
    let backend = MockBackend::new().traced(log.clone());
    let gateway = ApiGateway::builder()
        .add_route(route("any", "/**", "http://upstream", 0))
        .add_filter(RecordingFilter::new("inner", 10, log.clone()))
        .add_filter(FailingFilter::new(5, GatewayError::filter("quota", "store unavailable")))
        .add_filter(RecordingFilter::new("outer", 1, log.clone()))
        .backend_handler(backend.clone())
        .build()
        .unwrap();

    let err = gateway.handle(&mut get("/x")).await.unwrap_err();

    assert_eq!(err, GatewayError::filter("quota", "store unavailable"));
    assert_eq!(log.snapshot(), "outer-pre,outer-post,");
    waygate_testing::assert_backend_called!(backend, 0);
}

#[tokio::test]
async fn backend_outcome_can_be_swapped() {
    let backend = MockBackend::new();
    let gateway = ApiGateway::builder()
        .add_route(route("any", "/**", "http://upstream", 0))
        .backend_handler(backend.clone())
        .build()
        .unwrap();

    backend
        .set_outcome(Ok(GatewayResponse::new(204)))
        .await;
    let resp = gateway.handle(&mut get("/x")).await.unwrap();
    assert_eq!(resp.status, 204);
}

#[tokio::test]
async fn concurrent_requests_do_not_share_context() {
    let backend = MockBackend::new();
    let gateway = Arc::new(
        ApiGateway::builder()
            .add_route(route("users", "/api/users/{id}", "http://users", 0))
            .add_route(route("orders", "/api/orders/{id}", "http://orders", 0))
            .add_filter(LoggingFilter::new())
            .backend_handler(backend.clone())
            .build()
            .unwrap(),
    );

    let mut handles = Vec::new();
    for i in 0..32 {
        let gateway = Arc::clone(&gateway);
        handles.push(tokio::spawn(async move {
            let (kind, expected) = if i % 2 == 0 {
                ("users", "users")
            } else {
                ("orders", "orders")
            };
            let mut req = get(&format!("/api/{kind}/{i}"));
            let resp = gateway.handle(&mut req).await.unwrap();
            assert_eq!(resp.status, 200);
            assert_eq!(req.context.route_id.as_deref(), Some(expected));
            assert_eq!(req.path_param("id"), Some(i.to_string().as_str()));
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    waygate_testing::assert_backend_called!(backend, 32);
}

#[tokio::test]
async fn builtin_filters_end_to_end() -> anyhow::Result<()> {
    let backend = MockBackend::new();
    let gateway = ApiGateway::builder()
        .add_route(route("users", "/api/users/{id}", "http://users", 0))
        .add_filter(LoggingFilter::new())
        .add_filter(RateLimitFilter::new(100, 100))
        .add_filter(ApiKeyFilter::new(["secret-key"]))
        .add_filter(RequestIdFilter::new())
        .backend_handler(backend.clone())
        .build()?;

    assert_eq!(
        gateway.filter_names(),
        vec!["request-id", "api-key-auth", "rate-limit", "access-log"]
    );

    let mut denied = GatewayRequest::builder()
        .path("/api/users/1")
        .header("X-Request-Id", "req-1")
        .build();
    let resp = gateway.handle(&mut denied).await?;
    assert_eq!(resp.status, 401);
    assert_eq!(resp.headers.get("x-request-id").map(String::as_str), Some("req-1"));
    waygate_testing::assert_backend_called!(backend, 0);

    let mut allowed = GatewayRequest::builder()
        .path("/api/users/1")
        .header("Authorization", "Bearer secret-key")
        .build();
    let resp = gateway.handle(&mut allowed).await?;
    assert_eq!(resp.status, 200);
    assert!(resp.headers.contains_key("x-response-time-ms"));
    assert!(resp.headers.contains_key("x-ratelimit-limit"));
    waygate_testing::assert_backend_called!(backend, 1);
    Ok(())
}
