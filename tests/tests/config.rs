use std::io::Write;
use waygate_gateway::ApiGateway;
use waygate_gateway::gateway::{GatewayRequest, HttpMethod, ROUTE_ID_ATTR};
use waygate_kernel::config::load_gateway_config;
use waygate_testing::MockBackend;

const GATEWAY_YAML: &str = r#"
id: edge
routes:
  - id: general
    path_pattern: /api/users/**
    target_url: http://users.internal
    priority: 10
  - id: specific
    path_pattern: /api/users/admin
    target_url: http://admin.internal
    priority: 1
  - id: writes
    path_pattern: /api/orders/{orderId}
    target_url: http://orders.internal
    methods: [POST, PUT]
"#;

#[tokio::test]
async fn gateway_built_from_yaml_file() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile()?;
    file.write_all(GATEWAY_YAML.as_bytes())?;
    let path = file.path().to_string_lossy().into_owned();

    let config = load_gateway_config(&path)?;
    let backend = MockBackend::new();
    let gateway = ApiGateway::builder()
        .with_config(&config)
        .backend_handler(backend.clone())
        .build()?;

    let ids: Vec<&str> = gateway.routes().into_iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec!["writes", "specific", "general"]);

    let mut admin = GatewayRequest::new(HttpMethod::Get, "/api/users/admin");
    gateway.handle(&mut admin).await?;
    assert_eq!(admin.get_attr::<String>(ROUTE_ID_ATTR).as_deref(), Some("specific"));

    // Method-restricted route is skipped for GET.
    let resp = gateway
        .handle(&mut GatewayRequest::new(HttpMethod::Get, "/api/orders/7"))
        .await?;
    assert_eq!(resp.status, 404);

    let mut post = GatewayRequest::new(HttpMethod::Post, "/api/orders/7");
    gateway.handle(&mut post).await?;
    assert_eq!(post.path_param("orderId"), Some("7"));

    waygate_testing::assert_backend_called!(backend, 2);
    Ok(())
}

#[test]
fn invalid_config_file_is_rejected() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(b"id = \"edge\"\nroutes = []\n").unwrap();
    let path = file.path().to_string_lossy().into_owned();

    assert!(load_gateway_config(&path).is_err());
}
