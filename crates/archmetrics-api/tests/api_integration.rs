use archmetrics_analysis::IntegrationPipeline;
use archmetrics_api::{create_router, resolve_listen_addr, AppState, Server};
use archmetrics_core::{
    AnalysisConfig, ArchMetricsConfig, ConfigManager, EvolutionHotspot, ModuleSuggestion,
    RuntimeMetric, StaticMetric,
};
use axum_test::TestServer;

fn test_config() -> ArchMetricsConfig {
    let mut config = ArchMetricsConfig::default();
    config.analysis.latency_ms = 0;
    config
}

fn test_server(state: AppState) -> TestServer {
    TestServer::new(create_router(state)).expect("test server")
}

fn default_server() -> TestServer {
    test_server(AppState::with_config(test_config()).expect("app state"))
}

#[tokio::test]
async fn static_endpoint_returns_three_systems() {
    let server = default_server();

    let resp = server.get("/api/static").await;
    assert_eq!(resp.status_code(), 200);
    let metrics: Vec<StaticMetric> = resp.json();
    let names: Vec<_> = metrics.iter().map(|m| m.system_name.as_str()).collect();
    assert_eq!(names, ["SistemaA", "SistemaB", "SistemaC"]);
}

#[tokio::test]
async fn static_endpoint_uses_camel_case_fields() {
    let server = default_server();

    let body: serde_json::Value = server.get("/api/static").await.json();
    let first = &body[0];
    for field in [
        "systemName",
        "cbo",
        "lcom",
        "cyclomaticComplexity",
        "inheritanceDepth",
    ] {
        assert!(first.get(field).is_some(), "missing field {}", field);
    }
}

#[tokio::test]
async fn dynamic_endpoint_returns_four_endpoints() {
    let server = default_server();

    let resp = server.get("/api/dynamic").await;
    assert_eq!(resp.status_code(), 200);
    let metrics: Vec<RuntimeMetric> = resp.json();
    let endpoints: Vec<_> = metrics.iter().map(|m| m.endpoint.as_str()).collect();
    assert_eq!(
        endpoints,
        ["/api/orders", "/api/payments", "/api/users", "/api/reviews"]
    );
}

#[tokio::test]
async fn evolution_endpoint_is_ranked_and_repeatable() {
    let server = default_server();

    let first: Vec<EvolutionHotspot> = server.get("/api/evolution").await.json();
    let second: Vec<EvolutionHotspot> = server.get("/api/evolution").await.json();
    assert_eq!(first.len(), 7);
    assert!(first.windows(2).all(|w| w[0].changes >= w[1].changes));
    assert_eq!(first, second);
}

#[tokio::test]
async fn integration_endpoint_suggests_five_modules() {
    let server = default_server();

    let resp = server.get("/api/integration").await;
    assert_eq!(resp.status_code(), 200);
    let modules: Vec<ModuleSuggestion> = resp.json();
    assert_eq!(modules.len(), 5);

    let mut keys: Vec<_> = modules
        .iter()
        .map(|m| m.module_name.split_once('_').unwrap().1.to_string())
        .collect();
    keys.sort();
    assert_eq!(keys, ["Controllers", "Core", "Data", "Legacy", "Services"]);

    let core = modules
        .iter()
        .find(|m| m.module_name.ends_with("_Core"))
        .unwrap();
    assert_eq!(core.classes, ["Core.Mapping.Mapper"]);
}

#[tokio::test]
async fn root_redirects_to_documentation() {
    let server = default_server();

    let resp = server.get("/").await;
    assert_eq!(resp.status_code(), 307);
    let location = resp.header("location");
    let location = location.to_str().unwrap();
    assert!(location == "/swagger" || location == "/api-docs/openapi.json");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let server = default_server();

    let resp = server.get("/api-docs/openapi.json").await;
    assert_eq!(resp.status_code(), 200);
    let doc: serde_json::Value = resp.json();
    assert!(doc["paths"]["/api/integration"].is_object());
}

#[tokio::test]
async fn health_endpoint_reports_every_source() {
    let server = default_server();

    let resp = server.get("/health").await;
    assert_eq!(resp.status_code(), 200);
    let body: serde_json::Value = resp.json();
    assert_eq!(body["status"], "healthy");
    let components = body["components"].as_array().unwrap();
    let names: Vec<_> = components
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["static", "dynamic", "evolution", "integration"]);
    assert_eq!(components[2]["records"], 7);
}

#[tokio::test]
async fn metrics_endpoint_counts_generation_requests() {
    let server = default_server();

    server.get("/api/static").await;
    let resp = server.get("/metrics").await;
    assert_eq!(resp.status_code(), 200);
    let text = resp.text();
    assert!(text.contains("archmetrics_generation_requests_total"));
    assert!(text.contains("source=\"static\""));
}

#[tokio::test]
async fn cancelled_state_returns_service_unavailable() {
    let state = AppState::with_config(test_config()).expect("app state");
    state.shutdown.cancel();
    let server = test_server(state);

    let resp = server.get("/api/dynamic").await;
    assert_eq!(resp.status_code(), 503);
    let body: serde_json::Value = resp.json();
    assert_eq!(body["status"], 503);

    let health: serde_json::Value = server.get("/health").await.json();
    assert_eq!(health["status"], "unhealthy");
}

#[tokio::test]
async fn slow_generation_returns_gateway_timeout() {
    let mut state = AppState::with_config(test_config()).expect("app state");
    let slow = AnalysisConfig {
        latency_ms: 5_000,
        timeout_ms: 20,
        ..AnalysisConfig::default()
    };
    state.pipeline = IntegrationPipeline::from_config(&slow, state.shutdown.clone());
    let server = test_server(state);

    let resp = server.get("/api/integration").await;
    assert_eq!(resp.status_code(), 504);
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = test_config();
    config.logging.format = "yaml".to_string();
    assert!(AppState::with_config(config).is_err());
}

#[test]
fn host_names_and_bare_ipv6_resolve_to_listen_addresses() {
    for host in ["localhost", "::1", "[::1]", "127.0.0.1"] {
        let mut config = test_config();
        config.server.host = host.to_string();
        let manager = ConfigManager::from_config(config).expect("valid config");

        let server = Server::new(&manager)
            .unwrap_or_else(|e| panic!("host {:?} rejected: {}", host, e));
        assert!(server.addr().ip().is_loopback(), "host {:?}", host);
        assert_eq!(server.addr().port(), 5000);
    }
}

#[test]
fn unresolvable_listen_address_is_invalid_input() {
    let err = resolve_listen_addr("not a host", 5000).unwrap_err();
    assert!(matches!(err, archmetrics_core::MetricsError::InvalidInput(_)));
}
