use crate::{handlers, ApiDoc, AppState};
use axum::{routing::get, Json, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(handlers::root))
        // Analysis
        .route("/api/static", get(handlers::get_static))
        .route("/api/dynamic", get(handlers::get_dynamic))
        .route("/api/evolution", get(handlers::get_evolution))
        .route("/api/integration", get(handlers::get_integration))
        // Operations
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::prometheus_metrics))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .with_state(state);

    #[cfg(feature = "openapi-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger").url("/swagger/openapi.json", ApiDoc::openapi()),
    );

    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(
                CorsLayer::new()
                    .allow_origin(tower_http::cors::Any)
                    .allow_methods(tower_http::cors::Any)
                    .allow_headers(tower_http::cors::Any),
            ),
    )
}
