use crate::handlers;
use archmetrics_core::{EvolutionHotspot, ModuleSuggestion, RuntimeMetric, StaticMetric};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::get_static,
        handlers::get_dynamic,
        handlers::get_evolution,
        handlers::get_integration,
        handlers::health,
    ),
    components(
        schemas(
            StaticMetric,
            RuntimeMetric,
            EvolutionHotspot,
            ModuleSuggestion,
            handlers::HealthResponse,
            handlers::ComponentStatus,
        )
    ),
    tags(
        (name = "analysis", description = "Synthetic static, runtime and evolution metrics"),
        (name = "ops", description = "Operational endpoints")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_analysis_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/static",
            "/api/dynamic",
            "/api/evolution",
            "/api/integration",
            "/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
        let schemas = doc.components.expect("components").schemas;
        assert!(schemas.contains_key("ModuleSuggestion"));
        assert!(schemas.contains_key("EvolutionHotspot"));
    }
}
