use crate::{metrics, ApiError, ApiResult, AppState};
use archmetrics_analysis::with_deadline;
use archmetrics_core::{
    EvolutionHotspot, MetricSource, ModuleSuggestion, Result, RuntimeMetric, StaticMetric,
};
use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, HeaderValue},
    response::{IntoResponse, Redirect},
    Json,
};
use serde::Serialize;
use std::future::Future;
use std::time::Instant;
use utoipa::ToSchema;

/// Times a generation step and records it under `source`.
async fn observed<T, F>(source: &'static str, fut: F) -> ApiResult<T>
where
    F: Future<Output = Result<T>>,
{
    let started = Instant::now();
    let result = fut.await;
    metrics::observe_generation(source, started.elapsed().as_secs_f64());
    result.map_err(ApiError::from)
}

async fn run_source<R: Send + 'static>(
    state: &AppState,
    source: &dyn MetricSource<Record = R>,
    input: &str,
) -> ApiResult<Vec<R>> {
    with_deadline(state.pipeline.deadline(), source.name(), source.generate(input))
        .await
        .map_err(ApiError::from)
}

/// Static code metrics per system
#[utoipa::path(
    get,
    path = "/api/static",
    tag = "analysis",
    responses(
        (status = 200, description = "Static metrics", body = [StaticMetric]),
        (status = 503, description = "Server shutting down"),
        (status = 504, description = "Generation timed out")
    )
)]
pub async fn get_static(State(state): State<AppState>) -> ApiResult<Json<Vec<StaticMetric>>> {
    let records = run_source(
        &state,
        state.pipeline.statics.as_ref(),
        &state.inputs.source_root,
    )
    .await?;
    Ok(Json(records))
}

/// Runtime metrics per endpoint
#[utoipa::path(
    get,
    path = "/api/dynamic",
    tag = "analysis",
    responses(
        (status = 200, description = "Runtime metrics", body = [RuntimeMetric]),
        (status = 503, description = "Server shutting down"),
        (status = 504, description = "Generation timed out")
    )
)]
pub async fn get_dynamic(State(state): State<AppState>) -> ApiResult<Json<Vec<RuntimeMetric>>> {
    let records = run_source(
        &state,
        state.pipeline.runtime.as_ref(),
        &state.inputs.logs_path,
    )
    .await?;
    Ok(Json(records))
}

/// Change hotspots ranked by number of changes
#[utoipa::path(
    get,
    path = "/api/evolution",
    tag = "analysis",
    responses(
        (status = 200, description = "Evolution hotspots, most changed first", body = [EvolutionHotspot]),
        (status = 503, description = "Server shutting down"),
        (status = 504, description = "Generation timed out")
    )
)]
pub async fn get_evolution(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<EvolutionHotspot>>> {
    let records = run_source(
        &state,
        state.pipeline.evolution.as_ref(),
        &state.inputs.history_path,
    )
    .await?;
    Ok(Json(records))
}

/// Module suggestions built from all three analyses
#[utoipa::path(
    get,
    path = "/api/integration",
    tag = "analysis",
    responses(
        (status = 200, description = "Suggested modules", body = [ModuleSuggestion]),
        (status = 503, description = "Server shutting down"),
        (status = 504, description = "Generation timed out")
    )
)]
pub async fn get_integration(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ModuleSuggestion>>> {
    let modules = observed("integration", state.pipeline.run(&state.inputs)).await?;
    Ok(Json(modules))
}

pub async fn root() -> Redirect {
    #[cfg(feature = "openapi-ui")]
    let target = "/swagger";
    #[cfg(not(feature = "openapi-ui"))]
    let target = "/api-docs/openapi.json";

    Redirect::temporary(target)
}

pub async fn prometheus_metrics() -> ApiResult<impl IntoResponse> {
    let body = metrics::render().map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok((
        [(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; version=0.0.4"),
        )],
        body,
    ))
}

// -------- Health --------

#[derive(Serialize, Debug, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: Vec<ComponentStatus>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ComponentStatus {
    pub name: String,
    pub status: String,
    pub response_time_ms: u64,
    pub records: Option<usize>,
    pub error: Option<String>,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.components.iter().all(|c| c.status == "healthy")
    }
}

impl ComponentStatus {
    fn from_probe<T>(name: &str, started: Instant, outcome: Result<Vec<T>>) -> Self {
        let response_time_ms = started.elapsed().as_millis() as u64;
        match outcome {
            Ok(records) => Self {
                name: name.to_string(),
                status: "healthy".to_string(),
                response_time_ms,
                records: Some(records.len()),
                error: None,
            },
            Err(e) => Self {
                name: name.to_string(),
                status: "unhealthy".to_string(),
                response_time_ms,
                records: None,
                error: Some(e.to_string()),
            },
        }
    }
}

async fn probe<R: Send + 'static>(
    state: &AppState,
    source: &dyn MetricSource<Record = R>,
) -> ComponentStatus {
    let started = Instant::now();
    let outcome =
        with_deadline(state.pipeline.deadline(), source.name(), source.generate("")).await;
    ComponentStatus::from_probe(source.name(), started, outcome)
}

/// Liveness plus a probe of every metric source
#[utoipa::path(
    get,
    path = "/health",
    tag = "ops",
    responses((status = 200, description = "Service health", body = HealthResponse))
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let pipeline = &state.pipeline;
    let (statics, runtime, evolution) = tokio::join!(
        probe(&state, pipeline.statics.as_ref()),
        probe(&state, pipeline.runtime.as_ref()),
        probe(&state, pipeline.evolution.as_ref()),
    );

    let started = Instant::now();
    let outcome = with_deadline(
        pipeline.deadline(),
        "integration",
        pipeline.advisor.suggest_modules(&[], &[], &[]),
    )
    .await;
    let integration = ComponentStatus::from_probe("integration", started, outcome);

    let mut response = HealthResponse {
        status: String::new(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        components: vec![statics, runtime, evolution, integration],
    };
    response.status = if response.is_healthy() {
        "healthy".to_string()
    } else {
        "unhealthy".to_string()
    };

    Json(response)
}
