use archmetrics_analysis::{AnalysisInputs, IntegrationPipeline};
use archmetrics_core::{ArchMetricsConfig, ConfigManager};
use std::time::Instant;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: IntegrationPipeline,
    pub inputs: AnalysisInputs,
    /// Fired on shutdown; interrupts simulated scans still in flight.
    pub shutdown: CancellationToken,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: &ArchMetricsConfig) -> Self {
        crate::metrics::register_metrics();

        let shutdown = CancellationToken::new();
        let analysis = &config.analysis;
        let pipeline = crate::metrics::instrument(IntegrationPipeline::from_config(
            analysis,
            shutdown.clone(),
        ));
        let inputs = AnalysisInputs::from(analysis);

        Self {
            pipeline,
            inputs,
            shutdown,
            started_at: Instant::now(),
        }
    }

    /// State over an in-memory configuration, for tests and embedding.
    pub fn with_config(config: ArchMetricsConfig) -> archmetrics_core::Result<Self> {
        let manager = ConfigManager::from_config(config)?;
        Ok(Self::new(manager.config()))
    }
}
