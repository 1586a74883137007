use crate::{
    with_deadline, EvolutionHotspotGenerator, IntegrationAggregator, RuntimeMetricGenerator,
    SimulatedLatency, StaticMetricGenerator,
};
use archmetrics_core::{
    AnalysisConfig, EvolutionSource, ModuleAdvisor, ModuleSuggestion, Result, RuntimeSource,
    StaticSource,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Path-like inputs handed to each source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisInputs {
    pub source_root: String,
    pub logs_path: String,
    pub history_path: String,
}

impl Default for AnalysisInputs {
    fn default() -> Self {
        Self::from(&AnalysisConfig::default())
    }
}

impl From<&AnalysisConfig> for AnalysisInputs {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            source_root: config.source_root.clone(),
            logs_path: config.logs_path.clone(),
            history_path: config.history_path.clone(),
        }
    }
}

/// The three metric sources plus the aggregator, wired together.
///
/// Each source is also reachable on its own so the HTTP layer can serve them
/// individually.
#[derive(Clone)]
pub struct IntegrationPipeline {
    pub statics: Arc<StaticSource>,
    pub runtime: Arc<RuntimeSource>,
    pub evolution: Arc<EvolutionSource>,
    pub advisor: Arc<dyn ModuleAdvisor>,
    deadline: Duration,
}

impl IntegrationPipeline {
    pub fn new(
        statics: Arc<StaticSource>,
        runtime: Arc<RuntimeSource>,
        evolution: Arc<EvolutionSource>,
        advisor: Arc<dyn ModuleAdvisor>,
        deadline: Duration,
    ) -> Self {
        Self {
            statics,
            runtime,
            evolution,
            advisor,
            deadline,
        }
    }

    /// Builds the fabricated sources from configuration. Every simulated
    /// wait observes `cancel`.
    pub fn from_config(config: &AnalysisConfig, cancel: CancellationToken) -> Self {
        let latency = SimulatedLatency::new(config.latency()).with_cancellation(cancel);
        let seeds = config.seeds;
        Self::new(
            Arc::new(StaticMetricGenerator::new(seeds.r#static, latency.clone())),
            Arc::new(RuntimeMetricGenerator::new(seeds.runtime, latency.clone())),
            Arc::new(EvolutionHotspotGenerator::new(seeds.evolution, latency.clone())),
            Arc::new(IntegrationAggregator::new(seeds.integration, latency)),
            config.timeout(),
        )
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Runs all three sources concurrently, then groups the evolution
    /// records into module suggestions.
    pub async fn run(&self, inputs: &AnalysisInputs) -> Result<Vec<ModuleSuggestion>> {
        let started = Instant::now();

        let (statics, runtime, evolution) = tokio::try_join!(
            with_deadline(
                self.deadline,
                self.statics.name(),
                self.statics.generate(&inputs.source_root)
            ),
            with_deadline(
                self.deadline,
                self.runtime.name(),
                self.runtime.generate(&inputs.logs_path)
            ),
            with_deadline(
                self.deadline,
                self.evolution.name(),
                self.evolution.generate(&inputs.history_path)
            ),
        )?;

        let modules = with_deadline(
            self.deadline,
            "integration",
            self.advisor.suggest_modules(&statics, &runtime, &evolution),
        )
        .await?;

        info!(
            modules = modules.len(),
            hotspots = evolution.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "integration pipeline finished"
        );
        Ok(modules)
    }
}

impl Default for IntegrationPipeline {
    fn default() -> Self {
        let config = AnalysisConfig {
            latency_ms: 0,
            ..AnalysisConfig::default()
        };
        Self::from_config(&config, CancellationToken::new())
    }
}
