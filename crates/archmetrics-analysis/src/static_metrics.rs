use crate::SimulatedLatency;
use archmetrics_core::{round_to, MetricSource, Result, StaticMetric, STATIC_SEED};
use async_trait::async_trait;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::debug;

/// Systems covered by the static scan, in output order.
pub const SYSTEM_NAMES: [&str; 3] = ["SistemaA", "SistemaB", "SistemaC"];

/// Fabricates coupling, cohesion, complexity and inheritance figures per
/// system. The source root is accepted but never read.
#[derive(Debug, Clone)]
pub struct StaticMetricGenerator {
    seed: u64,
    latency: SimulatedLatency,
}

impl Default for StaticMetricGenerator {
    fn default() -> Self {
        Self::new(STATIC_SEED, SimulatedLatency::none())
    }
}

impl StaticMetricGenerator {
    pub fn new(seed: u64, latency: SimulatedLatency) -> Self {
        Self { seed, latency }
    }

    fn fabricate(&self) -> Vec<StaticMetric> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        SYSTEM_NAMES
            .iter()
            .map(|name| StaticMetric {
                system_name: (*name).to_string(),
                cbo: round_to(8.0 + rng.random::<f64>() * 6.0, 1),
                lcom: round_to(0.55 + rng.random::<f64>() * 0.3, 2),
                cyclomatic_complexity: round_to(6.0 + rng.random::<f64>() * 6.0, 1),
                inheritance_depth: round_to(2.0 + rng.random::<f64>() * 3.0, 1),
            })
            .collect()
    }
}

#[async_trait]
impl MetricSource for StaticMetricGenerator {
    type Record = StaticMetric;

    fn name(&self) -> &'static str {
        "static"
    }

    async fn generate(&self, source_root: &str) -> Result<Vec<StaticMetric>> {
        self.latency.wait(self.name()).await?;
        let metrics = self.fabricate();
        debug!(
            source = self.name(),
            input = source_root,
            seed = self.seed,
            records = metrics.len(),
            "generated static metrics"
        );
        Ok(metrics)
    }
}
