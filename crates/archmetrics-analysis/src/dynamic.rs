use crate::SimulatedLatency;
use archmetrics_core::{round_to, MetricSource, Result, RuntimeMetric, RUNTIME_SEED};
use async_trait::async_trait;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::debug;

/// Endpoints covered by the runtime analysis, in output order.
pub const ENDPOINTS: [&str; 4] = ["/api/orders", "/api/payments", "/api/users", "/api/reviews"];

/// Fabricates latency, CPU and call volume per endpoint. The log path is
/// accepted but never read.
#[derive(Debug, Clone)]
pub struct RuntimeMetricGenerator {
    seed: u64,
    latency: SimulatedLatency,
}

impl Default for RuntimeMetricGenerator {
    fn default() -> Self {
        Self::new(RUNTIME_SEED, SimulatedLatency::none())
    }
}

impl RuntimeMetricGenerator {
    pub fn new(seed: u64, latency: SimulatedLatency) -> Self {
        Self { seed, latency }
    }

    fn fabricate(&self) -> Vec<RuntimeMetric> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        ENDPOINTS
            .iter()
            .map(|endpoint| RuntimeMetric {
                endpoint: (*endpoint).to_string(),
                avg_response_ms: round_to(150.0 + rng.random::<f64>() * 300.0, 1),
                cpu_utilization_pct: round_to(10.0 + rng.random::<f64>() * 70.0, 1),
                calls: rng.random_range(10_000..1_000_000),
            })
            .collect()
    }
}

#[async_trait]
impl MetricSource for RuntimeMetricGenerator {
    type Record = RuntimeMetric;

    fn name(&self) -> &'static str {
        "dynamic"
    }

    async fn generate(&self, logs_path: &str) -> Result<Vec<RuntimeMetric>> {
        self.latency.wait(self.name()).await?;
        let metrics = self.fabricate();
        debug!(
            source = self.name(),
            input = logs_path,
            seed = self.seed,
            records = metrics.len(),
            "generated runtime metrics"
        );
        Ok(metrics)
    }
}
