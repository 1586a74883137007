use crate::SimulatedLatency;
use archmetrics_core::{round_to, EvolutionHotspot, MetricSource, Result, EVOLUTION_SEED};
use async_trait::async_trait;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::debug;

/// Files tracked by the evolution analysis, in enumeration order. Ranking
/// ties fall back to this order.
pub const TRACKED_FILES: [&str; 7] = [
    "Services/OrderService.cs",
    "Controllers/OrderController.cs",
    "Data/OrderRepo.cs",
    "Services/PaymentService.cs",
    "Controllers/PaymentController.cs",
    "Core/Mapping/Mapper.cs",
    "Legacy/Monolith/GodClass.cs",
];

/// Fabricates change counts and complexity per tracked file and ranks them
/// as hotspots. The history path is accepted but never read.
#[derive(Debug, Clone)]
pub struct EvolutionHotspotGenerator {
    seed: u64,
    latency: SimulatedLatency,
}

impl Default for EvolutionHotspotGenerator {
    fn default() -> Self {
        Self::new(EVOLUTION_SEED, SimulatedLatency::none())
    }
}

impl EvolutionHotspotGenerator {
    pub fn new(seed: u64, latency: SimulatedLatency) -> Self {
        Self { seed, latency }
    }

    fn fabricate(&self) -> Vec<EvolutionHotspot> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let hotspots = TRACKED_FILES
            .iter()
            .map(|path| EvolutionHotspot {
                file_path: (*path).to_string(),
                changes: rng.random_range(20..300),
                complexity_score: round_to(5.0 + rng.random::<f64>() * 20.0, 2),
            })
            .collect();
        rank_hotspots(hotspots)
    }
}

/// Orders hotspots by `changes`, most changed first. The sort is stable, so
/// equal counts keep their incoming order.
pub fn rank_hotspots(mut hotspots: Vec<EvolutionHotspot>) -> Vec<EvolutionHotspot> {
    hotspots.sort_by(|a, b| b.changes.cmp(&a.changes));
    hotspots
}

#[async_trait]
impl MetricSource for EvolutionHotspotGenerator {
    type Record = EvolutionHotspot;

    fn name(&self) -> &'static str {
        "evolution"
    }

    async fn generate(&self, history_path: &str) -> Result<Vec<EvolutionHotspot>> {
        self.latency.wait(self.name()).await?;
        let hotspots = self.fabricate();
        debug!(
            source = self.name(),
            input = history_path,
            seed = self.seed,
            records = hotspots.len(),
            top = hotspots.first().map(|h| h.file_path.as_str()).unwrap_or(""),
            "generated evolution hotspots"
        );
        Ok(hotspots)
    }
}
