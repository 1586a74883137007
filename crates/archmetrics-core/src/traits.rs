use crate::{EvolutionHotspot, ModuleSuggestion, Result, RuntimeMetric, StaticMetric};
use async_trait::async_trait;

/// A producer of metric records from a path-like input (a source tree, a
/// log file, a history export).
///
/// The current implementations fabricate their data; a real analyser can
/// slot in behind the same signature.
#[async_trait]
pub trait MetricSource: Send + Sync {
    type Record: Send;

    /// Short identifier used in logs and metrics labels.
    fn name(&self) -> &'static str;

    async fn generate(&self, input: &str) -> Result<Vec<Self::Record>>;
}

#[async_trait]
pub trait ModuleAdvisor: Send + Sync {
    async fn suggest_modules(
        &self,
        statics: &[StaticMetric],
        runtime: &[RuntimeMetric],
        evolution: &[EvolutionHotspot],
    ) -> Result<Vec<ModuleSuggestion>>;
}

pub type StaticSource = dyn MetricSource<Record = StaticMetric>;
pub type RuntimeSource = dyn MetricSource<Record = RuntimeMetric>;
pub type EvolutionSource = dyn MetricSource<Record = EvolutionHotspot>;
