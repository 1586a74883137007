//! Metric sources and the integration step that turns their output into
//! module suggestions.
//!
//! Every source draws from its own freshly seeded [`rand::rngs::StdRng`], so
//! repeated calls return identical records.

pub mod dynamic;
pub mod evolution;
pub mod integration;
pub mod latency;
pub mod pipeline;
pub mod static_metrics;

pub use dynamic::RuntimeMetricGenerator;
pub use evolution::{rank_hotspots, EvolutionHotspotGenerator};
pub use integration::{group_by_prefix, IntegrationAggregator};
pub use latency::{with_deadline, SimulatedLatency};
pub use pipeline::{AnalysisInputs, IntegrationPipeline};
pub use static_metrics::StaticMetricGenerator;
