//! Module suggestion from evolution hotspots.
//!
//! Hotspots are grouped by the first segment of their path. Each group becomes
//! one suggested module, numbered in the order its first member appears, with
//! cohesion and coupling scores drawn from a seeded source.

use crate::SimulatedLatency;
use archmetrics_core::{
    round_to, EvolutionHotspot, ModuleAdvisor, ModuleSuggestion, Result, RuntimeMetric,
    StaticMetric, INTEGRATION_SEED,
};
use async_trait::async_trait;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct IntegrationAggregator {
    seed: u64,
    latency: SimulatedLatency,
}

impl Default for IntegrationAggregator {
    fn default() -> Self {
        Self::new(INTEGRATION_SEED, SimulatedLatency::none())
    }
}

impl IntegrationAggregator {
    pub fn new(seed: u64, latency: SimulatedLatency) -> Self {
        Self { seed, latency }
    }
}

#[async_trait]
impl ModuleAdvisor for IntegrationAggregator {
    /// Static and runtime metrics are part of the contract but do not
    /// influence grouping yet.
    async fn suggest_modules(
        &self,
        statics: &[StaticMetric],
        runtime: &[RuntimeMetric],
        evolution: &[EvolutionHotspot],
    ) -> Result<Vec<ModuleSuggestion>> {
        self.latency.wait("integration").await?;
        let modules = group_by_prefix(evolution, self.seed);
        debug!(
            statics = statics.len(),
            runtime = runtime.len(),
            hotspots = evolution.len(),
            modules = modules.len(),
            seed = self.seed,
            "suggested modules"
        );
        Ok(modules)
    }
}

/// Groups hotspots by leading path segment, preserving first-seen order, and
/// scores each group.
pub fn group_by_prefix(evolution: &[EvolutionHotspot], seed: u64) -> Vec<ModuleSuggestion> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&EvolutionHotspot>)> = Vec::new();

    for hotspot in evolution {
        let key = group_key(&hotspot.file_path);
        match index.get(key) {
            Some(&slot) => groups[slot].1.push(hotspot),
            None => {
                index.insert(key, groups.len());
                groups.push((key, vec![hotspot]));
            }
        }
    }

    let mut rng = StdRng::seed_from_u64(seed);
    groups
        .into_iter()
        .enumerate()
        .map(|(i, (key, members))| ModuleSuggestion {
            module_name: format!("M{}_{}", i + 1, key),
            classes: members.iter().map(|h| class_name(&h.file_path)).collect(),
            cohesion: round_to(0.65 + rng.random::<f64>() * 0.2, 2),
            coupling: round_to(0.2 + rng.random::<f64>() * 0.2, 2),
        })
        .collect()
}

/// Path segment before the first `/`, or the whole path.
fn group_key(path: &str) -> &str {
    path.split_once('/').map_or(path, |(head, _)| head)
}

/// `Core/Mapping/Mapper.cs` -> `Core.Mapping.Mapper`.
///
/// Only the extension of the last segment is dropped; dot-files keep their name.
fn class_name(path: &str) -> String {
    let (dir, file) = match path.rsplit_once('/') {
        Some((dir, file)) => (Some(dir), file),
        None => (None, path),
    };
    let stem = match file.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file,
    };
    match dir {
        Some(dir) => format!("{}.{}", dir.replace('/', "."), stem),
        None => stem.to_string(),
    }
}
