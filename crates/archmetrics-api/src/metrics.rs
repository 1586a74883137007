use archmetrics_analysis::IntegrationPipeline;
use archmetrics_core::{MetricSource, Result};
use async_trait::async_trait;
use lazy_static::lazy_static;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::{Arc, Once};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    pub static ref GENERATION_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "archmetrics_generation_requests_total",
            "Total number of generation requests per source"
        ),
        &["source"]
    )
    .expect("valid counter definition");

    pub static ref GENERATION_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "archmetrics_generation_duration_seconds",
            "Duration of generation requests in seconds"
        ),
        &["source"]
    )
    .expect("valid histogram definition");
}

static REGISTER: Once = Once::new();

/// Registers all collectors with [`REGISTRY`]. Safe to call repeatedly.
pub fn register_metrics() {
    REGISTER.call_once(|| {
        let collectors: [Box<dyn prometheus::core::Collector>; 2] = [
            Box::new(GENERATION_REQUESTS_TOTAL.clone()),
            Box::new(GENERATION_DURATION_SECONDS.clone()),
        ];
        for collector in collectors {
            if let Err(e) = REGISTRY.register(collector) {
                tracing::warn!("Failed to register metric: {}", e);
            }
        }
    });
}

pub fn observe_generation(source: &str, seconds: f64) {
    GENERATION_REQUESTS_TOTAL.with_label_values(&[source]).inc();
    GENERATION_DURATION_SECONDS
        .with_label_values(&[source])
        .observe(seconds);
}

/// Counts and times every `generate` call of the wrapped source, including
/// calls cut short by a deadline or cancellation.
pub struct ObservedSource<R> {
    inner: Arc<dyn MetricSource<Record = R>>,
}

impl<R> ObservedSource<R> {
    pub fn new(inner: Arc<dyn MetricSource<Record = R>>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<R: Send + 'static> MetricSource for ObservedSource<R> {
    type Record = R;

    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn generate(&self, input: &str) -> Result<Vec<R>> {
        let source = self.inner.name();
        GENERATION_REQUESTS_TOTAL.with_label_values(&[source]).inc();
        // observes on drop
        let _timer = GENERATION_DURATION_SECONDS
            .with_label_values(&[source])
            .start_timer();
        self.inner.generate(input).await
    }
}

/// Wraps every source of `pipeline` in an [`ObservedSource`].
pub fn instrument(mut pipeline: IntegrationPipeline) -> IntegrationPipeline {
    pipeline.statics = Arc::new(ObservedSource::new(pipeline.statics));
    pipeline.runtime = Arc::new(ObservedSource::new(pipeline.runtime));
    pipeline.evolution = Arc::new(ObservedSource::new(pipeline.evolution));
    pipeline
}

/// Prometheus text exposition of [`REGISTRY`].
pub fn render() -> std::result::Result<String, prometheus::Error> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
