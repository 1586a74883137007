use archmetrics_core::{MetricsError, Result};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Stand-in for the time a real scan would take.
///
/// The wait is cancelable: once the token fires, pending and future waits
/// return [`MetricsError::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct SimulatedLatency {
    delay: Duration,
    cancel: CancellationToken,
}

impl SimulatedLatency {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            cancel: CancellationToken::new(),
        }
    }

    /// No delay at all; useful for tests and benchmarks.
    pub fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub async fn wait(&self, operation: &str) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(MetricsError::Cancelled(operation.to_string()));
        }
        if self.delay.is_zero() {
            return Ok(());
        }

        trace!(operation, delay_ms = self.delay.as_millis() as u64, "simulating scan");
        tokio::select! {
            _ = self.cancel.cancelled() => Err(MetricsError::Cancelled(operation.to_string())),
            _ = tokio::time::sleep(self.delay) => Ok(()),
        }
    }
}

/// Runs `fut` under a deadline, mapping expiry to [`MetricsError::Timeout`].
pub async fn with_deadline<F, T>(limit: Duration, operation: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(MetricsError::Timeout {
            operation: operation.to_string(),
            limit_ms: limit.as_millis() as u64,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn zero_delay_returns_immediately() {
        let latency = SimulatedLatency::none();
        let started = Instant::now();
        assert_ok!(latency.wait("static").await);
        assert!(started.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn cancelled_token_interrupts_long_wait() {
        let token = CancellationToken::new();
        let latency = SimulatedLatency::new(Duration::from_secs(30)).with_cancellation(token.clone());

        let waiter = tokio::spawn(async move { latency.wait("evolution").await });
        token.cancel();

        let result = waiter.await.unwrap();
        assert!(matches!(result, Err(MetricsError::Cancelled(op)) if op == "evolution"));
    }

    #[tokio::test]
    async fn already_cancelled_token_short_circuits() {
        let token = CancellationToken::new();
        token.cancel();
        let latency = SimulatedLatency::none().with_cancellation(token);
        assert_err!(latency.wait("dynamic").await);
    }

    #[tokio::test]
    async fn deadline_expiry_maps_to_timeout() {
        let result: Result<()> = with_deadline(Duration::from_millis(10), "integration", async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;

        match result {
            Err(MetricsError::Timeout { operation, limit_ms }) => {
                assert_eq!(operation, "integration");
                assert_eq!(limit_ms, 10);
            }
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn deadline_passes_through_inner_result() {
        let value = with_deadline(Duration::from_secs(1), "static", async { Ok(7u32) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }
}
