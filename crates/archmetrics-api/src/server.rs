use crate::{create_router, AppState};
use archmetrics_core::{ConfigManager, MetricsError, Result};
use std::net::{SocketAddr, ToSocketAddrs};
use tokio::signal;
use tracing::info;

pub struct Server {
    state: AppState,
    addr: SocketAddr,
}

impl Server {
    pub fn new(config: &ConfigManager) -> Result<Self> {
        let server = &config.config().server;
        let addr = resolve_listen_addr(&server.host, server.port)?;

        Ok(Self {
            state: AppState::new(config.config()),
            addr,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub async fn run(self) -> Result<()> {
        let shutdown = self.state.shutdown.clone();
        let router = create_router(self.state);

        // Bind with tuned socket options for better keep-alive behavior
        let listener = {
            let socket = if self.addr.is_ipv6() {
                tokio::net::TcpSocket::new_v6()
            } else {
                tokio::net::TcpSocket::new_v4()
            }?;

            let _ = socket.set_reuseaddr(true);
            let _ = socket.set_keepalive(true);

            socket.bind(self.addr)?;
            socket.listen(1024)?
        };

        info!("ArchMetrics API listening on http://{}", self.addr);
        info!("  GET /api/static      - Static code metrics");
        info!("  GET /api/dynamic     - Runtime metrics");
        info!("  GET /api/evolution   - Evolution hotspots");
        info!("  GET /api/integration - Module suggestions");
        info!("  GET /health          - Source probes");
        info!("  GET /metrics         - Prometheus metrics");
        #[cfg(feature = "openapi-ui")]
        info!("Swagger UI available at http://{}/swagger", self.addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

/// Resolves `host` (IP literal, bare IPv6 or host name) to the first
/// matching socket address.
pub fn resolve_listen_addr(host: &str, port: u16) -> Result<SocketAddr> {
    let host = host.trim_start_matches('[').trim_end_matches(']');
    (host, port)
        .to_socket_addrs()
        .map_err(|e| {
            MetricsError::InvalidInput(format!("invalid listen address {}:{}: {}", host, port, e))
        })?
        .next()
        .ok_or_else(|| {
            MetricsError::InvalidInput(format!("{}:{} resolved to no addresses", host, port))
        })
}

/// Resolves on Ctrl+C or SIGTERM and cancels in-flight simulated scans.
async fn shutdown_signal(token: tokio_util::sync::CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully");
        },
    }

    token.cancel();
}
