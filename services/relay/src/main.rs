//! Relay HTTP service entry point.
//!
//! # Purpose
//! Wires configuration, observability, and the HTTP router, then starts the
//! API server alongside the metrics server.
//!
//! # Notes
//! The `run_with_shutdown` helper keeps startup wiring testable.
use anyhow::Result;
use relay::app::{AppState, build_router};
use relay::config::RelayConfig;
use relay::observability;
use relay::service::RelayService;
use std::future::Future;

#[tokio::main]
async fn main() -> Result<()> {
    let config = RelayConfig::from_env_or_yaml()?;
    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(config: RelayConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics_handle = observability::init_observability();
    // Expose Prometheus metrics on the configured bind address.
    let metrics_task = tokio::spawn(observability::serve_metrics(
        metrics_handle,
        config.metrics_bind,
    ));

    let state = AppState {
        relay: RelayService::new(),
        long_poll_timeout: config.long_poll_timeout(),
    };
    let app = build_router(state);

    let addr = config.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        long_poll_timeout_ms = config.long_poll_timeout_ms,
        "relay listening"
    );
    tokio::pin!(shutdown);
    tokio::select! {
        result = axum::serve(listener, app.into_make_service()) => {
            result?;
        }
        _ = &mut shutdown => {}
    }

    metrics_task.abort();
    let _ = metrics_task.await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn test_config() -> RelayConfig {
        RelayConfig {
            bind_addr: "127.0.0.1:0".parse().expect("bind"),
            metrics_bind: "127.0.0.1:0".parse().expect("metrics"),
            long_poll_timeout_ms: 1000,
        }
    }

    #[tokio::test]
    #[serial]
    async fn run_with_shutdown_starts_and_stops() {
        run_with_shutdown(test_config(), async {
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        })
        .await
        .expect("run should stop cleanly");
    }
}
