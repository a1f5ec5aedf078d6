//! This module sets up observability for the relay service: tracing and metrics.
//! It configures a tracing subscriber with environment filtering and formatting,
//! installs a Prometheus metrics recorder, and provides an HTTP server exposing
//! `/metrics`, `/live`, and `/ready` endpoints.
//! Metrics serving is asynchronous and uses `axum` to handle requests.
//! In tests, metrics recorder initialization is cached to avoid conflicts, and
//! subscriber initialization is adapted accordingly.

use metrics_exporter_prometheus::PrometheusBuilder;
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
#[cfg(test)]
use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[cfg(test)]
static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initializes observability for the service.
///
/// Configures the tracing subscriber with environment filtering and
/// formatting, and installs a Prometheus metrics recorder.
///
/// Returns a `PrometheusHandle` for serving metrics.
pub fn init_observability() -> PrometheusHandle {
    // Use environment variable for log filtering; default to "info" if unset or invalid.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer();
    let registry = tracing_subscriber::registry().with(filter).with(fmt_layer);
    init_subscriber(registry);

    // Install Prometheus metrics recorder.
    install_metrics_recorder()
}

/// Serves Prometheus metrics and health endpoints on the given socket address.
///
/// Starts an asynchronous HTTP server exposing:
/// - `/metrics`: Prometheus metrics endpoint.
/// - `/live`: liveness probe returning "ok".
/// - `/ready`: readiness probe returning "ok".
///
/// Returns an I/O error if binding or serving fails.
pub async fn serve_metrics(handle: PrometheusHandle, addr: SocketAddr) -> std::io::Result<()> {
    let app = axum::Router::new()
        .route(
            "/metrics",
            axum::routing::get(move || async move { handle.render() }),
        )
        .route("/live", axum::routing::get(|| async { "ok" }))
        .route("/ready", axum::routing::get(|| async { "ok" }));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await
}

/// Installs the Prometheus metrics recorder globally.
///
/// In tests, reuses a cached recorder handle to avoid conflicts with
/// multiple installs. Outside tests, installs a new recorder each call.
fn install_metrics_recorder() -> PrometheusHandle {
    #[cfg(test)]
    {
        if let Some(handle) = METRICS_HANDLE.get() {
            return handle.clone();
        }
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .expect("install metrics recorder");
        let _ = METRICS_HANDLE.set(handle.clone());
        handle
    }
    #[cfg(not(test))]
    {
        PrometheusBuilder::new()
            .install_recorder()
            .expect("install metrics recorder")
    }
}

/// Initializes the tracing subscriber.
///
/// In tests, uses `try_init` to avoid panics if the subscriber is already
/// set. In non-test builds, uses `init` which panics on multiple
/// initializations.
fn init_subscriber<S>(subscriber: S)
where
    S: tracing::Subscriber + Send + Sync + 'static,
{
    #[cfg(test)]
    {
        let _ = subscriber.try_init();
    }
    #[cfg(not(test))]
    {
        subscriber.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn init_observability_succeeds() {
        let handle = init_observability();
        // Rendering must not panic, even with no metrics recorded yet.
        let _ = handle.render();
    }

    #[test]
    #[serial]
    fn install_metrics_recorder_is_cached_in_tests() {
        let handle1 = install_metrics_recorder();
        let handle2 = install_metrics_recorder();
        let _ = (handle1.render(), handle2.render());
    }

    #[tokio::test]
    #[serial]
    async fn serve_metrics_endpoints_respond() {
        let handle = init_observability();
        let addr: SocketAddr = "127.0.0.1:0".parse().expect("parse addr");
        let listener = tokio::net::TcpListener::bind(addr).await.expect("bind");
        let bound_addr = listener.local_addr().expect("local addr");

        tokio::spawn(async move {
            let app = axum::Router::new()
                .route(
                    "/metrics",
                    axum::routing::get(move || async move { handle.render() }),
                )
                .route("/live", axum::routing::get(|| async { "ok" }))
                .route("/ready", axum::routing::get(|| async { "ok" }));
            axum::serve(listener, app.into_make_service()).await.ok();
        });

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(1))
            .no_proxy()
            .build()
            .expect("build client");

        for path in ["metrics", "live", "ready"] {
            let url = format!("http://{}/{}", bound_addr, path);
            let mut last_err = None;
            let mut response = None;
            // Poll briefly; the server task may not have started accepting yet.
            for _ in 0..50 {
                match client.get(&url).send().await {
                    Ok(r) => {
                        response = Some(r);
                        break;
                    }
                    Err(err) => {
                        last_err = Some(err);
                        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                    }
                }
            }
            let response =
                response.unwrap_or_else(|| panic!("GET {} failed: {:?}", url, last_err));
            assert_eq!(response.status(), 200);
        }
    }
}
