use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::time::Duration;

// Relay service configuration sourced from environment variables.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    // HTTP listener bind address.
    pub bind_addr: SocketAddr,
    // Metrics HTTP listener bind address.
    pub metrics_bind: SocketAddr,
    // Max time a long-poll request is held open before replying empty.
    pub long_poll_timeout_ms: u64,
}

// Long-polls are held open for 50 seconds by default.
const DEFAULT_LONG_POLL_TIMEOUT_MS: u64 = 50_000;

#[derive(Debug, Deserialize)]
struct RelayConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    long_poll_timeout_ms: Option<u64>,
}

impl RelayConfig {
    pub fn from_env() -> Result<Self> {
        // Environment variables provide defaults for local development.
        let bind_addr = std::env::var("RELAY_BIND")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .with_context(|| "parse RELAY_BIND")?;
        let metrics_bind = std::env::var("RELAY_METRICS_BIND")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .with_context(|| "parse RELAY_METRICS_BIND")?;
        let long_poll_timeout_ms = std::env::var("RELAY_LONG_POLL_TIMEOUT_MS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(DEFAULT_LONG_POLL_TIMEOUT_MS);
        Ok(Self {
            bind_addr,
            metrics_bind,
            long_poll_timeout_ms,
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("RELAY_CONFIG") {
            let contents =
                fs::read_to_string(&path).with_context(|| format!("read RELAY_CONFIG: {path}"))?;
            let override_cfg: RelayConfigOverride = serde_yaml::from_str(&contents)
                .with_context(|| "parse relay config yaml")?;
            if let Some(value) = override_cfg.bind_addr {
                config.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
            }
            if let Some(value) = override_cfg.metrics_bind {
                config.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
            }
            if let Some(value) = override_cfg.long_poll_timeout_ms {
                config.long_poll_timeout_ms = value;
            }
        }
        Ok(config)
    }

    pub fn long_poll_timeout(&self) -> Duration {
        Duration::from_millis(self.long_poll_timeout_ms)
    }
}
