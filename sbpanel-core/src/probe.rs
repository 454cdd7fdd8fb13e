//! Reachability probe for the game server's listening port.

use crate::conf::ServerConfig;
use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;

/// Answers "is the server up right now".
#[async_trait]
pub trait StatusProbe: Send + Sync {
    async fn check(&self) -> bool;
}

/// TCP connect probe. The connection is dropped as soon as it opens.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    address: String,
    port: u16,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(address: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            address: address.into(),
            port,
            timeout,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl From<&ServerConfig> for TcpProbe {
    fn from(config: &ServerConfig) -> Self {
        Self::new(config.address.clone(), config.port, config.probe_timeout())
    }
}

#[async_trait]
impl StatusProbe for TcpProbe {
    async fn check(&self) -> bool {
        check_reachable(&self.address, self.port, self.timeout).await
    }
}

/// True when a TCP connection to `address:port` opens within `timeout`.
///
/// Resolution failures, refusals and timeouts all read as unreachable.
pub async fn check_reachable(address: &str, port: u16, timeout: Duration) -> bool {
    match tokio::time::timeout(timeout, TcpStream::connect((address, port))).await {
        Ok(Ok(_stream)) => true,
        Ok(Err(e)) => {
            tracing::debug!(address, port, error = %e, "probe connect failed");
            false
        }
        Err(_) => {
            tracing::debug!(address, port, ?timeout, "probe timed out");
            false
        }
    }
}
