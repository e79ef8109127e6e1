//! Configuration for the conversion gateway.
//!
//! Everything the gateway needs besides its converter lives in
//! [`GatewayConfig`], built via [`GatewayConfigBuilder`]. The converter itself
//! is configured on its own type (see [`crate::converter::DoclingCli`]) and
//! injected separately.

use crate::error::GatewayError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default listen address, matching the port existing clients expect.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8081";

/// Default timeout for `/parse-url` fetches, in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Default request body limit: 50 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Configuration for a [`crate::Gateway`] and its HTTP server.
///
/// # Example
/// ```rust
/// use docling_gateway::GatewayConfig;
///
/// let config = GatewayConfig::builder()
///     .bind_addr("127.0.0.1:9000")
///     .fetch_timeout_secs(10)
///     .build()
///     .unwrap();
/// assert_eq!(config.fetch_timeout_secs, 10);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Socket address the server binds to. Default: `0.0.0.0:8081`.
    pub bind_addr: String,

    /// Timeout for the whole remote fetch on `/parse-url`, in seconds. Default: 30.
    ///
    /// When it elapses the request fails with a client error rather than
    /// hanging on a slow host.
    pub fetch_timeout_secs: u64,

    /// Largest accepted request body in bytes. Default: 50 MiB.
    pub max_upload_bytes: usize,

    /// Directory for transient files. `None` uses the system temp directory.
    pub temp_dir: Option<PathBuf>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            temp_dir: None,
        }
    }
}

impl GatewayConfig {
    /// Create a new builder for `GatewayConfig`.
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`GatewayConfig`].
#[derive(Debug)]
pub struct GatewayConfigBuilder {
    config: GatewayConfig,
}

impl GatewayConfigBuilder {
    pub fn bind_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.bind_addr = addr.into();
        self
    }

    pub fn fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.config.fetch_timeout_secs = secs.max(1);
        self
    }

    pub fn max_upload_bytes(mut self, bytes: usize) -> Self {
        self.config.max_upload_bytes = bytes;
        self
    }

    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.temp_dir = Some(dir.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GatewayConfig, GatewayError> {
        let c = &self.config;
        if c.bind_addr.trim().is_empty() {
            return Err(GatewayError::InvalidConfig(
                "bind address must not be empty".into(),
            ));
        }
        if c.max_upload_bytes == 0 {
            return Err(GatewayError::InvalidConfig(
                "max upload size must be ≥ 1 byte".into(),
            ));
        }
        if let Some(ref dir) = c.temp_dir {
            if !dir.is_dir() {
                return Err(GatewayError::InvalidConfig(format!(
                    "temp dir '{}' is not a directory",
                    dir.display()
                )));
            }
        }
        Ok(self.config)
    }
}
