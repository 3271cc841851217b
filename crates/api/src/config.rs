//! Configuration loading and validation for the API service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any variable is present but invalid.
//! The encryption secret is optional: without it credentials are stored
//! unencrypted.

use anyhow::{Context, Result};
use axum::http::HeaderName;
use serde::Deserialize;

use crate::crypto::ConfigSecret;

/// Validated service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Secret from which the credential encryption key is derived.
    /// Blank is treated as absent.
    #[serde(default)]
    pub encryption_secret: Option<ConfigSecret>,

    /// Port the HTTP server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// HTTP header carrying the authenticated principal id, set by the
    /// upstream identity provider.
    #[serde(default = "default_principal_header")]
    pub principal_header_name: String,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// OTLP endpoint for span export. Export is disabled when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,
}

fn default_listen_port() -> u16 {
    8080
}
fn default_principal_header() -> String {
    "X-User-Id".into()
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        Self::from_config(cfg)
    }

    fn from_config(cfg: config::Config) -> Result<Self> {
        let mut c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.normalise();
        c.validate()?;
        Ok(c)
    }

    /// Borrow the configured secret, if any.
    pub fn secret(&self) -> Option<&str> {
        self.encryption_secret.as_ref().map(ConfigSecret::expose)
    }

    /// Collapse blank optional values to `None`.
    fn normalise(&mut self) {
        self.encryption_secret = self
            .encryption_secret
            .take()
            .and_then(|s| ConfigSecret::new(s.expose()));
        self.otel_exporter_otlp_endpoint = self
            .otel_exporter_otlp_endpoint
            .take()
            .filter(|e| !e.trim().is_empty());
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.listen_port == 0 {
            anyhow::bail!("LISTEN_PORT must be > 0");
        }
        if HeaderName::from_bytes(self.principal_header_name.as_bytes()).is_err() {
            anyhow::bail!(
                "PRINCIPAL_HEADER_NAME {:?} is not a valid HTTP header name",
                self.principal_header_name
            );
        }
        if self.log_level.trim().is_empty() {
            anyhow::bail!("LOG_LEVEL must not be empty");
        }
        Ok(())
    }
}
