//! Gateway configuration
//!
//! Layers, lowest precedence first: built-in defaults, a TOML file,
//! `HEARTFAIL_*` environment variables. CLI flags are applied on top by the
//! binary.

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File as ConfigFile};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_MODEL_PATH: &str = "models/RF.model";
pub const DEFAULT_CONFIG_PATH: &str = "config/gateway.toml";
pub const ENV_PREFIX: &str = "HEARTFAIL";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
    /// Pinned artifact fingerprint; startup fails on mismatch when set
    #[serde(default)]
    pub expected_model_hash: Option<String>,
    pub log_level: String,
    /// `json` or `pretty`
    pub log_format: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            expected_model_hash: None,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl GatewayConfig {
    /// Resolve configuration from file and environment
    ///
    /// An explicitly requested file must exist; the default location is
    /// used only when present.
    pub fn load(config_path_override: Option<&Path>) -> Result<Self> {
        Self::load_with_env_prefix(config_path_override, ENV_PREFIX)
    }

    fn load_with_env_prefix(
        config_path_override: Option<&Path>,
        env_prefix: &str,
    ) -> Result<Self> {
        let resolved_path = match config_path_override {
            Some(path) => {
                if !path.exists() {
                    bail!(
                        "Configuration file {} not found (specified via --config)",
                        path.display()
                    );
                }
                Some(path.to_path_buf())
            }
            None => Some(PathBuf::from(DEFAULT_CONFIG_PATH)).filter(|p| p.exists()),
        };

        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("model_path", DEFAULT_MODEL_PATH)?
            .set_default("log_level", defaults.log_level)?
            .set_default("log_format", defaults.log_format)?;

        if let Some(path) = &resolved_path {
            builder = builder.add_source(ConfigFile::from(path.as_path()));
        }
        builder = builder.add_source(Environment::with_prefix(env_prefix));

        let config: GatewayConfig = builder
            .build()
            .context("failed to assemble gateway configuration")?
            .try_deserialize()
            .context("invalid gateway configuration")?;

        Ok(config.normalized())
    }

    fn normalized(mut self) -> Self {
        self.host = self.host.trim().to_string();
        self.expected_model_hash = self
            .expected_model_hash
            .map(|hash| hash.trim().to_string())
            .filter(|hash| !hash.is_empty());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            bail!("host must not be empty");
        }
        if self.port == 0 {
            bail!("port must be greater than zero");
        }
        if self.model_path.as_os_str().is_empty() {
            bail!("model_path must not be empty");
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
