use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use tracing::debug;
use validator::Validate;

use crate::domain::error::{AppError, Result};
use crate::domain::workflow_config::WorkflowConfig;

pub const CONFIG_FILE: &str = "smart-leads.toml";
pub const ENV_PREFIX: &str = "SMART_LEADS_";

/// Layered configuration: defaults, then the TOML file (when it exists),
/// then `SMART_LEADS_*` environment variables.
pub struct ConfigService {
    path: PathBuf,
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigService {
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(CONFIG_FILE),
        }
    }

    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Load variables from a `.env` file into the process environment.
    pub fn load_dotenv() {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "Loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => debug!(error = %e, "Ignoring unreadable .env"),
        }
    }

    pub fn figment(&self) -> Figment {
        Figment::from(Serialized::defaults(WorkflowConfig::default()))
            .merge(Toml::file(&self.path))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load(&self) -> Result<WorkflowConfig> {
        let config: WorkflowConfig = self
            .figment()
            .extract()
            .map_err(|e| AppError::ConfigError(format!("Failed to load configuration: {}", e)))?;
        config
            .validate()
            .map_err(|e| AppError::ConfigError(format!("Invalid configuration: {}", e)))?;
        debug!(api_base = %config.api_base, auto_validate = config.auto_validate, "Configuration loaded");
        Ok(config)
    }
}
