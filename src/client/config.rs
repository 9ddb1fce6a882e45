use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{RoleGridError, RoleGridResult};

/// Default location checked when no path is supplied
pub const DEFAULT_CONFIG_PATH: &str = "config/role_service.json";
/// Environment variable naming an alternative config file
pub const CONFIG_PATH_ENV: &str = "ROLEGRID_CONFIG";
/// Environment override for the service base URL
pub const BASE_URL_ENV: &str = "ROLEGRID_BASE_URL";
/// Environment override for the request timeout in seconds
pub const TIMEOUT_ENV: &str = "ROLEGRID_TIMEOUT_SECS";
/// Environment variable holding the bearer token for authenticated calls
pub const AUTH_TOKEN_ENV: &str = "ROLEGRID_AUTH_TOKEN";

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Connection settings for the role service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RoleServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RoleServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check the configuration for values that cannot work.
    pub fn validate(&self) -> RoleGridResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(RoleGridError::config_error("base_url must not be empty"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(RoleGridError::config_error(format!(
                "base_url must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(RoleGridError::config_error(
                "timeout_secs must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Caller identity passed explicitly to the HTTP client.
///
/// Holding the token here instead of reading ambient process state at call
/// sites keeps request code testable; tests construct a context directly.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    bearer_token: Option<String>,
}

impl SessionContext {
    /// Context without credentials; requests carry no Authorization header
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            bearer_token: Some(token.into()),
        }
    }

    /// Build a context from `ROLEGRID_AUTH_TOKEN`, anonymous when unset.
    #[must_use]
    pub fn from_env() -> Self {
        match env::var(AUTH_TOKEN_ENV) {
            Ok(token) if !token.trim().is_empty() => Self::with_token(token),
            _ => Self::anonymous(),
        }
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }
}

/// Load the service configuration.
///
/// Sources are tried in order: the explicit `path` argument, the
/// `ROLEGRID_CONFIG` environment variable, the default file location, and
/// finally built-in defaults. Field-level environment overrides
/// (`ROLEGRID_BASE_URL`, `ROLEGRID_TIMEOUT_SECS`) are applied on top of
/// whichever source won, and the result is validated before it is returned.
///
/// # Errors
///
/// Fails when an explicitly named file is missing or malformed, when a file
/// at the default location is malformed, or when the merged configuration
/// does not validate.
pub fn load_service_config(path: Option<&str>) -> RoleGridResult<RoleServiceConfig> {
    let mut config = if let Some(path) = path {
        info!("Loading role service config from {}", path);
        read_config_file(path)?
    } else if let Ok(env_path) = env::var(CONFIG_PATH_ENV) {
        info!(
            "Loading role service config from {} ({})",
            env_path, CONFIG_PATH_ENV
        );
        read_config_file(&env_path)?
    } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
        info!("Loading role service config from {}", DEFAULT_CONFIG_PATH);
        read_config_file(DEFAULT_CONFIG_PATH)?
    } else {
        debug!("No role service config file found, using defaults");
        RoleServiceConfig::default()
    };

    if let Ok(base_url) = env::var(BASE_URL_ENV) {
        debug!("Overriding base_url from {}", BASE_URL_ENV);
        config.base_url = base_url;
    }
    if let Ok(raw) = env::var(TIMEOUT_ENV) {
        match raw.parse::<u64>() {
            Ok(secs) => {
                debug!("Overriding timeout_secs from {}", TIMEOUT_ENV);
                config.timeout_secs = secs;
            }
            Err(_) => warn!("Ignoring unparseable {}='{}'", TIMEOUT_ENV, raw),
        }
    }

    config.validate()?;
    Ok(config)
}

fn read_config_file(path: &str) -> RoleGridResult<RoleServiceConfig> {
    let contents = fs::read_to_string(path).map_err(|e| {
        RoleGridError::config_error(format!("Failed to read config file {}: {}", path, e))
    })?;
    serde_json::from_str(&contents).map_err(|e| {
        RoleGridError::config_error(format!("Failed to parse config file {}: {}", path, e))
    })
}
