//! Application settings shared by the GUI and CLI.
//!
//! Stored as JSON in the platform config directory
//! (`<config_dir>/lepra-screen/config.json`). A missing file means defaults.
//! `LEPRA_ENDPOINT` in the environment overrides the stored endpoint.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{ScreenError, ScreenResult};
use crate::file_io::write_atomic;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
pub const CURRENT_VERSION: u32 = 1;

/// Environment variable overriding [`AppConfig::endpoint`]
pub const ENV_ENDPOINT: &str = "LEPRA_ENDPOINT";

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:10000";
pub const DEFAULT_WELCOME_SECONDS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    /// Base URL of the prediction service (`/predict` is appended)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub dark_mode: bool,
    /// How long the welcome overlay stays before fading out
    #[serde(default = "default_welcome_seconds")]
    pub welcome_seconds: u64,
    /// Where reports are written without asking; `None` asks (GUI) or uses
    /// the working directory (CLI)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_dir: Option<PathBuf>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_welcome_seconds() -> u64 {
    DEFAULT_WELCOME_SECONDS
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            config_version: CURRENT_VERSION,
            endpoint: default_endpoint(),
            dark_mode: false,
            welcome_seconds: DEFAULT_WELCOME_SECONDS,
            report_dir: None,
        }
    }
}

impl AppConfig {
    /// Replace the endpoint with `LEPRA_ENDPOINT` when set and non-empty
    pub fn apply_env_overrides(mut self) -> Self {
        if let Ok(endpoint) = std::env::var(ENV_ENDPOINT) {
            if !endpoint.trim().is_empty() {
                tracing::debug!(%endpoint, "endpoint overridden from environment");
                self.endpoint = endpoint;
            }
        }
        self
    }
}

/// Default location of the config file
#[cfg(not(target_arch = "wasm32"))]
pub fn config_path() -> ScreenResult<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| ScreenError::Internal {
        message: "no config directory found".to_string(),
    })?;
    Ok(base.join("lepra-screen").join("config.json"))
}

/// Load config from the default location, then apply env overrides.
///
/// WASM builds have no config file and always start from defaults.
pub fn load_config() -> ScreenResult<AppConfig> {
    #[cfg(not(target_arch = "wasm32"))]
    let config = load_config_from(&config_path()?)?;
    #[cfg(target_arch = "wasm32")]
    let config = AppConfig::default();

    Ok(config.apply_env_overrides())
}

/// Load config from `path`; a missing file yields defaults
pub fn load_config_from(path: &Path) -> ScreenResult<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| ScreenError::file_error("read", path.display().to_string(), e.to_string()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: AppConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(mut json: serde_json::Value, from_version: u32) -> ScreenResult<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(ScreenError::VersionMismatch {
            file_version: from_version.to_string(),
            expected_version: CURRENT_VERSION.to_string(),
        });
    }

    // v0 → v1: stamp the version; missing fields take serde defaults
    if from_version < 1 {
        let obj = json.as_object_mut().ok_or_else(|| {
            ScreenError::invalid_input("config", "non-object", "config is not a JSON object")
        })?;
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1");
    }

    Ok(json)
}

/// Save config atomically to `path`, creating parent directories
pub fn save_config_to(config: &AppConfig, path: &Path) -> ScreenResult<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| {
            ScreenError::file_error("create directory", dir.display().to_string(), e.to_string())
        })?;
    }

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let json = serde_json::to_string_pretty(&stamped)?;
    write_atomic(path, json.as_bytes())?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

/// Save config to the default location
#[cfg(not(target_arch = "wasm32"))]
pub fn save_config(config: &AppConfig) -> ScreenResult<()> {
    save_config_to(config, &config_path()?)
}
