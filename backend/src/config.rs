//! Layered runtime configuration.
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults,
//! 2. `config/default.toml` (or the file named by `OUTFITS_CONFIG`), optional,
//! 3. `OUTFITS__SECTION__KEY` environment variables,
//! 4. `PORT`, which overrides `server.port`.

use crate::error::AppError;
use serde::Deserialize;
use std::path::PathBuf;

const ENV_PREFIX: &str = "OUTFITS";
const CONFIG_PATH_VAR: &str = "OUTFITS_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/default";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub scorer: ScorerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    pub data_file: PathBuf,
    pub allowed_extensions: Vec<String>,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorerBackend {
    /// Probe the model endpoint and fall back to the heuristic if unreachable.
    Auto,
    /// Require the model endpoint; startup fails without it.
    Model,
    /// Always use the heuristic.
    Fallback,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScorerConfig {
    pub backend: ScorerBackend,
    #[serde(default)]
    pub endpoint: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
    /// Seeds the fallback's random term; unset means OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            data_file: PathBuf::from("outfits.json"),
            allowed_extensions: vec!["png".into(), "jpg".into(), "jpeg".into()],
            max_upload_bytes: 16 * 1024 * 1024,
        }
    }
}

pub fn load() -> Result<AppConfig, AppError> {
    let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
    build(Some(&path), std::env::var("PORT").ok())
}

fn build(path: Option<&str>, port_override: Option<String>) -> Result<AppConfig, AppError> {
    let defaults = StorageConfig::default();
    let mut settings = config::Config::builder()
        .set_default("server.host", "0.0.0.0")
        .and_then(|b| b.set_default("server.port", 5000_i64))
        .and_then(|b| {
            b.set_default(
                "storage.upload_dir",
                defaults.upload_dir.to_string_lossy().into_owned(),
            )
        })
        .and_then(|b| {
            b.set_default(
                "storage.data_file",
                defaults.data_file.to_string_lossy().into_owned(),
            )
        })
        .and_then(|b| b.set_default("storage.allowed_extensions", defaults.allowed_extensions))
        .and_then(|b| b.set_default("storage.max_upload_bytes", defaults.max_upload_bytes as i64))
        .and_then(|b| b.set_default("scorer.backend", "auto"))
        .and_then(|b| b.set_default("scorer.model", "patrickjohncyh/fashion-clip"))
        .and_then(|b| b.set_default("scorer.timeout_secs", 30_i64))
        .map_err(|e| AppError::Config(e.to_string()))?;

    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p).required(false));
    }
    settings = settings.add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("storage.allowed_extensions")
            .try_parsing(true),
    );
    if let Some(port) = port_override {
        settings = settings
            .set_override("server.port", port)
            .map_err(|e| AppError::Config(e.to_string()))?;
    }

    let cfg = settings
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;
    cfg.try_deserialize()
        .map_err(|e| AppError::Config(e.to_string()))
}
