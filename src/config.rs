//! Configuration loading.
//!
//! Settings come from an optional `config.toml` with environment overrides
//! (prefix `MLB_PROPS`, e.g. `MLB_PROPS__DATABASE__PATH`). Every key has a
//! default so a bare checkout runs without any file at all.

use serde::Deserialize;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub export: ExportConfig,
    pub resolution: ResolutionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Directory CSV exports land in.
    pub dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolutionConfig {
    /// Source label stamped on auto-resolved results.
    pub result_source: String,
    /// Confidence stamped on auto-resolved results, in [0, 1].
    pub result_confidence: f64,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("database.path", "mlb_props.db")
            .map_err(config_err)?
            .set_default("export.dir", ".")
            .map_err(config_err)?
            .set_default("resolution.result_source", "box_score_auto")
            .map_err(config_err)?
            .set_default("resolution.result_confidence", 0.95)
            .map_err(config_err)?
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("MLB_PROPS").separator("__"),
            )
            .build()
            .map_err(config_err)?;

        settings.try_deserialize().map_err(config_err)
    }
}

fn config_err(e: config::ConfigError) -> AppError {
    AppError::Config(e.to_string())
}
