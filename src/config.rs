//! Application-level configuration loading, including the fallback palette.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

use crate::color::Palette;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "COLOR_LENS_BACK_CONFIG_PATH";
/// Interval between live-sampling ticks when the config does not override it.
const DEFAULT_SAMPLING_INTERVAL_MS: u64 = 800;
/// Model asset handed to the classifier on initialisation.
const DEFAULT_MODEL_ASSET: &str = "color_model.tflite";
/// Severity applied to CVD transforms when the request omits one.
const DEFAULT_SEVERITY: f64 = 1.0;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    palette: Palette,
    sampling_interval: Duration,
    model_asset: String,
    default_severity: f64,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the
    /// built-in defaults when the file is absent or malformed.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        palette_entries = config.palette.len(),
                        "loaded configuration"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Fallback naming palette for locally-derived colors.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Interval between live-sampling ticks.
    pub fn sampling_interval(&self) -> Duration {
        self.sampling_interval
    }

    /// Asset identifier handed to the classifier's `init_model`.
    pub fn model_asset(&self) -> &str {
        &self.model_asset
    }

    /// Severity used by CVD transforms when a request does not specify one.
    pub fn default_severity(&self) -> f64 {
        self.default_severity
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            sampling_interval: Duration::from_millis(DEFAULT_SAMPLING_INTERVAL_MS),
            model_asset: DEFAULT_MODEL_ASSET.into(),
            default_severity: DEFAULT_SEVERITY,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    palette: Option<Vec<RawPaletteEntry>>,
    #[serde(default)]
    sampling_interval_ms: Option<u64>,
    #[serde(default)]
    model_asset: Option<String>,
    #[serde(default)]
    default_severity: Option<f64>,
}

#[derive(Debug, Deserialize)]
/// JSON representation of a single palette entry inside the configuration file.
struct RawPaletteEntry {
    hex: String,
    name: String,
}

impl From<RawConfig> for AppConfig {
    fn from(raw: RawConfig) -> Self {
        let defaults = AppConfig::default();
        Self {
            palette: raw
                .palette
                .filter(|entries| !entries.is_empty())
                .map(|entries| Palette::new(entries.into_iter().map(|e| (e.hex, e.name))))
                .unwrap_or(defaults.palette),
            sampling_interval: raw
                .sampling_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.sampling_interval),
            model_asset: raw.model_asset.unwrap_or(defaults.model_asset),
            default_severity: raw
                .default_severity
                .filter(|severity| severity.is_finite())
                .unwrap_or(defaults.default_severity),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_config_defaults_fill_missing_fields() {
        let raw: RawConfig = serde_json::from_str("{}").unwrap();
        let config: AppConfig = raw.into();
        assert_eq!(config.palette().len(), 10);
        assert_eq!(config.sampling_interval(), Duration::from_millis(800));
        assert_eq!(config.model_asset(), "color_model.tflite");
        assert_eq!(config.default_severity(), 1.0);
    }

    #[test]
    fn raw_config_overrides_apply() {
        let raw: RawConfig = serde_json::from_str(
            r##"{
                "palette": [{"hex": "#102030", "name": "Test Teal"}],
                "sampling_interval_ms": 250,
                "model_asset": "alt_model.tflite",
                "default_severity": 0.5
            }"##,
        )
        .unwrap();
        let config: AppConfig = raw.into();
        assert_eq!(config.palette().name_of("#102030"), "Test Teal");
        assert_eq!(config.sampling_interval(), Duration::from_millis(250));
        assert_eq!(config.model_asset(), "alt_model.tflite");
        assert_eq!(config.default_severity(), 0.5);
    }

    #[test]
    fn empty_palette_falls_back_to_builtin() {
        let raw: RawConfig = serde_json::from_str(r#"{"palette": []}"#).unwrap();
        let config: AppConfig = raw.into();
        assert_eq!(config.palette().len(), 10);
    }
}
