//! Viewer configuration.

use pagemark_core::viewport::{DEFAULT_MAX_SCALE, DEFAULT_MIN_SCALE, DEFAULT_SCALE, DEFAULT_ZOOM_STEP};
use pagemark_core::{MIN_ANNOTATION_SIZE, ViewportState};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
    #[error("Invalid backend URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Invalid configuration file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Viewer settings. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the backend REST API.
    pub backend_url: String,
    pub min_scale: f64,
    pub max_scale: f64,
    pub initial_scale: f64,
    pub zoom_step: f64,
    /// Minimum annotation width/height in device pixels.
    pub min_annotation_size: f64,
    pub resize_debounce_ms: u64,
    /// How long notifications stay visible.
    pub notification_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8000".to_string(),
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            initial_scale: DEFAULT_SCALE,
            zoom_step: DEFAULT_ZOOM_STEP,
            min_annotation_size: MIN_ANNOTATION_SIZE,
            resize_debounce_ms: 150,
            notification_secs: 5,
        }
    }
}

impl AppConfig {
    /// Defaults overridden by `PAGEMARK_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the
    /// `PAGEMARK_*` keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(url) = lookup("PAGEMARK_BACKEND_URL") {
            config.backend_url = url;
        }
        read_var(&lookup, "PAGEMARK_MIN_SCALE", &mut config.min_scale)?;
        read_var(&lookup, "PAGEMARK_MAX_SCALE", &mut config.max_scale)?;
        read_var(&lookup, "PAGEMARK_INITIAL_SCALE", &mut config.initial_scale)?;
        read_var(&lookup, "PAGEMARK_ZOOM_STEP", &mut config.zoom_step)?;
        read_var(&lookup, "PAGEMARK_MIN_ANNOTATION_SIZE", &mut config.min_annotation_size)?;
        read_var(&lookup, "PAGEMARK_RESIZE_DEBOUNCE_MS", &mut config.resize_debounce_ms)?;
        read_var(&lookup, "PAGEMARK_NOTIFICATION_SECS", &mut config.notification_secs)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON configuration file. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_scale.is_finite() && self.min_scale > 0.0) {
            return Err(ConfigError::Invalid(format!("min_scale must be positive, got {}", self.min_scale)));
        }
        if !(self.max_scale.is_finite() && self.max_scale >= self.min_scale) {
            return Err(ConfigError::Invalid(format!(
                "max_scale {} is below min_scale {}",
                self.max_scale, self.min_scale
            )));
        }
        if !(self.min_scale..=self.max_scale).contains(&self.initial_scale) {
            return Err(ConfigError::Invalid(format!(
                "initial_scale {} is outside [{}, {}]",
                self.initial_scale, self.min_scale, self.max_scale
            )));
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 0.0) {
            return Err(ConfigError::Invalid("zoom_step must be positive".to_string()));
        }
        if self.min_annotation_size < 0.0 {
            return Err(ConfigError::Invalid("min_annotation_size must not be negative".to_string()));
        }
        self.backend_base().map(|_| ())
    }

    /// Backend base URL, always ending in a slash so relative joins append.
    pub fn backend_base(&self) -> Result<Url, ConfigError> {
        let mut url = Url::parse(&self.backend_url).map_err(|e| ConfigError::InvalidUrl {
            url: self.backend_url.clone(),
            reason: e.to_string(),
        })?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// URL of an uploaded document file.
    pub fn document_url(&self, file_path: &str) -> Result<Url, ConfigError> {
        let base = self.backend_base()?;
        base.join("uploaded_files/")
            .and_then(|dir| dir.join(file_path.trim_start_matches('/')))
            .map_err(|e| ConfigError::InvalidUrl {
                url: file_path.to_string(),
                reason: e.to_string(),
            })
    }

    /// A fresh viewport for a document with `page_count` pages.
    pub fn viewport_state(&self, page_count: u32) -> ViewportState {
        let mut viewport =
            ViewportState::new(page_count).with_limits(self.min_scale, self.max_scale, self.zoom_step);
        viewport.set_scale(self.initial_scale);
        viewport
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_secs(self.notification_secs)
    }
}

fn read_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    target: &mut T,
) -> Result<(), ConfigError> {
    if let Some(value) = lookup(key) {
        *target = value.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value,
        })?;
    }
    Ok(())
}
