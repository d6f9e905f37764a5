//! Service configuration.
//!
//! Settings come from the environment, optionally seeded from a `.env`
//! file:
//!
//! | Variable        | Required | Default                    |
//! |-----------------|----------|----------------------------|
//! | `APP_NAME`      | no       | `Water Segmentation API`   |
//! | `APP_VERSION`   | no       | crate version              |
//! | `MODEL_API_URL` | yes      |                            |
//! | `API_KEY`       | no       |                            |

use std::env;

use crate::error::{ConfigError, ConfigResult};

/// Default application name.
pub const DEFAULT_APP_NAME: &str = "Water Segmentation API";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8000;

/// Maximum upload size (in bytes).
///
/// 500 MiB limit, same as the upload widget.
pub const MAX_UPLOAD_SIZE: u64 = 500 * 1024 * 1024;

/// Extensions the model accepts.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "tiff"];

/// Runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub app_name: String,
    pub app_version: String,
    /// Segmentation model endpoint
    pub model_api_url: String,
    /// Bearer token for the model endpoint
    pub api_key: Option<String>,
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        // Try loading .env file
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let model_api_url = non_empty("MODEL_API_URL").ok_or(ConfigError::Missing("MODEL_API_URL"))?;
        if !model_api_url.starts_with("http://") && !model_api_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                name: "MODEL_API_URL",
                message: format!("expected an http(s) URL, got '{}'", model_api_url),
            });
        }

        Ok(Self {
            app_name: non_empty("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            app_version: non_empty("APP_VERSION").unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
            model_api_url,
            api_key: non_empty("API_KEY"),
        })
    }
}
