use std::env;
use std::path::PathBuf;

use tracing::debug;

use closetiq_ai::models::{DEFAULT_API_BASE, DEFAULT_MODEL};
use closetiq_ai::GeminiConfig;

/// Key under which the whole wardrobe is stored.
pub const STORAGE_KEY: &str = "closetIQ-wardrobe";

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const MODEL_VAR: &str = "CLOSETIQ_GEMINI_MODEL";
pub const API_BASE_VAR: &str = "CLOSETIQ_GEMINI_API_BASE";
pub const DATA_DIR_VAR: &str = "CLOSETIQ_DATA_DIR";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Missing is fine until an AI call is attempted.
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub data_dir: PathBuf,
}

impl AppConfig {
    /// Reads settings from the process environment, loading `.env` first if present.
    pub fn from_env() -> Self {
        if let Ok(path) = dotenv::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from any variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            api_key: get(API_KEY_VAR),
            api_base: get(API_BASE_VAR).unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            model: get(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            data_dir: get(DATA_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(default_data_dir),
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        self
    }

    pub fn with_data_dir(mut self, data_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        self
    }

    pub fn gemini(&self) -> GeminiConfig {
        GeminiConfig::new(self.api_key.clone())
            .with_api_base(self.api_base.clone())
            .with_model(self.model.clone())
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("closetiq"))
        .unwrap_or_else(|| PathBuf::from(".closetiq"))
}
