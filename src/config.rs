//! Configuration module

use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Trained classifier artifact
    pub model_path: PathBuf,

    /// Fitted scaler artifact
    pub scaler_path: PathBuf,

    /// Directory holding index.html
    pub template_dir: PathBuf,

    /// Directory served under /static
    pub static_dir: PathBuf,

    /// Log output format (pretty, json)
    pub log_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            model_path: PathBuf::from("models/random_forest_model.json"),
            scaler_path: PathBuf::from("models/scaler.json"),
            template_dir: PathBuf::from("frontend/templates"),
            static_dir: PathBuf::from("frontend/static"),
            log_format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),

            scaler_path: env::var("SCALER_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.scaler_path),

            template_dir: env::var("TEMPLATE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.template_dir),

            static_dir: env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),

            log_format: env::var("LOG_FORMAT").unwrap_or(defaults.log_format),
        }
    }

    /// Check if logs should be emitted as JSON
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
