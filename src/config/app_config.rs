use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde_derive::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub explanation_preview_len: usize,
    pub view_idle_secs: u64,
    pub max_views: u64,
    pub staff_panel_url: String,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = AppConfig::get_config_directory()
            .map_err(|err| ConfigError::Message(err.to_string()))?;

        let mut config = Config::builder();
        if config_dir.join("config.yml").exists() {
            config = config.add_source(File::from(config_dir.join("config.yml")))
        }

        config = config.add_source(Environment::with_prefix("libportal"))
            .set_default("port", "3030")?
            .set_default("api_url", "http://localhost:8000/api")?
            .set_default("request_timeout_secs", "30")?
            .set_default("explanation_preview_len", "50")?
            .set_default("view_idle_secs", "1800")?
            .set_default("max_views", "10000")?
            .set_default("staff_panel_url", "staff_panel.html")?;

        config.build()?.try_deserialize()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn to_yaml(&self) -> String {
        serde_yaml::to_string(self).unwrap_or_else(|err| format!("<unprintable config: {}>", err))
    }

    fn get_config_directory() -> std::io::Result<PathBuf> {
        let config_dir = match env::var("LIBPORTAL_CONF_DIR") {
            Ok(path) => PathBuf::from(path),
            Err(_) => env::current_dir()?,
        };

        fs::create_dir_all(&config_dir)?;

        Ok(config_dir)
    }
}

#[cfg(test)]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 0,
            api_url: "http://127.0.0.1:9/api".to_string(),
            request_timeout_secs: 30,
            explanation_preview_len: 50,
            view_idle_secs: 1800,
            max_views: 100,
            staff_panel_url: "staff_panel.html".to_string(),
        }
    }
}
