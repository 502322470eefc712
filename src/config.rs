use std::path::PathBuf;

use crate::error::AppError;

#[derive(Clone, Default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_url: String,
    pub db_path: String,
    pub logs_path: PathBuf,
    pub at_username: String,
    pub at_api_key: String,
    pub at_base_url: String,
}

impl Config {
    pub fn new() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            db_url: "sqlite://data.db".to_string(),
            db_path: "data.db".to_string(),
            logs_path: PathBuf::from("logs"),
            at_username: String::new(),
            at_api_key: String::new(),
            at_base_url: "https://api.sandbox.africastalking.com".to_string(),
        }
    }

    /// Reads configuration from the environment, keeping defaults for
    /// anything unset. The SMS gateway credentials are required.
    pub fn load(&mut self) -> Result<(), AppError> {
        if let Ok(host) = std::env::var("HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            self.port = port.parse::<u16>().map_err(|_| AppError::ConfigurationError {
                msg: format!("PORT must be a number, got \"{port}\""),
            })?;
        }
        if let Ok(db_url) = std::env::var("DB_URL") {
            self.db_url = db_url;
        }
        if let Ok(db_path) = std::env::var("DB_PATH") {
            self.db_path = db_path;
        }
        if let Ok(logs_path) = std::env::var("LOGS_PATH") {
            self.logs_path = PathBuf::from(logs_path);
        }
        if let Ok(base_url) = std::env::var("AT_BASE_URL") {
            self.at_base_url = base_url;
        }

        self.at_username = Self::require("AT_USERNAME")?;
        self.at_api_key = Self::require("AT_API_KEY")?;

        Ok(())
    }

    fn require(key: &str) -> Result<String, AppError> {
        std::env::var(key).map_err(|_| AppError::MissingConfig {
            key: key.to_string(),
        })
    }
}
