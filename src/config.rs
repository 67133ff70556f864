use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_notices_path")]
    pub notices_path: String,

    pub api_token: Option<String>,

    /// Base URL of the web front end; notification links are resolved against it.
    #[serde(default = "default_web_base_url")]
    pub web_base_url: String,

    #[serde(default = "default_user_id")]
    pub user_id: i64,

    #[serde(default)]
    pub role: Role,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_db_path() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lms-notices");
    std::fs::create_dir_all(&data_dir).ok();
    data_dir.join("preferences.db").to_string_lossy().to_string()
}

fn default_api_base_url() -> String {
    "http://localhost:8080/api/".to_string()
}

fn default_notices_path() -> String {
    "notices".to_string()
}

fn default_web_base_url() -> String {
    "http://localhost:3000/".to_string()
}

fn default_user_id() -> i64 {
    1
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            api_base_url: default_api_base_url(),
            notices_path: default_notices_path(),
            api_token: None,
            web_base_url: default_web_base_url(),
            user_id: default_user_id(),
            role: Role::default(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Both base URLs must be absolute and able to take relative paths.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("api_base_url", &self.api_base_url),
            ("web_base_url", &self.web_base_url),
        ] {
            let url = Url::parse(value)
                .map_err(|e| AppError::Config(format!("{name} {value:?}: {e}")))?;
            if url.cannot_be_a_base() {
                return Err(AppError::Config(format!(
                    "{name} {value:?} cannot be used as a base URL"
                )));
            }
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lms-notices")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: Config = toml::from_str(
            r#"
            api_base_url = "https://lms.example.com/api/"
            role = "instructor"
            user_id = 12
            "#,
        )
        .unwrap();

        assert_eq!(config.api_base_url, "https://lms.example.com/api/");
        assert_eq!(config.role, Role::Instructor);
        assert_eq!(config.user_id, 12);
        assert_eq!(config.notices_path, "notices");
        assert_eq!(config.request_timeout_secs, 10);
        assert!(config.api_token.is_none());
    }

    #[test]
    fn defaults_validate() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn malformed_base_urls_are_config_errors() {
        let config = Config {
            api_base_url: "localhost:8080/api".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(AppError::Config(_))));

        let config = Config {
            web_base_url: "not a url".to_string(),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("web_base_url"));
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(toml::from_str::<Config>("role = \"janitor\"").is_err());
    }
}
