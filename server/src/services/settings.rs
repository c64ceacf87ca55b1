//! Settings service
//!
//! Manages server settings persistence using JSON file storage.

use crate::calendar::Calendar;
use crate::config;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

/// HTTP listener configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    config::DEFAULT_HTTP_HOST.to_string()
}

fn default_port() -> u16 {
    config::DEFAULT_HTTP_PORT
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Reference time zone for day boundaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSettings {
    /// Offset east of UTC in minutes (-180 for UTC-3)
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
}

fn default_utc_offset_minutes() -> i32 {
    config::DEFAULT_UTC_OFFSET_MINUTES
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            utc_offset_minutes: default_utc_offset_minutes(),
        }
    }
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AppSettings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub calendar: CalendarSettings,
}

impl AppSettings {
    /// Calendar for the configured reference offset
    pub fn calendar(&self) -> Result<Calendar> {
        Calendar::from_offset_minutes(self.calendar.utc_offset_minutes)
    }

    /// `host:port` for the HTTP listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Service for loading and saving settings
#[derive(Clone)]
pub struct SettingsService {
    settings_path: PathBuf,
}

impl SettingsService {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            settings_path: data_dir.join(config::SETTINGS_FILE_NAME),
        }
    }

    /// Load settings from disk or create default if not exists
    pub async fn load(&self) -> Result<AppSettings> {
        if !self.settings_path.exists() {
            tracing::info!("Settings file not found, creating default settings");
            let default = AppSettings::default();
            self.save(&default).await?;
            return Ok(default);
        }

        let content = fs::read_to_string(&self.settings_path).await?;
        let settings: AppSettings = serde_json::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse settings: {}", e)))?;

        // Reject an unusable offset at startup rather than on first request
        settings.calendar()?;

        Ok(settings)
    }

    /// Save settings to disk
    pub async fn save(&self, settings: &AppSettings) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(settings)?;

        fs::write(&self.settings_path, content).await?;
        tracing::info!("Settings saved to {:?}", self.settings_path);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_service() -> (SettingsService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let service = SettingsService::new(temp_dir.path().to_path_buf());
        (service, temp_dir)
    }

    #[tokio::test]
    async fn test_default_settings_created_on_load() {
        let (service, temp) = create_test_service();

        let settings = service.load().await.unwrap();

        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 3333);
        assert_eq!(settings.calendar.utc_offset_minutes, 0);
        assert!(temp.path().join("settings.json").exists());
    }

    #[tokio::test]
    async fn test_settings_persistence() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().to_path_buf();

        {
            let service = SettingsService::new(data_dir.clone());
            let mut settings = service.load().await.unwrap();
            settings.server.port = 8080;
            settings.calendar.utc_offset_minutes = -180;
            service.save(&settings).await.unwrap();
        }

        {
            let service = SettingsService::new(data_dir);
            let loaded = service.load().await.unwrap();
            assert_eq!(loaded.server.port, 8080);
            assert_eq!(loaded.calendar.utc_offset_minutes, -180);
            assert_eq!(loaded.bind_address(), "0.0.0.0:8080");
        }
    }

    #[tokio::test]
    async fn test_missing_fields_take_defaults() {
        let (service, temp) = create_test_service();

        std::fs::write(
            temp.path().join("settings.json"),
            r#"{ "calendar": { "utc_offset_minutes": 60 } }"#,
        )
        .unwrap();

        let loaded = service.load().await.unwrap();
        assert_eq!(loaded.server, ServerSettings::default());
        assert_eq!(loaded.calendar.utc_offset_minutes, 60);
    }

    #[tokio::test]
    async fn test_out_of_range_offset_rejected() {
        let (service, temp) = create_test_service();

        std::fs::write(
            temp.path().join("settings.json"),
            r#"{ "calendar": { "utc_offset_minutes": 2000 } }"#,
        )
        .unwrap();

        assert!(matches!(service.load().await, Err(AppError::Config(_))));
    }
}
