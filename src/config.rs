// src/config.rs
//! Configuration stored as JSON under the user's config directory

use crate::error::{FinderError, Result};
use crate::geo::{PositionOptions, PositionSource};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://10.120.32.94/restaurant/api/v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    pub api_url: String,
    pub language: String,
    pub source_type: String, // "fixed", "gpsd", "serial"
    pub latitude: f64,
    pub longitude: f64,
    pub gpsd_host: Option<String>,
    pub gpsd_port: Option<u16>,
    pub serial_port: Option<String>,
    pub serial_baudrate: Option<u32>,
    pub high_accuracy: bool,
    pub timeout_ms: u64,
    pub maximum_age_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            language: "fi".to_string(),
            source_type: "fixed".to_string(),
            // Helsinki central railway station
            latitude: 60.1719,
            longitude: 24.9414,
            gpsd_host: Some("localhost".to_string()),
            gpsd_port: Some(2947),
            serial_port: None,
            serial_baudrate: Some(9600),
            high_accuracy: true,
            timeout_ms: 5000,
            maximum_age_ms: 0,
            request_timeout_secs: 10,
        }
    }
}

impl FinderConfig {
    /// Load from the config file; a missing file yields the defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        serde_json::from_str(&contents)
            .map_err(|e| FinderError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::get_config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;

        Ok(())
    }

    fn home_dir() -> Result<PathBuf> {
        std::env::var("HOME")
            .map(PathBuf::from)
            .map_err(|_| FinderError::Config("HOME environment variable not set".to_string()))
    }

    pub fn get_config_path() -> Result<PathBuf> {
        Ok(Self::home_dir()?
            .join(".config")
            .join("restaurant-finder")
            .join("config.json"))
    }

    /// Directory for the interactive session log
    pub fn get_data_dir() -> Result<PathBuf> {
        Ok(Self::home_dir()?
            .join(".local")
            .join("share")
            .join("restaurant-finder"))
    }

    pub fn position_source(&self) -> Result<PositionSource> {
        match self.source_type.as_str() {
            "fixed" => Ok(PositionSource::Fixed {
                latitude: self.latitude,
                longitude: self.longitude,
            }),
            "gpsd" => Ok(PositionSource::Gpsd {
                host: self.gpsd_host.clone().unwrap_or_else(|| "localhost".to_string()),
                port: self.gpsd_port.unwrap_or(2947),
            }),
            "serial" => {
                let port = self
                    .serial_port
                    .clone()
                    .ok_or_else(|| FinderError::Config("Serial source selected but no serial_port set".to_string()))?;
                Ok(PositionSource::Serial {
                    port,
                    baudrate: self.serial_baudrate.unwrap_or(9600),
                })
            }
            other => Err(FinderError::Config(format!("Unknown source type: {}", other))),
        }
    }

    pub fn position_options(&self) -> PositionOptions {
        PositionOptions {
            enable_high_accuracy: self.high_accuracy,
            timeout: Duration::from_millis(self.timeout_ms),
            maximum_age: Duration::from_millis(self.maximum_age_ms),
        }
    }

    pub fn update_source(&mut self, source_type: &str) {
        self.source_type = source_type.to_string();
    }

    pub fn update_fixed(&mut self, latitude: f64, longitude: f64) {
        self.source_type = "fixed".to_string();
        self.latitude = latitude;
        self.longitude = longitude;
    }

    pub fn update_serial(&mut self, port: String, baudrate: u32) {
        self.source_type = "serial".to_string();
        self.serial_port = Some(port);
        self.serial_baudrate = Some(baudrate);
    }

    pub fn update_gpsd(&mut self, host: String, port: u16) {
        self.source_type = "gpsd".to_string();
        self.gpsd_host = Some(host);
        self.gpsd_port = Some(port);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("restaurant-finder-test-{}-{}", std::process::id(), name))
            .join("config.json")
    }

    #[test]
    fn test_default_config() {
        let config = FinderConfig::default();
        assert_eq!(config.source_type, "fixed");
        assert_eq!(config.language, "fi");
        assert_eq!(config.position_options(), PositionOptions::default());
    }

    #[test]
    fn test_update_serial() {
        let mut config = FinderConfig::default();
        config.update_serial("/dev/ttyUSB0".to_string(), 115200);
        assert_eq!(
            config.position_source().unwrap(),
            PositionSource::Serial { port: "/dev/ttyUSB0".to_string(), baudrate: 115200 }
        );
    }

    #[test]
    fn test_serial_without_port_is_error() {
        let mut config = FinderConfig::default();
        config.update_source("serial");
        assert!(config.position_source().is_err());

        config.update_source("bluetooth");
        assert!(matches!(config.position_source(), Err(FinderError::Config(_))));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_path("partial");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{"api_url":"http://localhost:3000/api/v1","source_type":"gpsd"}"#).unwrap();

        let config = FinderConfig::load_from(&path).unwrap();
        assert_eq!(config.api_url, "http://localhost:3000/api/v1");
        assert_eq!(config.timeout_ms, 5000);
        assert_eq!(
            config.position_source().unwrap(),
            PositionSource::Gpsd { host: "localhost".to_string(), port: 2947 }
        );

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("save");
        let mut config = FinderConfig::default();
        config.update_gpsd("gps.local".to_string(), 3000);
        config.save_to(&path).unwrap();

        assert_eq!(FinderConfig::load_from(&path).unwrap(), config);
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = FinderConfig::load_from(&temp_path("missing")).unwrap();
        assert_eq!(config, FinderConfig::default());
    }
}
