// src/geo/data.rs
//! Position data structures and utilities

use chrono::{DateTime, Utc};
use std::fmt;

/// A resolved user position, the result of a successful lookup
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,   // meters
    pub timestamp: DateTime<Utc>,
    pub source: String,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64, source: &str) -> Self {
        Self {
            latitude,
            longitude,
            accuracy: None,
            timestamp: Utc::now(),
            source: source.to_string(),
        }
    }

    /// Whether both coordinates are finite and inside the WGS84 range
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}°, {:.6}°", self.latitude, self.longitude)?;
        if let Some(acc) = self.accuracy {
            write!(f, " (±{:.0} m)", acc)?;
        }
        write!(f, " via {}", self.source)
    }
}

/// Fix state accumulated from a live receiver, one sentence at a time
#[derive(Debug, Clone, Default)]
pub struct PositionFix {
    pub timestamp: Option<DateTime<Utc>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<f64>,
    pub fix_quality: Option<u8>, // NMEA GGA quality
    pub mode: Option<u8>,        // gpsd TPV mode
    pub hdop: Option<f64>,
    pub accuracy: Option<f64>,   // meters
    pub source: Option<String>,
}

impl PositionFix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_fix(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }

    /// A fix that a high-accuracy request is willing to accept.
    /// gpsd mode 1 means "no fix" and NMEA quality 0 means "invalid".
    pub fn has_quality_fix(&self) -> bool {
        if !self.has_fix() {
            return false;
        }
        if matches!(self.mode, Some(m) if m < 2) {
            return false;
        }
        !matches!(self.fix_quality, Some(0))
    }

    pub fn update_timestamp(&mut self) {
        self.timestamp = Some(Utc::now());
    }

    pub fn set_source(&mut self, source: &str) {
        self.source = Some(source.to_string());
    }

    /// Convert to a [`Position`] once both coordinates are known
    pub fn to_position(&self) -> Option<Position> {
        let (latitude, longitude) = (self.latitude?, self.longitude?);
        Some(Position {
            latitude,
            longitude,
            accuracy: self.accuracy,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            source: self.source.clone().unwrap_or_else(|| "unknown".to_string()),
        })
    }

    /// Get fix type description
    pub fn get_fix_description(&self) -> String {
        if let Some(quality) = self.fix_quality {
            match quality {
                0 => "No fix".to_string(),
                1 => "GPS".to_string(),
                2 => "DGPS".to_string(),
                4 => "RTK".to_string(),
                5 => "Float RTK".to_string(),
                6 => "Estimated".to_string(),
                _ => format!("Unknown ({})", quality),
            }
        } else if let Some(m) = self.mode {
            match m {
                1 => "No fix".to_string(),
                2 => "2D fix".to_string(),
                3 => "3D fix".to_string(),
                _ => format!("Mode {}", m),
            }
        } else {
            "Unknown".to_string()
        }
    }
}

/// Reason a position lookup failed, numbered like the W3C geolocation codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    PermissionDenied = 1,
    PositionUnavailable = 2,
    Timeout = 3,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeolocationError {
    pub code: ErrorCode,
    pub message: String,
}

impl GeolocationError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PositionUnavailable, message)
    }
}

impl fmt::Display for GeolocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ERROR({}): {}", self.code as u8, self.message)
    }
}

impl std::error::Error for GeolocationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_requires_both_coordinates() {
        let mut fix = PositionFix::new();
        fix.latitude = Some(60.17);
        assert!(!fix.has_fix());
        assert!(fix.to_position().is_none());

        fix.longitude = Some(24.94);
        fix.set_source("gpsd");
        let pos = fix.to_position().unwrap();
        assert_eq!(pos.latitude, 60.17);
        assert_eq!(pos.source, "gpsd");
    }

    #[test]
    fn test_quality_fix_rejects_no_fix_modes() {
        let mut fix = PositionFix::new();
        fix.latitude = Some(1.0);
        fix.longitude = Some(2.0);
        assert!(fix.has_quality_fix());

        fix.mode = Some(1);
        assert!(!fix.has_quality_fix());

        fix.mode = Some(3);
        fix.fix_quality = Some(0);
        assert!(!fix.has_quality_fix());
    }

    #[test]
    fn test_position_validity() {
        assert!(Position::new(60.0, 24.0, "fixed").is_valid());
        assert!(!Position::new(91.0, 24.0, "fixed").is_valid());
        assert!(!Position::new(60.0, f64::NAN, "fixed").is_valid());
    }

    #[test]
    fn test_error_display() {
        let err = GeolocationError::new(ErrorCode::PermissionDenied, "User denied Geolocation");
        assert_eq!(err.to_string(), "ERROR(1): User denied Geolocation");
    }
}
