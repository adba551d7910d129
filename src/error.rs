// src/error.rs
//! Error types for the restaurant finder

use crate::geo::GeolocationError;
use std::fmt;

pub type Result<T> = std::result::Result<T, FinderError>;

#[derive(Debug)]
pub enum FinderError {
    Io(std::io::Error),
    Serial(tokio_serial::Error),
    Json(serde_json::Error),
    Http(reqwest::Error),
    /// Non-success HTTP status returned by the restaurant API
    Api { status: u16 },
    Connection(String),
    Parse(String),
    Geolocation(GeolocationError),
    Config(String),
    Other(String),
}

impl fmt::Display for FinderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinderError::Io(e) => write!(f, "IO error: {}", e),
            FinderError::Serial(e) => write!(f, "Serial error: {}", e),
            FinderError::Json(e) => write!(f, "JSON error: {}", e),
            FinderError::Http(e) => write!(f, "HTTP error: {}", e),
            FinderError::Api { status } => write!(f, "Error {} occurred", status),
            FinderError::Connection(msg) => write!(f, "Connection error: {}", msg),
            FinderError::Parse(msg) => write!(f, "Parse error: {}", msg),
            FinderError::Geolocation(e) => write!(f, "{}", e),
            FinderError::Config(msg) => write!(f, "Config error: {}", msg),
            FinderError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for FinderError {}

impl From<std::io::Error> for FinderError {
    fn from(error: std::io::Error) -> Self {
        FinderError::Io(error)
    }
}

impl From<tokio_serial::Error> for FinderError {
    fn from(error: tokio_serial::Error) -> Self {
        FinderError::Serial(error)
    }
}

impl From<serde_json::Error> for FinderError {
    fn from(error: serde_json::Error) -> Self {
        FinderError::Json(error)
    }
}

impl From<reqwest::Error> for FinderError {
    fn from(error: reqwest::Error) -> Self {
        FinderError::Http(error)
    }
}

impl From<GeolocationError> for FinderError {
    fn from(error: GeolocationError) -> Self {
        FinderError::Geolocation(error)
    }
}

impl From<anyhow::Error> for FinderError {
    fn from(error: anyhow::Error) -> Self {
        FinderError::Other(error.to_string())
    }
}
