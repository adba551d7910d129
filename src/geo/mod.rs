// src/geo/mod.rs
//! Position sources and parsing

pub mod data;
pub mod gpsd;
pub mod nmea;
pub mod provider;

pub use data::{ErrorCode, GeolocationError, Position, PositionFix};
pub use provider::{current_position, PositionOptions, PositionSource};
