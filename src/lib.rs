// src/lib.rs
//! Restaurant Finder Library
//!
//! Locates the user, lists nearby restaurants ordered by distance and shows
//! their weekly menus, in a terminal table or as HTML fragments.

pub mod api;
pub mod app;
pub mod config;
pub mod display;
pub mod error;
pub mod geo;
pub mod logging;
pub mod render;
pub mod sort;

// Re-export main types for convenience
pub use api::{ApiClient, Menu, Restaurant};
pub use app::Finder;
pub use config::FinderConfig;
pub use error::{FinderError, Result};
pub use geo::{Position, PositionSource};
