// src/api/mod.rs
//! Restaurant API client and wire types

pub mod client;
pub mod models;

pub use client::ApiClient;
pub use models::{Course, DailyMenu, Day, Diets, Location, Menu, MenuType, Restaurant};
