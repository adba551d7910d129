// src/api/client.rs
//! HTTP client for the restaurant API

use super::models::{DailyMenu, Menu, Restaurant};
use crate::error::{FinderError, Result};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        let base = Url::parse(base_url)
            .map_err(|e| FinderError::Config(format!("Invalid API URL {}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(FinderError::Config(format!("Invalid API URL {}", base_url)));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("RestaurantFinder/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| FinderError::Other(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
            base,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Append path segments to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| FinderError::Config(format!("Invalid API URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET `url` and decode the JSON body. Non-2xx statuses are errors.
    pub async fn fetch_data<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(url, "GET");
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FinderError::Api { status: status.as_u16() });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn fetch_restaurants(&self) -> Result<Vec<Restaurant>> {
        let url = self.endpoint(&["restaurants"])?;
        self.fetch_data(url.as_str()).await
    }

    pub async fn fetch_weekly_menu(&self, restaurant_id: &str, lang: &str) -> Result<Menu> {
        let url = self.endpoint(&["restaurants", "weekly", restaurant_id, lang])?;
        self.fetch_data(url.as_str()).await
    }

    pub async fn fetch_daily_menu(&self, restaurant_id: &str, lang: &str) -> Result<DailyMenu> {
        let url = self.endpoint(&["restaurants", "daily", restaurant_id, lang])?;
        self.fetch_data(url.as_str()).await
    }
}
