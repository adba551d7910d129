// src/app.rs
//! Locate, fetch, sort and open menus: the pipeline behind every command

use crate::{
    api::{ApiClient, MenuType, Restaurant},
    config::FinderConfig,
    error::{FinderError, Result},
    geo::{self, GeolocationError, Position, PositionOptions, PositionSource},
    render::Modal,
    sort,
};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Coordinates the position lookup and API calls
pub struct Finder {
    client: ApiClient,
    source: PositionSource,
    options: PositionOptions,
    language: String,
}

impl Finder {
    pub fn new(client: ApiClient, source: PositionSource, options: PositionOptions, language: &str) -> Self {
        Self {
            client,
            source,
            options,
            language: language.to_string(),
        }
    }

    pub fn from_config(config: &FinderConfig) -> Result<Self> {
        let client = ApiClient::new(
            &config.api_url,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(Self::new(
            client,
            config.position_source()?,
            config.position_options(),
            &config.language,
        ))
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn source(&self) -> &PositionSource {
        &self.source
    }

    pub async fn locate(&self) -> std::result::Result<Position, GeolocationError> {
        geo::current_position(&self.source, &self.options).await
    }

    /// Like [`Finder::locate`], but logs the failure and turns it into a
    /// [`FinderError`] so callers stop before touching the API
    pub async fn require_position(&self) -> Result<Position> {
        self.locate().await.map_err(|e| {
            warn!("{}", e);
            FinderError::Geolocation(e)
        })
    }

    pub async fn load_restaurants(&self, position: &Position) -> Result<Vec<Restaurant>> {
        load_restaurants(&self.client, position).await
    }

    /// Resolve the position, then fetch the restaurants sorted around it.
    /// Nothing is requested when the position lookup fails.
    pub async fn locate_and_load(&self) -> Result<(Position, Vec<Restaurant>)> {
        let position = self.require_position().await?;
        let restaurants = self.load_restaurants(&position).await?;
        Ok((position, restaurants))
    }

    pub async fn open_menu(&self, restaurant: &Restaurant, menu_type: MenuType) -> Modal {
        open_menu(&self.client, restaurant, &self.language, menu_type).await
    }
}

/// Fetch all restaurants and order them nearest first
pub async fn load_restaurants(client: &ApiClient, position: &Position) -> Result<Vec<Restaurant>> {
    let mut restaurants = client.fetch_restaurants().await?;
    info!(count = restaurants.len(), "Fetched restaurants");
    sort::sort_by_distance(&mut restaurants, position);
    Ok(restaurants)
}

/// Fetch the weekly menu of `restaurant` and build the dialog for it.
/// `menu_type` is accepted for callers but the weekly menu is always used.
pub async fn open_menu(
    client: &ApiClient,
    restaurant: &Restaurant,
    lang: &str,
    menu_type: MenuType,
) -> Modal {
    debug!(restaurant = %restaurant.id, %menu_type, "Opening menu");
    match client.fetch_weekly_menu(&restaurant.id, lang).await {
        Ok(menu) => {
            debug!(?menu, "Fetched weekly menu");
            Modal::for_menu(restaurant.clone(), menu)
        }
        Err(e) => {
            error!("Error fetching or rendering weekly menu: {}", e);
            Modal::error(e.to_string())
        }
    }
}

/// Find a restaurant by `_id`
pub fn find_restaurant<'a>(restaurants: &'a [Restaurant], id: &str) -> Option<&'a Restaurant> {
    restaurants.iter().find(|r| r.id == id)
}
