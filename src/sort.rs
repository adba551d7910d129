// src/sort.rs
//! Distance ordering of restaurants relative to the user

use crate::{api::Restaurant, geo::Position};
use std::cmp::Ordering;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Straight-line distance between two points in the coordinate plane
pub fn calculate_distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt()
}

/// Planar distance in degrees from the user to a restaurant; the sort key
pub fn degree_distance(position: &Position, restaurant: &Restaurant) -> f64 {
    calculate_distance(
        position.latitude,
        position.longitude,
        restaurant.location.latitude(),
        restaurant.location.longitude(),
    )
}

/// Great-circle distance in kilometers, for display only
pub fn distance_km(position: &Position, restaurant: &Restaurant) -> f64 {
    let lat1 = position.latitude.to_radians();
    let lat2 = restaurant.location.latitude().to_radians();
    let dlat = lat2 - lat1;
    let dlon = (restaurant.location.longitude() - position.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Sort nearest first. Stable, so ties keep the API order; NaN sorts last.
pub fn sort_by_distance(restaurants: &mut [Restaurant], position: &Position) {
    restaurants.sort_by(|a, b| {
        let da = degree_distance(position, a);
        let db = degree_distance(position, b);
        match (da.is_nan(), db.is_nan()) {
            (false, false) => da.partial_cmp(&db).unwrap_or(Ordering::Equal),
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (true, true) => Ordering::Equal,
        }
    });
}
