// src/render/text.rs
//! Plain-text layout for the terminal table and dialog

use super::MISSING_MENU;
use crate::api::{Menu, Restaurant};

/// Pad or truncate to exactly `width` characters
pub fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{}{}", text, " ".repeat(width - count))
    } else if width == 0 {
        String::new()
    } else {
        let mut out: String = text.chars().take(width - 1).collect();
        out.push('…');
        out
    }
}

/// Table cells for one restaurant: name, address, company, distance
pub fn restaurant_cells(restaurant: &Restaurant, distance_km: Option<f64>) -> [String; 4] {
    let distance = match distance_km {
        Some(km) if km < 1.0 => format!("{:.0} m", km * 1000.0),
        Some(km) => format!("{:.1} km", km),
        None => "-".to_string(),
    };
    [
        restaurant.name.clone(),
        restaurant.address.clone(),
        restaurant.company.clone(),
        distance,
    ]
}

pub fn error_lines(message: &str) -> Vec<String> {
    vec!["Error".to_string(), String::new(), message.to_string()]
}

/// Day headings followed by aligned `Course | Diet | Price` rows
pub fn menu_lines(menu: &Menu) -> Vec<String> {
    let days = match &menu.days {
        Some(days) => days,
        None => return error_lines(MISSING_MENU),
    };
    if days.is_empty() {
        return vec!["No menu published for this week.".to_string()];
    }

    let courses = days.iter().flat_map(|d| d.courses.iter());
    let name_width = courses
        .clone()
        .map(|c| c.name.chars().count())
        .chain(std::iter::once("Course".len()))
        .max()
        .unwrap_or(0)
        .min(48);
    let diet_width = courses
        .map(|c| c.diets.display().chars().count())
        .chain(std::iter::once("Diet".len()))
        .max()
        .unwrap_or(0)
        .min(24);

    let mut lines = Vec::new();
    for (i, day) in days.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(day.date.clone());
        lines.push(format!("  {}  {}  Price", fit("Course", name_width), fit("Diet", diet_width)));
        for course in &day.courses {
            lines.push(format!(
                "  {}  {}  {}",
                fit(&course.name, name_width),
                fit(&course.diets.display(), diet_width),
                course.price_display()
            ));
        }
    }
    lines
}

/// Contact block shown above the menu
pub fn restaurant_header(restaurant: &Restaurant) -> Vec<String> {
    let mut lines = vec![restaurant.name.clone()];
    let locality = format!("{} {}", restaurant.postal_code, restaurant.city);
    for field in [restaurant.address.as_str(), locality.trim(), restaurant.phone.as_str()] {
        if !field.is_empty() {
            lines.push(field.to_string());
        }
    }
    lines
}
