// src/render/html.rs
//! HTML fragments for the restaurant table and the menu dialog

use super::MISSING_MENU;
use crate::api::{Day, Menu, Restaurant};

/// Escape text for use inside element content
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn restaurant_row(restaurant: &Restaurant) -> String {
    format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
        escape(&restaurant.name),
        escape(&restaurant.address),
        escape(&restaurant.company)
    )
}

/// The whole restaurant list as one table, rows in the given order
pub fn restaurant_table(restaurants: &[Restaurant]) -> String {
    let rows: String = restaurants.iter().map(restaurant_row).collect();
    format!("<table>{}</table>", rows)
}

pub fn error_modal(message: &str) -> String {
    format!("<h3>Error</h3><p>{}</p>", escape(message))
}

fn day_html(day: &Day) -> String {
    let rows: String = day
        .courses
        .iter()
        .map(|course| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&course.name),
                escape(&course.diets.display()),
                escape(course.price_display())
            )
        })
        .collect();

    format!(
        "<h4>{}</h4><table><tr><th>Course</th><th>Diet</th><th>Price</th></tr>{}</table>",
        escape(&day.date),
        rows
    )
}

/// One heading and course table per day, or the error fragment when the
/// menu carries no days
pub fn menu_html(menu: &Menu) -> String {
    match &menu.days {
        Some(days) => days.iter().map(day_html).collect(),
        None => error_modal(MISSING_MENU),
    }
}

pub fn restaurant_modal(restaurant: &Restaurant, menu: &Menu) -> String {
    if menu.days.is_none() {
        return error_modal(MISSING_MENU);
    }
    format!(
        "<h3>{}</h3><p>{}</p><p>{} {}</p><p>{}</p><p>{}</p>{}",
        escape(&restaurant.name),
        escape(&restaurant.address),
        escape(&restaurant.postal_code),
        escape(&restaurant.city),
        escape(&restaurant.phone),
        escape(&restaurant.company),
        menu_html(menu)
    )
}
