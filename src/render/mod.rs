// src/render/mod.rs
//! Table and dialog rendering

pub mod html;
pub mod text;

use crate::api::{Menu, Restaurant};

pub const MISSING_MENU: &str = "Menu data is missing or invalid.";

/// Contents of the dialog shown after a restaurant is selected
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    Menu { restaurant: Restaurant, menu: Menu },
    Error(String),
}

impl Modal {
    /// A menu without days turns into the error dialog
    pub fn for_menu(restaurant: Restaurant, menu: Menu) -> Self {
        if menu.days.is_none() {
            Modal::Error(MISSING_MENU.to_string())
        } else {
            Modal::Menu { restaurant, menu }
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Modal::Error(message.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Modal::Error(_))
    }

    pub fn to_html(&self) -> String {
        match self {
            Modal::Menu { restaurant, menu } => html::restaurant_modal(restaurant, menu),
            Modal::Error(message) => html::error_modal(message),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        match self {
            Modal::Menu { restaurant, menu } => {
                let mut lines = text::restaurant_header(restaurant);
                lines.push(String::new());
                lines.extend(text::menu_lines(menu));
                lines
            }
            Modal::Error(message) => text::error_lines(message),
        }
    }
}
