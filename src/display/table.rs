// src/display/table.rs
//! State of the restaurant table: rows, highlight, dialog and input mapping

use crate::{
    api::{MenuType, Restaurant},
    error::Result,
    geo::Position,
    render::Modal,
    sort,
};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tracing::error;

/// Screen line of the first restaurant row (title, status, blank, header, rule)
pub const TABLE_TOP: u16 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub restaurant: Restaurant,
    pub distance_km: Option<f64>,
}

/// What the event loop should do after an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Redraw,
    Open(usize),
    Quit,
}

#[derive(Debug, Default)]
pub struct TableState {
    rows: Vec<Row>,
    cursor: usize,
    highlighted: Option<usize>,
    scroll: usize,
    modal: Option<Modal>,
    modal_scroll: usize,
    menu_type: MenuType,
    pub status: String,
}

impl TableState {
    pub fn new(menu_type: MenuType) -> Self {
        Self {
            menu_type,
            ..Default::default()
        }
    }

    /// Replace the table contents. Rows must already be in display order.
    pub fn set_rows(&mut self, restaurants: Vec<Restaurant>, position: Option<&Position>) {
        self.rows = restaurants
            .into_iter()
            .map(|restaurant| Row {
                distance_km: position.map(|p| sort::distance_km(p, &restaurant)),
                restaurant,
            })
            .collect();
        self.cursor = 0;
        self.highlighted = None;
        self.scroll = 0;
    }

    /// Fill the table from a restaurant fetch. A failed fetch leaves the
    /// table empty and shows the error dialog.
    pub fn apply_load(&mut self, result: Result<Vec<Restaurant>>, position: &Position) {
        match result {
            Ok(restaurants) => {
                self.status = format!("{} restaurants near {}", restaurants.len(), position);
                self.set_rows(restaurants, Some(position));
            }
            Err(e) => {
                error!("Error fetching or rendering restaurants: {}", e);
                self.status = "Could not load restaurants".to_string();
                self.set_rows(Vec::new(), Some(position));
                self.show_modal(Modal::error(e.to_string()));
            }
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn menu_type(&self) -> MenuType {
        self.menu_type
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn modal_scroll(&self) -> usize {
        self.modal_scroll
    }

    /// Highlight a row, clearing any previous highlight
    pub fn select(&mut self, index: usize) -> Option<&Restaurant> {
        let row = self.rows.get(index)?;
        self.cursor = index;
        self.highlighted = Some(index);
        Some(&row.restaurant)
    }

    /// Replace the dialog contents and show it
    pub fn show_modal(&mut self, modal: Modal) {
        self.modal = Some(modal);
        self.modal_scroll = 0;
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
        self.modal_scroll = 0;
    }

    /// Stop the dialog scrolling past its last page
    pub fn clamp_modal_scroll(&mut self, max: usize) {
        self.modal_scroll = self.modal_scroll.min(max);
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }

    /// Keep the cursor inside a window of `visible` rows
    pub fn adjust_scroll(&mut self, visible: usize) {
        if visible == 0 {
            return;
        }
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        } else if self.cursor >= self.scroll + visible {
            self.scroll = self.cursor + 1 - visible;
        }
    }

    /// Row index under a screen line, if any
    pub fn row_at(&self, screen_row: u16) -> Option<usize> {
        let offset = screen_row.checked_sub(TABLE_TOP)? as usize;
        let index = self.scroll + offset;
        (index < self.rows.len()).then_some(index)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.kind == KeyEventKind::Release {
            return Action::None;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        if self.modal.is_some() {
            match key.code {
                KeyCode::Up | KeyCode::Char('k') => self.modal_scroll = self.modal_scroll.saturating_sub(1),
                KeyCode::Down | KeyCode::Char('j') => self.modal_scroll += 1,
                KeyCode::PageUp => self.modal_scroll = self.modal_scroll.saturating_sub(10),
                KeyCode::PageDown => self.modal_scroll += 10,
                _ => self.close_modal(),
            }
            return Action::Redraw;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_cursor(-1);
                Action::Redraw
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_cursor(1);
                Action::Redraw
            }
            KeyCode::PageUp => {
                self.move_cursor(-10);
                Action::Redraw
            }
            KeyCode::PageDown => {
                self.move_cursor(10);
                Action::Redraw
            }
            KeyCode::Home => {
                self.cursor = 0;
                Action::Redraw
            }
            KeyCode::End => {
                self.move_cursor(isize::MAX);
                Action::Redraw
            }
            KeyCode::Enter | KeyCode::Char(' ') if !self.rows.is_empty() => Action::Open(self.cursor),
            _ => Action::None,
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Action {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.modal.is_some() {
                    self.close_modal();
                    return Action::Redraw;
                }
                match self.row_at(mouse.row) {
                    Some(index) => Action::Open(index),
                    None => Action::None,
                }
            }
            MouseEventKind::ScrollUp => {
                if self.modal.is_some() {
                    self.modal_scroll = self.modal_scroll.saturating_sub(1);
                } else {
                    self.move_cursor(-1);
                }
                Action::Redraw
            }
            MouseEventKind::ScrollDown => {
                if self.modal.is_some() {
                    self.modal_scroll += 1;
                } else {
                    self.move_cursor(1);
                }
                Action::Redraw
            }
            _ => Action::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{api::Location, error::FinderError};

    fn restaurants(n: usize) -> Vec<Restaurant> {
        (0..n)
            .map(|i| Restaurant {
                id: format!("id{}", i),
                company_id: None,
                name: format!("R{}", i),
                address: String::new(),
                postal_code: String::new(),
                city: String::new(),
                phone: String::new(),
                location: Location {
                    kind: "Point".to_string(),
                    coordinates: [24.9, 60.1 + i as f64 * 0.01],
                },
                company: String::new(),
            })
            .collect()
    }

    fn state(n: usize) -> TableState {
        let mut state = TableState::new(MenuType::default());
        state.set_rows(restaurants(n), Some(&Position::new(60.1, 24.9, "fixed")));
        state
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 3,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_distances_filled() {
        let state = state(2);
        assert!(state.rows()[0].distance_km.unwrap() < 0.01);
        assert!(state.rows()[1].distance_km.unwrap() > 1.0);
        assert_eq!(state.menu_type(), MenuType::Daily);
    }

    #[test]
    fn test_single_highlight() {
        let mut state = state(3);
        state.select(0);
        state.select(2);
        assert_eq!(state.highlighted(), Some(2));
        assert!(state.select(7).is_none());
        assert_eq!(state.highlighted(), Some(2));
    }

    #[test]
    fn test_cursor_bounds() {
        let mut state = state(3);
        assert_eq!(state.handle_key(key(KeyCode::Up)), Action::Redraw);
        assert_eq!(state.cursor(), 0);
        state.handle_key(key(KeyCode::End));
        assert_eq!(state.cursor(), 2);
        state.handle_key(key(KeyCode::Down));
        assert_eq!(state.cursor(), 2);
        assert_eq!(state.handle_key(key(KeyCode::Enter)), Action::Open(2));
    }

    #[test]
    fn test_click_maps_to_row() {
        let mut state = state(3);
        assert_eq!(state.handle_mouse(click(TABLE_TOP + 1)), Action::Open(1));
        assert_eq!(state.handle_mouse(click(TABLE_TOP + 3)), Action::None);
        assert_eq!(state.handle_mouse(click(1)), Action::None);
    }

    #[test]
    fn test_click_respects_scroll() {
        let mut state = state(20);
        state.handle_key(key(KeyCode::End));
        state.adjust_scroll(5);
        assert_eq!(state.scroll(), 15);
        assert_eq!(state.row_at(TABLE_TOP), Some(15));
    }

    #[test]
    fn test_modal_closes_on_click_and_key() {
        let mut state = state(1);
        state.show_modal(Modal::error("boom"));
        assert_eq!(state.handle_mouse(click(TABLE_TOP)), Action::Redraw);
        assert!(state.modal().is_none());

        state.show_modal(Modal::error("boom"));
        state.handle_key(key(KeyCode::Down));
        assert_eq!(state.modal_scroll(), 1);
        assert!(state.modal().is_some());
        state.handle_key(key(KeyCode::Char('x')));
        assert!(state.modal().is_none());
    }

    #[test]
    fn test_modal_scroll_keys_then_close() {
        let mut state = state(1);
        state.show_modal(Modal::error("long"));
        state.handle_key(key(KeyCode::PageDown));
        assert_eq!(state.modal_scroll(), 10);
        state.handle_key(key(KeyCode::Char('k')));
        state.handle_key(key(KeyCode::PageUp));
        assert_eq!(state.modal_scroll(), 0);
        assert!(state.modal().is_some());

        assert_eq!(state.handle_key(key(KeyCode::Enter)), Action::Redraw);
        assert!(state.modal().is_none());
        assert_eq!(state.highlighted(), None);
    }

    #[test]
    fn test_failed_load_shows_error_dialog() {
        let position = Position::new(60.1, 24.9, "fixed");
        let mut state = TableState::new(MenuType::default());
        state.apply_load(Err(FinderError::Api { status: 500 }), &position);

        assert!(state.rows().is_empty());
        assert!(state.modal().unwrap().is_error());
        assert_eq!(state.status, "Could not load restaurants");
        assert_eq!(state.handle_key(key(KeyCode::Enter)), Action::Redraw);
        assert_eq!(state.handle_key(key(KeyCode::Enter)), Action::None);
    }

    #[test]
    fn test_successful_load_fills_rows() {
        let position = Position::new(60.1, 24.9, "fixed");
        let mut state = TableState::new(MenuType::default());
        state.apply_load(Ok(restaurants(3)), &position);

        assert_eq!(state.rows().len(), 3);
        assert!(state.modal().is_none());
        assert!(state.status.starts_with("3 restaurants near"));
    }

    #[test]
    fn test_quit_keys() {
        let mut state = state(0);
        assert_eq!(state.handle_key(key(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(state.handle_key(key(KeyCode::Enter)), Action::None);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        state.show_modal(Modal::error("x"));
        assert_eq!(state.handle_key(ctrl_c), Action::Quit);
    }
}
