// src/display/terminal.rs
//! Interactive terminal table with a menu dialog

use super::table::{Action, TableState, TABLE_TOP};
use crate::{
    api::MenuType,
    app::Finder,
    error::Result,
    geo::Position,
    render::text,
};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::{
    io::{self, Write},
    time::Duration,
};
use tracing::{info, warn};

const SEPARATOR: &str = "  ";
const DISTANCE_WIDTH: usize = 8;
const CLOSE_HINT: &str = " arrows scroll, other keys close ";

/// Restores the terminal even when the event loop bails out early
struct TerminalGuard;

impl TerminalGuard {
    fn enter(stdout: &mut impl Write) -> Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture, Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, Show, DisableMouseCapture, LeaveAlternateScreen) {
            warn!("Failed to restore terminal screen: {}", e);
        }
        if let Err(e) = terminal::disable_raw_mode() {
            warn!("Failed to disable raw mode: {}", e);
        }
    }
}

/// Widths of the name, address, company and distance columns
pub fn column_widths(width: u16) -> [usize; 4] {
    let width = width as usize;
    let fixed = DISTANCE_WIDTH + SEPARATOR.len() * 3 + 2;
    let flexible = width.saturating_sub(fixed);
    let company = (flexible / 5).clamp(6, 20).min(flexible);
    let rest = flexible.saturating_sub(company);
    let name = rest * 11 / 20;
    let address = rest - name;
    [name, address, company, DISTANCE_WIDTH]
}

fn format_row(cells: &[String; 4], widths: &[usize; 4]) -> String {
    let parts: Vec<String> = cells
        .iter()
        .zip(widths.iter())
        .enumerate()
        .map(|(i, (cell, &w))| {
            if i == 3 {
                format!("{:>w$}", cell, w = w)
            } else {
                text::fit(cell, w)
            }
        })
        .collect();
    format!(" {} ", parts.join(SEPARATOR))
}

pub struct TerminalDisplay {
    menu_type: MenuType,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self {
            menu_type: MenuType::default(),
        }
    }

    /// Run the table until the user quits
    pub async fn run(&self, finder: &Finder, position: &Position) -> Result<()> {
        let mut stdout = io::stdout();
        let _guard = TerminalGuard::enter(&mut stdout)?;

        let mut state = TableState::new(self.menu_type);
        state.status = format!("Loading restaurants near {} ...", position);
        self.draw(&mut stdout, &mut state)?;

        state.apply_load(finder.load_restaurants(position).await, position);
        self.draw(&mut stdout, &mut state)?;

        loop {
            if !event::poll(Duration::from_millis(250))? {
                continue;
            }

            let action = match event::read()? {
                Event::Key(key) => state.handle_key(key),
                Event::Mouse(mouse) => state.handle_mouse(mouse),
                Event::Resize(_, _) => Action::Redraw,
                _ => Action::None,
            };

            match action {
                Action::None => {}
                Action::Redraw => self.draw(&mut stdout, &mut state)?,
                Action::Quit => break,
                Action::Open(index) => {
                    let Some(restaurant) = state.select(index).cloned() else {
                        continue;
                    };
                    let status = std::mem::replace(
                        &mut state.status,
                        format!("Loading menu for {} ...", restaurant.name),
                    );
                    self.draw(&mut stdout, &mut state)?;

                    let modal = finder.open_menu(&restaurant, state.menu_type()).await;
                    state.show_modal(modal);
                    state.status = status;
                    self.draw(&mut stdout, &mut state)?;
                }
            }
        }

        info!("Closing restaurant table");
        Ok(())
    }

    fn draw(&self, stdout: &mut impl Write, state: &mut TableState) -> Result<()> {
        let (width, height) = terminal::size()?;
        let visible = height.saturating_sub(TABLE_TOP + 1) as usize;
        state.adjust_scroll(visible);
        let widths = column_widths(width);

        queue!(
            stdout,
            Clear(ClearType::All),
            MoveTo(0, 0),
            SetForegroundColor(Color::Green),
            SetAttribute(Attribute::Bold),
            Print(text::fit(" Restaurant Finder", width as usize)),
            SetAttribute(Attribute::Reset),
            ResetColor,
            MoveTo(0, 1),
            Print(text::fit(&format!(" {}", state.status), width as usize)),
        )?;

        let header = [
            "Name".to_string(),
            "Address".to_string(),
            "Company".to_string(),
            "Distance".to_string(),
        ];
        queue!(
            stdout,
            MoveTo(0, TABLE_TOP - 2),
            SetForegroundColor(Color::Yellow),
            Print(format_row(&header, &widths)),
            MoveTo(0, TABLE_TOP - 1),
            Print("-".repeat(width as usize)),
            ResetColor,
        )?;

        let rows = state.rows().iter().enumerate().skip(state.scroll()).take(visible);
        for (line, (index, row)) in rows.enumerate() {
            let cells = text::restaurant_cells(&row.restaurant, row.distance_km);
            queue!(stdout, MoveTo(0, TABLE_TOP + line as u16))?;
            if state.highlighted() == Some(index) {
                queue!(stdout, SetBackgroundColor(Color::DarkYellow), SetForegroundColor(Color::Black))?;
            }
            if state.cursor() == index {
                queue!(stdout, SetAttribute(Attribute::Reverse))?;
            }
            queue!(
                stdout,
                Print(format_row(&cells, &widths)),
                SetAttribute(Attribute::Reset),
                ResetColor
            )?;
        }

        queue!(
            stdout,
            MoveTo(0, height.saturating_sub(1)),
            SetForegroundColor(Color::DarkGrey),
            Print(text::fit(
                " Up/Down move   Enter or click: weekly menu   q quit",
                width as usize
            )),
            ResetColor
        )?;

        if state.modal().is_some() {
            self.draw_modal(stdout, state, width, height)?;
        }

        stdout.flush()?;
        Ok(())
    }

    fn draw_modal(&self, stdout: &mut impl Write, state: &mut TableState, width: u16, height: u16) -> Result<()> {
        let Some(modal) = state.modal() else {
            return Ok(());
        };
        let lines = modal.lines();
        let accent = if modal.is_error() { Color::Red } else { Color::Cyan };

        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let box_width = (longest + 4).max(30).min(width.saturating_sub(2) as usize);
        let box_height = (lines.len() + 2).min(height.saturating_sub(2) as usize).max(3);
        let inner_width = box_width.saturating_sub(4);
        let inner_height = box_height - 2;
        let left = (width as usize).saturating_sub(box_width) / 2;
        let top = (height as usize).saturating_sub(box_height) / 2;

        let max_scroll = lines.len().saturating_sub(inner_height);
        state.clamp_modal_scroll(max_scroll);
        let scroll = state.modal_scroll();

        let horizontal = "─".repeat(box_width.saturating_sub(2));
        let bottom = (top + box_height - 1) as u16;
        queue!(
            stdout,
            SetForegroundColor(accent),
            MoveTo(left as u16, top as u16),
            Print(format!("┌{}┐", horizontal)),
            MoveTo(left as u16, bottom),
            Print(format!("└{}┘", horizontal)),
        )?;
        if box_width >= CLOSE_HINT.len() + 4 {
            queue!(stdout, MoveTo(left as u16 + 2, bottom), Print(CLOSE_HINT))?;
        }
        queue!(stdout, ResetColor)?;

        for row in 0..inner_height {
            let content = lines.get(scroll + row).map(String::as_str).unwrap_or("");
            queue!(
                stdout,
                MoveTo(left as u16, (top + 1 + row) as u16),
                SetForegroundColor(accent),
                Print("│ "),
                ResetColor,
            )?;
            if row == 0 && scroll == 0 {
                queue!(stdout, SetAttribute(Attribute::Bold))?;
            }
            queue!(
                stdout,
                Print(text::fit(content, inner_width)),
                SetAttribute(Attribute::Reset),
                SetForegroundColor(accent),
                Print(" │"),
                ResetColor
            )?;
        }

        Ok(())
    }
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_widths_fill_line() {
        for width in [40u16, 80, 120, 200] {
            let widths = column_widths(width);
            let line = format_row(
                &["a".to_string(), "b".to_string(), "c".to_string(), "1 km".to_string()],
                &widths,
            );
            assert_eq!(line.chars().count(), width as usize, "width {}", width);
        }
    }

    #[test]
    fn test_narrow_terminal_does_not_panic() {
        let widths = column_widths(5);
        assert_eq!(widths[3], DISTANCE_WIDTH);
        assert_eq!(widths[0] + widths[1] + widths[2], 0);
    }
}
