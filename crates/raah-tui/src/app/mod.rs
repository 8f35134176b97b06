mod notify;
mod update;

#[cfg(test)]
mod tests;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use tokio::sync::mpsc;

use raah_core::Intent;

use crate::model::viewer::ViewerModel;
use crate::theme::Theme;

/// Which pane has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Editions,
    Books,
    Comparison,
}

impl Pane {
    fn next(self) -> Self {
        match self {
            Pane::Editions => Pane::Books,
            Pane::Books => Pane::Comparison,
            Pane::Comparison => Pane::Editions,
        }
    }

    fn prev(self) -> Self {
        match self {
            Pane::Editions => Pane::Comparison,
            Pane::Books => Pane::Editions,
            Pane::Comparison => Pane::Books,
        }
    }
}

/// Input mode determines how keyboard input is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing a chapter number.
    Chapter,
}

/// Main application state.
pub struct App {
    pub theme: Theme,
    pub viewer: ViewerModel,
    pub focus: Pane,
    pub input_mode: InputMode,
    pub edition_cursor: usize,
    pub book_cursor: usize,
    pub comparison_scroll: u16,
    pub chapter_input: String,
    /// Local hint shown in the footer (e.g. why a key did nothing).
    pub status: Option<String>,
    pub show_help: bool,
    pub tick: usize,
    pub should_quit: bool,
    pub visible_rows: usize,
    /// Intents go to the listener task in main, which runs them on the orchestrator.
    pub intent_tx: Option<mpsc::UnboundedSender<Intent>>,
}

impl App {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            viewer: ViewerModel::default(),
            focus: Pane::Editions,
            input_mode: InputMode::Normal,
            edition_cursor: 0,
            book_cursor: 0,
            comparison_scroll: 0,
            chapter_input: String::new(),
            status: None,
            show_help: false,
            tick: 0,
            should_quit: false,
            visible_rows: 20,
            intent_tx: None,
        }
    }

    fn send(&self, intent: Intent) {
        tracing::debug!(?intent, "dispatching intent");
        if let Some(tx) = &self.intent_tx {
            // Closed only during shutdown.
            let _ = tx.send(intent);
        }
    }

    pub fn view(&mut self, f: &mut Frame) {
        let area = f.area();
        let rows = Layout::vertical([
            Constraint::Length(1), // header
            Constraint::Min(5),    // panes
            Constraint::Length(1), // footer
        ])
        .split(area);

        let columns = Layout::horizontal([Constraint::Length(30), Constraint::Min(20)]).split(rows[1]);
        let left = Layout::vertical([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(columns[0]);

        crate::view::status::render_header(f, rows[0], self);
        crate::view::editions::render_in(f, left[0], self);
        crate::view::books::render_in(f, left[1], self);
        crate::view::comparison::render_in(f, columns[1], self);
        crate::view::status::render_footer(f, rows[2], self);

        if self.show_help {
            crate::view::help::render(f, &self.theme);
        }
    }
}
