use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

use raah_core::ChapterCount;

use crate::app::{App, Pane};
use crate::view::truncate;

pub fn render_in(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let current = app.viewer.selection.book_id.as_deref();
    let width = area.width.saturating_sub(9) as usize;

    let items: Vec<ListItem> = app
        .viewer
        .books
        .iter()
        .map(|book| {
            let is_current = current == Some(book.id.as_str());
            let style = if is_current {
                Style::default().fg(theme.selected).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            let count = match book.chapter_count {
                ChapterCount::Known(n) => n.to_string(),
                ChapterCount::Unknown => "?".to_string(),
            };
            ListItem::new(Line::from(vec![
                Span::styled(if is_current { "\u{25B8} " } else { "  " }, style),
                Span::styled(format!("{:<w$}", truncate(&book.name, width), w = width), style),
                Span::styled(format!("{count:>3}"), Style::default().fg(theme.dim)),
            ]))
        })
        .collect();

    // Books come from one edition; say which.
    let title = match &app.viewer.books_source {
        Some(source) => format!(" Books \u{00B7} {} ", app.viewer.abbreviation(source)),
        None => " Books ".to_string(),
    };
    let focused = app.focus == Pane::Books;
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style(focused))
                .title(title),
        )
        .highlight_style(theme.highlight_style());

    let mut state = ListState::default();
    if !app.viewer.books.is_empty() {
        state.select(Some(app.book_cursor));
    }
    f.render_stateful_widget(list, area, &mut state);
}
