use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

use crate::app::{App, Pane};
use crate::view::truncate;

/// Edition catalog with selection markers. Unselected editions are dimmed
/// once the cap is reached.
pub fn render_in(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let selection = &app.viewer.selection;
    let width = area.width.saturating_sub(10) as usize;

    let items: Vec<ListItem> = app
        .viewer
        .editions
        .iter()
        .map(|edition| {
            let selected = selection.is_selected(&edition.id);
            let (marker, style) = if selected {
                ("[x]", Style::default().fg(theme.selected).add_modifier(Modifier::BOLD))
            } else if selection.can_add() {
                ("[ ]", Style::default().fg(theme.text))
            } else {
                ("[-]", Style::default().fg(theme.dim))
            };
            let label = if edition.name.is_empty() {
                format!("{} ({})", edition.abbreviation, edition.language)
            } else {
                format!("{} \u{00B7} {}", edition.abbreviation, edition.language)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{marker} "), style),
                Span::styled(truncate(&label, width), style),
            ]))
        })
        .collect();

    let focused = app.focus == Pane::Editions;
    let title = if app.viewer.editions.is_empty() && !app.viewer.loading {
        " Versions (none) ".to_string()
    } else {
        format!(" Versions ({}) ", app.viewer.editions.len())
    };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style(focused))
                .title(title),
        )
        .highlight_style(theme.highlight_style());

    let mut state = ListState::default();
    if focused && !app.viewer.editions.is_empty() {
        state.select(Some(app.edition_cursor));
    }
    f.render_stateful_widget(list, area, &mut state);
}
