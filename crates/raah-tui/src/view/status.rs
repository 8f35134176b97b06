use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, InputMode};
use crate::view::spinner_char;

/// Title bar: app name, selection count, position and loading spinner.
pub fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let viewer = &app.viewer;

    let mut spans = vec![
        Span::styled(" RAAH ", theme.header_style()),
        Span::styled(
            format!(" {} ", viewer.selection.count_label()),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
    ];
    if viewer.selection.book_id.is_some() {
        spans.push(Span::styled(
            format!("\u{2502} {} ", viewer.position_label()),
            Style::default().fg(theme.dim),
        ));
    }
    if viewer.loading {
        spans.push(Span::styled(
            format!("{} loading", spinner_char(app.tick)),
            Style::default().fg(theme.spinner),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Bottom line: chapter prompt, error, local hint or key hints, in that order.
pub fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let line = if app.input_mode == InputMode::Chapter {
        Line::from(vec![
            Span::styled(
                format!(" Chapter (1-{}): ", app.viewer.chapter_bound()),
                Style::default().fg(theme.active).add_modifier(Modifier::BOLD),
            ),
            Span::styled(app.chapter_input.clone(), Style::default().fg(theme.text)),
            Span::styled("_", Style::default().fg(theme.active)),
        ])
    } else if let Some(error) = &app.viewer.error {
        Line::from(vec![
            Span::styled(
                format!(" \u{2716} {error}"),
                Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  r:retry", theme.footer_style()),
        ])
    } else if let Some(status) = &app.status {
        Line::from(Span::styled(format!(" {status}"), Style::default().fg(theme.missing)))
    } else {
        Line::from(Span::styled(
            " Tab:pane  Space:select  n/p:chapter  c:go to chapter  r:refresh  ?:help  q:quit",
            theme.footer_style(),
        ))
    };

    f.render_widget(Paragraph::new(line), area);
}
