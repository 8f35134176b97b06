use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use raah_core::ComparisonPayload;

use crate::app::{App, Pane};
use crate::model::viewer::ViewerModel;
use crate::theme::Theme;

pub const MISSING_VERSE: &str = "Verse not available";

pub fn render_in(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let focused = app.focus == Pane::Comparison;

    let (title, lines) = match &app.viewer.comparison {
        Some(payload) => (
            format!(" {} ", payload.heading()),
            comparison_lines(payload, &app.viewer, theme),
        ),
        None => (" Comparison ".to_string(), placeholder(&app.viewer, theme)),
    };

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style(focused))
                .title(title)
                .title_alignment(Alignment::Center),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.comparison_scroll, 0));
    f.render_widget(paragraph, area);
}

/// Edition badges, then each verse with one line per selected edition in
/// selection order.
fn comparison_lines<'a>(
    payload: &'a ComparisonPayload,
    viewer: &'a ViewerModel,
    theme: &Theme,
) -> Vec<Line<'a>> {
    let editions = &viewer.selection.edition_ids;
    let badge_width = editions
        .iter()
        .map(|id| viewer.abbreviation(id).chars().count())
        .max()
        .unwrap_or(0);

    let mut badges = vec![Span::raw(" ")];
    for id in editions {
        badges.push(Span::styled(
            format!(" {} ", viewer.abbreviation(id)),
            theme.badge_style(),
        ));
        badges.push(Span::raw(" "));
    }
    let mut lines = vec![Line::from(badges), Line::from("")];

    if payload.verses.is_empty() {
        lines.push(Line::from(Span::styled(
            " No verses in this chapter",
            Style::default().fg(theme.dim),
        )));
        return lines;
    }

    for verse in &payload.verses {
        lines.push(Line::from(Span::styled(
            format!(" {}", verse.number),
            Style::default().fg(theme.active).add_modifier(Modifier::BOLD),
        )));
        for id in editions {
            let label = Span::styled(
                format!("   {:<w$} \u{2502} ", viewer.abbreviation(id), w = badge_width),
                Style::default().fg(theme.dim),
            );
            let text = match verse.text_for(id) {
                Some(text) => Span::styled(text, Style::default().fg(theme.text)),
                None => Span::styled(MISSING_VERSE, theme.missing_style()),
            };
            lines.push(Line::from(vec![label, text]));
        }
    }
    lines
}

/// Why there is nothing to show yet.
fn placeholder<'a>(viewer: &ViewerModel, theme: &Theme) -> Vec<Line<'a>> {
    let message = if viewer.loading {
        "Loading\u{2026}"
    } else if viewer.selection.edition_ids.is_empty() {
        "Select at least one version to compare"
    } else if viewer.selection.book_id.is_none() {
        "Select a book"
    } else {
        "Nothing to show"
    };
    vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(theme.dim))).centered(),
    ]
}
