use ratatui::crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

use crate::action::Action;
use crate::app::InputMode;

/// Map a crossterm terminal event to a TUI action, respecting input mode.
pub fn map_event(event: &Event, input_mode: &InputMode) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            // Ctrl+C always quits regardless of mode
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Action::Quit;
            }

            match input_mode {
                InputMode::Normal => map_key_normal(key),
                InputMode::Chapter => map_key_chapter(key),
            }
        }
        Event::Mouse(mouse) => map_mouse(mouse),
        Event::Resize(w, h) => Action::Resize(*w, *h),
        _ => Action::None,
    }
}

fn map_mouse(mouse: &MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::ScrollDown => Action::MoveDown,
        MouseEventKind::ScrollUp => Action::MoveUp,
        _ => Action::None,
    }
}

fn map_key_normal(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::PageDown,
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::PageUp,
        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::SaveSelection,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::Char('g') | KeyCode::Home => Action::GoTop,
        KeyCode::Char('G') | KeyCode::End => Action::GoBottom,
        KeyCode::Tab => Action::FocusNext,
        KeyCode::BackTab => Action::FocusPrev,
        KeyCode::Enter | KeyCode::Char(' ') => Action::Select,
        KeyCode::Char('n') | KeyCode::Char(']') | KeyCode::Right => Action::NextChapter,
        KeyCode::Char('p') | KeyCode::Char('[') | KeyCode::Left => Action::PrevChapter,
        KeyCode::Char('c') | KeyCode::Char(':') => Action::StartChapterInput,
        KeyCode::Char('r') => Action::Retry,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Esc => Action::ChapterCancel,
        _ => Action::None,
    }
}

fn map_key_chapter(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc => Action::ChapterCancel,
        KeyCode::Enter => Action::ChapterConfirm,
        KeyCode::Backspace => Action::ChapterBackspace,
        KeyCode::Char(c) if c.is_ascii_digit() => Action::ChapterInput(c),
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn normal_mode_keys() {
        let mode = InputMode::Normal;
        assert_eq!(map_event(&press(KeyCode::Char('n')), &mode), Action::NextChapter);
        assert_eq!(map_event(&press(KeyCode::Left), &mode), Action::PrevChapter);
        assert_eq!(map_event(&press(KeyCode::Char(' ')), &mode), Action::Select);
        assert_eq!(map_event(&press(KeyCode::Char('r')), &mode), Action::Retry);
        assert_eq!(map_event(&press(KeyCode::Char('7')), &mode), Action::None);
    }

    #[test]
    fn chapter_mode_accepts_digits_only() {
        let mode = InputMode::Chapter;
        assert_eq!(
            map_event(&press(KeyCode::Char('7')), &mode),
            Action::ChapterInput('7')
        );
        assert_eq!(map_event(&press(KeyCode::Char('q')), &mode), Action::None);
        assert_eq!(map_event(&press(KeyCode::Enter), &mode), Action::ChapterConfirm);
    }

    #[test]
    fn ctrl_c_quits_in_any_mode() {
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(map_event(&ctrl_c, &InputMode::Normal), Action::Quit);
        assert_eq!(map_event(&ctrl_c, &InputMode::Chapter), Action::Quit);
    }
}
