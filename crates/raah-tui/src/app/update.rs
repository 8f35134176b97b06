use raah_core::{Intent, MAX_EDITIONS, Step};

use super::{App, InputMode, Pane};
use crate::action::Action;

/// Chapter numbers longer than this are not accepted in the input box.
const MAX_CHAPTER_DIGITS: usize = 3;

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        match action {
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
                return false;
            }
            Action::Resize(_w, h) => {
                self.visible_rows = (h as usize).saturating_sub(6);
                return false;
            }
            Action::Quit => {
                self.should_quit = true;
                return true;
            }
            Action::None => return false,
            _ => self.status = None,
        }

        // Help overlay swallows everything but closing it
        if self.show_help {
            if matches!(action, Action::ToggleHelp | Action::ChapterCancel) {
                self.show_help = false;
            }
            return false;
        }

        match action {
            Action::MoveUp => self.move_cursor(-1),
            Action::MoveDown => self.move_cursor(1),
            Action::PageUp => self.move_cursor(-(self.page() as isize)),
            Action::PageDown => self.move_cursor(self.page() as isize),
            Action::GoTop => self.move_cursor(isize::MIN / 2),
            Action::GoBottom => self.move_cursor(isize::MAX / 2),
            Action::FocusNext => self.focus = self.focus.next(),
            Action::FocusPrev => self.focus = self.focus.prev(),
            Action::Select => self.select_under_cursor(),
            Action::NextChapter => self.step_chapter(Step::Next),
            Action::PrevChapter => self.step_chapter(Step::Previous),
            Action::StartChapterInput => {
                if self.viewer.selection.book_id.is_some() {
                    self.input_mode = InputMode::Chapter;
                    self.chapter_input.clear();
                } else {
                    self.status = Some("Pick a book first".into());
                }
            }
            Action::ChapterInput(c) => {
                if self.chapter_input.len() < MAX_CHAPTER_DIGITS {
                    self.chapter_input.push(c);
                }
            }
            Action::ChapterBackspace => {
                self.chapter_input.pop();
            }
            Action::ChapterConfirm => self.confirm_chapter(),
            Action::ChapterCancel => {
                self.input_mode = InputMode::Normal;
                self.chapter_input.clear();
            }
            Action::Retry => self.send(Intent::Retry),
            Action::SaveSelection => self.save_selection(),
            Action::ToggleHelp => self.show_help = true,
            Action::Tick | Action::Resize(..) | Action::Quit | Action::None => {}
        }
        false
    }

    fn page(&self) -> usize {
        self.visible_rows.max(1)
    }

    fn move_cursor(&mut self, delta: isize) {
        fn shifted(cursor: usize, delta: isize, len: usize) -> usize {
            let max = len.saturating_sub(1) as isize;
            (cursor as isize).saturating_add(delta).clamp(0, max) as usize
        }
        match self.focus {
            Pane::Editions => {
                self.edition_cursor =
                    shifted(self.edition_cursor, delta, self.viewer.editions.len());
            }
            Pane::Books => {
                self.book_cursor = shifted(self.book_cursor, delta, self.viewer.books.len());
            }
            Pane::Comparison => {
                let rows = self
                    .viewer
                    .comparison
                    .as_ref()
                    .map_or(0, |p| p.verses.len() * (self.viewer.selection.edition_ids.len() + 1));
                let scroll = shifted(self.comparison_scroll as usize, delta, rows);
                self.comparison_scroll = u16::try_from(scroll).unwrap_or(u16::MAX);
            }
        }
    }

    fn select_under_cursor(&mut self) {
        match self.focus {
            Pane::Editions => {
                let Some(edition) = self.viewer.editions.get(self.edition_cursor) else {
                    return;
                };
                let selection = &self.viewer.selection;
                if !selection.is_selected(&edition.id) && !selection.can_add() {
                    self.status = Some(format!(
                        "At most {MAX_EDITIONS} versions can be compared; deselect one first"
                    ));
                    return;
                }
                self.send(Intent::ToggleEdition(edition.id.clone()));
            }
            Pane::Books => {
                if let Some(book) = self.viewer.books.get(self.book_cursor) {
                    self.send(Intent::ChangeBook(book.id.clone()));
                }
            }
            Pane::Comparison => {}
        }
    }

    fn step_chapter(&mut self, step: Step) {
        if self.viewer.selection.book_id.is_none() {
            return;
        }
        let chapter = self.viewer.selection.chapter;
        let bound = self.viewer.chapter_bound();
        match step {
            Step::Previous if chapter <= 1 => {
                self.status = Some("Already at the first chapter".into());
            }
            Step::Next if chapter >= bound => {
                self.status = Some("Already at the last chapter".into());
            }
            _ => self.send(Intent::StepChapter(step)),
        }
    }

    fn save_selection(&mut self) {
        let selection = &self.viewer.selection;
        let saved = raah_core::config_file::save_selection(
            &selection.edition_ids,
            selection.book_id.as_deref(),
        );
        self.status = Some(match saved {
            Ok(path) => {
                tracing::info!(path = %path.display(), "saved selection");
                format!("Saved selection to {}", path.display())
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not save selection");
                e
            }
        });
    }

    fn confirm_chapter(&mut self) {
        self.input_mode = InputMode::Normal;
        let input = std::mem::take(&mut self.chapter_input);
        if input.is_empty() {
            return;
        }
        let bound = self.viewer.chapter_bound();
        match input.parse::<u32>() {
            Ok(n) if (1..=bound).contains(&n) => {
                if n != self.viewer.selection.chapter {
                    self.send(Intent::ChangeChapter(n));
                }
            }
            _ => self.status = Some(format!("Chapter must be between 1 and {bound}")),
        }
    }
}
