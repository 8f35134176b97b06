//! Selected editions, book and chapter, with the bounds they must respect.

/// At most this many editions are compared side by side.
pub const MAX_EDITIONS: usize = 4;

/// Chapter bound used when the selected book's chapter count is unknown.
pub const FALLBACK_CHAPTER_BOUND: u32 = 50;

/// Result of [`SelectionStore::toggle_edition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// The edition was not selected and the 4-edition cap is reached.
    Rejected,
}

/// Direction for [`SelectionStore::step_chapter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Previous,
    Next,
}

/// Immutable copy of the selection handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    pub edition_ids: Vec<String>,
    pub book_id: Option<String>,
    pub chapter: u32,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            edition_ids: Vec::new(),
            book_id: None,
            chapter: 1,
        }
    }
}

impl SelectionState {
    pub fn is_selected(&self, edition_id: &str) -> bool {
        self.edition_ids.iter().any(|id| id == edition_id)
    }

    /// Whether another edition may be added (false at the cap).
    pub fn can_add(&self) -> bool {
        self.edition_ids.len() < MAX_EDITIONS
    }

    /// A comparison can be requested: at least one edition and a book.
    pub fn is_ready(&self) -> bool {
        !self.edition_ids.is_empty() && self.book_id.is_some()
    }

    /// "1 version selected" / "3 versions selected".
    pub fn count_label(&self) -> String {
        let n = self.edition_ids.len();
        format!("{} version{} selected", n, if n == 1 { "" } else { "s" })
    }
}

/// Owns the selection and rejects every change that would break its bounds.
///
/// Edition order is insertion order, which is also the display order of
/// comparison columns. Chapter operations take the current bound as an
/// argument; see [`crate::ChapterCount::bound`].
#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    state: SelectionState,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn snapshot(&self) -> SelectionState {
        self.state.clone()
    }

    pub fn edition_ids(&self) -> &[String] {
        &self.state.edition_ids
    }

    pub fn book_id(&self) -> Option<&str> {
        self.state.book_id.as_deref()
    }

    pub fn chapter(&self) -> u32 {
        self.state.chapter
    }

    pub fn toggle_edition(&mut self, id: &str) -> ToggleOutcome {
        if let Some(pos) = self.state.edition_ids.iter().position(|e| e == id) {
            self.state.edition_ids.remove(pos);
            ToggleOutcome::Removed
        } else if self.state.can_add() {
            self.state.edition_ids.push(id.to_string());
            ToggleOutcome::Added
        } else {
            ToggleOutcome::Rejected
        }
    }

    /// Select a book; always starts over at chapter 1.
    pub fn set_book(&mut self, id: &str) {
        self.state.book_id = Some(id.to_string());
        self.state.chapter = 1;
    }

    pub fn set_chapter(&mut self, chapter: u32, bound: u32) -> bool {
        if chapter < 1 || chapter > bound {
            return false;
        }
        self.state.chapter = chapter;
        true
    }

    pub fn step_chapter(&mut self, step: Step, bound: u32) -> bool {
        let target = match step {
            Step::Previous => self.state.chapter.checked_sub(1),
            Step::Next => self.state.chapter.checked_add(1),
        };
        match target {
            Some(chapter) => self.set_chapter(chapter, bound),
            None => false,
        }
    }
}
