use std::sync::Arc;

use raah_core::{Book, ChapterCount, ComparisonPayload, Edition, SelectionState};

/// The TUI's copy of orchestrator state, kept current from notifications.
#[derive(Debug, Clone, Default)]
pub struct ViewerModel {
    pub editions: Vec<Edition>,
    pub books: Vec<Book>,
    /// Edition whose book list is shown.
    pub books_source: Option<String>,
    pub selection: SelectionState,
    pub comparison: Option<Arc<ComparisonPayload>>,
    pub loading: bool,
    pub error: Option<String>,
}

impl ViewerModel {
    pub fn selected_book(&self) -> Option<&Book> {
        let id = self.selection.book_id.as_deref()?;
        self.books.iter().find(|b| b.id == id)
    }

    pub fn chapter_bound(&self) -> u32 {
        self.selected_book()
            .map_or(ChapterCount::Unknown, |b| b.chapter_count)
            .bound()
    }

    /// Abbreviation for an edition id, falling back to the id itself.
    pub fn abbreviation<'a>(&'a self, edition_id: &'a str) -> &'a str {
        self.editions
            .iter()
            .find(|e| e.id == edition_id)
            .map_or(edition_id, |e| e.abbreviation.as_str())
    }

    /// "Genesis 3 of 50", or just the chapter when no book is selected.
    pub fn position_label(&self) -> String {
        match self.selected_book() {
            Some(book) => match book.chapter_count {
                ChapterCount::Known(n) => {
                    format!("{} {} of {}", book.name, self.selection.chapter, n)
                }
                ChapterCount::Unknown => format!("{} {}", book.name, self.selection.chapter),
            },
            None => format!("Chapter {}", self.selection.chapter),
        }
    }
}
