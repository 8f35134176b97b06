use std::sync::Arc;

use raah_core::Notification;

use super::App;

impl App {
    /// Apply an orchestrator notification to the local model.
    pub fn handle_notification(&mut self, notification: Notification) {
        match notification {
            Notification::LoadingChanged(loading) => self.viewer.loading = loading,
            Notification::ErrorRaised { operation, message } => {
                tracing::debug!(%operation, "error shown");
                self.viewer.error = Some(message);
            }
            Notification::ErrorCleared => self.viewer.error = None,
            Notification::SelectionChanged(selection) => {
                let book_changed = selection.book_id != self.viewer.selection.book_id;
                self.viewer.selection = selection;
                if book_changed {
                    self.sync_book_cursor();
                }
            }
            Notification::EditionsChanged(editions) => {
                self.viewer.editions = editions;
                self.edition_cursor = self
                    .edition_cursor
                    .min(self.viewer.editions.len().saturating_sub(1));
            }
            Notification::BooksChanged {
                books,
                source_edition,
            } => {
                self.viewer.books = books;
                self.viewer.books_source = Some(source_edition);
                self.sync_book_cursor();
            }
            Notification::ComparisonChanged(payload) => {
                let same = match (&self.viewer.comparison, &payload) {
                    (Some(old), Some(new)) => Arc::ptr_eq(old, new),
                    _ => false,
                };
                if !same {
                    self.comparison_scroll = 0;
                }
                self.viewer.comparison = payload;
            }
        }
    }

    /// Put the book cursor on the selected book, or keep it in range.
    fn sync_book_cursor(&mut self) {
        let selected = self
            .viewer
            .selection
            .book_id
            .as_deref()
            .and_then(|id| self.viewer.books.iter().position(|b| b.id == id));
        self.book_cursor = match selected {
            Some(index) => index,
            None => self
                .book_cursor
                .min(self.viewer.books.len().saturating_sub(1)),
        };
    }
}
