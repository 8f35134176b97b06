//! Last-fetched edition and book lists.

use crate::model::{Book, ChapterCount, Edition};

/// Replace-on-write storage for the edition catalog and the book list.
///
/// Books are recorded together with the edition id they were fetched for;
/// every edition is assumed to share that book and chapter structure.
#[derive(Debug, Clone, Default)]
pub struct CatalogCache {
    editions: Vec<Edition>,
    editions_loaded: bool,
    books: Vec<Book>,
    books_source: Option<String>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_editions(&mut self, editions: Vec<Edition>) {
        self.editions = editions;
        self.editions_loaded = true;
    }

    pub fn replace_books(&mut self, source_edition: &str, books: Vec<Book>) {
        self.books = books;
        self.books_source = Some(source_edition.to_string());
    }

    pub fn editions(&self) -> &[Edition] {
        &self.editions
    }

    /// True once an edition list has been stored, even an empty one.
    pub fn editions_loaded(&self) -> bool {
        self.editions_loaded
    }

    pub fn edition(&self, id: &str) -> Option<&Edition> {
        self.editions.iter().find(|e| e.id == id)
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// True when no non-empty book list has been stored yet.
    pub fn books_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Edition whose book list is cached.
    pub fn books_source(&self) -> Option<&str> {
        self.books_source.as_deref()
    }

    pub fn book(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    pub fn chapter_count(&self, book_id: &str) -> ChapterCount {
        self.book(book_id)
            .map(|b| b.chapter_count)
            .unwrap_or(ChapterCount::Unknown)
    }
}
