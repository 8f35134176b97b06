//! The selection-and-fetch state machine.
//!
//! Intents mutate the [`SelectionStore`], then fetch whatever the new
//! selection needs: the book list when it is still missing, then the
//! comparison for the current book and chapter. Steps of one intent run in
//! order; separate intents may overlap when the caller spawns them.
//!
//! Book-list and comparison fetches carry a sequence number taken when they
//! are issued. A result (or failure) is applied only if no newer fetch of the
//! same kind has been issued since, so a slow response can never overwrite a
//! newer one.
//!
//! The state lock is only held between awaits.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::backend::{BackendFuture, ScriptureBackend};
use crate::catalog::CatalogCache;
use crate::error::{FetchError, ViewerError};
use crate::model::{Book, ChapterCount, ComparisonPayload, CompareRequest, Edition};
use crate::notify::{Notification, NotificationSink};
use crate::result::ComparisonResult;
use crate::selection::{MAX_EDITIONS, SelectionState, SelectionStore, Step, ToggleOutcome};

/// Something the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    ToggleEdition(String),
    ChangeBook(String),
    ChangeChapter(u32),
    StepChapter(Step),
    /// Re-issue whatever failed or is missing.
    Retry,
}

/// Editions, book and chapter to open with instead of the catalog defaults.
///
/// Unknown ids are skipped; if none of the editions exist the first two in
/// the catalog are used, as without a preselection.
#[derive(Debug, Clone, Default)]
pub struct Preselection {
    pub editions: Vec<String>,
    pub book: Option<String>,
    pub chapter: Option<u32>,
}

/// Readiness flags; each moves independently of the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Readiness {
    pub catalog_loaded: bool,
    pub books_loaded: bool,
    pub comparison_fresh: bool,
}

/// A consistent copy of everything a renderer may show.
#[derive(Debug, Clone)]
pub struct ViewerSnapshot {
    pub editions: Vec<Edition>,
    pub books: Vec<Book>,
    pub books_source: Option<String>,
    pub selection: SelectionState,
    pub comparison: Option<Arc<ComparisonPayload>>,
    pub loading: bool,
    pub error: Option<String>,
    pub readiness: Readiness,
}

impl ViewerSnapshot {
    pub fn chapter_bound(&self) -> u32 {
        self.selection
            .book_id
            .as_deref()
            .and_then(|id| self.books.iter().find(|b| b.id == id))
            .map_or(ChapterCount::Unknown, |b| b.chapter_count)
            .bound()
    }
}

#[derive(Debug, Default)]
struct ViewerState {
    selection: SelectionStore,
    catalog: CatalogCache,
    result: ComparisonResult,
    in_flight: usize,
    error: Option<String>,
    books_seq: u64,
    comparison_seq: u64,
}

impl ViewerState {
    fn chapter_bound(&self) -> u32 {
        self.selection
            .book_id()
            .map_or(ChapterCount::Unknown, |id| self.catalog.chapter_count(id))
            .bound()
    }
}

/// Drives the viewer: owns its state, talks to the backend, notifies the sink.
///
/// Cloning is cheap and every clone shares the same state, so intents can be
/// handed to separate tasks.
#[derive(Clone)]
pub struct Orchestrator {
    backend: Arc<dyn ScriptureBackend>,
    sink: Arc<dyn NotificationSink>,
    state: Arc<Mutex<ViewerState>>,
}

impl Orchestrator {
    pub fn new(backend: Arc<dyn ScriptureBackend>, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            backend,
            sink,
            state: Arc::new(Mutex::new(ViewerState::default())),
        }
    }

    pub fn snapshot(&self) -> ViewerSnapshot {
        let state = self.state.lock();
        ViewerSnapshot {
            editions: state.catalog.editions().to_vec(),
            books: state.catalog.books().to_vec(),
            books_source: state.catalog.books_source().map(String::from),
            selection: state.selection.snapshot(),
            comparison: state.result.visible().cloned(),
            loading: state.in_flight > 0,
            error: state.error.clone(),
            readiness: Readiness {
                catalog_loaded: state.catalog.editions_loaded(),
                books_loaded: !state.catalog.books_empty(),
                comparison_fresh: state.result.is_fresh(),
            },
        }
    }

    pub async fn dispatch(&self, intent: Intent) {
        match intent {
            Intent::ToggleEdition(id) => self.toggle_edition(&id).await,
            Intent::ChangeBook(id) => self.change_book(&id).await,
            Intent::ChangeChapter(chapter) => self.change_chapter(chapter).await,
            Intent::StepChapter(step) => self.step_chapter(step).await,
            Intent::Retry => self.retry().await,
        }
    }

    /// Startup cascade: editions, then books for the first selected edition,
    /// then the comparison for chapter 1.
    pub async fn start(&self) {
        self.start_with(&Preselection::default()).await;
    }

    pub async fn start_with(&self, preselection: &Preselection) {
        if !self.load_editions(preselection).await {
            return;
        }
        let first = self.state.lock().selection.edition_ids().first().cloned();
        let Some(first) = first else {
            debug!("edition catalog is empty, nothing to compare");
            return;
        };
        self.load_books(&first, Some(preselection)).await;
        self.refresh_comparison().await;
    }

    pub async fn toggle_edition(&self, edition_id: &str) {
        let needs_books = {
            let mut state = self.state.lock();
            if state.catalog.edition(edition_id).is_none() {
                warn!(edition = %edition_id, "ignoring toggle of unknown edition");
                self.sink
                    .notify(Notification::SelectionChanged(state.selection.snapshot()));
                return;
            }
            let outcome = state.selection.toggle_edition(edition_id);
            debug!(edition = %edition_id, ?outcome, "toggled edition");
            self.sink
                .notify(Notification::SelectionChanged(state.selection.snapshot()));
            match outcome {
                ToggleOutcome::Rejected => return,
                ToggleOutcome::Added => state.catalog.books_empty(),
                ToggleOutcome::Removed => false,
            }
        };

        if needs_books {
            self.load_books(edition_id, None).await;
        }
        self.refresh_comparison().await;
    }

    /// Select a book from the cached list; the chapter goes back to 1.
    pub async fn change_book(&self, book_id: &str) {
        {
            let mut state = self.state.lock();
            if state.catalog.book(book_id).is_none() {
                warn!(book = %book_id, "ignoring unknown book");
                return;
            }
            state.selection.set_book(book_id);
            self.sink
                .notify(Notification::SelectionChanged(state.selection.snapshot()));
        }
        self.refresh_comparison().await;
    }

    pub async fn change_chapter(&self, chapter: u32) {
        self.move_chapter(|selection, bound| selection.set_chapter(chapter, bound))
            .await;
    }

    pub async fn step_chapter(&self, step: Step) {
        self.move_chapter(|selection, bound| selection.step_chapter(step, bound))
            .await;
    }

    pub async fn retry(&self) {
        let (catalog_loaded, books_from) = {
            let state = self.state.lock();
            let books_from = if state.catalog.books_empty() {
                state.selection.edition_ids().first().cloned()
            } else {
                None
            };
            (state.catalog.editions_loaded(), books_from)
        };

        if !catalog_loaded {
            info!("retrying startup");
            self.start().await;
            return;
        }
        if let Some(edition_id) = books_from {
            self.load_books(&edition_id, None).await;
        }
        self.refresh_comparison().await;
    }

    async fn move_chapter(&self, apply: impl FnOnce(&mut SelectionStore, u32) -> bool) {
        {
            let mut state = self.state.lock();
            let bound = state.chapter_bound();
            if !apply(&mut state.selection, bound) {
                debug!(
                    chapter = state.selection.chapter(),
                    bound, "chapter change out of range"
                );
                return;
            }
            self.sink
                .notify(Notification::SelectionChanged(state.selection.snapshot()));
        }
        self.refresh_comparison().await;
    }

    async fn load_editions(&self, preselection: &Preselection) -> bool {
        info!("loading edition catalog");
        let result = self.fetch(self.backend.list_editions()).await;

        let mut state = self.state.lock();
        let editions = match result {
            Ok(editions) => editions,
            Err(source) => {
                self.raise(&mut state, ViewerError::Catalog(source));
                return false;
            }
        };
        info!(count = editions.len(), "edition catalog loaded");
        state.catalog.replace_editions(editions);

        if state.selection.edition_ids().is_empty() {
            let initial = initial_editions(state.catalog.editions(), &preselection.editions);
            for id in &initial {
                state.selection.toggle_edition(id);
            }
        }

        self.clear_error(&mut state);
        self.sink.notify(Notification::EditionsChanged(
            state.catalog.editions().to_vec(),
        ));
        self.sink
            .notify(Notification::SelectionChanged(state.selection.snapshot()));
        true
    }

    async fn load_books(&self, edition_id: &str, preselection: Option<&Preselection>) -> bool {
        let seq = {
            let mut state = self.state.lock();
            state.books_seq += 1;
            state.books_seq
        };
        debug!(edition = %edition_id, seq, "loading book list");
        let result = self.fetch(self.backend.list_books(edition_id)).await;

        let mut state = self.state.lock();
        if seq != state.books_seq {
            debug!(seq, latest = state.books_seq, "discarding superseded book list");
            return false;
        }
        let books = match result {
            Ok(books) => books,
            Err(source) => {
                self.raise(
                    &mut state,
                    ViewerError::Books {
                        edition_id: edition_id.to_string(),
                        source,
                    },
                );
                return false;
            }
        };
        info!(edition = %edition_id, count = books.len(), "book list loaded");
        state.catalog.replace_books(edition_id, books);

        let ViewerState {
            selection, catalog, ..
        } = &mut *state;
        let current_still_listed = selection
            .book_id()
            .is_some_and(|id| catalog.book(id).is_some());
        let mut selection_changed = false;
        if !current_still_listed {
            let preferred = preselection
                .and_then(|p| p.book.as_deref())
                .and_then(|id| catalog.book(id));
            if let Some(book) = preferred.or_else(|| catalog.books().first()) {
                selection.set_book(&book.id);
                selection_changed = true;
                if let Some(chapter) = preselection.and_then(|p| p.chapter)
                    && preferred.is_some()
                    && !selection.set_chapter(chapter, book.chapter_count.bound())
                {
                    warn!(book = %book.id, chapter, "preselected chapter out of range");
                }
            }
        }

        self.clear_error(&mut state);
        self.sink.notify(Notification::BooksChanged {
            books: state.catalog.books().to_vec(),
            source_edition: edition_id.to_string(),
        });
        if selection_changed {
            self.sink
                .notify(Notification::SelectionChanged(state.selection.snapshot()));
        }
        true
    }

    /// Re-fetch the comparison for the current selection, or hide it when the
    /// selection is not ready. Either way any in-flight comparison is superseded.
    async fn refresh_comparison(&self) {
        let (seq, request) = {
            let mut state = self.state.lock();
            state.comparison_seq += 1;
            let seq = state.comparison_seq;
            state.result.mark_stale();

            let selection = state.selection.state();
            let request = match (&selection.book_id, selection.is_ready()) {
                (Some(book_id), true) => Some(CompareRequest {
                    version_ids: selection.edition_ids.clone(),
                    book_id: book_id.clone(),
                    chapter: selection.chapter,
                }),
                _ => None,
            };
            let Some(request) = request else {
                debug!("selection incomplete, hiding comparison");
                if state.result.hide() {
                    self.sink.notify(Notification::ComparisonChanged(None));
                }
                return;
            };
            (seq, request)
        };

        debug!(
            seq,
            book = %request.book_id,
            chapter = request.chapter,
            editions = ?request.version_ids,
            "requesting comparison"
        );
        let result = self.fetch(self.backend.compare(&request)).await;

        let mut state = self.state.lock();
        if seq != state.comparison_seq {
            debug!(seq, latest = state.comparison_seq, "discarding superseded comparison");
            return;
        }
        match result {
            Ok(payload) => {
                let payload = state.result.replace(payload);
                self.clear_error(&mut state);
                self.sink
                    .notify(Notification::ComparisonChanged(Some(payload)));
            }
            Err(source) => {
                self.raise(
                    &mut state,
                    ViewerError::Comparison {
                        book_id: request.book_id,
                        chapter: request.chapter,
                        source,
                    },
                );
                if state.result.hide() {
                    self.sink.notify(Notification::ComparisonChanged(None));
                }
            }
        }
    }

    /// Await a backend call with the loading flag raised.
    async fn fetch<T>(&self, call: BackendFuture<'_, T>) -> Result<T, FetchError> {
        {
            let mut state = self.state.lock();
            state.in_flight += 1;
            if state.in_flight == 1 {
                self.sink.notify(Notification::LoadingChanged(true));
            }
        }
        let result = call.await;
        {
            let mut state = self.state.lock();
            state.in_flight = state.in_flight.saturating_sub(1);
            if state.in_flight == 0 {
                self.sink.notify(Notification::LoadingChanged(false));
            }
        }
        result
    }

    fn raise(&self, state: &mut ViewerState, error: ViewerError) {
        warn!(operation = %error.operation(), error = %error, "fetch failed");
        let message = error.to_string();
        state.error = Some(message.clone());
        self.sink.notify(Notification::ErrorRaised {
            operation: error.operation(),
            message,
        });
    }

    fn clear_error(&self, state: &mut ViewerState) {
        if state.error.take().is_some() {
            self.sink.notify(Notification::ErrorCleared);
        }
    }
}

/// Preselected editions that exist in the catalog (at most four, no
/// duplicates), or else the first two of the catalog.
fn initial_editions(catalog: &[Edition], preferred: &[String]) -> Vec<String> {
    let mut chosen: Vec<String> = Vec::new();
    for id in preferred {
        if chosen.len() == MAX_EDITIONS {
            break;
        }
        if catalog.iter().any(|e| &e.id == id) && !chosen.contains(id) {
            chosen.push(id.clone());
        }
    }
    if chosen.is_empty() {
        chosen = catalog.iter().take(2).map(|e| e.id.clone()).collect();
    }
    chosen
}
