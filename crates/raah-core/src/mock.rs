//! Scripted backend and recording sink for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use crate::backend::{BackendFuture, ScriptureBackend};
use crate::error::FetchError;
use crate::model::{
    Book, ChapterCount, ComparisonPayload, CompareRequest, Edition, HealthStatus, VerseRow,
};
use crate::notify::{Notification, NotificationSink};

/// One scripted answer: a value or an error, optionally after a delay.
#[derive(Clone, Debug)]
pub struct MockReply<T> {
    outcome: Result<T, FetchError>,
    delay: Option<Duration>,
}

impl<T> MockReply<T> {
    pub fn ok(value: T) -> Self {
        Self {
            outcome: Ok(value),
            delay: None,
        }
    }

    pub fn fail(error: FetchError) -> Self {
        Self {
            outcome: Err(error),
            delay: None,
        }
    }

    /// Simulate network latency before resolving.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Comparison replies: `None` builds a payload from the request (see [`echo_payload`]).
pub type CompareReply = MockReply<Option<ComparisonPayload>>;

impl CompareReply {
    pub fn echo() -> Self {
        Self::ok(None)
    }

    pub fn payload(payload: ComparisonPayload) -> Self {
        Self::ok(Some(payload))
    }
}

/// Shorthand for a network failure.
pub fn network_error() -> FetchError {
    FetchError::Network("connection refused".into())
}

/// Replies handed out in order, repeating the last one once exhausted.
struct Script<T> {
    replies: Mutex<Vec<MockReply<T>>>,
    fallback: MockReply<T>,
    calls: AtomicUsize,
}

impl<T: Clone> Script<T> {
    fn new(mut replies: Vec<MockReply<T>>) -> Self {
        // Reverse so we can pop() from the front cheaply.
        replies.reverse();
        let fallback = replies.first().cloned().unwrap_or_else(|| {
            MockReply::fail(FetchError::Network("no scripted reply".into()))
        });
        Self {
            replies: Mutex::new(replies),
            fallback,
            calls: AtomicUsize::new(0),
        }
    }

    fn next(&self) -> MockReply<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies
            .lock()
            .pop()
            .unwrap_or_else(|| self.fallback.clone())
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

async fn resolve<T>(reply: MockReply<T>) -> Result<T, FetchError> {
    if let Some(d) = reply.delay {
        tokio::time::sleep(d).await;
    }
    reply.outcome
}

/// A hand-rolled [`ScriptureBackend`] for tests and demos.
///
/// Each endpoint has its own reply script. Book-list and comparison requests
/// are recorded so tests can assert which edition or chapter was asked for.
pub struct MockBackend {
    editions: Script<Vec<Edition>>,
    books: Script<Vec<Book>>,
    comparisons: Script<Option<ComparisonPayload>>,
    book_requests: Mutex<Vec<String>>,
    compare_requests: Mutex<Vec<CompareRequest>>,
}

impl MockBackend {
    /// Always succeeds: the given catalogs, and echoed comparisons.
    pub fn new(editions: Vec<Edition>, books: Vec<Book>) -> Self {
        Self {
            editions: Script::new(vec![MockReply::ok(editions)]),
            books: Script::new(vec![MockReply::ok(books)]),
            comparisons: Script::new(vec![CompareReply::echo()]),
            book_requests: Mutex::new(Vec::new()),
            compare_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_editions(mut self, replies: Vec<MockReply<Vec<Edition>>>) -> Self {
        self.editions = Script::new(replies);
        self
    }

    pub fn with_books(mut self, replies: Vec<MockReply<Vec<Book>>>) -> Self {
        self.books = Script::new(replies);
        self
    }

    pub fn with_comparisons(mut self, replies: Vec<CompareReply>) -> Self {
        self.comparisons = Script::new(replies);
        self
    }

    pub fn edition_calls(&self) -> usize {
        self.editions.calls()
    }

    pub fn book_calls(&self) -> usize {
        self.books.calls()
    }

    pub fn compare_calls(&self) -> usize {
        self.comparisons.calls()
    }

    /// Edition ids the book list was requested for, in call order.
    pub fn book_requests(&self) -> Vec<String> {
        self.book_requests.lock().clone()
    }

    pub fn compare_requests(&self) -> Vec<CompareRequest> {
        self.compare_requests.lock().clone()
    }
}

impl ScriptureBackend for MockBackend {
    fn list_editions(&self) -> BackendFuture<'_, Vec<Edition>> {
        let reply = self.editions.next();
        Box::pin(resolve(reply))
    }

    fn list_books<'a>(&'a self, edition_id: &'a str) -> BackendFuture<'a, Vec<Book>> {
        self.book_requests.lock().push(edition_id.to_string());
        let reply = self.books.next();
        Box::pin(resolve(reply))
    }

    fn compare<'a>(&'a self, request: &'a CompareRequest) -> BackendFuture<'a, ComparisonPayload> {
        self.compare_requests.lock().push(request.clone());
        let reply = self.comparisons.next();
        Box::pin(async move {
            match resolve(reply).await? {
                Some(payload) => Ok(payload),
                None => Ok(echo_payload(request)),
            }
        })
    }

    fn health(&self) -> BackendFuture<'_, HealthStatus> {
        Box::pin(async {
            Ok(HealthStatus {
                status: "healthy".into(),
                message: "mock backend".into(),
            })
        })
    }
}

pub fn edition(id: &str, abbreviation: &str, language: &str) -> Edition {
    Edition {
        id: id.into(),
        name: abbreviation.into(),
        abbreviation: abbreviation.into(),
        language: language.into(),
    }
}

pub fn book(id: &str, name: &str, chapters: Option<u32>) -> Book {
    Book {
        id: id.into(),
        name: name.into(),
        abbreviation: String::new(),
        chapter_count: chapters.map_or(ChapterCount::Unknown, ChapterCount::Known),
    }
}

/// Two verses whose texts name the edition, book and chapter they came from.
pub fn echo_payload(request: &CompareRequest) -> ComparisonPayload {
    let verses = (1..=2)
        .map(|n| VerseRow {
            number: n,
            texts: request
                .version_ids
                .iter()
                .map(|id| {
                    (
                        id.clone(),
                        format!("{id} {} {}:{n}", request.book_id, request.chapter),
                    )
                })
                .collect(),
        })
        .collect();
    ComparisonPayload {
        book_id: Some(request.book_id.clone()),
        book_name: request.book_id.clone(),
        chapter: request.chapter,
        verses,
    }
}

/// Collects every notification it receives.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Notification> {
        self.events.lock().clone()
    }

    /// Drain what has been recorded so far.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: Notification) {
        self.events.lock().push(notification);
    }
}
