//! The comparison service contract, as seen by the orchestrator.

use std::future::Future;
use std::pin::Pin;

use crate::error::FetchError;
use crate::model::{Book, ComparisonPayload, CompareRequest, Edition, HealthStatus};

/// Boxed future returned by [`ScriptureBackend`] methods.
pub type BackendFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, FetchError>> + Send + 'a>>;

/// A source of editions, books and chapter comparisons.
///
/// Every call resolves to exactly one of typed data or a [`FetchError`];
/// implementations validate payloads before returning them.
pub trait ScriptureBackend: Send + Sync {
    /// `GET /api/versions`
    fn list_editions(&self) -> BackendFuture<'_, Vec<Edition>>;

    /// `GET /api/versions/{edition_id}/books`
    fn list_books<'a>(&'a self, edition_id: &'a str) -> BackendFuture<'a, Vec<Book>>;

    /// `POST /api/compare`
    fn compare<'a>(&'a self, request: &'a CompareRequest) -> BackendFuture<'a, ComparisonPayload>;

    /// `GET /api/health`
    fn health(&self) -> BackendFuture<'_, HealthStatus>;
}
