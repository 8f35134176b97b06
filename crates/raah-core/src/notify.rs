//! State-change notifications for the rendering side.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::error::Operation;
use crate::model::{Book, ComparisonPayload, Edition};
use crate::selection::SelectionState;

/// Events flowing from the orchestrator to whatever renders its state.
#[derive(Debug, Clone)]
pub enum Notification {
    /// At least one fetch is in flight (true) or none is (false).
    LoadingChanged(bool),
    ErrorRaised {
        operation: Operation,
        message: String,
    },
    ErrorCleared,
    SelectionChanged(SelectionState),
    EditionsChanged(Vec<Edition>),
    /// A new book list, fetched with `source_edition`'s id.
    BooksChanged {
        books: Vec<Book>,
        source_edition: String,
    },
    /// `None` hides the comparison.
    ComparisonChanged(Option<Arc<ComparisonPayload>>),
}

/// Receiver of [`Notification`]s.
///
/// Called while the orchestrator's state lock is held, so implementations must
/// not call back into the orchestrator; forward the event and return.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl NotificationSink for mpsc::UnboundedSender<Notification> {
    fn notify(&self, notification: Notification) {
        // Receiver gone means the UI is shutting down.
        let _ = self.send(notification);
    }
}
