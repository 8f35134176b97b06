//! The comparison currently on screen.

use std::sync::Arc;

use crate::model::ComparisonPayload;

/// Last successfully fetched comparison, with visibility and freshness.
///
/// The payload is replaced wholesale and never edited. Hiding keeps the
/// payload (and its `Arc` identity) around; only a new successful fetch
/// replaces it.
#[derive(Debug, Clone, Default)]
pub struct ComparisonResult {
    payload: Option<Arc<ComparisonPayload>>,
    visible: bool,
    fresh: bool,
}

impl ComparisonResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, payload: ComparisonPayload) -> Arc<ComparisonPayload> {
        let payload = Arc::new(payload);
        self.payload = Some(Arc::clone(&payload));
        self.visible = true;
        self.fresh = true;
        payload
    }

    /// Inputs changed; the stored payload no longer matches the selection.
    pub fn mark_stale(&mut self) {
        self.fresh = false;
    }

    /// Hide the payload. Returns true if it was visible.
    pub fn hide(&mut self) -> bool {
        self.fresh = false;
        std::mem::replace(&mut self.visible, false)
    }

    /// The payload to display, if any.
    pub fn visible(&self) -> Option<&Arc<ComparisonPayload>> {
        if self.visible {
            self.payload.as_ref()
        } else {
            None
        }
    }

    pub fn is_fresh(&self) -> bool {
        self.fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(chapter: u32) -> ComparisonPayload {
        ComparisonPayload {
            book_id: None,
            book_name: "Genesis".into(),
            chapter,
            verses: vec![],
        }
    }

    #[test]
    fn replace_then_hide_keeps_identity() {
        let mut result = ComparisonResult::new();
        assert!(result.visible().is_none());

        let stored = result.replace(payload(1));
        assert!(result.is_fresh());
        assert!(Arc::ptr_eq(result.visible().unwrap(), &stored));

        assert!(result.hide());
        assert!(!result.hide());
        assert!(result.visible().is_none());
        assert!(Arc::ptr_eq(result.payload.as_ref().unwrap(), &stored));
        assert!(!result.is_fresh());
    }

    #[test]
    fn stale_payload_stays_visible() {
        let mut result = ComparisonResult::new();
        result.replace(payload(1));
        result.mark_stale();
        assert!(!result.is_fresh());
        assert_eq!(result.visible().unwrap().chapter, 1);
    }
}
