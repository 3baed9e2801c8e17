//! Row identity tracking.

use crate::models::RowRef;

/// Remembers which row is the active edit target.
///
/// Every grid call also takes its row explicitly; the tracker only answers
/// "what is focused" for callers that act on the current row, and lets the
/// grid notice when focus leaves the new row.
#[derive(Debug, Clone, Default)]
pub struct RowIdentityTracker {
    current: Option<RowRef>,
}

impl RowIdentityTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `row` as the edit target and return the previous one.
    pub fn focus(&mut self, row: RowRef) -> Option<RowRef> {
        self.current.replace(row)
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    #[must_use]
    pub const fn current(&self) -> Option<RowRef> {
        self.current
    }

    /// Row to use for lookups that need a concrete target; nothing focused means row 0.
    #[must_use]
    pub fn lookup_target(&self) -> RowRef {
        self.current.unwrap_or(RowRef::Existing(0))
    }

    /// Row whose state a clear should touch; nothing focused means no row.
    #[must_use]
    pub const fn invalidation_target(&self) -> Option<RowRef> {
        self.current
    }
}
