//! Request tags for in-flight on-select lookups.
//!
//! Each lookup carries a monotonic tag. A response is applied only while its
//! tag is still the latest one issued for that row and field; later edits
//! supersede it.

use std::collections::HashMap;

use crate::models::{DgField, RowRef};

#[derive(Debug, Default)]
pub(super) struct RequestTags {
    next: u64,
    latest: HashMap<(RowRef, DgField), u64>,
}

impl RequestTags {
    pub(super) fn issue(&mut self, row: RowRef, field: DgField) -> u64 {
        self.next += 1;
        self.latest.insert((row, field), self.next);
        self.next
    }

    pub(super) fn is_current(&self, row: RowRef, field: DgField, tag: u64) -> bool {
        self.latest.get(&(row, field)) == Some(&tag)
    }

    /// Row that `tag` is still live on, following any move since it was issued.
    pub(super) fn owner(&self, field: DgField, tag: u64) -> Option<RowRef> {
        self.latest
            .iter()
            .find(|((_, tagged_field), latest)| *tagged_field == field && **latest == tag)
            .map(|((row, _), _)| *row)
    }

    /// Forget the tag once its response has been handled.
    pub(super) fn finish(&mut self, row: RowRef, field: DgField, tag: u64) {
        if self.is_current(row, field, tag) {
            self.latest.remove(&(row, field));
        }
    }

    /// Invalidate whatever is in flight for these fields on `row`.
    pub(super) fn supersede(&mut self, row: RowRef, fields: &[DgField]) {
        for field in fields {
            self.latest.remove(&(row, *field));
        }
    }

    /// Carry the live tags of `from` over to `to`.
    pub(super) fn move_row(&mut self, from: RowRef, to: RowRef) {
        let moved: Vec<(DgField, u64)> = self
            .latest
            .iter()
            .filter(|((row, _), _)| *row == from)
            .map(|((_, field), tag)| (*field, *tag))
            .collect();
        self.forget_row(from);
        self.forget_row(to);
        for (field, tag) in moved {
            self.latest.insert((to, field), tag);
        }
    }

    pub(super) fn forget_row(&mut self, row: RowRef) {
        self.latest.retain(|(tagged_row, _), _| *tagged_row != row);
    }

    pub(super) fn clear(&mut self) {
        self.latest.clear();
    }

    #[cfg(test)]
    pub(super) fn in_flight(&self) -> usize {
        self.latest.len()
    }
}
