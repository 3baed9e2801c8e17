//! Field change dispatch.
//!
//! A raw selection for Product, UN Code or DG Class is routed to one of:
//!
//! | Event | Row state | Lookup |
//! |---|---|---|
//! | clear (empty value) | field + downstream emptied, caches invalidated | none |
//! | Product selected | Product set | `ProductID On Select`, fills UN Code / DG Class |
//! | Product selected, new row, UN Code chosen first | Product set | none |
//! | UN Code selected | UN Code set | `UnCode On Select`, fills DG Class |
//! | DG Class selected | DG Class set, hazardous = Yes | none |
//!
//! Lookups are tagged (see `tags.rs`). Any later edit on the same row that
//! touches a field the response would write supersedes it, so the most recent
//! user action always wins.

use std::sync::Arc;
use tracing::{debug, warn};

use super::ConsignmentGrid;
use super::cache::CacheKey;
use crate::core::GridError;
use crate::lookup::{LookupEnvelope, LookupRequest, SelectDetail};
use crate::models::{DgField, RowRef, split_selection};

/// What a field change did to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// Field and its downstream fields were emptied
    Cleared,
    /// Value stored; the field has no on-select lookup
    Selected,
    /// New-row Product stored without its lookup because UN Code came first
    PriorityKept,
    /// On-select detail applied to the row
    Populated,
    /// On-select lookup answered without anything to apply
    NothingToPopulate,
    /// On-select lookup failed; the selection stands on its own
    LookupFailed,
    /// A later edit made the response obsolete; nothing was applied
    Superseded,
}

/// Result of the synchronous half of a field change.
#[derive(Debug)]
pub enum Dispatch {
    Done(ChangeOutcome),
    /// Run the request, then hand the result to [`ConsignmentGrid::complete_lookup`]
    Lookup(PendingLookup),
}

/// An on-select lookup the grid is waiting for.
#[derive(Debug, Clone)]
pub struct PendingLookup {
    tag: u64,
    row: RowRef,
    field: DgField,
    request: LookupRequest,
}

impl PendingLookup {
    #[must_use]
    pub const fn request(&self) -> &LookupRequest {
        &self.request
    }

    #[must_use]
    pub const fn row(&self) -> RowRef {
        self.row
    }

    #[must_use]
    pub const fn field(&self) -> DgField {
        self.field
    }

    #[must_use]
    pub const fn tag(&self) -> u64 {
        self.tag
    }
}

impl ConsignmentGrid {
    /// Apply a selection or clear and run its lookup, if any, to completion.
    ///
    /// Lookup failures never surface here; they show up as
    /// [`ChangeOutcome::LookupFailed`]. Only an unknown row is an error.
    pub async fn on_field_change(
        &mut self,
        field: DgField,
        raw_value: Option<&str>,
        row: RowRef,
    ) -> Result<ChangeOutcome, GridError> {
        match self.begin_field_change(field, raw_value, row)? {
            Dispatch::Done(outcome) => Ok(outcome),
            Dispatch::Lookup(pending) => {
                let lookup = Arc::clone(&self.lookup);
                let result = lookup.lookup(pending.request()).await;
                Ok(self.complete_lookup(pending, result))
            }
        }
    }

    /// Apply the row-state half of a field change.
    ///
    /// The row shows the user's selection immediately; cross-population waits
    /// for [`complete_lookup`](Self::complete_lookup).
    pub fn begin_field_change(
        &mut self,
        field: DgField,
        raw_value: Option<&str>,
        row: RowRef,
    ) -> Result<Dispatch, GridError> {
        self.require_row(row)?;
        self.focus(row);

        match split_selection(raw_value) {
            None => Ok(Dispatch::Done(self.apply_clear(row, field))),
            Some((code, description)) => Ok(self.apply_selection(row, field, code, description)),
        }
    }

    /// Apply a lookup result if no later edit superseded it.
    pub fn complete_lookup(
        &mut self,
        pending: PendingLookup,
        result: Result<LookupEnvelope, GridError>,
    ) -> ChangeOutcome {
        let PendingLookup {
            tag,
            row,
            field,
            request,
        } = pending;

        // A committed new row carries its lookups to its committed index
        let Some(row) = self.tags.owner(field, tag) else {
            debug!("Discarding superseded '{}' response for row {row}", request.message_type);
            return ChangeOutcome::Superseded;
        };
        self.tags.finish(row, field, tag);

        let envelope = match result {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!("{e}; row {row} keeps its {field} selection without dependent values");
                return ChangeOutcome::LookupFailed;
            }
        };

        match envelope.detail(request.message_type) {
            Some(detail) => self.apply_detail(row, field, &detail),
            None => ChangeOutcome::NothingToPopulate,
        }
    }

    pub(super) fn apply_clear(&mut self, row: RowRef, field: DgField) -> ChangeOutcome {
        let mut cleared = vec![field];
        cleared.extend_from_slice(field.downstream());

        let previous: Vec<(DgField, String)> = match self.row(row) {
            Some(current) => cleared.iter().map(|f| (*f, current.code(*f).to_string())).collect(),
            None => return ChangeOutcome::Cleared,
        };

        // Every on-select response writes into this field or below it
        self.tags.supersede(row, &DgField::ALL);

        let cache = self.resolver.cache_mut();
        for (cleared_field, old_code) in &previous {
            if let Some(dependent) = cleared_field.dependent_field() {
                if !old_code.is_empty() {
                    cache.invalidate(dependent, &CacheKey::Driving(old_code.clone()));
                }
            }
            cache.request_refresh(*cleared_field);
        }

        if let Some(target) = self.row_mut(row) {
            for cleared_field in &cleared {
                target.clear_field(*cleared_field);
            }
        }

        if row.is_new() {
            let emptied = self.new_row.as_ref().is_some_and(|r| r.product.is_empty() && r.un_code.is_empty());
            if emptied {
                self.arbiter.reset();
            }
        }

        debug!(
            "Cleared {} on row {row}",
            cleared.iter().map(|f| f.column_name()).collect::<Vec<_>>().join(", ")
        );
        ChangeOutcome::Cleared
    }

    fn apply_selection(
        &mut self,
        row: RowRef,
        field: DgField,
        code: String,
        description: String,
    ) -> Dispatch {
        let previous = self.row(row).map(|r| r.code(field).to_string()).unwrap_or_default();

        // The dependent list keyed by the old value is stale now
        if !previous.is_empty() && previous != code {
            if let Some(dependent) = field.dependent_field() {
                self.resolver.cache_mut().invalidate(dependent, &CacheKey::Driving(previous));
            }
        }

        if let Some(target) = self.row_mut(row) {
            target.set_field(field, code.as_str(), description.as_str());
        }

        if row.is_new() && self.arbiter.suppresses(field) {
            self.tags.supersede(row, &[field]);
            debug!("UN Code was selected first on the new row; storing {field} '{code}' without lookup");
            return Dispatch::Done(ChangeOutcome::PriorityKept);
        }
        if row.is_new() && self.arbiter.mark_first_selected(field) {
            debug!("{field} selected first on the new row");
        }

        // In-flight responses from upstream fields would overwrite this choice
        self.tags.supersede(row, field.upstream());
        self.tags.supersede(row, &[field]);

        match LookupRequest::on_select(field, &code, &description) {
            None => {
                debug!("Row {row}: {field} = '{code}'");
                Dispatch::Done(ChangeOutcome::Selected)
            }
            Some(request) => {
                self.tags.supersede(row, field.downstream());
                let tag = self.tags.issue(row, field);
                debug!("Row {row}: {field} = '{code}', awaiting '{}' (tag {tag})", request.message_type);
                Dispatch::Lookup(PendingLookup {
                    tag,
                    row,
                    field,
                    request,
                })
            }
        }
    }

    fn apply_detail(&mut self, row: RowRef, field: DgField, detail: &SelectDetail) -> ChangeOutcome {
        let Some(target) = self.row_mut(row) else {
            return ChangeOutcome::Superseded;
        };
        let previous_un_code = target.un_code.clone();
        let mut applied = false;

        // UN Code selections never re-derive Product, and only Product fills UN Code
        if field == DgField::Product {
            if let Some(un_code) = &detail.un_code {
                let description = detail.un_code_description.as_deref().unwrap_or_default();
                target.set_field(DgField::UnCode, un_code.trim(), description.trim());
                applied = true;
            }
        }
        if let Some(dg_class) = &detail.dg_class {
            let description = detail.dg_class_description.as_deref().unwrap_or_default();
            target.set_field(DgField::DgClass, dg_class.trim(), description.trim());
            applied = true;
        }

        if let Some(flag) = &detail.contains_hazardous_goods {
            let reported = flag.trim().eq_ignore_ascii_case("yes");
            if reported != target.is_hazardous() {
                debug!(
                    "Backend reported ContainsHazardousGoods='{flag}' for row {row}; keeping '{}' derived from DG class",
                    target.contains_hazardous_goods
                );
            }
        }

        let current_un_code = target.un_code.clone();
        if !previous_un_code.is_empty() && previous_un_code != current_un_code {
            self.resolver
                .cache_mut()
                .invalidate(DgField::DgClass, &CacheKey::Driving(previous_un_code));
        }

        if applied {
            debug!("Row {row}: applied {field} detail");
            ChangeOutcome::Populated
        } else {
            ChangeOutcome::NothingToPopulate
        }
    }
}
