//! The consignment actuals grid and its dependent-field protocol.
//!
//! [`ConsignmentGrid`] owns the committed rows, the optional new row and the
//! per-grid state that keeps the Product / UN Code / DG Class dropdowns
//! consistent:
//!
//! - [`RowIdentityTracker`] - which row is focused
//! - [`PriorityArbiter`] - which of Product / UN Code came first on the new row
//! - [`DependentOptionResolver`] with its [`OptionCache`] - dropdown options
//! - request tags - which in-flight on-select lookup is still wanted
//!
//! Field changes go through the dispatcher (see `dispatcher.rs`): either
//! [`ConsignmentGrid::on_field_change`] in one call, or
//! [`ConsignmentGrid::begin_field_change`] / [`ConsignmentGrid::complete_lookup`]
//! when the caller runs lookups itself and responses can arrive out of order.
//!
//! # Example
//!
//! ```rust,no_run
//! use consignment_grid::grid::{ConsignmentGrid, OptionQuery};
//! use consignment_grid::lookup::HttpLookupService;
//! use consignment_grid::models::{DgField, RowRef};
//! use std::sync::Arc;
//!
//! # async fn demo() -> Result<(), consignment_grid::core::GridError> {
//! let lookup = Arc::new(HttpLookupService::new("http://localhost:8080/lookup"));
//! let mut grid = ConsignmentGrid::new(lookup, 50);
//! let row = grid.start_new_row();
//! grid.on_field_change(DgField::UnCode, Some("U9 || Hazmat"), row).await?;
//! let dg_options = grid.options_for(row, DgField::DgClass, &OptionQuery::new()).await?;
//! # let _ = dg_options;
//! grid.commit_new_row()?;
//! # Ok(())
//! # }
//! ```

mod arbiter;
mod cache;
mod dispatcher;
mod resolver;
mod tags;
mod tracker;

pub use arbiter::{FieldPriority, PriorityArbiter};
pub use cache::{CacheKey, CacheStats, CachedOptions, OptionCache};
pub use dispatcher::{ChangeOutcome, Dispatch, PendingLookup};
pub use resolver::{DependentOptionResolver, OptionQuery};
pub use tracker::RowIdentityTracker;

use std::sync::Arc;
use tracing::debug;

use crate::core::GridError;
use crate::lookup::LookupService;
use crate::models::{DgField, DropdownOption, Row, RowRef};
use tags::RequestTags;

pub struct ConsignmentGrid {
    rows: Vec<Row>,
    new_row: Option<Row>,
    tracker: RowIdentityTracker,
    arbiter: PriorityArbiter,
    resolver: DependentOptionResolver,
    lookup: Arc<dyn LookupService>,
    tags: RequestTags,
}

impl ConsignmentGrid {
    pub fn new(lookup: Arc<dyn LookupService>, page_limit: u32) -> Self {
        Self {
            rows: Vec::new(),
            new_row: None,
            tracker: RowIdentityTracker::new(),
            arbiter: PriorityArbiter::new(),
            resolver: DependentOptionResolver::new(Arc::clone(&lookup), page_limit),
            lookup,
            tags: RequestTags::default(),
        }
    }

    /// Replace the committed rows with a freshly loaded set.
    ///
    /// Drops any new row and all in-flight lookups. The option cache survives;
    /// it holds master data, not row state.
    pub fn load_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        for row in &mut self.rows {
            row.sync_hazard();
        }
        self.new_row = None;
        self.arbiter.reset();
        self.tracker.clear();
        self.tags.clear();
        debug!("Loaded {} row(s)", self.rows.len());
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn new_row(&self) -> Option<&Row> {
        self.new_row.as_ref()
    }

    #[must_use]
    pub fn row(&self, row: RowRef) -> Option<&Row> {
        match row {
            RowRef::Existing(index) => self.rows.get(index),
            RowRef::New => self.new_row.as_ref(),
        }
    }

    fn row_mut(&mut self, row: RowRef) -> Option<&mut Row> {
        match row {
            RowRef::Existing(index) => self.rows.get_mut(index),
            RowRef::New => self.new_row.as_mut(),
        }
    }

    fn require_row(&self, row: RowRef) -> Result<&Row, GridError> {
        self.row(row).ok_or_else(|| match row {
            RowRef::New => GridError::NoNewRow,
            RowRef::Existing(_) => GridError::RowNotFound {
                row: row.to_string(),
            },
        })
    }

    /// Open the new row (or keep the one already open) and focus it.
    pub fn start_new_row(&mut self) -> RowRef {
        if self.new_row.is_none() {
            self.new_row = Some(Row::new());
            self.arbiter.reset();
            debug!("Started new row");
        }
        self.focus(RowRef::New);
        RowRef::New
    }

    /// Append the new row to the committed rows and return its index.
    pub fn commit_new_row(&mut self) -> Result<usize, GridError> {
        let mut row = self.new_row.take().ok_or(GridError::NoNewRow)?;
        row.sync_hazard();
        self.rows.push(row);
        let index = self.rows.len() - 1;

        self.arbiter.reset();
        // Lookups still in flight now belong to the committed row
        self.tags.move_row(RowRef::New, RowRef::Existing(index));
        if self.tracker.current() == Some(RowRef::New) {
            self.tracker.focus(RowRef::Existing(index));
        }
        debug!("Committed new row as row {index}");
        Ok(index)
    }

    /// Throw the new row away.
    pub fn discard_new_row(&mut self) -> Result<Row, GridError> {
        let row = self.new_row.take().ok_or(GridError::NoNewRow)?;
        self.arbiter.reset();
        self.tags.forget_row(RowRef::New);
        if self.tracker.current() == Some(RowRef::New) {
            self.tracker.clear();
        }
        debug!("Discarded new row");
        Ok(row)
    }

    /// Soft-delete a committed row. Indices of other rows do not move.
    pub fn mark_deleted(&mut self, row: RowRef) -> Result<(), GridError> {
        let RowRef::Existing(index) = row else {
            return Err(GridError::NewRowNotDeletable);
        };
        let target = self.rows.get_mut(index).ok_or_else(|| GridError::RowNotFound {
            row: row.to_string(),
        })?;
        target.is_deleted = true;
        self.tags.forget_row(row);
        debug!("Marked row {index} for deletion");
        Ok(())
    }

    /// Make `row` the edit target.
    ///
    /// Leaving the new row for another row resets the first-selection priority.
    pub fn focus(&mut self, row: RowRef) {
        let previous = self.tracker.focus(row);
        if previous == Some(RowRef::New) && row != RowRef::New && self.arbiter.priority().is_some()
        {
            debug!("Focus left the new row; resetting field priority");
            self.arbiter.reset();
        }
    }

    #[must_use]
    pub const fn focused(&self) -> Option<RowRef> {
        self.tracker.current()
    }

    #[must_use]
    pub const fn priority(&self) -> Option<FieldPriority> {
        self.arbiter.priority()
    }

    /// Options for `field` on `row`, scoped by that row's driving value.
    pub async fn options_for(
        &mut self,
        row: RowRef,
        field: DgField,
        query: &OptionQuery,
    ) -> Result<Vec<DropdownOption>, GridError> {
        let driving = self.require_row(row)?.driving_value(field).map(str::to_string);
        Ok(self.resolver.resolve(field, driving.as_deref(), query).await)
    }

    /// Options for `field` on the focused row (row 0 when nothing is focused).
    pub async fn options_for_focused(
        &mut self,
        field: DgField,
        query: &OptionQuery,
    ) -> Result<Vec<DropdownOption>, GridError> {
        let target = self.tracker.lookup_target();
        self.options_for(target, field, query).await
    }

    /// Clear `field` on the focused row; does nothing when nothing is focused.
    pub fn clear_focused(&mut self, field: DgField) -> Result<Option<ChangeOutcome>, GridError> {
        let Some(target) = self.tracker.invalidation_target() else {
            return Ok(None);
        };
        self.require_row(target)?;
        self.focus(target);
        Ok(Some(self.apply_clear(target, field)))
    }

    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.resolver.cache_stats()
    }
}
