//! First-selection priority for the new row.
//!
//! On an empty new row both Product and UN Code lookups can write each
//! other's columns. Whichever the user touches first wins: if UN Code came
//! first, a later Product selection is stored as-is without its lookup.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::DgField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldPriority {
    Product,
    #[serde(rename = "uncode")]
    UnCode,
}

impl fmt::Display for FieldPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPriority::Product => write!(f, "product"),
            FieldPriority::UnCode => write!(f, "uncode"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PriorityArbiter {
    first: Option<FieldPriority>,
}

impl PriorityArbiter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `field` as first selected unless a priority already exists.
    ///
    /// DG Class never takes priority. Returns `true` when this call set it.
    pub fn mark_first_selected(&mut self, field: DgField) -> bool {
        if self.first.is_some() {
            return false;
        }
        self.first = match field {
            DgField::Product => Some(FieldPriority::Product),
            DgField::UnCode => Some(FieldPriority::UnCode),
            DgField::DgClass => None,
        };
        self.first.is_some()
    }

    #[must_use]
    pub const fn priority(&self) -> Option<FieldPriority> {
        self.first
    }

    /// Whether a selection on `field` must skip its cross-populating lookup.
    #[must_use]
    pub fn suppresses(&self, field: DgField) -> bool {
        field == DgField::Product && self.first == Some(FieldPriority::UnCode)
    }

    pub fn reset(&mut self) {
        self.first = None;
    }
}
