//! Grid rows and dropdown options.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::DgField;
use crate::constants::{HAZARDOUS_NO, HAZARDOUS_YES, OPTION_SEPARATOR};

/// Value of the derived `ContainsHazardousGoods` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Hazardous {
    #[serde(alias = "yes", alias = "YES", alias = "Y")]
    Yes,
    #[default]
    #[serde(alias = "no", alias = "NO", alias = "N", alias = "")]
    No,
}

impl Hazardous {
    #[must_use]
    pub fn from_dg_class(dg_class: &str) -> Self {
        if dg_class.is_empty() { Hazardous::No } else { Hazardous::Yes }
    }
}

impl fmt::Display for Hazardous {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hazardous::Yes => write!(f, "{HAZARDOUS_YES}"),
            Hazardous::No => write!(f, "{HAZARDOUS_NO}"),
        }
    }
}

/// One line of the consignment actuals grid.
///
/// Only the dangerous-goods columns are modelled; wagon, container and THU
/// columns travel in [`Row::extra`] untouched so a loaded payload can be
/// written back out unchanged.
///
/// `contains_hazardous_goods` is kept in step with `dg_class` by every
/// mutator on this type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Row {
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub product_description: String,
    #[serde(default, rename = "UNCode")]
    pub un_code: String,
    #[serde(default, rename = "UNCodeDescription")]
    pub un_code_description: String,
    #[serde(default, rename = "DGClass")]
    pub dg_class: String,
    #[serde(default, rename = "DGClassDescription")]
    pub dg_class_description: String,
    #[serde(default)]
    pub contains_hazardous_goods: Hazardous,
    /// Soft-delete marker for committed rows
    #[serde(default)]
    pub is_deleted: bool,
    /// Columns this crate does not interpret
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Row {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn code(&self, field: DgField) -> &str {
        match field {
            DgField::Product => &self.product,
            DgField::UnCode => &self.un_code,
            DgField::DgClass => &self.dg_class,
        }
    }

    #[must_use]
    pub fn description(&self, field: DgField) -> &str {
        match field {
            DgField::Product => &self.product_description,
            DgField::UnCode => &self.un_code_description,
            DgField::DgClass => &self.dg_class_description,
        }
    }

    /// Set a field's code and description.
    pub fn set_field(&mut self, field: DgField, code: impl Into<String>, description: impl Into<String>) {
        let (code_slot, description_slot) = match field {
            DgField::Product => (&mut self.product, &mut self.product_description),
            DgField::UnCode => (&mut self.un_code, &mut self.un_code_description),
            DgField::DgClass => (&mut self.dg_class, &mut self.dg_class_description),
        };
        *code_slot = code.into();
        *description_slot = description.into();
        self.sync_hazard();
    }

    /// Empty a field's code and description.
    pub fn clear_field(&mut self, field: DgField) {
        self.set_field(field, String::new(), String::new());
    }

    /// Non-empty code of the field that scopes `field`'s options.
    ///
    /// Returns `None` for Product and whenever the driving column is empty, so
    /// an emptied Product never leaves UN Code options filtered by a stale value.
    #[must_use]
    pub fn driving_value(&self, field: DgField) -> Option<&str> {
        field
            .driving_field()
            .map(|driver| self.code(driver).trim())
            .filter(|code| !code.is_empty())
    }

    /// Re-derive `ContainsHazardousGoods` from the DG class.
    ///
    /// A whitespace-only class is stored as empty first, so the flag always
    /// matches the stored column.
    pub fn sync_hazard(&mut self) {
        let trimmed = self.dg_class.trim();
        if trimmed.len() != self.dg_class.len() {
            self.dg_class = trimmed.to_string();
        }
        self.contains_hazardous_goods = Hazardous::from_dg_class(&self.dg_class);
    }

    #[must_use]
    pub fn is_hazardous(&self) -> bool {
        self.contains_hazardous_goods == Hazardous::Yes
    }
}

/// A `{label, value}` pair shown in a dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

impl DropdownOption {
    /// Build the option for a master-data record; label and value are both `"id || name"`.
    #[must_use]
    pub fn from_parts(id: &str, name: &str) -> Self {
        let text = format!("{id}{OPTION_SEPARATOR}{name}");
        Self {
            label: text.clone(),
            value: text,
        }
    }

    /// Code half of the value.
    #[must_use]
    pub fn code(&self) -> &str {
        split_parts(&self.value).0
    }
}

fn split_parts(raw: &str) -> (&str, &str) {
    match raw.split_once(OPTION_SEPARATOR.trim()) {
        Some((code, description)) => (code.trim(), description.trim()),
        None => (raw.trim(), ""),
    }
}

/// Split a raw `"code || description"` selection.
///
/// Returns `None` when the selection is a manual clear: absent, blank, or
/// without a code.
#[must_use]
pub fn split_selection(raw: Option<&str>) -> Option<(String, String)> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    let (code, description) = split_parts(raw);
    if code.is_empty() {
        return None;
    }
    Some((code.to_string(), description.to_string()))
}
