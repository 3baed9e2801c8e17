//! Field and row identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{NEW_ROW_SENTINEL, PRODUCT_FILTER_NAME, UN_CODE_FILTER_NAME};
use crate::core::GridError;

/// One of the three cross-referencing dropdown columns.
///
/// Product drives UN Code, UN Code drives DG Class. DG Class drives nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DgField {
    /// Product ID
    Product,
    /// UN number of the dangerous good
    #[serde(alias = "un_code", alias = "un-code")]
    UnCode,
    /// Dangerous-goods class
    #[serde(alias = "dg_class", alias = "dg-class")]
    DgClass,
}

impl DgField {
    /// All fields, upstream first.
    pub const ALL: [DgField; 3] = [DgField::Product, DgField::UnCode, DgField::DgClass];

    /// The field whose value scopes this field's options, if any.
    #[must_use]
    pub const fn driving_field(self) -> Option<DgField> {
        match self {
            DgField::Product => None,
            DgField::UnCode => Some(DgField::Product),
            DgField::DgClass => Some(DgField::UnCode),
        }
    }

    /// The field whose options this field scopes, if any.
    #[must_use]
    pub const fn dependent_field(self) -> Option<DgField> {
        match self {
            DgField::Product => Some(DgField::UnCode),
            DgField::UnCode => Some(DgField::DgClass),
            DgField::DgClass => None,
        }
    }

    /// Fields cleared together with this one on a manual clear.
    ///
    /// Product is upstream of both others; UN Code only of DG Class.
    #[must_use]
    pub const fn downstream(self) -> &'static [DgField] {
        match self {
            DgField::Product => &[DgField::UnCode, DgField::DgClass],
            DgField::UnCode => &[DgField::DgClass],
            DgField::DgClass => &[],
        }
    }

    /// Fields whose on-select lookups may write this field.
    #[must_use]
    pub const fn upstream(self) -> &'static [DgField] {
        match self {
            DgField::Product => &[],
            DgField::UnCode => &[DgField::Product],
            DgField::DgClass => &[DgField::Product, DgField::UnCode],
        }
    }

    /// `FilterName` sent when this field scopes a dependent lookup.
    #[must_use]
    pub const fn filter_name(self) -> Option<&'static str> {
        match self {
            DgField::Product => Some(PRODUCT_FILTER_NAME),
            DgField::UnCode => Some(UN_CODE_FILTER_NAME),
            DgField::DgClass => None,
        }
    }

    /// Column header used in tables and logs.
    #[must_use]
    pub const fn column_name(self) -> &'static str {
        match self {
            DgField::Product => "Product",
            DgField::UnCode => "UNCode",
            DgField::DgClass => "DGClass",
        }
    }
}

impl fmt::Display for DgField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DgField::Product => write!(f, "product"),
            DgField::UnCode => write!(f, "uncode"),
            DgField::DgClass => write!(f, "dgclass"),
        }
    }
}

impl FromStr for DgField {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "product" | "productid" => Ok(DgField::Product),
            "uncode" => Ok(DgField::UnCode),
            "dgclass" => Ok(DgField::DgClass),
            _ => Err(GridError::UnknownField {
                name: s.to_string(),
            }),
        }
    }
}

/// Target of an edit: a committed row by index, or the new row.
///
/// The new row is exchanged with the outside world as index `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RowRefRepr", into = "i64")]
pub enum RowRef {
    /// Zero-based index into the committed rows
    Existing(usize),
    /// The uncommitted row being composed
    New,
}

impl RowRef {
    /// Interpret a raw grid index, mapping the sentinel to [`RowRef::New`].
    ///
    /// Negative values other than the sentinel are rejected.
    #[must_use]
    pub fn from_index(index: i64) -> Option<Self> {
        if index == NEW_ROW_SENTINEL {
            Some(RowRef::New)
        } else {
            usize::try_from(index).ok().map(RowRef::Existing)
        }
    }

    /// Raw grid index, `-1` for the new row.
    #[must_use]
    pub fn as_index(self) -> i64 {
        match self {
            RowRef::Existing(index) => i64::try_from(index).unwrap_or(i64::MAX),
            RowRef::New => NEW_ROW_SENTINEL,
        }
    }

    #[must_use]
    pub const fn is_new(self) -> bool {
        matches!(self, RowRef::New)
    }
}

impl fmt::Display for RowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowRef::Existing(index) => write!(f, "{index}"),
            RowRef::New => write!(f, "new"),
        }
    }
}

impl FromStr for RowRef {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("new") {
            return Ok(RowRef::New);
        }
        trimmed.parse::<i64>().ok().and_then(RowRef::from_index).ok_or_else(|| {
            GridError::RowNotFound {
                row: s.to_string(),
            }
        })
    }
}

impl From<RowRef> for i64 {
    fn from(row: RowRef) -> Self {
        row.as_index()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RowRefRepr {
    Index(i64),
    Name(String),
}

impl TryFrom<RowRefRepr> for RowRef {
    type Error = GridError;

    fn try_from(repr: RowRefRepr) -> Result<Self, Self::Error> {
        match repr {
            RowRefRepr::Index(index) => RowRef::from_index(index).ok_or(GridError::RowNotFound {
                row: index.to_string(),
            }),
            RowRefRepr::Name(name) => name.parse(),
        }
    }
}
