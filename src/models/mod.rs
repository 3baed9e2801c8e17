//! Shared data models for grid operations
//!
//! These types are used by the grid, the lookup client and the CLI alike:
//! - [`DgField`] names the three interdependent dropdown columns
//! - [`RowRef`] identifies a committed row or the uncommitted new row
//! - [`Row`] is one line of the consignment actuals grid
//! - [`DropdownOption`] is a `{label, value}` pair shown in a dropdown

mod field;
mod row;

pub use field::{DgField, RowRef};
pub use row::{DropdownOption, Hazardous, Row, split_selection};
