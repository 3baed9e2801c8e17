//! consignment-grid - dependent dangerous-goods fields for consignment actuals
//!
//! Each row of a consignment-trip actuals grid carries three cross-referencing
//! dropdowns:
//!
//! - **Product** scopes the selectable **UN Codes** and, once chosen, looks up
//!   the product's UN Code and DG Class
//! - **UN Code** scopes the selectable **DG Classes** and looks up its DG Class
//! - **DG Class** decides the derived `ContainsHazardousGoods` flag
//!
//! This crate keeps those fields consistent while the user edits committed
//! rows and one uncommitted new row, against a master-data lookup backend.
//!
//! # Core Modules
//!
//! - [`grid`] - the grid, its field-change dispatcher, option resolver and cache
//! - [`lookup`] - wire types and the [`lookup::LookupService`] backend trait
//! - [`models`] - rows, fields, row references and dropdown options
//! - [`config`] - user configuration (`~/.cgrid/config.toml`)
//! - [`core`] - error types and user-facing error context
//! - [`cli`] - the `cgrid` command-line tool
//!
//! # Example
//!
//! ```rust,no_run
//! use consignment_grid::grid::{ConsignmentGrid, OptionQuery};
//! use consignment_grid::lookup::HttpLookupService;
//! use consignment_grid::models::{DgField, Row, RowRef};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let lookup = Arc::new(HttpLookupService::new("http://localhost:8080/api/masterdata/lookup"));
//! let mut grid = ConsignmentGrid::new(lookup, 50);
//! grid.load_rows(vec![Row::new()]);
//!
//! let row = RowRef::Existing(0);
//! grid.on_field_change(DgField::Product, Some("P1 || Widget"), row).await?;
//! let un_codes = grid.options_for(row, DgField::UnCode, &OptionQuery::new()).await?;
//! println!("{} UN codes for P1", un_codes.len());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod grid;
pub mod lookup;
pub mod models;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
