//! Configuration for the `cgrid` tool.
//!
//! A single user-level TOML file holds the lookup backend location and
//! option paging defaults. See [`GridConfig`] for the file format and
//! resolution order.

mod global;

pub use global::{BackendConfig, GridConfig, OptionsConfig};
