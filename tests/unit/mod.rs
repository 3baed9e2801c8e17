//! Unit-level test suite for consignment-grid
//!
//! Exercises the public grid API against the in-memory `FakeLookup` backend;
//! no network, no binary.
//!
//! ```bash
//! cargo test --test unit
//! ```
//!
//! - **field_protocol**: selection, clearing, new-row priority, hazard flag
//! - **option_scoping**: dependent option filters and caching through the grid
//! - **races**: out-of-order on-select responses
//! - **wire_format**: request and envelope JSON shapes

mod wire_format;
