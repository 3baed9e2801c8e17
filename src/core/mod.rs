//! Core types shared by every other module.
//!
//! For now this is the error system: [`GridError`] for typed failures and
//! [`ErrorContext`] / [`user_friendly_error`] for what the CLI prints.

pub mod error;

pub use error::{ErrorContext, GridError, user_friendly_error};
