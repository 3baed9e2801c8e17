//! Error handling for consignment-grid
//!
//! The error system follows two rules:
//! 1. **Strongly-typed errors** ([`GridError`]) so callers can tell a missing
//!    row apart from a failed master-data lookup
//! 2. **User-friendly messages** ([`ErrorContext`]) with actionable suggestions
//!    for CLI users
//!
//! Lookup failures are special: the grid swallows them (an empty option list
//! or no cross-population) and only logs them. They still get a typed variant
//! because [`LookupService`](crate::lookup::LookupService) implementations
//! return them.
//!
//! # Examples
//!
//! ```rust,no_run
//! use consignment_grid::core::{ErrorContext, GridError, user_friendly_error};
//!
//! let error = GridError::NoNewRow;
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//!
//! let manual = ErrorContext::new(GridError::RowNotFound {
//!     row: "7".to_string(),
//! })
//! .with_suggestion("Reload the grid before editing");
//! println!("{manual}");
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for grid and lookup operations
///
/// # Error Categories
///
/// ## Grid state
/// - [`RowNotFound`] - An edit targeted a row that does not exist
/// - [`NoNewRow`] - Commit/discard requested without an open new row
/// - [`NewRowNotDeletable`] - Soft delete requested for the uncommitted row
///
/// ## Master-data lookups
/// - [`LookupTransport`] - The request never produced an HTTP response
/// - [`LookupStatus`] - The backend answered with a non-success status
/// - [`LookupDecode`] - The envelope or its `ResponseData` was malformed
///
/// ## Configuration and input
/// - [`ConfigError`], [`ConfigNotFound`], [`UnknownField`], [`ScriptParseError`]
///
/// [`RowNotFound`]: GridError::RowNotFound
/// [`NoNewRow`]: GridError::NoNewRow
/// [`NewRowNotDeletable`]: GridError::NewRowNotDeletable
/// [`LookupTransport`]: GridError::LookupTransport
/// [`LookupStatus`]: GridError::LookupStatus
/// [`LookupDecode`]: GridError::LookupDecode
/// [`ConfigError`]: GridError::ConfigError
/// [`ConfigNotFound`]: GridError::ConfigNotFound
/// [`UnknownField`]: GridError::UnknownField
/// [`ScriptParseError`]: GridError::ScriptParseError
#[derive(Error, Debug, Clone)]
pub enum GridError {
    /// Row reference does not point at a committed row or the open new row
    #[error("Row {row} does not exist in the grid")]
    RowNotFound {
        /// Display form of the row reference (`3`, `new`)
        row: String,
    },

    /// No new row is currently being composed
    #[error("No new row is being edited")]
    NoNewRow,

    /// The uncommitted row can only be discarded, not soft-deleted
    #[error("The new row has not been committed and cannot be marked for deletion")]
    NewRowNotDeletable,

    /// Lookup request failed before a response arrived
    ///
    /// Covers connection refusal, DNS failures and client-side timeouts.
    #[error("Lookup '{message_type}' failed: {reason}")]
    LookupTransport {
        /// Message type of the failed request
        message_type: String,
        /// Transport error text
        reason: String,
    },

    /// Backend returned a non-success HTTP status
    #[error("Lookup '{message_type}' returned HTTP {status}")]
    LookupStatus {
        /// Message type of the failed request
        message_type: String,
        /// HTTP status code
        status: u16,
    },

    /// Response envelope could not be decoded
    #[error("Lookup '{message_type}' returned an unreadable response: {reason}")]
    LookupDecode {
        /// Message type of the failed request
        message_type: String,
        /// Decoder error text
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// Config file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// Path to the configuration file that was not found
        path: String,
    },

    /// Field name did not match Product, UN Code or DG Class
    #[error("Unknown field '{name}' (expected product, uncode or dgclass)")]
    UnknownField {
        /// The name that was given
        name: String,
    },

    /// Replay script or rows file could not be parsed
    #[error("Invalid script syntax in {file}")]
    ScriptParseError {
        /// Path to the file that failed to parse
        file: String,
        /// Specific reason for the parsing failure
        reason: String,
    },

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

/// Error context wrapper that provides user-friendly error information
///
/// When displayed, errors show the main message in red, optional details in
/// yellow and an optional suggestion in green.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: GridError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: GridError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`GridError`], [`std::io::Error`], [`toml::de::Error`] and
/// [`serde_json::Error`]; anything else is reported with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(grid_error) = error.downcast_ref::<GridError>() {
        return create_error_context(grid_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(GridError::Other {
                    message: format!("File not found: {io_error}"),
                })
                .with_suggestion("Check that the file exists and the path is correct");
            }
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(GridError::Other {
                    message: format!("Permission denied: {io_error}"),
                })
                .with_suggestion("Check the file ownership and permissions");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(GridError::ConfigError {
            message: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax of your cgrid config file")
        .with_details("Run 'cgrid config path' to see which file was loaded");
    }

    if let Some(json_error) = error.downcast_ref::<serde_json::Error>() {
        return ErrorContext::new(GridError::ScriptParseError {
            file: "input".to_string(),
            reason: json_error.to_string(),
        })
        .with_suggestion("Validate the JSON input with a JSON linter");
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(GridError::Other {
        message,
    })
}

fn create_error_context(error: GridError) -> ErrorContext {
    match &error {
        GridError::RowNotFound { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Rows are zero-based; use -1 or 'new' for the row being composed")
            .with_details("Soft-deleted rows keep their index, so indices never shift"),

        GridError::NoNewRow => ErrorContext::new(error.clone())
            .with_suggestion("Start a new row before selecting values on it"),

        GridError::LookupTransport { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Check the [backend] endpoint in your config and that the service is reachable")
            .with_details("Lookups are attempted once; the grid shows no options when they fail"),

        GridError::LookupStatus { status, .. } => ErrorContext::new(error.clone())
            .with_suggestion(if *status == 404 {
                "The lookup endpoint path looks wrong; check [backend].endpoint"
            } else {
                "The master-data backend rejected the request; check its logs"
            }),

        GridError::LookupDecode { .. } => ErrorContext::new(error.clone())
            .with_details("ResponseData must be a JSON array (or JSON-encoded string) of {id, name} records"),

        GridError::UnknownField { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Use one of: product, uncode, dgclass"),

        GridError::ScriptParseError { reason, .. } => ErrorContext::new(error.clone())
            .with_details(reason.clone())
            .with_suggestion("Events need an \"event\" tag: focus, select, clear, options, new-row, commit, discard or delete"),

        GridError::ConfigError { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Run 'cgrid config init' or pass --endpoint <URL>"),

        GridError::ConfigNotFound { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Run 'cgrid config init' to create an example config"),

        _ => ErrorContext::new(error.clone()),
    }
}
