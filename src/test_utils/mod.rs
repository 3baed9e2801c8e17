//! Test utilities for consignment-grid
//!
//! Provides a scripted in-memory [`FakeLookup`] backend and a one-time logging
//! initializer. Enabled for unit tests and, through the `test-utils` feature,
//! for the integration test crates.
//!
//! # Example
//!
//! ```rust,no_run
//! use consignment_grid::grid::ConsignmentGrid;
//! use consignment_grid::lookup::MessageType;
//! use consignment_grid::test_utils::FakeLookup;
//! use std::sync::Arc;
//!
//! let fake = Arc::new(FakeLookup::new());
//! fake.set_options(MessageType::UnCodeInit, Some("P1"), &[("U9", "Hazmat")]);
//! let grid = ConsignmentGrid::new(fake.clone(), 50);
//! # let _ = grid;
//! ```

use futures::future::BoxFuture;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, Once};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::core::GridError;
use crate::lookup::{LookupEnvelope, LookupRequest, LookupService, MasterRecord, MessageType, SelectDetail};

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`; with neither, stays silent.
///
/// ```bash
/// RUST_LOG=consignment_grid=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}

#[derive(Default)]
struct FakeState {
    options: HashMap<(MessageType, Option<String>), Vec<MasterRecord>>,
    details: HashMap<(MessageType, String), SelectDetail>,
    failures: HashSet<MessageType>,
    requests: Vec<LookupRequest>,
}

/// Scripted lookup backend that records every request it receives.
///
/// - List lookups answer with the records registered for the message type and
///   filter value, narrowed by search term and paged by offset / limit.
/// - On-select lookups answer with the detail registered for the selected
///   code, or an empty envelope.
/// - [`fail_next`](Self::fail_next) makes the next call of a message type fail
///   with a transport error.
#[derive(Default)]
pub struct FakeLookup {
    state: Mutex<FakeState>,
}

impl FakeLookup {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Register the `(id, name)` records answered for `message_type` under `filter_value`.
    pub fn set_options(&self, message_type: MessageType, filter_value: Option<&str>, records: &[(&str, &str)]) {
        let records = records
            .iter()
            .map(|(id, name)| MasterRecord {
                id: Some((*id).into()),
                name: Some((*name).into()),
            })
            .collect();
        self.state().options.insert((message_type, filter_value.map(str::to_string)), records);
    }

    /// Register the detail answered when `code` is selected.
    pub fn set_detail(&self, message_type: MessageType, code: &str, detail: SelectDetail) {
        self.state().details.insert((message_type, code.to_string()), detail);
    }

    pub fn fail_next(&self, message_type: MessageType) {
        self.state().failures.insert(message_type);
    }

    #[must_use]
    pub fn requests(&self) -> Vec<LookupRequest> {
        self.state().requests.clone()
    }

    #[must_use]
    pub fn requests_of(&self, message_type: MessageType) -> Vec<LookupRequest> {
        self.state().requests.iter().filter(|r| r.message_type == message_type).cloned().collect()
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        self.state().requests.len()
    }

    fn answer(&self, request: &LookupRequest) -> Result<LookupEnvelope, GridError> {
        let mut state = self.state();
        state.requests.push(request.clone());

        if state.failures.remove(&request.message_type) {
            return Err(GridError::LookupTransport {
                message_type: request.message_type.to_string(),
                reason: "scripted failure".to_string(),
            });
        }

        if let Some(criteria) = &request.search_criteria {
            let detail = state.details.get(&(request.message_type, criteria.id.clone()));
            return Ok(detail.map(LookupEnvelope::from_detail).unwrap_or_default());
        }

        let key = (request.message_type, request.filter_value().map(str::to_string));
        let records = state.options.get(&key).cloned().unwrap_or_default();
        let term = request.search_term.as_deref().map(str::to_lowercase);
        let page: Vec<MasterRecord> = records
            .into_iter()
            .filter(|record| match &term {
                Some(term) => record_text(record).to_lowercase().contains(term),
                None => true,
            })
            .skip(request.offset.unwrap_or(0) as usize)
            .take(request.limit.map_or(usize::MAX, |l| l as usize))
            .collect();
        Ok(LookupEnvelope::from_records(&page))
    }
}

fn record_text(record: &MasterRecord) -> String {
    [&record.id, &record.name]
        .iter()
        .filter_map(|v| v.as_ref().and_then(|v| v.as_str()))
        .collect::<Vec<_>>()
        .join(" ")
}

impl LookupService for FakeLookup {
    fn name(&self) -> &str {
        "fake"
    }

    fn lookup<'a>(
        &'a self,
        request: &'a LookupRequest,
    ) -> BoxFuture<'a, Result<LookupEnvelope, GridError>> {
        let result = self.answer(request);
        Box::pin(async move { result })
    }
}
