//! Master-data lookup contract.
//!
//! Every backend interaction of the grid goes through [`LookupService`]: one
//! request shape ([`LookupRequest`]), one response envelope
//! ([`LookupEnvelope`]). List lookups (`"… Init"`) return `{id, name}`
//! records inside `ResponseData`; on-select lookups return one detail record
//! in `ResponsePayload`.
//!
//! The production implementation is [`HttpLookupService`]. Tests use the
//! scripted fake in `test_utils`.

mod envelope;
mod http;
mod request;

pub use envelope::{LookupEnvelope, MasterRecord, OptionPage, SelectDetail, option_from_record};
pub use http::HttpLookupService;
pub use request::{AdditionalFilter, LookupRequest, MessageType, SearchCriteria};

use futures::future::BoxFuture;

use crate::core::GridError;

/// Backend that answers master-data lookups.
///
/// Implementations make a single attempt per call; retries are left to the
/// next user action.
pub trait LookupService: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Send one request and return the decoded envelope.
    fn lookup<'a>(
        &'a self,
        request: &'a LookupRequest,
    ) -> BoxFuture<'a, Result<LookupEnvelope, GridError>>;
}
