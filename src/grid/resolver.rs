//! Dependent option resolution.

use std::sync::Arc;
use tracing::{debug, warn};

use super::cache::{CacheKey, CacheStats, CachedOptions, OptionCache};
use crate::lookup::{LookupRequest, LookupService};
use crate::models::{DgField, DropdownOption};

/// Search and paging parameters of one dropdown read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionQuery {
    pub search_term: Option<String>,
    pub offset: u32,
    /// Page size; `None` uses the resolver's configured page limit
    pub limit: Option<u32>,
}

impl OptionQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    #[must_use]
    pub const fn with_page(mut self, offset: u32, limit: u32) -> Self {
        self.offset = offset;
        self.limit = Some(limit);
        self
    }

    fn search(&self) -> Option<&str> {
        self.search_term.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

/// Fetches a field's options from the lookup service, through the cache.
///
/// Only unsearched first pages are cached; searches always go to the backend.
/// Failures yield an empty list and are never cached or retried.
pub struct DependentOptionResolver {
    lookup: Arc<dyn LookupService>,
    cache: OptionCache,
    page_limit: u32,
}

impl DependentOptionResolver {
    pub fn new(lookup: Arc<dyn LookupService>, page_limit: u32) -> Self {
        Self {
            lookup,
            cache: OptionCache::new(),
            page_limit: page_limit.max(1),
        }
    }

    pub async fn resolve(
        &mut self,
        field: DgField,
        driving_value: Option<&str>,
        query: &OptionQuery,
    ) -> Vec<DropdownOption> {
        // Product has no driver; anything passed for it is ignored
        let driving = field
            .driving_field()
            .and(driving_value)
            .map(str::trim)
            .filter(|v| !v.is_empty());
        let key = CacheKey::for_driving(driving);
        let limit = query.limit.unwrap_or(self.page_limit).max(1);
        let search = query.search();

        if search.is_none() {
            if let Some(window) =
                self.cache.get(field, &key).and_then(|entry| entry.window(query.offset, limit))
            {
                debug!("Option cache hit for {field} [{key}]");
                return window;
            }
        }

        let request = LookupRequest::options(field, driving)
            .with_search_term(search)
            .with_page(query.offset, limit);

        let page = match self.lookup.lookup(&request).await {
            Ok(envelope) => envelope.option_page(request.message_type),
            Err(e) => Err(e),
        };
        match page {
            Ok(page) => {
                debug!(
                    "Fetched {} {field} option(s) from {} record(s) for [{key}] via {}",
                    page.options.len(),
                    page.records,
                    self.lookup.name()
                );
                if search.is_none() && query.offset == 0 {
                    self.cache.put(field, key, CachedOptions::new(page.options.clone(), page.records, limit));
                }
                page.options
            }
            Err(e) => {
                warn!("No {field} options for [{key}]: {e}");
                Vec::new()
            }
        }
    }

    pub fn cache_mut(&mut self) -> &mut OptionCache {
        &mut self.cache
    }

    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    #[must_use]
    pub const fn page_limit(&self) -> u32 {
        self.page_limit
    }
}
