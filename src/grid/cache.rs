//! Option cache keyed by dependent field and driving value.
//!
//! Avoids re-fetching a dropdown's options while the same driving value stays
//! selected. A clear arms a one-shot refresh for the cleared fields so their
//! next read goes back to the backend in "all options" mode.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::constants::ALL_OPTIONS_KEY;
use crate::models::{DgField, DropdownOption};

/// Driving value an option list was fetched for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// No driving value: the unfiltered list
    All,
    /// Code of the driving field
    Driving(String),
}

impl CacheKey {
    #[must_use]
    pub fn for_driving(value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(code) => CacheKey::Driving(code.to_string()),
            None => CacheKey::All,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::All => f.write_str(ALL_OPTIONS_KEY),
            CacheKey::Driving(code) => f.write_str(code),
        }
    }
}

/// A fetched list and the page it came from.
///
/// `records` counts what the backend returned before records without an
/// `id` or `name` were dropped, so it can differ from `options.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedOptions {
    options: Vec<DropdownOption>,
    records: usize,
    fetch_limit: u32,
}

impl CachedOptions {
    #[must_use]
    pub const fn new(options: Vec<DropdownOption>, records: usize, fetch_limit: u32) -> Self {
        Self {
            options,
            records,
            fetch_limit,
        }
    }

    #[must_use]
    pub fn options(&self) -> &[DropdownOption] {
        &self.options
    }

    /// The backend returned fewer records than asked for, so nothing is missing.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        (self.records as u64) < u64::from(self.fetch_limit)
    }

    /// Slice `offset..offset + limit`, or `None` if the list may not cover it.
    #[must_use]
    pub fn window(&self, offset: u32, limit: u32) -> Option<Vec<DropdownOption>> {
        if self.records != self.options.len() {
            // Backend offsets no longer line up with option positions; only
            // the page that was fetched (or a wider one over a complete list)
            // can be answered.
            let same_page = offset == 0
                && (limit == self.fetch_limit || (limit > self.fetch_limit && self.is_complete()));
            return same_page.then(|| self.options.clone());
        }
        let start = offset as usize;
        let end = start.saturating_add(limit as usize);
        if end > self.options.len() && !self.is_complete() {
            return None;
        }
        let end = end.min(self.options.len());
        Some(self.options.get(start..end).map(<[DropdownOption]>::to_vec).unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub entries: usize,
}

#[derive(Debug, Default)]
pub struct OptionCache {
    entries: HashMap<(DgField, CacheKey), CachedOptions>,
    refresh: HashSet<DgField>,
    hits: usize,
    misses: usize,
}

impl OptionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached list for `field` under `key`.
    ///
    /// A pending refresh for `field` is consumed here and reported as a miss.
    pub fn get(&mut self, field: DgField, key: &CacheKey) -> Option<&CachedOptions> {
        if self.refresh.remove(&field) {
            self.misses += 1;
            return None;
        }
        match self.entries.get(&(field, key.clone())) {
            Some(entry) => {
                self.hits += 1;
                Some(entry)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn put(&mut self, field: DgField, key: CacheKey, entry: CachedOptions) {
        self.entries.insert((field, key), entry);
    }

    /// Drop one entry; returns whether it existed.
    pub fn invalidate(&mut self, field: DgField, key: &CacheKey) -> bool {
        self.entries.remove(&(field, key.clone())).is_some()
    }

    /// Force the next `get` for `field` to miss.
    pub fn request_refresh(&mut self, field: DgField) {
        self.refresh.insert(field);
    }

    #[must_use]
    pub fn refresh_pending(&self, field: DgField) -> bool {
        self.refresh.contains(&field)
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }
}
