//! Pagination types and traits
//!
//! Defines the core pagination abstractions used by all strategies.

use crate::error::{Error, Result};
use crate::types::StringMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;
use url::form_urlencoded;

/// Query parameter carrying the 1-based page number
pub const PAGE_NUMBER_PARAM: &str = "page[number]";
/// Query parameter carrying the page size
pub const PAGE_SIZE_PARAM: &str = "page[size]";
/// Query parameter carrying the record offset
pub const PAGE_OFFSET_PARAM: &str = "page[offset]";
/// Query parameter carrying the record limit
pub const PAGE_LIMIT_PARAM: &str = "page[limit]";

// ============================================================================
// Settings
// ============================================================================

/// Algorithm used to window a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationStrategy {
    /// Return the whole collection
    None,
    /// `page[offset]` / `page[limit]`
    Offset,
    /// `page[number]` / `page[size]`
    #[default]
    Paged,
}

impl std::fmt::Display for PaginationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Offset => "offset",
            Self::Paged => "paged",
        };
        f.write_str(name)
    }
}

/// Process-wide pagination settings, fixed at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaginationSettings {
    /// Strategy applied to every collection
    #[serde(default)]
    pub strategy: PaginationStrategy,
    /// Page size used when the request names none
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    /// Upper bound for any requested page size
    #[serde(default = "maximum_page_size")]
    pub maximum_page_size: u32,
}

fn default_page_size() -> u32 {
    2
}

fn maximum_page_size() -> u32 {
    20
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            strategy: PaginationStrategy::default(),
            default_page_size: default_page_size(),
            maximum_page_size: maximum_page_size(),
        }
    }
}

impl PaginationSettings {
    /// Create settings for the given strategy and sizes
    pub fn new(strategy: PaginationStrategy, default_page_size: u32, maximum_page_size: u32) -> Self {
        Self {
            strategy,
            default_page_size,
            maximum_page_size,
        }
    }

    /// Check the size invariants
    pub fn validate(&self) -> Result<()> {
        if self.default_page_size == 0 {
            return Err(Error::invalid_config(
                "pagination.default_page_size",
                "must be at least 1",
            ));
        }
        if self.maximum_page_size == 0 {
            return Err(Error::invalid_config(
                "pagination.maximum_page_size",
                "must be at least 1",
            ));
        }
        if self.default_page_size > self.maximum_page_size {
            return Err(Error::invalid_config(
                "pagination.default_page_size",
                format!(
                    "{} exceeds maximum_page_size {}",
                    self.default_page_size, self.maximum_page_size
                ),
            ));
        }
        Ok(())
    }

    /// Clamp a requested size into `[1, maximum_page_size]`, falling back to the default
    pub fn clamp_size(&self, requested: Option<i64>) -> u32 {
        let size = requested.unwrap_or(i64::from(self.default_page_size));
        size.clamp(1, i64::from(self.maximum_page_size)) as u32
    }
}

// ============================================================================
// Request parameters
// ============================================================================

/// Raw paging parameters as sent by the client
///
/// Values are signed so that negative input can be clamped instead of rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageParams {
    pub number: Option<i64>,
    pub size: Option<i64>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl PageParams {
    /// Parameters for a page-number request
    pub fn paged(number: u64, size: u32) -> Self {
        Self {
            number: Some(number as i64),
            size: Some(i64::from(size)),
            ..Default::default()
        }
    }

    /// Parameters for an offset request
    pub fn offset(offset: u64, limit: u32) -> Self {
        Self {
            offset: Some(offset as i64),
            limit: Some(i64::from(limit)),
            ..Default::default()
        }
    }

    /// Read the `page[...]` keys out of a query map
    ///
    /// Missing keys stay `None`. A present value that is not an integer is
    /// rejected; range checking is left to the paginator.
    pub fn from_query(query: &StringMap) -> Result<Self> {
        Ok(Self {
            number: parse_param(query, PAGE_NUMBER_PARAM)?,
            size: parse_param(query, PAGE_SIZE_PARAM)?,
            offset: parse_param(query, PAGE_OFFSET_PARAM)?,
            limit: parse_param(query, PAGE_LIMIT_PARAM)?,
        })
    }

    /// Present parameters as `(name, value)` pairs in a stable order
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        [
            (PAGE_NUMBER_PARAM, self.number),
            (PAGE_SIZE_PARAM, self.size),
            (PAGE_OFFSET_PARAM, self.offset),
            (PAGE_LIMIT_PARAM, self.limit),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v.to_string())))
        .collect()
    }

    /// Form-encoded query string, e.g. `page%5Bnumber%5D=2&page%5Bsize%5D=2`
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (name, value) in self.to_query_pairs() {
            serializer.append_pair(name, &value);
        }
        serializer.finish()
    }

    /// Query map form, as consumed by `ResourceStore::query`
    pub fn to_query_map(&self) -> StringMap {
        self.to_query_pairs()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }
}

fn parse_param(query: &StringMap, name: &str) -> Result<Option<i64>> {
    match query.get(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| Error::invalid_page_param(name, raw.clone())),
    }
}

// ============================================================================
// Response metadata
// ============================================================================

/// Pagination metadata embedded in the top-level `meta` block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageMeta {
    /// Offset strategy
    Offset {
        offset: u64,
        limit: u32,
        record_count: u64,
    },
    /// Paged strategy
    Paged {
        page_number: u64,
        page_size: u32,
        total_pages: u64,
        record_count: u64,
    },
}

impl PageMeta {
    /// Total number of records in the collection
    pub fn record_count(&self) -> u64 {
        match self {
            Self::Offset { record_count, .. } | Self::Paged { record_count, .. } => *record_count,
        }
    }
}

/// Navigation targets, expressed as the parameters of the adjacent pages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub first: Option<PageParams>,
    pub prev: Option<PageParams>,
    pub next: Option<PageParams>,
    pub last: Option<PageParams>,
}

impl PageLinks {
    /// No navigation at all
    pub fn none() -> Self {
        Self::default()
    }

    /// Check if no link is present
    pub fn is_empty(&self) -> bool {
        self.first.is_none() && self.prev.is_none() && self.next.is_none() && self.last.is_none()
    }

    /// Render the links as URLs relative to `base`
    pub fn render(&self, base: &str) -> BTreeMap<String, String> {
        [
            ("first", self.first),
            ("prev", self.prev),
            ("next", self.next),
            ("last", self.last),
        ]
        .into_iter()
        .filter_map(|(rel, params)| {
            params.map(|p| (rel.to_string(), format!("{base}?{}", p.to_query_string())))
        })
        .collect()
    }
}

// ============================================================================
// Plans and pages
// ============================================================================

/// What a paginator decided for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagePlan {
    /// Index range of the window, always within `0..total`
    pub range: Range<usize>,
    pub meta: Option<PageMeta>,
    pub links: PageLinks,
}

/// A window of records plus its metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub window: Vec<T>,
    pub meta: Option<PageMeta>,
    pub links: PageLinks,
}

impl<T> Page<T> {
    /// Transform the records, keeping the metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            window: self.window.into_iter().map(f).collect(),
            meta: self.meta,
            links: self.links,
        }
    }
}

/// Core trait for pagination strategies
///
/// Implementations are pure: the plan depends only on the settings the
/// paginator was built with, the request parameters and the collection size.
pub trait Paginator: Send + Sync + std::fmt::Debug {
    /// Strategy implemented by this paginator
    fn strategy(&self) -> PaginationStrategy;

    /// Compute the window and metadata for a collection of `total` records
    fn plan(&self, params: &PageParams, total: usize) -> PagePlan;
}
