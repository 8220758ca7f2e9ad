//! Pagination strategy implementations
//!
//! Each strategy handles one way of windowing a collection.

use super::types::{PageLinks, PageMeta, PageParams, PagePlan, PaginationSettings, PaginationStrategy, Paginator};
use tracing::debug;

/// Convert a clamped, non-negative request value into an index
fn to_index(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

// ============================================================================
// No Pagination
// ============================================================================

/// No pagination - the whole collection in one response
///
/// Only suitable for collections known to stay small.
#[derive(Debug, Clone, Default)]
pub struct NoPaginator;

impl Paginator for NoPaginator {
    fn strategy(&self) -> PaginationStrategy {
        PaginationStrategy::None
    }

    fn plan(&self, _params: &PageParams, total: usize) -> PagePlan {
        PagePlan {
            range: 0..total,
            meta: None,
            links: PageLinks::none(),
        }
    }
}

// ============================================================================
// Offset Pagination
// ============================================================================

/// Offset-based pagination
///
/// Common pattern: `?page[offset]=4&page[limit]=2`
#[derive(Debug, Clone)]
pub struct OffsetPaginator {
    settings: PaginationSettings,
}

impl OffsetPaginator {
    /// Create a new offset paginator
    pub fn new(settings: PaginationSettings) -> Self {
        Self { settings }
    }
}

impl Paginator for OffsetPaginator {
    fn strategy(&self) -> PaginationStrategy {
        PaginationStrategy::Offset
    }

    fn plan(&self, params: &PageParams, total: usize) -> PagePlan {
        let limit = self.settings.clamp_size(params.limit);
        let offset = params.offset.unwrap_or(0).max(0) as u64;
        let record_count = total as u64;

        let start = to_index(offset).min(total);
        let end = start.saturating_add(limit as usize).min(total);
        debug!(offset, limit, total, "Resolved offset window {}..{}", start, end);

        let links = if total == 0 {
            PageLinks::none()
        } else {
            let step = u64::from(limit);
            let last = PageParams::offset(record_count.saturating_sub(step), limit);
            // Past the end, step back to the last non-empty window
            let prev = if offset >= record_count {
                Some(last)
            } else {
                (offset > 0).then(|| PageParams::offset(offset.saturating_sub(step), limit))
            };
            PageLinks {
                first: Some(PageParams::offset(0, limit)),
                prev,
                next: (offset.saturating_add(step) < record_count)
                    .then(|| PageParams::offset(offset + step, limit)),
                last: Some(last),
            }
        };

        PagePlan {
            range: start..end,
            meta: Some(PageMeta::Offset {
                offset,
                limit,
                record_count,
            }),
            links,
        }
    }
}

// ============================================================================
// Page Number Pagination
// ============================================================================

/// Page number pagination, 1-based
///
/// Common pattern: `?page[number]=2&page[size]=10`
#[derive(Debug, Clone)]
pub struct PagedPaginator {
    settings: PaginationSettings,
}

impl PagedPaginator {
    /// Create a new page number paginator
    pub fn new(settings: PaginationSettings) -> Self {
        Self { settings }
    }
}

impl Paginator for PagedPaginator {
    fn strategy(&self) -> PaginationStrategy {
        PaginationStrategy::Paged
    }

    fn plan(&self, params: &PageParams, total: usize) -> PagePlan {
        let page_size = self.settings.clamp_size(params.size);
        let page_number = params.number.unwrap_or(1).max(1) as u64;
        let record_count = total as u64;
        let total_pages = record_count.div_ceil(u64::from(page_size));

        let start = to_index((page_number - 1).saturating_mul(u64::from(page_size))).min(total);
        let end = start.saturating_add(page_size as usize).min(total);
        debug!(
            page_number,
            page_size, total_pages, "Resolved page window {}..{}", start, end
        );

        // A page past the end still gets metadata; links only point at real pages
        let links = if total_pages == 0 {
            PageLinks::none()
        } else {
            PageLinks {
                first: Some(PageParams::paged(1, page_size)),
                prev: (page_number > 1 && page_number - 1 <= total_pages)
                    .then(|| PageParams::paged(page_number - 1, page_size)),
                next: (page_number < total_pages)
                    .then(|| PageParams::paged(page_number + 1, page_size)),
                last: Some(PageParams::paged(total_pages, page_size)),
            }
        };

        PagePlan {
            range: start..end,
            meta: Some(PageMeta::Paged {
                page_number,
                page_size,
                total_pages,
                record_count,
            }),
            links,
        }
    }
}

/// Build the paginator for the configured strategy
pub fn build_paginator(settings: PaginationSettings) -> Box<dyn Paginator> {
    match settings.strategy {
        PaginationStrategy::None => Box::new(NoPaginator),
        PaginationStrategy::Offset => Box::new(OffsetPaginator::new(settings)),
        PaginationStrategy::Paged => Box::new(PagedPaginator::new(settings)),
    }
}
