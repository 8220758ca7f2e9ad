//! Pagination module
//!
//! Supports: None, Offset, Paged (page number)
//!
//! # Overview
//!
//! The pagination module windows a collection according to the strategy
//! chosen at startup. Out-of-range requests are clamped rather than rejected:
//! oversize pages shrink to the configured maximum and pages past the end come
//! back empty with valid metadata.

mod resolver;
mod strategies;
mod types;

pub use resolver::PaginationResolver;
pub use strategies::{build_paginator, NoPaginator, OffsetPaginator, PagedPaginator};
pub use types::{
    Page, PageLinks, PageMeta, PageParams, PagePlan, PaginationSettings, PaginationStrategy,
    Paginator, PAGE_LIMIT_PARAM, PAGE_NUMBER_PARAM, PAGE_OFFSET_PARAM, PAGE_SIZE_PARAM,
};
