//! Pagination resolver
//!
//! Binds the validated settings to a paginator once, at startup, and applies
//! it to every collection request afterwards.

use super::strategies::build_paginator;
use super::types::{Page, PageParams, PagePlan, PaginationSettings, PaginationStrategy, Paginator};
use crate::error::Result;

/// Applies the configured strategy to collections
///
/// Holds no mutable state, so a single instance can be shared by every
/// request handler.
#[derive(Debug)]
pub struct PaginationResolver {
    settings: PaginationSettings,
    paginator: Box<dyn Paginator>,
}

impl PaginationResolver {
    /// Create a resolver, rejecting settings that break the size invariants
    pub fn new(settings: PaginationSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            paginator: build_paginator(settings),
        })
    }

    /// Settings this resolver was built with
    pub fn settings(&self) -> &PaginationSettings {
        &self.settings
    }

    /// Active strategy
    pub fn strategy(&self) -> PaginationStrategy {
        self.paginator.strategy()
    }

    /// Plan the window for a collection of `total` records
    pub fn plan(&self, params: &PageParams, total: usize) -> PagePlan {
        self.paginator.plan(params, total)
    }

    /// Cut the requested window out of `collection`
    pub fn resolve<T: Clone>(&self, collection: &[T], params: &PageParams) -> Page<T> {
        let plan = self.plan(params, collection.len());
        Page {
            window: collection[plan.range].to_vec(),
            meta: plan.meta,
            links: plan.links,
        }
    }
}
