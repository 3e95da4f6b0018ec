//! Product Handler
//!
//! Catalog browsing. Only active products are listed.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::{DomainError, OperationContext, Product, ProductSortKey, ProductSummary};
use crate::error::AppResult;
use crate::query::{ListQuery, ListQueryProcessor, ListResult};
use crate::repository::AffiliateRepository;

use super::ProductFilters;

/// A catalog page plus the filter values available across the catalog.
#[derive(Debug, Clone)]
pub struct ProductListing {
    pub result: ListResult<Product, ProductSummary>,
    pub categories: Vec<String>,
    pub vendors: Vec<String>,
}

pub struct ProductQueryHandler {
    repository: Arc<dyn AffiliateRepository>,
}

impl ProductQueryHandler {
    pub fn new(repository: Arc<dyn AffiliateRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(
        &self,
        query: &ListQuery<ProductSortKey>,
        filters: &ProductFilters,
        context: &OperationContext,
    ) -> AppResult<ProductListing> {
        let snapshot = self.repository.products().await?;

        let processor = ListQueryProcessor::new(query)
            .with_filter(Product::is_active)
            .with_filter(|p: &Product| matches_filters(p, filters));
        let result = processor.run(&snapshot);

        let active = snapshot.iter().filter(|p| p.is_active());
        let categories: BTreeSet<&str> = active.clone().map(|p| p.category.as_str()).collect();
        let vendors: BTreeSet<&str> = active.map(|p| p.vendor.as_str()).collect();

        tracing::debug!(
            correlation_id = ?context.correlation_id,
            route = context.route.as_deref().unwrap_or("-"),
            total = result.pagination.total_count,
            returned = result.data.len(),
            "Listed products"
        );

        Ok(ProductListing {
            result,
            categories: categories.into_iter().map(str::to_string).collect(),
            vendors: vendors.into_iter().map(str::to_string).collect(),
        })
    }

    /// Single active product.
    pub async fn get(&self, id: u64) -> AppResult<Product> {
        self.repository
            .products()
            .await?
            .into_iter()
            .find(|p| p.id == id && p.is_active())
            .ok_or_else(|| DomainError::ProductNotFound(id).into())
    }
}

fn matches_filters(product: &Product, filters: &ProductFilters) -> bool {
    if let Some(category) = filters.category.as_deref() {
        if !product.category.eq_ignore_ascii_case(category) {
            return false;
        }
    }
    if let Some(vendor) = filters.vendor.as_deref() {
        if !product.vendor.eq_ignore_ascii_case(vendor) {
            return false;
        }
    }
    if let Some(term) = filters.search.as_deref() {
        if !product.matches_search(term.trim()) {
            return false;
        }
    }
    if let Some(min_price) = filters.min_price {
        if product.price < min_price {
            return false;
        }
    }
    if let Some(max_price) = filters.max_price {
        if product.price > max_price {
            return false;
        }
    }
    if let Some(min_commission) = filters.min_commission {
        match product.estimated_commission() {
            Ok(commission) if commission >= min_commission => {}
            _ => return false,
        }
    }
    if let Some(in_stock) = filters.in_stock {
        if product.in_stock() != in_stock {
            return false;
        }
    }
    true
}
