//! Command palette search

use shared::palette::{search_all, SearchHit};

use crate::config::BusinessConfig;
use crate::error::AppResult;
use crate::store::Stores;

#[derive(Clone)]
pub struct SearchService {
    stores: Stores,
    business: BusinessConfig,
}

impl SearchService {
    /// Create a new SearchService instance
    pub fn new(stores: Stores, business: BusinessConfig) -> Self {
        Self { stores, business }
    }

    /// Orders, then customers, then products matching `term`
    pub async fn search(&self, term: &str) -> AppResult<Vec<SearchHit>> {
        if term.trim().is_empty() {
            return Ok(Vec::new());
        }
        let orders = self.stores.orders.get_all().await?;
        let customers = self.stores.customers.get_all().await?;
        let products = self.stores.products.get_all().await?;

        let hits = search_all(
            &orders,
            &customers,
            &products,
            term,
            self.business.palette_results_per_kind,
        );
        tracing::debug!(term = %term, hits = hits.len(), "Palette search");
        Ok(hits)
    }
}
