//! Product catalog service with finished-goods stock

use std::sync::Arc;

use uuid::Uuid;

use shared::query::ProductFilter;
use shared::validation::{validate_product, validate_stock_quantity};
use shared::{Product, ProductInput, ProductPatch, StockAdjustment};

use super::patched_input;
use crate::error::AppResult;
use crate::notifier::{report, Notice, Notifier};
use crate::store::{require, Stores};

#[derive(Clone)]
pub struct ProductService {
    stores: Stores,
    notifier: Arc<dyn Notifier>,
}

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(stores: Stores, notifier: Arc<dyn Notifier>) -> Self {
        Self { stores, notifier }
    }

    pub async fn list(&self, filter: &ProductFilter) -> AppResult<Vec<Product>> {
        let products = self.stores.products.get_all().await?;
        Ok(filter.apply(&products))
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Product> {
        require(self.stores.products.as_ref(), id).await
    }

    /// Products at or under their alert threshold
    pub async fn low_stock(&self) -> AppResult<Vec<Product>> {
        let filter = ProductFilter {
            low_stock_only: true,
            ..Default::default()
        };
        self.list(&filter).await
    }

    pub async fn create(&self, input: ProductInput) -> AppResult<Product> {
        let result = async {
            validate_product(&input)?;
            self.stores.products.create(input).await
        }
        .await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("המוצר נוסף בהצלחה", "Product added")
        });
        result
    }

    pub async fn update(&self, id: Uuid, patch: ProductPatch) -> AppResult<Product> {
        let result = self.update_inner(id, patch).await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("המוצר עודכן בהצלחה", "Product updated")
        });
        result
    }

    async fn update_inner(&self, id: Uuid, patch: ProductPatch) -> AppResult<Product> {
        let product = self.get(id).await?;
        let preview: ProductInput = patched_input(&product, &patch)?;
        validate_product(&preview)?;
        self.stores.products.update(id, patch).await
    }

    /// Manual stock correction; subtracting never goes below zero
    pub async fn adjust_stock(&self, id: Uuid, adjustment: StockAdjustment) -> AppResult<Product> {
        let result = self.adjust_inner(id, adjustment).await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("המלאי עודכן בהצלחה", "Stock updated")
        });
        result
    }

    async fn adjust_inner(&self, id: Uuid, adjustment: StockAdjustment) -> AppResult<Product> {
        validate_stock_quantity(&adjustment)?;
        let product = self.get(id).await?;
        let level = adjustment.apply(product.current_stock);

        tracing::info!(
            product_id = %id,
            from = product.current_stock,
            to = level,
            "Adjusting product stock"
        );
        self.stores.products.update(id, ProductPatch::stock(level)).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = self.stores.products.delete(id).await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("המוצר נמחק בהצלחה", "Product deleted")
        });
        result
    }
}
