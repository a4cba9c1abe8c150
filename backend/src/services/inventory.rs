//! Inventory service for raw materials, packaging and consumables

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use shared::query::StockItemFilter;
use shared::validation::{validate_stock_item, validate_stock_quantity};
use shared::{StatusToken, StockAdjustment, StockItem, StockItemInput, StockItemPatch, StockItemType};

use super::patched_input;
use crate::config::BusinessConfig;
use crate::error::AppResult;
use crate::notifier::{report, Notice, Notifier};
use crate::store::{require, Stores};

/// Inventory service for stock items and their valuation
#[derive(Clone)]
pub struct InventoryService {
    stores: Stores,
    notifier: Arc<dyn Notifier>,
    business: BusinessConfig,
}

/// Stock totals for one item type
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InventorySummary {
    pub item_type: StockItemType,
    pub label_he: &'static str,
    pub item_count: usize,
    pub low_stock_count: usize,
    pub total_value: Decimal,
    pub currency: String,
}

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(stores: Stores, notifier: Arc<dyn Notifier>, business: BusinessConfig) -> Self {
        Self {
            stores,
            notifier,
            business,
        }
    }

    pub async fn list(&self, filter: &StockItemFilter) -> AppResult<Vec<StockItem>> {
        let items = self.stores.stock_items.get_all().await?;
        Ok(filter.apply(&items))
    }

    pub async fn get(&self, id: Uuid) -> AppResult<StockItem> {
        require(self.stores.stock_items.as_ref(), id).await
    }

    pub async fn low_stock(&self) -> AppResult<Vec<StockItem>> {
        let filter = StockItemFilter {
            low_stock_only: true,
            ..Default::default()
        };
        self.list(&filter).await
    }

    pub async fn create(&self, input: StockItemInput) -> AppResult<StockItem> {
        let result = async {
            validate_stock_item(&input)?;
            self.stores.stock_items.create(input).await
        }
        .await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("הפריט נוסף בהצלחה", "Item added")
        });
        result
    }

    pub async fn update(&self, id: Uuid, patch: StockItemPatch) -> AppResult<StockItem> {
        let result = self.update_inner(id, patch).await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("הפריט עודכן בהצלחה", "Item updated")
        });
        result
    }

    async fn update_inner(&self, id: Uuid, patch: StockItemPatch) -> AppResult<StockItem> {
        let item = self.get(id).await?;
        let preview: StockItemInput = patched_input(&item, &patch)?;
        validate_stock_item(&preview)?;
        self.stores.stock_items.update(id, patch).await
    }

    pub async fn adjust(&self, id: Uuid, adjustment: StockAdjustment) -> AppResult<StockItem> {
        let result = self.adjust_inner(id, adjustment).await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("המלאי עודכן בהצלחה", "Stock updated")
        });
        result
    }

    async fn adjust_inner(&self, id: Uuid, adjustment: StockAdjustment) -> AppResult<StockItem> {
        validate_stock_quantity(&adjustment)?;
        let item = self.get(id).await?;
        let quantity = adjustment.apply(item.current_quantity);

        tracing::info!(
            item_id = %id,
            from = item.current_quantity,
            to = quantity,
            "Adjusting stock item"
        );
        self.stores
            .stock_items
            .update(id, StockItemPatch::quantity(quantity))
            .await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = self.stores.stock_items.delete(id).await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("הפריט נמחק בהצלחה", "Item deleted")
        });
        result
    }

    /// Item counts and stock value per item type
    pub async fn summary(&self) -> AppResult<Vec<InventorySummary>> {
        let items = self.stores.stock_items.get_all().await?;
        Ok(summarize(&items, &self.business.currency))
    }
}

pub fn summarize(items: &[StockItem], currency: &str) -> Vec<InventorySummary> {
    StockItemType::all()
        .into_iter()
        .map(|item_type| {
            let of_type: Vec<&StockItem> =
                items.iter().filter(|i| i.item_type == item_type).collect();
            InventorySummary {
                item_type,
                label_he: item_type.label_he(),
                item_count: of_type.len(),
                low_stock_count: of_type.iter().filter(|i| i.is_low_stock()).count(),
                total_value: of_type.iter().map(|i| i.stock_value()).sum(),
                currency: currency.to_string(),
            }
        })
        .collect()
}
