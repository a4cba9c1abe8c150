//! Import shipments ordered from overseas suppliers

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use shared::board::{plan_move, Board, MovePlan, MoveRequest};
use shared::validation::validate_import_order;
use shared::{
    ImportOrder, ImportOrderInput, ImportOrderPatch, ImportStatus, StatusToken,
};

use super::{patched_input, today};
use crate::error::AppResult;
use crate::notifier::{report, Notice, Notifier};
use crate::store::{require, Stores};

#[derive(Clone)]
pub struct ImportService {
    stores: Stores,
    notifier: Arc<dyn Notifier>,
}

/// A shipment with its pipeline progress
#[derive(Debug, Clone, Serialize)]
pub struct ImportOrderView {
    #[serde(flatten)]
    pub import_order: ImportOrder,
    pub status_label_he: &'static str,
    pub progress_percent: u8,
}

impl From<ImportOrder> for ImportOrderView {
    fn from(import_order: ImportOrder) -> Self {
        Self {
            status_label_he: import_order.status.label_he(),
            progress_percent: import_order.progress_percent(),
            import_order,
        }
    }
}

impl ImportService {
    /// Create a new ImportService instance
    pub fn new(stores: Stores, notifier: Arc<dyn Notifier>) -> Self {
        Self { stores, notifier }
    }

    pub async fn list(&self, status: Option<ImportStatus>) -> AppResult<Vec<ImportOrderView>> {
        let shipments = self.stores.import_orders.get_all().await?;
        Ok(shipments
            .into_iter()
            .filter(|s| status.map_or(true, |st| s.status == st))
            .map(ImportOrderView::from)
            .collect())
    }

    pub async fn get(&self, id: Uuid) -> AppResult<ImportOrder> {
        require(self.stores.import_orders.as_ref(), id).await
    }

    pub async fn create(&self, input: ImportOrderInput) -> AppResult<ImportOrder> {
        let result = self.create_inner(input).await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("הזמנת יבוא נוצרה בהצלחה", "Import order created")
        });
        result
    }

    async fn create_inner(&self, mut input: ImportOrderInput) -> AppResult<ImportOrder> {
        input.order_numbers = clean_order_numbers(input.order_numbers);
        validate_import_order(&input)?;
        let shipment = self.stores.import_orders.create(input).await?;
        tracing::info!(
            import_order_id = %shipment.id,
            supplier = %shipment.supplier_name,
            orders = shipment.order_numbers.len(),
            "Import order created"
        );
        Ok(shipment)
    }

    pub async fn update(&self, id: Uuid, patch: ImportOrderPatch) -> AppResult<ImportOrder> {
        let result = self.update_inner(id, patch).await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("הזמנת היבוא עודכנה בהצלחה", "Import order updated")
        });
        result
    }

    async fn update_inner(&self, id: Uuid, mut patch: ImportOrderPatch) -> AppResult<ImportOrder> {
        patch.order_numbers = patch.order_numbers.map(clean_order_numbers);
        let shipment = self.get(id).await?;
        let preview: ImportOrderInput = patched_input(&shipment, &patch)?;
        validate_import_order(&preview)?;
        self.stores.import_orders.update(id, patch).await
    }

    pub async fn board(&self) -> AppResult<Board<ImportOrder>> {
        let shipments = self.stores.import_orders.get_all().await?;
        Ok(Board::full(&shipments))
    }

    pub async fn move_status(&self, request: MoveRequest<ImportStatus>) -> AppResult<ImportOrder> {
        let result = self.move_status_inner(request).await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("סטטוס היבוא עודכן בהצלחה", "Import status updated")
        });
        result
    }

    async fn move_status_inner(&self, request: MoveRequest<ImportStatus>) -> AppResult<ImportOrder> {
        let shipments = self.stores.import_orders.get_all().await?;
        match plan_move(&shipments, &request)? {
            MovePlan::NoOp => self.get(request.item_id).await,
            MovePlan::Move { from, to } => {
                tracing::info!(
                    import_order_id = %request.item_id,
                    from = from.as_str(),
                    to = to.as_str(),
                    "Import status changed"
                );
                self.stores
                    .import_orders
                    .update(request.item_id, ImportOrderPatch::status(to))
                    .await
            }
        }
    }

    /// Shipments due within `days` that have not reached the warehouse
    pub async fn arriving_soon(&self, days: i64) -> AppResult<Vec<ImportOrder>> {
        let today = today();
        let shipments = self.stores.import_orders.get_all().await?;
        let mut due: Vec<ImportOrder> = shipments
            .into_iter()
            .filter(|s| s.arrives_within(today, days))
            .collect();
        due.sort_by_key(|s| s.estimated_arrival);
        Ok(due)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = self.stores.import_orders.delete(id).await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("הזמנת היבוא נמחקה", "Import order deleted")
        });
        result
    }
}

/// Order numbers entered comma separated in one field arrive trimmed and without blanks
fn clean_order_numbers(numbers: Vec<String>) -> Vec<String> {
    numbers
        .iter()
        .flat_map(|n| n.split(','))
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_order_numbers() {
        let cleaned = clean_order_numbers(vec![
            "24-00001, 24-00002".to_string(),
            "  ".to_string(),
            "24-00007".to_string(),
        ]);
        assert_eq!(cleaned, vec!["24-00001", "24-00002", "24-00007"]);
    }
}
