//! Order service: the order lifecycle from draft to completion

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared::board::{plan_move, Board, LocalBoardOrder, MovePlan, MoveRequest};
use shared::query::{sort_orders, OrderFilter, ProductionFilter, SortState};
use shared::validation::validate_order_draft;
use shared::{
    ActivityKind, ActivityLogEntry, Comment, CommentInput, Customer, ImportStatus, Language,
    LocalProductionStatus, NewOrder, Order, OrderDraft, OrderPatch, OrderStatus, OrderTotals,
    PaymentMethod, PaymentStatus, ProductionStage, ProductionType, StatusFlow, StatusToken,
    Subject,
};

use super::{today, ActivityService};
use crate::config::BusinessConfig;
use crate::error::{AppError, AppResult};
use crate::notifier::{report, Notice, Notifier};
use crate::store::{require, Stores};

/// Order service for the order list, detail page and boards
#[derive(Clone)]
pub struct OrderService {
    stores: Stores,
    notifier: Arc<dyn Notifier>,
    business: BusinessConfig,
}

/// Body of a production status change; the token is checked against the order's type
#[derive(Debug, Clone, Deserialize)]
pub struct ProductionStatusInput {
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusInput {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentInput {
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
}

/// Order detail page payload
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub editable: bool,
    pub allowed_next: Vec<OrderStatus>,
    pub production_label_he: &'static str,
    /// Import progress, present for import orders
    pub import_progress: Option<u8>,
}

impl OrderService {
    /// Create a new OrderService instance
    pub fn new(stores: Stores, notifier: Arc<dyn Notifier>, business: BusinessConfig) -> Self {
        Self {
            stores,
            notifier,
            business,
        }
    }

    fn activity(&self) -> ActivityService {
        ActivityService::new(self.stores.clone(), self.notifier.clone())
    }

    /// Filtered and sorted order list
    pub async fn list(&self, filter: &OrderFilter, sort: SortState) -> AppResult<Vec<Order>> {
        let orders = self.stores.orders.get_all().await?;
        let mut orders = filter.apply(&orders, today());
        sort_orders(&mut orders, sort);
        Ok(orders)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Order> {
        require(self.stores.orders.as_ref(), id).await
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<OrderDetail> {
        let order = self.get(id).await?;
        Ok(OrderDetail {
            editable: order.is_editable(),
            allowed_next: order.status.allowed_next(),
            production_label_he: order.production_stage.label(Language::Hebrew),
            import_progress: order.production_stage.import().map(|s| s.progress_percent()),
            order,
        })
    }

    async fn customer_for(&self, draft: &OrderDraft) -> AppResult<Customer> {
        let customer_id = draft
            .customer_id
            .ok_or_else(|| AppError::NotFound("Customer".to_string()))?;
        require(self.stores.customers.as_ref(), customer_id).await
    }

    /// Validate the draft, allocate a number and store the order as a draft
    pub async fn create(&self, draft: OrderDraft) -> AppResult<Order> {
        let result = self.create_inner(draft).await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("ההזמנה נוצרה בהצלחה!", "Order created")
        });
        result
    }

    async fn create_inner(&self, draft: OrderDraft) -> AppResult<Order> {
        let today = today();
        if let Err(issue) = validate_order_draft(&draft, today) {
            tracing::warn!(field = issue.field, "Rejected order draft: {}", issue.message);
            return Err(issue.into());
        }
        let customer = self.customer_for(&draft).await?;

        let items = draft.items();
        let totals = OrderTotals::from_items(&items, self.business.tax_rate);
        let number = self.stores.order_numbers.allocate(today.year()).await?;

        let order = self
            .stores
            .orders
            .create(NewOrder {
                order_number: number.to_string(),
                customer_id: customer.id,
                customer_name: customer.display_name(),
                status: OrderStatus::Draft,
                production_type: draft.production_type,
                production_stage: ProductionStage::initial(draft.production_type),
                event_name: draft.event_name.map(|s| s.trim().to_string()),
                event_date: draft.event_date,
                subtotal: totals.subtotal,
                tax_amount: totals.tax_amount,
                total_amount: totals.total_amount,
                payment_status: PaymentStatus::Pending,
                payment_method: draft.payment_method,
                shipping_type: draft.shipping_type,
                shipping_address: draft.shipping_address,
                deadline: draft.deadline,
                notes: draft.notes,
                items,
            })
            .await?;

        tracing::info!(order_number = %order.order_number, "Order created");
        self.activity()
            .record(
                Subject::Order(order.id),
                ActivityKind::Created,
                format!("הזמנה {} נוצרה", order.order_number),
            )
            .await;

        Ok(order)
    }

    /// Replace details and items; totals are recomputed
    pub async fn update(&self, id: Uuid, draft: OrderDraft) -> AppResult<Order> {
        let result = self.update_inner(id, draft).await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("ההזמנה עודכנה בהצלחה", "Order updated")
        });
        result
    }

    async fn update_inner(&self, id: Uuid, draft: OrderDraft) -> AppResult<Order> {
        let order = self.get(id).await?;
        if !order.is_editable() {
            return Err(AppError::NotEditable(format!(
                "order {} is {}",
                order.order_number,
                order.status.as_str()
            )));
        }
        if draft.production_type != order.production_type {
            return Err(AppError::ProductionTypeMismatch(format!(
                "order {} is {} and cannot become {}",
                order.order_number,
                order.production_type.as_str(),
                draft.production_type.as_str()
            )));
        }
        // A deadline kept from before may already have passed
        let earliest_deadline = if draft.deadline == order.deadline {
            NaiveDate::MIN
        } else {
            today()
        };
        validate_order_draft(&draft, earliest_deadline)?;
        let customer = self.customer_for(&draft).await?;

        let items = draft.items();
        let totals = OrderTotals::from_items(&items, self.business.tax_rate);
        // The form is submitted whole, so a missing optional field clears it
        let patch = OrderPatch {
            customer_id: Some(customer.id),
            customer_name: Some(customer.display_name()),
            event_name: draft.event_name.map(|s| s.trim().to_string()),
            event_date: Some(draft.event_date),
            deadline: Some(draft.deadline),
            shipping_type: Some(draft.shipping_type),
            shipping_address: Some(draft.shipping_address),
            payment_method: Some(draft.payment_method),
            notes: Some(draft.notes),
            items: Some(items),
            ..Default::default()
        }
        .with_totals(totals);

        self.stores.orders.update(id, patch).await
    }

    /// Move the order along the status table
    pub async fn change_status(&self, id: Uuid, to: OrderStatus) -> AppResult<Order> {
        let result = self.change_status_inner(id, to).await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success(
                format!("ההזמנה עודכנה ל-{}", to.label_he()),
                format!("Order moved to {}", to.label_en()),
            )
        });
        result
    }

    async fn change_status_inner(&self, id: Uuid, to: OrderStatus) -> AppResult<Order> {
        let order = self.get(id).await?;
        let from = order.status;
        if from == to {
            return Ok(order);
        }
        if !from.can_transition_to(to) {
            tracing::warn!(
                order_number = %order.order_number,
                from = from.as_str(),
                to = to.as_str(),
                "Rejected order status transition"
            );
            return Err(AppError::InvalidStateTransition(format!(
                "{} -> {}",
                from.as_str(),
                to.as_str()
            )));
        }

        let updated = self.stores.orders.update(id, OrderPatch::status(to)).await?;
        tracing::info!(
            order_number = %updated.order_number,
            from = from.as_str(),
            to = to.as_str(),
            "Order status changed"
        );
        self.activity()
            .record(
                Subject::Order(id),
                ActivityKind::StatusChange,
                format!("סטטוס שונה מ-{} ל-{}", from.label_he(), to.label_he()),
            )
            .await;
        Ok(updated)
    }

    /// Set the production sub-status; any value of the order's own production type is allowed
    pub async fn change_production_stage(&self, id: Uuid, token: &str) -> AppResult<Order> {
        let result = self.change_production_stage_inner(id, token).await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("סטטוס הייצור עודכן בהצלחה", "Production status updated")
        });
        result
    }

    async fn change_production_stage_inner(&self, id: Uuid, token: &str) -> AppResult<Order> {
        let order = self.get(id).await?;
        let stage = resolve_stage(order.production_type, token)?;
        if stage == order.production_stage {
            return Ok(order);
        }

        let updated = self
            .stores
            .orders
            .update(id, OrderPatch::stage(stage))
            .await?;
        tracing::info!(
            order_number = %updated.order_number,
            stage = stage.token(),
            "Production status changed"
        );
        self.activity()
            .record(
                Subject::Order(id),
                ActivityKind::ProductionChange,
                format!(
                    "סטטוס ייצור שונה מ-{} ל-{}",
                    order.production_stage.label(Language::Hebrew),
                    stage.label(Language::Hebrew)
                ),
            )
            .await;
        Ok(updated)
    }

    pub async fn record_payment(&self, id: Uuid, input: PaymentInput) -> AppResult<Order> {
        let result = self.record_payment_inner(id, input).await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("פרטי התשלום עודכנו", "Payment updated")
        });
        result
    }

    async fn record_payment_inner(&self, id: Uuid, input: PaymentInput) -> AppResult<Order> {
        self.get(id).await?;
        let patch = OrderPatch {
            payment_status: Some(input.payment_status),
            payment_method: input.payment_method.map(Some),
            ..Default::default()
        };
        let updated = self.stores.orders.update(id, patch).await?;
        self.activity()
            .record(
                Subject::Order(id),
                ActivityKind::Payment,
                format!("סטטוס תשלום: {}", input.payment_status.label_he()),
            )
            .await;
        Ok(updated)
    }

    /// Orders grouped by status, one column per status
    pub async fn board(&self, columns: Option<Vec<OrderStatus>>) -> AppResult<Board<Order>> {
        let orders = self.stores.orders.get_all().await?;
        Ok(match columns {
            Some(columns) => Board::partition(&orders, &columns),
            None => Board::full(&orders),
        })
    }

    /// Drag-and-drop on the order board. The record is only replaced once the
    /// store confirms the change.
    pub async fn move_on_board(&self, request: MoveRequest<OrderStatus>) -> AppResult<Order> {
        let orders = self.stores.orders.get_all().await?;
        match plan_move(&orders, &request)? {
            MovePlan::NoOp => self.get(request.item_id).await,
            MovePlan::Move { to, .. } => self.change_status(request.item_id, to).await,
        }
    }

    /// Local production floor, optionally narrowed to urgent orders
    pub async fn production_board(
        &self,
        filter: &ProductionFilter,
    ) -> AppResult<Board<LocalBoardOrder>> {
        let today = today();
        let orders = self.stores.orders.get_all().await?;
        let local = LocalBoardOrder::from_orders(
            orders
                .into_iter()
                .filter(|o| filter.matches(o, today, self.business.deadline_alert_days)),
        );
        Ok(Board::full(&local))
    }

    pub async fn move_on_production_board(
        &self,
        request: MoveRequest<LocalProductionStatus>,
    ) -> AppResult<Order> {
        let orders = self.stores.orders.get_all().await?;
        let local = LocalBoardOrder::from_orders(orders);
        match plan_move(&local, &request)? {
            MovePlan::NoOp => self.get(request.item_id).await,
            MovePlan::Move { to, .. } => {
                self.change_production_stage(request.item_id, to.as_str())
                    .await
            }
        }
    }

    /// Import orders in progress, with their stage
    pub async fn import_pipeline(&self) -> AppResult<Vec<Order>> {
        let orders = self.stores.orders.get_all().await?;
        Ok(orders
            .into_iter()
            .filter(|o| o.production_type == ProductionType::Import && o.status.is_open())
            .collect())
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = self.stores.orders.delete(id).await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("ההזמנה נמחקה", "Order deleted")
        });
        result
    }

    pub async fn add_comment(&self, id: Uuid, input: CommentInput) -> AppResult<Comment> {
        self.get(id).await?;
        self.activity().add_comment(Subject::Order(id), input).await
    }

    pub async fn comments(&self, id: Uuid) -> AppResult<Vec<Comment>> {
        self.get(id).await?;
        self.activity().comments(Subject::Order(id)).await
    }

    pub async fn history(&self, id: Uuid) -> AppResult<Vec<ActivityLogEntry>> {
        self.get(id).await?;
        self.activity().history(Subject::Order(id)).await
    }
}

/// Parse a production status token for an order of `production_type`
pub fn resolve_stage(production_type: ProductionType, token: &str) -> AppResult<ProductionStage> {
    if let Some(stage) = ProductionStage::parse(production_type, token) {
        return Ok(stage);
    }
    let belongs_elsewhere = match production_type {
        ProductionType::Local => ImportStatus::parse(token).is_some(),
        ProductionType::Import => LocalProductionStatus::parse(token).is_some(),
    };
    if belongs_elsewhere {
        Err(AppError::ProductionTypeMismatch(format!(
            "{} is not a {} production status",
            token,
            production_type.as_str()
        )))
    } else {
        Err(AppError::ValidationError(format!(
            "unknown production status {}",
            token
        )))
    }
}
