//! Customer tests
//!
//! Tests for the customer service including:
//! - Required fields by customer type
//! - Order count and purchase totals per customer
//! - Customers with orders can only be deactivated, not deleted

use std::str::FromStr;
use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use backoffice_backend::notifier::RecordingNotifier;
use backoffice_backend::services::{CustomerService, OrderService};
use backoffice_backend::store::Stores;
use backoffice_backend::{AppError, BusinessConfig};
use shared::query::CustomerFilter;
use shared::{
    CustomerInput, CustomerPatch, CustomerType, OrderDraft, OrderLine, OrderStatus,
    ProductionType, ShippingType,
};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn private_customer(first_name: &str) -> CustomerInput {
    CustomerInput {
        customer_type: CustomerType::Private,
        first_name: Some(first_name.to_string()),
        last_name: Some("מזרחי".to_string()),
        phone: "054-1112233".to_string(),
        ..Default::default()
    }
}

fn order_for(customer_id: Uuid, unit_price: &str) -> OrderDraft {
    OrderDraft {
        customer_id: Some(customer_id),
        event_name: Some("בר מצווה".to_string()),
        event_date: None,
        deadline: Some(Utc::now().date_naive() + Duration::days(14)),
        production_type: ProductionType::Local,
        shipping_type: ShippingType::Pickup,
        shipping_address: None,
        payment_method: None,
        notes: None,
        items: vec![OrderLine {
            product_name: "חולצה".to_string(),
            quantity: 1,
            unit_price: dec(unit_price),
        }],
    }
}

fn services() -> (Arc<RecordingNotifier>, CustomerService, OrderService) {
    let stores = Stores::memory();
    let notifier = Arc::new(RecordingNotifier::new());
    let customers = CustomerService::new(stores.clone(), notifier.clone());
    let orders = OrderService::new(stores, notifier.clone(), BusinessConfig::default());
    (notifier, customers, orders)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[tokio::test]
    async fn test_business_customer_needs_company_name() {
        let (notifier, customers, _) = services();
        let mut input = private_customer("אבי");
        input.customer_type = CustomerType::Business;

        let err = customers.create(input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(notifier.last().unwrap().message_he, "נא למלא שם חברה ללקוח עסקי");
    }

    #[tokio::test]
    async fn test_blank_optional_fields_are_dropped() {
        let (_, customers, _) = services();
        let mut input = private_customer("אבי");
        input.email = Some("   ".to_string());

        let customer = customers.create(input).await.unwrap();
        assert_eq!(customer.email, None);
        assert!(customer.is_active);
    }

    #[tokio::test]
    async fn test_stats_skip_cancelled_orders() {
        let (_, customers, orders) = services();
        let customer = customers.create(private_customer("אבי")).await.unwrap();
        orders.create(order_for(customer.id, "100")).await.unwrap();
        let cancelled = orders.create(order_for(customer.id, "500")).await.unwrap();
        orders
            .change_status(cancelled.id, OrderStatus::Cancelled)
            .await
            .unwrap();

        let stats = customers.stats_for(customer.id).await.unwrap();
        assert_eq!(stats.orders_count, 2);
        assert_eq!(stats.total_purchases, dec("117"));
    }

    #[tokio::test]
    async fn test_customer_with_orders_cannot_be_deleted() {
        let (_, customers, orders) = services();
        let customer = customers.create(private_customer("אבי")).await.unwrap();
        orders.create(order_for(customer.id, "100")).await.unwrap();

        let err = customers.delete(customer.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
        assert!(customers.get(customer.id).await.is_ok());

        let deactivated = customers.deactivate(customer.id).await.unwrap();
        assert!(!deactivated.is_active);

        let active = customers
            .list(&CustomerFilter {
                active_only: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(active.is_empty());
    }

    #[tokio::test]
    async fn test_customer_without_orders_is_deleted() {
        let (_, customers, _) = services();
        let customer = customers.create(private_customer("אבי")).await.unwrap();

        customers.delete(customer.id).await.unwrap();
        assert!(matches!(
            customers.get(customer.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_keeps_required_fields() {
        let (_, customers, _) = services();
        let customer = customers.create(private_customer("אבי")).await.unwrap();

        let cleared = CustomerPatch {
            phone: Some(String::new()),
            ..Default::default()
        };
        assert!(customers.update(customer.id, cleared).await.is_err());

        let renamed = CustomerPatch {
            first_name: Some("אביב".to_string()),
            ..Default::default()
        };
        let updated = customers.update(customer.id, renamed).await.unwrap();
        assert_eq!(updated.display_name(), "אביב מזרחי");
    }

    #[tokio::test]
    async fn test_search_matches_phone() {
        let (_, customers, _) = services();
        customers.create(private_customer("אבי")).await.unwrap();

        let found = customers
            .list(&CustomerFilter {
                search: "1112233".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].orders_count, 0);
    }
}
