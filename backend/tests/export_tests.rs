//! CSV export tests
//!
//! Tests for the report exports including:
//! - Files start with a UTF-8 byte order mark
//! - Hebrew headers in the expected column order
//! - Values with commas and quotes are quoted
//! - The finance sheet lists expenses, paid orders and the totals

use std::str::FromStr;
use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use backoffice_backend::notifier::RecordingNotifier;
use backoffice_backend::services::export::{finances_csv, orders_csv};
use backoffice_backend::services::order::PaymentInput;
use backoffice_backend::services::{CustomerService, ExportService, FinanceService, OrderService};
use backoffice_backend::store::Stores;
use backoffice_backend::BusinessConfig;
use shared::query::{FinancePeriod, OrderFilter, SortState};
use shared::{
    CustomerInput, CustomerType, DateRange, ExpenseCategory, ExpenseInput, Order, OrderDraft,
    OrderLine, PaymentStatus, ProductionType, ShippingType,
};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

struct Fixture {
    stores: Stores,
    notifier: Arc<RecordingNotifier>,
    orders: OrderService,
}

async fn fixture() -> Fixture {
    let stores = Stores::memory();
    let notifier = Arc::new(RecordingNotifier::new());
    let orders = OrderService::new(stores.clone(), notifier.clone(), BusinessConfig::default());
    Fixture {
        stores,
        notifier,
        orders,
    }
}

async fn place_order(fx: &Fixture, company: &str, unit_price: &str) -> Order {
    let customer = CustomerService::new(fx.stores.clone(), fx.notifier.clone())
        .create(CustomerInput {
            customer_type: CustomerType::Business,
            company_name: Some(company.to_string()),
            first_name: Some("רון".to_string()),
            phone: "03-5551234".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    fx.orders
        .create(OrderDraft {
            customer_id: Some(customer.id),
            event_name: Some("כנס שנתי".to_string()),
            event_date: None,
            deadline: Some(Utc::now().date_naive() + Duration::days(5)),
            production_type: ProductionType::Local,
            shipping_type: ShippingType::Pickup,
            shipping_address: None,
            payment_method: None,
            notes: None,
            items: vec![OrderLine {
                product_name: "שקית בד".to_string(),
                quantity: 1,
                unit_price: dec(unit_price),
            }],
        })
        .await
        .unwrap()
}

fn lines(content: &str) -> Vec<&str> {
    content.trim_start_matches('\u{feff}').lines().collect()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[tokio::test]
    async fn test_orders_csv_headers_and_bom() {
        let fx = fixture().await;
        let order = place_order(&fx, "אופק", "100").await;

        let content = orders_csv(&[order.clone()]).unwrap();
        assert!(content.starts_with('\u{feff}'));

        let rows = lines(&content);
        assert_eq!(rows[0], "מס' הזמנה,לקוח,סטטוס,סוג,דדליין,סכום");
        assert!(rows[1].starts_with(&format!("{},אופק,טיוטה,", order.order_number)));
        assert!(rows[1].ends_with(",117"));
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_orders_csv_quotes_commas_and_quotes() {
        let fx = fixture().await;
        let order = place_order(&fx, "כהן, לוי ושות' \"הדפסות\"", "10").await;

        let content = orders_csv(&[order]).unwrap();
        assert!(content.contains("\"כהן, לוי ושות' \"\"הדפסות\"\"\""));
    }

    #[tokio::test]
    async fn test_orders_csv_deadline_format() {
        let fx = fixture().await;
        let order = place_order(&fx, "אופק", "100").await;
        let deadline = order.deadline.unwrap().format("%-d.%-m.%Y").to_string();

        let content = orders_csv(&[order]).unwrap();
        assert!(content.contains(&deadline));
    }

    #[tokio::test]
    async fn test_export_service_names_file_by_date() {
        let fx = fixture().await;
        place_order(&fx, "אופק", "100").await;

        let export = ExportService::new(fx.stores.clone(), fx.notifier.clone())
            .orders_csv(&OrderFilter::default(), SortState::default())
            .await
            .unwrap();
        let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
        assert_eq!(export.filename, format!("orders_{}.csv", today));
        assert_eq!(fx.notifier.last().unwrap().message_he, "הדוח יוצא בהצלחה");
    }

    #[tokio::test]
    async fn test_finances_csv_sections() {
        let fx = fixture().await;
        let paid = place_order(&fx, "אופק", "100").await;
        fx.orders
            .record_payment(
                paid.id,
                PaymentInput {
                    payment_status: PaymentStatus::Paid,
                    payment_method: None,
                },
            )
            .await
            .unwrap();
        // unpaid orders stay out of the revenue section
        place_order(&fx, "גליל", "900").await;

        let today = Utc::now().date_naive();
        let finance = FinanceService::new(fx.stores.clone(), fx.notifier.clone());
        finance
            .create_expense(ExpenseInput {
                category: ExpenseCategory::Rent,
                description: "שכירות".to_string(),
                amount: dec("50"),
                date: today,
                supplier_name: None,
            })
            .await
            .unwrap();

        let orders = fx.stores.orders.get_all().await.unwrap();
        let expenses = fx.stores.expenses.get_all().await.unwrap();
        let content = finances_csv(&orders, &expenses, DateRange::new(today, today)).unwrap();
        let rows = lines(&content);

        assert_eq!(rows[0], "תאריך,סוג,תיאור,סכום");
        assert_eq!(rows[1], format!("{},שכירות,שכירות,50", today));
        assert_eq!(rows[2], ",,,");
        assert_eq!(rows[3], "\"סה\"\"כ הוצאות\",,,50");
        assert_eq!(rows[5], "תאריך הזמנה,מספר הזמנה,לקוח,סכום");
        assert_eq!(rows[6], format!("{},{},אופק,117", today, paid.order_number));
        assert_eq!(rows[8], "\"סה\"\"כ הכנסות\",,,117");
        assert_eq!(rows[10], "רווח נקי,,,67");
        assert_eq!(rows.len(), 11);
    }

    #[tokio::test]
    async fn test_finance_export_uses_period() {
        let fx = fixture().await;
        let export = ExportService::new(fx.stores.clone(), fx.notifier.clone())
            .finances_csv(FinancePeriod::Month)
            .await
            .unwrap();
        assert!(export.filename.starts_with("finances_"));
        assert!(export.content.contains("רווח נקי,,,0"));
    }
}
