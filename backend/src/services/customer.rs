//! Customer service: customer records plus purchase statistics derived from orders

use std::sync::Arc;

use uuid::Uuid;

use shared::query::CustomerFilter;
use shared::validation::validate_customer;
use shared::{Customer, CustomerInput, CustomerPatch, CustomerStats, CustomerWithStats, Order};

use crate::error::{AppError, AppResult};
use crate::notifier::{report, Notice, Notifier};
use crate::store::{require, Stores};

#[derive(Clone)]
pub struct CustomerService {
    stores: Stores,
    notifier: Arc<dyn Notifier>,
}

impl CustomerService {
    /// Create a new CustomerService instance
    pub fn new(stores: Stores, notifier: Arc<dyn Notifier>) -> Self {
        Self { stores, notifier }
    }

    /// Customers matching the filter, each with order count and purchases
    pub async fn list(&self, filter: &CustomerFilter) -> AppResult<Vec<CustomerWithStats>> {
        let customers = self.stores.customers.get_all().await?;
        let orders = self.stores.orders.get_all().await?;

        Ok(filter
            .apply(&customers)
            .into_iter()
            .map(|c| {
                let stats = CustomerStats::from_orders(c.id, &orders);
                CustomerWithStats::new(c, stats)
            })
            .collect())
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Customer> {
        require(self.stores.customers.as_ref(), id).await
    }

    pub async fn with_stats(&self, id: Uuid) -> AppResult<CustomerWithStats> {
        let customer = self.get(id).await?;
        let stats = self.stats_for(id).await?;
        Ok(CustomerWithStats::new(customer, stats))
    }

    pub async fn stats_for(&self, id: Uuid) -> AppResult<CustomerStats> {
        let orders = self.stores.orders.get_all().await?;
        Ok(CustomerStats::from_orders(id, &orders))
    }

    /// Order history shown on the customer page, newest first
    pub async fn orders_for(&self, id: Uuid) -> AppResult<Vec<Order>> {
        self.get(id).await?;
        let orders = self.stores.orders.get_all().await?;
        Ok(orders.into_iter().filter(|o| o.customer_id == id).collect())
    }

    pub async fn create(&self, input: CustomerInput) -> AppResult<Customer> {
        let result = self.create_inner(input).await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("הלקוח נוסף בהצלחה", "Customer added")
        });
        result
    }

    async fn create_inner(&self, input: CustomerInput) -> AppResult<Customer> {
        let input = input.normalized();
        validate_customer(&input)?;
        let customer = self.stores.customers.create(input).await?;
        tracing::info!(customer_id = %customer.id, "Customer created");
        Ok(customer)
    }

    pub async fn update(&self, id: Uuid, patch: CustomerPatch) -> AppResult<Customer> {
        let result = self.update_inner(id, patch).await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("הלקוח עודכן בהצלחה", "Customer updated")
        });
        result
    }

    async fn update_inner(&self, id: Uuid, patch: CustomerPatch) -> AppResult<Customer> {
        let customer = self.get(id).await?;
        validate_customer(&patch.apply_to(&customer).normalized())?;
        self.stores.customers.update(id, patch).await
    }

    /// Soft delete: the customer stays on file but drops out of active lists
    pub async fn deactivate(&self, id: Uuid) -> AppResult<Customer> {
        let patch = CustomerPatch {
            is_active: Some(false),
            ..Default::default()
        };
        let result = self.stores.customers.update(id, patch).await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("הלקוח סומן כלא פעיל", "Customer deactivated")
        });
        result
    }

    /// Customers with orders on file can only be deactivated
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = self.delete_inner(id).await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("הלקוח נמחק", "Customer deleted")
        });
        result
    }

    async fn delete_inner(&self, id: Uuid) -> AppResult<()> {
        let stats = self.stats_for(id).await?;
        if stats.orders_count > 0 {
            return Err(AppError::Conflict {
                resource: "customer".to_string(),
                message: format!(
                    "Customer has {} orders; deactivate instead",
                    stats.orders_count
                ),
                message_he: "ללקוח יש הזמנות, ניתן רק לסמן כלא פעיל".to_string(),
            });
        }
        self.stores.customers.delete(id).await
    }
}
