//! Customer models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::order::{Order, OrderStatus};
use crate::status::{StatusEntry, StatusToken};

fn default_true() -> bool {
    true
}

/// A customer record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: Uuid,
    pub customer_type: CustomerType,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub phone: String,
    #[serde(default)]
    pub address_city: Option<String>,
    #[serde(default)]
    pub address_street: Option<String>,
    #[serde(default)]
    pub tax_id: Option<String>,
    /// Soft-delete flag
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Company name for business customers, "first last" for private ones
    pub fn display_name(&self) -> String {
        match self.customer_type {
            CustomerType::Business => self.company_name.clone().unwrap_or_default(),
            CustomerType::Private => {
                let first = self.first_name.as_deref().unwrap_or("");
                let last = self.last_name.as_deref().unwrap_or("");
                format!("{} {}", first, last).trim().to_string()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum CustomerType {
    #[default]
    Private,
    Business,
}

impl StatusToken for CustomerType {
    const ENTRIES: &'static [StatusEntry<Self>] = &[
        StatusEntry { value: Self::Private, token: "private", label_he: "פרטי", label_en: "Private" },
        StatusEntry { value: Self::Business, token: "business", label_he: "עסקי", label_en: "Business" },
    ];

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Customer form fields
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CustomerInput {
    #[serde(default)]
    pub customer_type: CustomerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
}

impl CustomerInput {
    /// Blank optional strings are treated as absent
    pub fn normalized(mut self) -> Self {
        for field in [
            &mut self.company_name,
            &mut self.first_name,
            &mut self.last_name,
            &mut self.email,
            &mut self.address_city,
            &mut self.address_street,
            &mut self.tax_id,
        ] {
            if field.as_deref().map(|s| s.trim().is_empty()).unwrap_or(false) {
                *field = None;
            }
        }
        self.phone = self.phone.trim().to_string();
        self
    }

    pub fn from_customer(customer: &Customer) -> Self {
        Self {
            customer_type: customer.customer_type,
            company_name: customer.company_name.clone(),
            first_name: customer.first_name.clone(),
            last_name: customer.last_name.clone(),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
            address_city: customer.address_city.clone(),
            address_street: customer.address_street.clone(),
            tax_id: customer.tax_id.clone(),
        }
    }
}

/// Partial update of a customer
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CustomerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_type: Option<CustomerType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl CustomerPatch {
    /// Result of applying this patch, as form fields, for re-validation
    pub fn apply_to(&self, customer: &Customer) -> CustomerInput {
        let mut input = CustomerInput::from_customer(customer);
        if let Some(t) = self.customer_type {
            input.customer_type = t;
        }
        if self.company_name.is_some() {
            input.company_name = self.company_name.clone();
        }
        if self.first_name.is_some() {
            input.first_name = self.first_name.clone();
        }
        if self.last_name.is_some() {
            input.last_name = self.last_name.clone();
        }
        if self.email.is_some() {
            input.email = self.email.clone();
        }
        if let Some(phone) = &self.phone {
            input.phone = phone.clone();
        }
        if self.address_city.is_some() {
            input.address_city = self.address_city.clone();
        }
        if self.address_street.is_some() {
            input.address_street = self.address_street.clone();
        }
        if self.tax_id.is_some() {
            input.tax_id = self.tax_id.clone();
        }
        input
    }
}

/// Purchase aggregates derived from the order collection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CustomerStats {
    pub orders_count: u32,
    /// Sum of `total_amount` over non-cancelled orders
    pub total_purchases: Decimal,
}

impl CustomerStats {
    pub fn from_orders<'a>(customer_id: Uuid, orders: impl IntoIterator<Item = &'a Order>) -> Self {
        orders
            .into_iter()
            .filter(|o| o.customer_id == customer_id)
            .fold(Self::default(), |mut acc, o| {
                acc.orders_count += 1;
                if o.status != OrderStatus::Cancelled {
                    acc.total_purchases += o.total_amount;
                }
                acc
            })
    }
}

/// Customer together with its derived aggregates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerWithStats {
    #[serde(flatten)]
    pub customer: Customer,
    pub orders_count: u32,
    pub total_purchases: Decimal,
}

impl CustomerWithStats {
    pub fn new(customer: Customer, stats: CustomerStats) -> Self {
        Self {
            customer,
            orders_count: stats.orders_count,
            total_purchases: stats.total_purchases,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::assert_table_consistent;

    fn customer(customer_type: CustomerType) -> Customer {
        Customer {
            id: Uuid::new_v4(),
            customer_type,
            company_name: Some("Blue Print Ltd".to_string()),
            first_name: Some("Dana".to_string()),
            last_name: None,
            email: None,
            phone: "0521234567".to_string(),
            address_city: None,
            address_street: None,
            tax_id: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_customer_type_table() {
        assert_table_consistent::<CustomerType>();
    }

    #[test]
    fn test_display_name() {
        assert_eq!(customer(CustomerType::Business).display_name(), "Blue Print Ltd");
        assert_eq!(customer(CustomerType::Private).display_name(), "Dana");
    }

    #[test]
    fn test_normalized_drops_blank_fields() {
        let input = CustomerInput {
            company_name: Some("   ".to_string()),
            phone: " 0521234567 ".to_string(),
            ..Default::default()
        }
        .normalized();
        assert_eq!(input.company_name, None);
        assert_eq!(input.phone, "0521234567");
    }

    #[test]
    fn test_is_active_defaults_to_true() {
        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "customer_type": "private",
            "first_name": "Avi",
            "phone": "0501111111",
            "created_at": "2024-01-01T00:00:00Z"
        });
        let customer: Customer = serde_json::from_value(json).unwrap();
        assert!(customer.is_active);
    }
}
