//! Product catalog models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::order::ProductionType;

/// A sellable product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub production_type: ProductionType,
    pub base_price: Decimal,
    pub base_cost: Decimal,
    pub current_stock: i32,
    pub min_stock_alert: i32,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn is_low_stock(&self) -> bool {
        self.current_stock <= self.min_stock_alert
    }

    /// Gross margin as a percentage of the base price
    pub fn margin_percent(&self) -> Option<Decimal> {
        if self.base_price.is_zero() {
            return None;
        }
        Some((self.base_price - self.base_cost) / self.base_price * Decimal::from(100))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInput {
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub name: String,
    pub production_type: ProductionType,
    #[serde(default)]
    pub base_price: Decimal,
    #[serde(default)]
    pub base_cost: Decimal,
    #[serde(default)]
    pub current_stock: i32,
    #[serde(default)]
    pub min_stock_alert: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_type: Option<ProductionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_cost: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_stock: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_stock_alert: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ProductPatch {
    pub fn stock(current_stock: i32) -> Self {
        Self {
            current_stock: Some(current_stock),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(current_stock: i32, min_stock_alert: i32) -> Product {
        Product {
            id: Uuid::new_v4(),
            sku: "MUG-01".to_string(),
            name: "Printed mug".to_string(),
            production_type: ProductionType::Local,
            base_price: Decimal::from(40),
            base_cost: Decimal::from(10),
            current_stock,
            min_stock_alert,
            image_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_low_stock_is_inclusive() {
        assert!(product(10, 10).is_low_stock());
        assert!(product(3, 10).is_low_stock());
        assert!(!product(11, 10).is_low_stock());
    }

    #[test]
    fn test_margin() {
        assert_eq!(product(0, 0).margin_percent(), Some(Decimal::from(75)));
    }
}
