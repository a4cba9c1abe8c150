//! Raw material and packaging stock

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::status::{StatusEntry, StatusToken};

/// A stock item (raw material, packaging or consumable)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockItem {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: StockItemType,
    pub current_quantity: i32,
    pub min_quantity: i32,
    pub unit: String,
    pub unit_cost: Decimal,
    pub created_at: DateTime<Utc>,
}

impl StockItem {
    pub fn is_low_stock(&self) -> bool {
        self.current_quantity <= self.min_quantity
    }

    pub fn stock_value(&self) -> Decimal {
        self.unit_cost * Decimal::from(self.current_quantity)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum StockItemType {
    #[default]
    RawMaterial,
    Packaging,
    Consumable,
}

impl StatusToken for StockItemType {
    const ENTRIES: &'static [StatusEntry<Self>] = &[
        StatusEntry { value: Self::RawMaterial, token: "raw_material", label_he: "חומר גלם", label_en: "Raw material" },
        StatusEntry { value: Self::Packaging, token: "packaging", label_he: "אריזה", label_en: "Packaging" },
        StatusEntry { value: Self::Consumable, token: "consumable", label_he: "מתכלה", label_en: "Consumable" },
    ];

    fn index(&self) -> usize {
        *self as usize
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockItemInput {
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub item_type: StockItemType,
    #[serde(default)]
    pub current_quantity: i32,
    #[serde(default)]
    pub min_quantity: i32,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub unit_cost: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StockItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<StockItemType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_quantity: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_quantity: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_cost: Option<Decimal>,
}

impl StockItemPatch {
    pub fn quantity(current_quantity: i32) -> Self {
        Self {
            current_quantity: Some(current_quantity),
            ..Default::default()
        }
    }
}

/// A manual stock correction entered from the stock dialog
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "quantity", rename_all = "snake_case")]
pub enum StockAdjustment {
    Add(i32),
    /// Never drops below zero
    Subtract(i32),
    Set(i32),
}

impl StockAdjustment {
    pub fn quantity(&self) -> i32 {
        match self {
            StockAdjustment::Add(q) | StockAdjustment::Subtract(q) | StockAdjustment::Set(q) => *q,
        }
    }

    pub fn apply(&self, current: i32) -> i32 {
        match self {
            StockAdjustment::Add(q) => current.saturating_add(*q),
            StockAdjustment::Subtract(q) => current.saturating_sub(*q).max(0),
            StockAdjustment::Set(q) => *q,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::assert_table_consistent;

    #[test]
    fn test_stock_type_table() {
        assert_table_consistent::<StockItemType>();
    }

    #[test]
    fn test_adjustments() {
        assert_eq!(StockAdjustment::Add(50).apply(200), 250);
        assert_eq!(StockAdjustment::Subtract(30).apply(200), 170);
        assert_eq!(StockAdjustment::Subtract(300).apply(200), 0);
        assert_eq!(StockAdjustment::Set(75).apply(200), 75);
    }

    #[test]
    fn test_adjustment_wire_format() {
        let adj: StockAdjustment =
            serde_json::from_value(serde_json::json!({ "type": "add", "quantity": 50 })).unwrap();
        assert_eq!(adj, StockAdjustment::Add(50));
    }

    #[test]
    fn test_stock_value() {
        let item = StockItem {
            id: Uuid::new_v4(),
            sku: "INK-B".to_string(),
            name: "Black ink".to_string(),
            item_type: StockItemType::Consumable,
            current_quantity: 4,
            min_quantity: 5,
            unit: "liter".to_string(),
            unit_cost: Decimal::new(1250, 2),
            created_at: Utc::now(),
        };
        assert_eq!(item.stock_value(), Decimal::from(50));
        assert!(item.is_low_stock());
    }
}
