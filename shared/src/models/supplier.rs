//! Overseas suppliers and import shipments

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::production::ImportStatus;
use crate::status::StatusToken;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub country: String,
    pub contact_name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub phone: String,
    pub lead_time_days: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SupplierInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub contact_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub lead_time_days: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SupplierPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_time_days: Option<i32>,
}

/// A consolidated shipment ordered from a supplier for one or more customer orders
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImportOrder {
    pub id: Uuid,
    pub supplier_name: String,
    pub status: ImportStatus,
    /// Customer order numbers covered by this shipment
    #[serde(default)]
    pub order_numbers: Vec<String>,
    pub total_cost: Decimal,
    #[serde(default)]
    pub estimated_arrival: Option<NaiveDate>,
    #[serde(default)]
    pub tracking_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ImportOrder {
    pub fn progress_percent(&self) -> u8 {
        self.status.progress_percent()
    }

    /// Arrival expected within `days` of `today` and not yet received
    pub fn arrives_within(&self, today: NaiveDate, days: i64) -> bool {
        match self.estimated_arrival {
            Some(eta) => {
                let until = (eta - today).num_days();
                (0..=days).contains(&until) && self.status.index() < ImportStatus::Received.index()
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOrderInput {
    #[serde(default)]
    pub supplier_name: String,
    #[serde(default = "default_import_status")]
    pub status: ImportStatus,
    #[serde(default)]
    pub order_numbers: Vec<String>,
    #[serde(default)]
    pub total_cost: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_arrival: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
}

fn default_import_status() -> ImportStatus {
    ImportStatus::QuoteRequested
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ImportOrderPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ImportStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_numbers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_arrival: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
}

impl ImportOrderPatch {
    pub fn status(status: ImportStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shipment(status: ImportStatus, eta: Option<NaiveDate>) -> ImportOrder {
        ImportOrder {
            id: Uuid::new_v4(),
            supplier_name: "Shenzhen Gifts".to_string(),
            status,
            order_numbers: vec!["24-00012".to_string()],
            total_cost: Decimal::from(5400),
            estimated_arrival: eta,
            tracking_number: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_arrives_within() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let soon = NaiveDate::from_ymd_opt(2024, 5, 12);
        assert!(shipment(ImportStatus::InTransit, soon).arrives_within(today, 3));
        assert!(!shipment(ImportStatus::Received, soon).arrives_within(today, 3));
        assert!(!shipment(ImportStatus::InTransit, None).arrives_within(today, 3));
        let late = NaiveDate::from_ymd_opt(2024, 5, 20);
        assert!(!shipment(ImportStatus::InTransit, late).arrives_within(today, 3));
    }
}
