//! Expense models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::status::{StatusEntry, StatusToken};

/// A business expense
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: Uuid,
    pub category: ExpenseCategory,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(default)]
    pub supplier_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Rent,
    Utilities,
    Salaries,
    Marketing,
    Equipment,
    Supplies,
    Shipping,
    Customs,
    #[default]
    Other,
}

impl StatusToken for ExpenseCategory {
    const ENTRIES: &'static [StatusEntry<Self>] = &[
        StatusEntry { value: Self::Rent, token: "rent", label_he: "שכירות", label_en: "Rent" },
        StatusEntry { value: Self::Utilities, token: "utilities", label_he: "חשמל/מים", label_en: "Utilities" },
        StatusEntry { value: Self::Salaries, token: "salaries", label_he: "משכורות", label_en: "Salaries" },
        StatusEntry { value: Self::Marketing, token: "marketing", label_he: "שיווק", label_en: "Marketing" },
        StatusEntry { value: Self::Equipment, token: "equipment", label_he: "ציוד", label_en: "Equipment" },
        StatusEntry { value: Self::Supplies, token: "supplies", label_he: "חומרים", label_en: "Supplies" },
        StatusEntry { value: Self::Shipping, token: "shipping", label_he: "משלוחים", label_en: "Shipping" },
        StatusEntry { value: Self::Customs, token: "customs", label_he: "מכס", label_en: "Customs" },
        StatusEntry { value: Self::Other, token: "other", label_he: "אחר", label_en: "Other" },
    ];

    fn index(&self) -> usize {
        *self as usize
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseInput {
    #[serde(default)]
    pub category: ExpenseCategory,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExpensePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ExpenseCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::assert_table_consistent;

    #[test]
    fn test_expense_category_table() {
        assert_table_consistent::<ExpenseCategory>();
        assert_eq!(ExpenseCategory::all().len(), 9);
    }
}
