//! Lead (prospective customer) models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::status::{any_other, StatusEntry, StatusFlow, StatusToken};

/// A prospective customer not yet converted into a customer record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lead {
    pub id: Uuid,
    pub contact_name: String,
    #[serde(default)]
    pub company_name: Option<String>,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    pub source: LeadSource,
    pub status: LeadStatus,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub event_date: Option<NaiveDate>,
    #[serde(default)]
    pub estimated_quantity: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Lead {
    /// First word and the remainder, used to prefill the conversion form
    pub fn split_contact_name(&self) -> (String, Option<String>) {
        let mut parts = self.contact_name.split_whitespace();
        let first = parts.next().unwrap_or("").to_string();
        let rest: Vec<&str> = parts.collect();
        let last = if rest.is_empty() {
            None
        } else {
            Some(rest.join(" "))
        };
        (first, last)
    }

    pub fn is_converted(&self) -> bool {
        self.status == LeadStatus::Converted
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    InNegotiation,
    Quoted,
    Converted,
    Lost,
}

impl StatusToken for LeadStatus {
    const ENTRIES: &'static [StatusEntry<Self>] = &[
        StatusEntry { value: Self::New, token: "new", label_he: "חדש", label_en: "New" },
        StatusEntry { value: Self::Contacted, token: "contacted", label_he: "נוצר קשר", label_en: "Contacted" },
        StatusEntry { value: Self::InNegotiation, token: "in_negotiation", label_he: "במשא ומתן", label_en: "In negotiation" },
        StatusEntry { value: Self::Quoted, token: "quoted", label_he: "נשלחה הצעה", label_en: "Quoted" },
        StatusEntry { value: Self::Converted, token: "converted", label_he: "הפך ללקוח", label_en: "Converted" },
        StatusEntry { value: Self::Lost, token: "lost", label_he: "אבד", label_en: "Lost" },
    ];

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Kanban-managed, any column may be chosen
impl StatusFlow for LeadStatus {
    fn allowed_next(&self) -> Vec<Self> {
        any_other(*self)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    Website,
    Instagram,
    Facebook,
    Referral,
    Returning,
    Phone,
    Whatsapp,
    #[default]
    Other,
}

impl StatusToken for LeadSource {
    const ENTRIES: &'static [StatusEntry<Self>] = &[
        StatusEntry { value: Self::Website, token: "website", label_he: "אתר", label_en: "Website" },
        StatusEntry { value: Self::Instagram, token: "instagram", label_he: "אינסטגרם", label_en: "Instagram" },
        StatusEntry { value: Self::Facebook, token: "facebook", label_he: "פייסבוק", label_en: "Facebook" },
        StatusEntry { value: Self::Referral, token: "referral", label_he: "הפניה", label_en: "Referral" },
        StatusEntry { value: Self::Returning, token: "returning", label_he: "לקוח חוזר", label_en: "Returning customer" },
        StatusEntry { value: Self::Phone, token: "phone", label_he: "טלפון", label_en: "Phone" },
        StatusEntry { value: Self::Whatsapp, token: "whatsapp", label_he: "וואטסאפ", label_en: "WhatsApp" },
        StatusEntry { value: Self::Other, token: "other", label_he: "אחר", label_en: "Other" },
    ];

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Lead form fields
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LeadInput {
    #[serde(default)]
    pub contact_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub source: LeadSource,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_quantity: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LeadPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<LeadSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LeadStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_quantity: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl LeadPatch {
    pub fn status(status: LeadStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::assert_table_consistent;

    #[test]
    fn test_lead_tables() {
        assert_table_consistent::<LeadStatus>();
        assert_table_consistent::<LeadSource>();
        assert_eq!(LeadSource::all().len(), 8);
    }

    #[test]
    fn test_split_contact_name() {
        let mut lead = Lead {
            id: Uuid::new_v4(),
            contact_name: "Noa Ben David".to_string(),
            company_name: None,
            phone: "0521234567".to_string(),
            email: None,
            source: LeadSource::Instagram,
            status: LeadStatus::New,
            event_type: None,
            event_date: None,
            estimated_quantity: None,
            notes: None,
            created_at: Utc::now(),
        };
        assert_eq!(
            lead.split_contact_name(),
            ("Noa".to_string(), Some("Ben David".to_string()))
        );

        lead.contact_name = "Moshe".to_string();
        assert_eq!(lead.split_contact_name(), ("Moshe".to_string(), None));
    }
}
