//! Local production and import pipeline stages

use serde::{Deserialize, Serialize};

use super::order::ProductionType;
use crate::status::{any_other, StatusEntry, StatusFlow, StatusToken};
use crate::types::Language;

/// Stage of an in-house print job
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LocalProductionStatus {
    Queued,
    Printing,
    QualityCheck,
    ReadyPack,
    Packed,
    ReadyShip,
}

impl StatusToken for LocalProductionStatus {
    const ENTRIES: &'static [StatusEntry<Self>] = &[
        StatusEntry { value: Self::Queued, token: "queued", label_he: "בתור להדפסה", label_en: "Queued" },
        StatusEntry { value: Self::Printing, token: "printing", label_he: "בהדפסה", label_en: "Printing" },
        StatusEntry { value: Self::QualityCheck, token: "quality_check", label_he: "בבדיקת איכות", label_en: "Quality check" },
        StatusEntry { value: Self::ReadyPack, token: "ready_pack", label_he: "מוכן לאריזה", label_en: "Ready to pack" },
        StatusEntry { value: Self::Packed, token: "packed", label_he: "ארוז", label_en: "Packed" },
        StatusEntry { value: Self::ReadyShip, token: "ready_ship", label_he: "מוכן למשלוח", label_en: "Ready to ship" },
    ];

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Freely reassignable: any stage may be set from any other
impl StatusFlow for LocalProductionStatus {
    fn allowed_next(&self) -> Vec<Self> {
        any_other(*self)
    }
}

/// Stage of an order sourced from an overseas supplier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ImportStatus {
    QuoteRequested,
    QuoteReceived,
    OrderPlaced,
    GraphicsSent,
    GraphicsApproved,
    PaymentSent,
    InProduction,
    SamplesReceived,
    SamplesApproved,
    Shipped,
    InTransit,
    Customs,
    CustomsReleased,
    Received,
    QualityCheck,
    Repackaging,
    ReadyShip,
}

impl StatusToken for ImportStatus {
    const ENTRIES: &'static [StatusEntry<Self>] = &[
        StatusEntry { value: Self::QuoteRequested, token: "quote_requested", label_he: "בקשת הצעת מחיר", label_en: "Quote requested" },
        StatusEntry { value: Self::QuoteReceived, token: "quote_received", label_he: "התקבלה הצעת מחיר", label_en: "Quote received" },
        StatusEntry { value: Self::OrderPlaced, token: "order_placed", label_he: "הזמנה נשלחה לספק", label_en: "Order placed" },
        StatusEntry { value: Self::GraphicsSent, token: "graphics_sent", label_he: "גרפיקה נשלחה", label_en: "Graphics sent" },
        StatusEntry { value: Self::GraphicsApproved, token: "graphics_approved", label_he: "גרפיקה אושרה", label_en: "Graphics approved" },
        StatusEntry { value: Self::PaymentSent, token: "payment_sent", label_he: "תשלום נשלח", label_en: "Payment sent" },
        StatusEntry { value: Self::InProduction, token: "in_production", label_he: "בייצור", label_en: "In production" },
        StatusEntry { value: Self::SamplesReceived, token: "samples_received", label_he: "דוגמיות התקבלו", label_en: "Samples received" },
        StatusEntry { value: Self::SamplesApproved, token: "samples_approved", label_he: "דוגמיות אושרו", label_en: "Samples approved" },
        StatusEntry { value: Self::Shipped, token: "shipped", label_he: "נשלח מהספק", label_en: "Shipped by supplier" },
        StatusEntry { value: Self::InTransit, token: "in_transit", label_he: "בדרך", label_en: "In transit" },
        StatusEntry { value: Self::Customs, token: "customs", label_he: "במכס", label_en: "In customs" },
        StatusEntry { value: Self::CustomsReleased, token: "customs_released", label_he: "שוחרר מהמכס", label_en: "Released from customs" },
        StatusEntry { value: Self::Received, token: "received", label_he: "הגיע למחסן", label_en: "Received at warehouse" },
        StatusEntry { value: Self::QualityCheck, token: "quality_check", label_he: "בבדיקת איכות", label_en: "Quality check" },
        StatusEntry { value: Self::Repackaging, token: "repackaging", label_he: "באריזה מחדש", label_en: "Repackaging" },
        StatusEntry { value: Self::ReadyShip, token: "ready_ship", label_he: "מוכן למשלוח", label_en: "Ready to ship" },
    ];

    fn index(&self) -> usize {
        *self as usize
    }
}

impl ImportStatus {
    /// Cosmetic pipeline progress: `round((index + 1) / 17 * 100)`
    pub fn progress_percent(&self) -> u8 {
        let total = Self::ENTRIES.len() as u32;
        let position = self.index() as u32 + 1;
        // integer half-up rounding of position * 100 / total
        ((position * 200 + total) / (total * 2)) as u8
    }
}

/// Freely reassignable: any stage may be set from any other
impl StatusFlow for ImportStatus {
    fn allowed_next(&self) -> Vec<Self> {
        any_other(*self)
    }
}

/// The production sub-status of an order, tied to its production type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProductionStage {
    #[serde(rename = "local_production_status")]
    Local(LocalProductionStatus),
    #[serde(rename = "import_status")]
    Import(ImportStatus),
}

impl ProductionStage {
    /// Stage a newly created order starts in
    pub fn initial(production_type: ProductionType) -> Self {
        match production_type {
            ProductionType::Local => ProductionStage::Local(LocalProductionStatus::Queued),
            ProductionType::Import => ProductionStage::Import(ImportStatus::QuoteRequested),
        }
    }

    pub fn production_type(&self) -> ProductionType {
        match self {
            ProductionStage::Local(_) => ProductionType::Local,
            ProductionStage::Import(_) => ProductionType::Import,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            ProductionStage::Local(s) => s.as_str(),
            ProductionStage::Import(s) => s.as_str(),
        }
    }

    pub fn label(&self, lang: Language) -> &'static str {
        match self {
            ProductionStage::Local(s) => s.label(lang),
            ProductionStage::Import(s) => s.label(lang),
        }
    }

    /// Parse a raw token in the vocabulary of the given production type
    pub fn parse(production_type: ProductionType, token: &str) -> Option<Self> {
        match production_type {
            ProductionType::Local => LocalProductionStatus::parse(token).map(ProductionStage::Local),
            ProductionType::Import => ImportStatus::parse(token).map(ProductionStage::Import),
        }
    }

    pub fn local(&self) -> Option<LocalProductionStatus> {
        match self {
            ProductionStage::Local(s) => Some(*s),
            ProductionStage::Import(_) => None,
        }
    }

    pub fn import(&self) -> Option<ImportStatus> {
        match self {
            ProductionStage::Import(s) => Some(*s),
            ProductionStage::Local(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::assert_table_consistent;

    #[test]
    fn test_status_tables() {
        assert_table_consistent::<LocalProductionStatus>();
        assert_table_consistent::<ImportStatus>();
        assert_eq!(LocalProductionStatus::all().len(), 6);
        assert_eq!(ImportStatus::all().len(), 17);
    }

    #[test]
    fn test_import_progress() {
        assert_eq!(ImportStatus::QuoteRequested.progress_percent(), 6);
        assert_eq!(ImportStatus::Shipped.progress_percent(), 59);
        assert_eq!(ImportStatus::ReadyShip.progress_percent(), 100);
    }

    #[test]
    fn test_progress_is_monotonic() {
        let all = ImportStatus::all();
        for pair in all.windows(2) {
            assert!(pair[0].progress_percent() < pair[1].progress_percent());
        }
    }

    #[test]
    fn test_production_stages_are_freely_reassignable() {
        for from in ImportStatus::all() {
            for to in ImportStatus::all() {
                assert_eq!(from.can_transition_to(to), from != to);
            }
        }
        assert!(LocalProductionStatus::ReadyShip.can_transition_to(LocalProductionStatus::Queued));
    }

    #[test]
    fn test_initial_stage() {
        assert_eq!(
            ProductionStage::initial(ProductionType::Local),
            ProductionStage::Local(LocalProductionStatus::Queued)
        );
        assert_eq!(
            ProductionStage::initial(ProductionType::Import).production_type(),
            ProductionType::Import
        );
    }

    #[test]
    fn test_parse_in_vocabulary() {
        assert_eq!(
            ProductionStage::parse(ProductionType::Import, "customs"),
            Some(ProductionStage::Import(ImportStatus::Customs))
        );
        // customs is not a local stage
        assert_eq!(ProductionStage::parse(ProductionType::Local, "customs"), None);
    }
}
