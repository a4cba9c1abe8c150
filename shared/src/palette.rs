//! Command palette: global quick search over orders, customers and products

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Customer, Order, Product};
use crate::query::contains_ci;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    Order,
    Customer,
    Product,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchHit {
    pub id: Uuid,
    pub kind: SearchKind,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
}

impl SearchHit {
    /// Page to open for this hit, with the record id when the page shows one record
    pub fn target(&self) -> (&'static str, Option<Uuid>) {
        match self.kind {
            SearchKind::Order => ("order-detail", Some(self.id)),
            SearchKind::Customer => ("customer-detail", Some(self.id)),
            SearchKind::Product => ("products", None),
        }
    }
}

/// Up to `per_kind` hits for each record kind; a blank term finds nothing
pub fn search_all(
    orders: &[Order],
    customers: &[Customer],
    products: &[Product],
    term: &str,
    per_kind: usize,
) -> Vec<SearchHit> {
    if term.trim().is_empty() {
        return Vec::new();
    }

    let order_hits = orders
        .iter()
        .filter(|o| contains_ci(&o.order_number, term) || contains_ci(&o.customer_name, term))
        .take(per_kind)
        .map(|o| SearchHit {
            id: o.id,
            kind: SearchKind::Order,
            title: format!("הזמנה #{}", o.order_number),
            subtitle: Some(o.customer_name.clone()),
        });

    let customer_hits = customers
        .iter()
        .filter(|c| {
            [&c.first_name, &c.last_name, &c.company_name]
                .iter()
                .any(|f| f.as_deref().map_or(false, |v| contains_ci(v, term)))
                || c.phone.contains(term.trim())
        })
        .take(per_kind)
        .map(|c| SearchHit {
            id: c.id,
            kind: SearchKind::Customer,
            title: c.display_name(),
            subtitle: Some(c.phone.clone()),
        });

    let product_hits = products
        .iter()
        .filter(|p| contains_ci(&p.name, term) || contains_ci(&p.sku, term))
        .take(per_kind)
        .map(|p| SearchHit {
            id: p.id,
            kind: SearchKind::Product,
            title: p.name.clone(),
            subtitle: Some(format!("SKU: {}", p.sku)),
        });

    order_hits.chain(customer_hits).chain(product_hits).collect()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "key", content = "char", rename_all = "snake_case")]
pub enum PaletteKey {
    /// Ctrl+K / Cmd+K
    OpenShortcut,
    Escape,
    ArrowUp,
    ArrowDown,
    Enter,
    Backspace,
    Char(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum PaletteAction {
    Ignored,
    Opened,
    Closed,
    /// The query text changed; the caller should refresh the results
    QueryChanged,
    SelectionMoved(usize),
    Navigate(SearchHit),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandPalette {
    pub open: bool,
    pub query: String,
    pub results: Vec<SearchHit>,
    pub selected: usize,
}

impl CommandPalette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opening always starts from an empty query
    pub fn open(&mut self) {
        self.open = true;
        self.query.clear();
        self.results.clear();
        self.selected = 0;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn set_results(&mut self, results: Vec<SearchHit>) {
        self.results = results;
        self.selected = 0;
    }

    pub fn selected_hit(&self) -> Option<&SearchHit> {
        self.results.get(self.selected)
    }

    pub fn handle_key(&mut self, key: PaletteKey) -> PaletteAction {
        if key == PaletteKey::OpenShortcut {
            if self.open {
                return PaletteAction::Ignored;
            }
            self.open();
            return PaletteAction::Opened;
        }
        if !self.open {
            return PaletteAction::Ignored;
        }
        match key {
            PaletteKey::Escape => {
                self.close();
                PaletteAction::Closed
            }
            PaletteKey::ArrowDown => {
                self.selected = (self.selected + 1).min(self.results.len().saturating_sub(1));
                PaletteAction::SelectionMoved(self.selected)
            }
            PaletteKey::ArrowUp => {
                self.selected = self.selected.saturating_sub(1);
                PaletteAction::SelectionMoved(self.selected)
            }
            PaletteKey::Enter => match self.selected_hit().cloned() {
                Some(hit) => {
                    self.close();
                    PaletteAction::Navigate(hit)
                }
                None => PaletteAction::Ignored,
            },
            PaletteKey::Backspace => {
                if self.query.pop().is_some() {
                    PaletteAction::QueryChanged
                } else {
                    PaletteAction::Ignored
                }
            }
            PaletteKey::Char(c) => {
                self.query.push(c);
                PaletteAction::QueryChanged
            }
            PaletteKey::OpenShortcut => PaletteAction::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CustomerType, ProductionType};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn product(name: &str, sku: &str) -> Product {
        Product {
            id: Uuid::new_v4(),
            sku: sku.to_string(),
            name: name.to_string(),
            production_type: ProductionType::Local,
            base_price: Decimal::from(10),
            base_cost: Decimal::from(4),
            current_stock: 50,
            min_stock_alert: 5,
            image_url: None,
            created_at: Utc::now(),
        }
    }

    fn customer(first: &str, phone: &str) -> Customer {
        Customer {
            id: Uuid::new_v4(),
            customer_type: CustomerType::Private,
            company_name: None,
            first_name: Some(first.to_string()),
            last_name: Some("Mizrahi".to_string()),
            email: None,
            phone: phone.to_string(),
            address_city: None,
            address_street: None,
            tax_id: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_blank_term_finds_nothing() {
        let products = vec![product("Mug", "MUG-1")];
        assert!(search_all(&[], &[], &products, "  ", 5).is_empty());
    }

    #[test]
    fn test_results_capped_per_kind() {
        let products: Vec<Product> = (0..8).map(|i| product("Mug", &format!("MUG-{}", i))).collect();
        let customers = vec![customer("Mugi", "050-0000000")];
        let hits = search_all(&[], &customers, &products, "mug", 5);
        assert_eq!(hits.len(), 6);
        assert_eq!(hits[0].kind, SearchKind::Customer);
        assert_eq!(hits[1].subtitle.as_deref(), Some("SKU: MUG-0"));
    }

    #[test]
    fn test_customer_found_by_phone() {
        let customers = vec![customer("Avi", "052-9998877")];
        let hits = search_all(&[], &customers, &[], "9998877", 5);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Avi Mizrahi");
        assert_eq!(hits[0].target(), ("customer-detail", Some(customers[0].id)));
    }

    #[test]
    fn test_palette_keyboard_flow() {
        let mut palette = CommandPalette::new();
        assert_eq!(palette.handle_key(PaletteKey::Char('x')), PaletteAction::Ignored);
        assert_eq!(palette.handle_key(PaletteKey::OpenShortcut), PaletteAction::Opened);
        assert_eq!(palette.handle_key(PaletteKey::Char('m')), PaletteAction::QueryChanged);
        assert_eq!(palette.query, "m");

        let products = vec![product("Mug", "MUG-1"), product("Magnet", "MAG-1")];
        palette.set_results(search_all(&[], &[], &products, &palette.query, 5));
        assert_eq!(palette.results.len(), 2);

        palette.handle_key(PaletteKey::ArrowDown);
        palette.handle_key(PaletteKey::ArrowDown);
        assert_eq!(palette.selected, 1);
        palette.handle_key(PaletteKey::ArrowUp);
        palette.handle_key(PaletteKey::ArrowUp);
        assert_eq!(palette.selected, 0);

        match palette.handle_key(PaletteKey::Enter) {
            PaletteAction::Navigate(hit) => assert_eq!(hit.title, "Mug"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(!palette.open);
    }

    #[test]
    fn test_reopen_resets_query() {
        let mut palette = CommandPalette::new();
        palette.handle_key(PaletteKey::OpenShortcut);
        palette.handle_key(PaletteKey::Char('a'));
        palette.handle_key(PaletteKey::Escape);
        palette.handle_key(PaletteKey::OpenShortcut);
        assert!(palette.query.is_empty());
        assert_eq!(palette.selected, 0);
        assert_eq!(palette.handle_key(PaletteKey::Enter), PaletteAction::Ignored);
    }
}
