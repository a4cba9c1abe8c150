//! Supplier directory service

use std::sync::Arc;

use uuid::Uuid;

use shared::query::contains_ci;
use shared::validation::validate_supplier;
use shared::{Supplier, SupplierInput, SupplierPatch};

use super::patched_input;
use crate::error::AppResult;
use crate::notifier::{report, Notice, Notifier};
use crate::store::{require, Stores};

#[derive(Clone)]
pub struct SupplierService {
    stores: Stores,
    notifier: Arc<dyn Notifier>,
}

impl SupplierService {
    /// Create a new SupplierService instance
    pub fn new(stores: Stores, notifier: Arc<dyn Notifier>) -> Self {
        Self { stores, notifier }
    }

    /// Suppliers whose name, country or contact matches `search`
    pub async fn list(&self, search: &str) -> AppResult<Vec<Supplier>> {
        let suppliers = self.stores.suppliers.get_all().await?;
        Ok(suppliers
            .into_iter()
            .filter(|s| {
                contains_ci(&s.name, search)
                    || contains_ci(&s.country, search)
                    || contains_ci(&s.contact_name, search)
            })
            .collect())
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Supplier> {
        require(self.stores.suppliers.as_ref(), id).await
    }

    pub async fn create(&self, input: SupplierInput) -> AppResult<Supplier> {
        let result = async {
            validate_supplier(&input)?;
            self.stores.suppliers.create(input).await
        }
        .await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("הספק נוסף בהצלחה", "Supplier added")
        });
        result
    }

    pub async fn update(&self, id: Uuid, patch: SupplierPatch) -> AppResult<Supplier> {
        let result = self.update_inner(id, patch).await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("הספק עודכן בהצלחה", "Supplier updated")
        });
        result
    }

    async fn update_inner(&self, id: Uuid, patch: SupplierPatch) -> AppResult<Supplier> {
        let supplier = self.get(id).await?;
        let preview: SupplierInput = patched_input(&supplier, &patch)?;
        validate_supplier(&preview)?;
        self.stores.suppliers.update(id, patch).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = self.stores.suppliers.delete(id).await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("הספק נמחק בהצלחה", "Supplier deleted")
        });
        result
    }
}
