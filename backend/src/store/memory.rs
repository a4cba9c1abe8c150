//! In-memory store for tests and demo mode

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{assemble, merge, to_object, Entity, Store};
use crate::error::{AppError, AppResult};

pub struct MemoryStore<T> {
    records: Mutex<Vec<T>>,
    fail_next: AtomicBool,
    fail_next_update: AtomicBool,
}

impl<T: Entity> Default for MemoryStore<T> {
    fn default() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail_next: AtomicBool::new(false),
            fail_next_update: AtomicBool::new(false),
        }
    }
}

impl<T: Entity> MemoryStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with existing records
    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records: Mutex::new(records),
            fail_next: AtomicBool::new(false),
            fail_next_update: AtomicBool::new(false),
        }
    }

    /// The next call fails as if the store could not be reached
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// The next `update` fails; reads and other writes are unaffected
    pub fn fail_next_update(&self) {
        self.fail_next_update.store(true, Ordering::SeqCst);
    }

    fn check_available(&self) -> AppResult<()> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(unavailable::<T>());
        }
        Ok(())
    }
}

fn unavailable<T: Entity>() -> AppError {
    AppError::StoreUnavailable(format!("{} store did not respond", T::NAME))
}

#[async_trait]
impl<T: Entity> Store<T> for MemoryStore<T> {
    async fn get_all(&self) -> AppResult<Vec<T>> {
        self.check_available()?;
        let mut records = self.records.lock().await.clone();
        // Ties keep the latest insertion first
        records.reverse();
        records.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(records)
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<T>> {
        self.check_available()?;
        let records = self.records.lock().await;
        Ok(records.iter().find(|r| r.id() == id).cloned())
    }

    async fn create(&self, input: T::New) -> AppResult<T> {
        self.check_available()?;
        let record: T = assemble(Uuid::new_v4(), Utc::now(), to_object(&input)?)?;
        self.records.lock().await.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: Uuid, patch: T::Patch) -> AppResult<T> {
        self.check_available()?;
        if self.fail_next_update.swap(false, Ordering::SeqCst) {
            return Err(unavailable::<T>());
        }
        let mut records = self.records.lock().await;
        let slot = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| AppError::NotFound(T::NAME.to_string()))?;

        let merged = merge(to_object(&*slot)?, to_object(&patch)?);
        let updated: T = assemble(slot.id(), slot.created_at(), merged)?;
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.check_available()?;
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Err(AppError::NotFound(T::NAME.to_string()));
        }
        Ok(())
    }
}
