//! Order number allocation
//!
//! Numbers come from a per-year counter that is bumped atomically, so two
//! orders created at the same time never share a number. A year's counter
//! starts from the highest number already on file for that year.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::Mutex;

use shared::order_number::{max_sequence, year_suffix, OrderNumber};

use crate::error::{AppError, AppResult};

#[async_trait]
pub trait OrderNumberAllocator: Send + Sync {
    async fn allocate(&self, year: i32) -> AppResult<OrderNumber>;
}

#[derive(Clone)]
pub struct PgOrderNumbers {
    db: PgPool,
}

impl PgOrderNumbers {
    /// Create a new PgOrderNumbers instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Highest sequence among stored orders for `year`
    async fn seed(&self, year: i32) -> AppResult<u32> {
        let prefix = format!("{:02}-%", year_suffix(year));
        let numbers: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT data->>'order_number'
            FROM orders
            WHERE data->>'order_number' LIKE $1
            "#,
        )
        .bind(prefix)
        .fetch_all(&self.db)
        .await?;

        Ok(max_sequence(numbers.iter().map(String::as_str), year))
    }
}

#[async_trait]
impl OrderNumberAllocator for PgOrderNumbers {
    async fn allocate(&self, year: i32) -> AppResult<OrderNumber> {
        let bumped: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE order_number_sequences
            SET last_value = last_value + 1
            WHERE year = $1
            RETURNING last_value
            "#,
        )
        .bind(year)
        .fetch_optional(&self.db)
        .await?;

        let sequence = match bumped {
            Some(value) => value,
            None => {
                let seed = i32::try_from(self.seed(year).await?)
                    .map_err(|_| AppError::Internal("order sequence overflow".to_string()))?;
                // A concurrent first allocation for the year lands on the conflict arm
                sqlx::query_scalar::<_, i32>(
                    r#"
                    INSERT INTO order_number_sequences (year, last_value)
                    VALUES ($1, $2 + 1)
                    ON CONFLICT (year) DO UPDATE
                    SET last_value = order_number_sequences.last_value + 1
                    RETURNING last_value
                    "#,
                )
                .bind(year)
                .bind(seed)
                .fetch_one(&self.db)
                .await?
            }
        };

        let sequence = u32::try_from(sequence)
            .map_err(|_| AppError::Internal(format!("negative order sequence {}", sequence)))?;
        Ok(OrderNumber::new(year, sequence))
    }
}

/// Mutex-guarded counters for the in-memory store
#[derive(Default)]
pub struct MemoryOrderNumbers {
    /// Keyed by two-digit year
    counters: Mutex<HashMap<u8, u32>>,
}

impl MemoryOrderNumbers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters continue after the given existing numbers
    pub fn seeded<'a>(existing: impl IntoIterator<Item = &'a str>) -> Self {
        let mut counters: HashMap<u8, u32> = HashMap::new();
        for number in existing {
            if let Ok(parsed) = number.parse::<OrderNumber>() {
                let slot = counters.entry(parsed.year_suffix).or_insert(0);
                *slot = (*slot).max(parsed.sequence);
            }
        }
        Self {
            counters: Mutex::new(counters),
        }
    }
}

#[async_trait]
impl OrderNumberAllocator for MemoryOrderNumbers {
    async fn allocate(&self, year: i32) -> AppResult<OrderNumber> {
        let mut counters = self.counters.lock().await;
        let slot = counters.entry(year_suffix(year)).or_insert(0);
        let number = OrderNumber::new(year, *slot)
            .next()
            .map_err(|e| AppError::Internal(e.to_string()))?;
        *slot = number.sequence;
        Ok(number)
    }
}
