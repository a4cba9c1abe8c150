//! Postgres-backed store: one `(id, created_at, data jsonb)` table per record kind

use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{assemble, to_object, Entity, Store};
use crate::error::{AppError, AppResult};

#[derive(Debug, FromRow)]
struct RecordRow {
    id: Uuid,
    created_at: DateTime<Utc>,
    data: Json<Map<String, Value>>,
}

impl RecordRow {
    fn into_entity<T: Entity>(self) -> AppResult<T> {
        assemble(self.id, self.created_at, self.data.0)
    }
}

#[derive(Clone)]
pub struct PgStore<T> {
    db: PgPool,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> PgStore<T> {
    /// Create a new PgStore instance
    pub fn new(db: PgPool) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<T: Entity> Store<T> for PgStore<T> {
    async fn get_all(&self) -> AppResult<Vec<T>> {
        let sql = format!(
            "SELECT id, created_at, data FROM {} ORDER BY created_at DESC",
            T::TABLE
        );
        let rows = sqlx::query_as::<_, RecordRow>(&sql)
            .fetch_all(&self.db)
            .await?;

        rows.into_iter().map(RecordRow::into_entity).collect()
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<T>> {
        let sql = format!("SELECT id, created_at, data FROM {} WHERE id = $1", T::TABLE);
        let row = sqlx::query_as::<_, RecordRow>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        row.map(RecordRow::into_entity).transpose()
    }

    async fn create(&self, input: T::New) -> AppResult<T> {
        let data = to_object(&input)?;
        let sql = format!(
            r#"
            INSERT INTO {} (id, created_at, data)
            VALUES ($1, NOW(), $2)
            RETURNING id, created_at, data
            "#,
            T::TABLE
        );
        let row = sqlx::query_as::<_, RecordRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(Json(data))
            .fetch_one(&self.db)
            .await?;

        row.into_entity()
    }

    async fn update(&self, id: Uuid, patch: T::Patch) -> AppResult<T> {
        let mut patch = to_object(&patch)?;
        patch.remove("id");
        patch.remove("created_at");
        let sql = format!(
            r#"
            UPDATE {} SET data = data || $2
            WHERE id = $1
            RETURNING id, created_at, data
            "#,
            T::TABLE
        );
        let row = sqlx::query_as::<_, RecordRow>(&sql)
            .bind(id)
            .bind(Json(patch))
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(T::NAME.to_string()))?;

        row.into_entity()
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = $1", T::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(&self.db).await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(T::NAME.to_string()));
        }
        Ok(())
    }
}
