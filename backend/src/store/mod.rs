//! Data store boundary
//!
//! Every record kind is persisted the same way: a store-assigned id and
//! creation time plus a JSON document holding the remaining fields. Services
//! talk to the [`Store`] trait so the server runs on Postgres while tests and
//! demo mode run entirely in memory.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use sqlx::PgPool;
use uuid::Uuid;

use shared::{
    ActivityLogEntry, ActivityPatch, Comment, CommentPatch, Customer, CustomerInput,
    CustomerPatch, Expense, ExpenseInput, ExpensePatch, ImportOrder, ImportOrderInput,
    ImportOrderPatch, Lead, LeadInput, LeadPatch, NewActivity, NewComment, NewOrder, Order,
    OrderPatch, Product, ProductInput, ProductPatch, StockItem, StockItemInput, StockItemPatch,
    Supplier, SupplierInput, SupplierPatch, Task, TaskInput, TaskPatch,
};

use crate::error::{AppError, AppResult};

pub mod memory;
pub mod pg;
pub mod sequence;

pub use memory::MemoryStore;
pub use pg::PgStore;
pub use sequence::{MemoryOrderNumbers, OrderNumberAllocator, PgOrderNumbers};

/// A persisted record kind
pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Backing table
    const TABLE: &'static str;
    /// Display name used in errors
    const NAME: &'static str;

    /// Fields supplied on creation
    type New: Serialize + Send + Sync + 'static;
    /// Fields supplied on partial update; absent fields are left alone
    type Patch: Serialize + Send + Sync + 'static;

    fn id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
}

#[async_trait]
pub trait Store<T: Entity>: Send + Sync {
    /// Newest first
    async fn get_all(&self) -> AppResult<Vec<T>>;

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<T>>;

    /// The store assigns `id` and `created_at`
    async fn create(&self, input: T::New) -> AppResult<T>;

    /// Shallow merge of the serialized patch over the stored fields
    async fn update(&self, id: Uuid, patch: T::Patch) -> AppResult<T>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Fetch a record or fail with `NotFound`
pub async fn require<T: Entity>(store: &dyn Store<T>, id: Uuid) -> AppResult<T> {
    store
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(T::NAME.to_string()))
}

/// Serialize a value that must become a JSON object
pub(crate) fn to_object<S: Serialize>(value: &S) -> AppResult<Map<String, Value>> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(AppError::Internal(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

/// Rebuild a record from its stored columns
pub(crate) fn assemble<T: Entity>(
    id: Uuid,
    created_at: DateTime<Utc>,
    mut data: Map<String, Value>,
) -> AppResult<T> {
    data.insert("id".to_string(), serde_json::to_value(id)?);
    data.insert("created_at".to_string(), serde_json::to_value(created_at)?);
    Ok(serde_json::from_value(Value::Object(data))?)
}

/// Patch keys override document keys; id and creation time never change
pub(crate) fn merge(mut data: Map<String, Value>, patch: Map<String, Value>) -> Map<String, Value> {
    for (key, value) in patch {
        if key != "id" && key != "created_at" {
            data.insert(key, value);
        }
    }
    data
}

macro_rules! entity {
    ($ty:ty, $table:literal, $name:literal, $new:ty, $patch:ty) => {
        impl Entity for $ty {
            const TABLE: &'static str = $table;
            const NAME: &'static str = $name;
            type New = $new;
            type Patch = $patch;

            fn id(&self) -> Uuid {
                self.id
            }

            fn created_at(&self) -> DateTime<Utc> {
                self.created_at
            }
        }
    };
}

entity!(Order, "orders", "Order", NewOrder, OrderPatch);
entity!(Customer, "customers", "Customer", CustomerInput, CustomerPatch);
entity!(Lead, "leads", "Lead", LeadInput, LeadPatch);
entity!(Product, "products", "Product", ProductInput, ProductPatch);
entity!(StockItem, "stock_items", "Stock item", StockItemInput, StockItemPatch);
entity!(Expense, "expenses", "Expense", ExpenseInput, ExpensePatch);
entity!(Task, "tasks", "Task", TaskInput, TaskPatch);
entity!(Supplier, "suppliers", "Supplier", SupplierInput, SupplierPatch);
entity!(ImportOrder, "import_orders", "Import order", ImportOrderInput, ImportOrderPatch);
entity!(Comment, "comments", "Comment", NewComment, CommentPatch);
entity!(ActivityLogEntry, "activity_log", "Activity entry", NewActivity, ActivityPatch);

/// One store per record kind
#[derive(Clone)]
pub struct Stores {
    pub orders: Arc<dyn Store<Order>>,
    pub customers: Arc<dyn Store<Customer>>,
    pub leads: Arc<dyn Store<Lead>>,
    pub products: Arc<dyn Store<Product>>,
    pub stock_items: Arc<dyn Store<StockItem>>,
    pub expenses: Arc<dyn Store<Expense>>,
    pub tasks: Arc<dyn Store<Task>>,
    pub suppliers: Arc<dyn Store<Supplier>>,
    pub import_orders: Arc<dyn Store<ImportOrder>>,
    pub comments: Arc<dyn Store<Comment>>,
    pub activity: Arc<dyn Store<ActivityLogEntry>>,
    pub order_numbers: Arc<dyn OrderNumberAllocator>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            orders: Arc::new(PgStore::new(pool.clone())),
            customers: Arc::new(PgStore::new(pool.clone())),
            leads: Arc::new(PgStore::new(pool.clone())),
            products: Arc::new(PgStore::new(pool.clone())),
            stock_items: Arc::new(PgStore::new(pool.clone())),
            expenses: Arc::new(PgStore::new(pool.clone())),
            tasks: Arc::new(PgStore::new(pool.clone())),
            suppliers: Arc::new(PgStore::new(pool.clone())),
            import_orders: Arc::new(PgStore::new(pool.clone())),
            comments: Arc::new(PgStore::new(pool.clone())),
            activity: Arc::new(PgStore::new(pool.clone())),
            order_numbers: Arc::new(PgOrderNumbers::new(pool)),
        }
    }

    pub fn memory() -> Self {
        Self {
            orders: Arc::new(MemoryStore::new()),
            customers: Arc::new(MemoryStore::new()),
            leads: Arc::new(MemoryStore::new()),
            products: Arc::new(MemoryStore::new()),
            stock_items: Arc::new(MemoryStore::new()),
            expenses: Arc::new(MemoryStore::new()),
            tasks: Arc::new(MemoryStore::new()),
            suppliers: Arc::new(MemoryStore::new()),
            import_orders: Arc::new(MemoryStore::new()),
            comments: Arc::new(MemoryStore::new()),
            activity: Arc::new(MemoryStore::new()),
            order_numbers: Arc::new(MemoryOrderNumbers::new()),
        }
    }
}
