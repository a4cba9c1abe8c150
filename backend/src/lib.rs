//! Back office server library
//!
//! Orders, leads, customers, production, inventory, finances, tasks,
//! suppliers and import shipments for a small print and promotional goods shop.

use std::sync::Arc;

use axum::{routing::get, Router};
use sqlx::PgPool;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod handlers;
pub mod notifier;
pub mod routes;
pub mod services;
pub mod store;

pub use config::{BusinessConfig, Config};
pub use error::{AppError, AppResult};

use notifier::{Notifier, TracingNotifier};
use store::Stores;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// `None` when running on in-memory stores
    pub db: Option<PgPool>,
    pub stores: Stores,
    pub notifier: Arc<dyn Notifier>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn postgres(db: PgPool, config: Config) -> Self {
        Self {
            stores: Stores::postgres(db.clone()),
            db: Some(db),
            notifier: Arc::new(TracingNotifier),
            config: Arc::new(config),
        }
    }

    pub fn in_memory(config: Config) -> Self {
        Self {
            db: None,
            stores: Stores::memory(),
            notifier: Arc::new(TracingNotifier),
            config: Arc::new(config),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn business(&self) -> BusinessConfig {
        self.config.business.clone()
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Back Office API v1.0"
}
