//! Route definitions for the back office API

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/search", get(handlers::search))
        .nest("/orders", order_routes())
        .nest("/production", production_routes())
        .nest("/customers", customer_routes())
        .nest("/leads", lead_routes())
        .nest("/products", product_routes())
        .nest("/stock-items", stock_item_routes())
        .nest("/expenses", expense_routes())
        .nest("/finances", finance_routes())
        .nest("/tasks", task_routes())
        .nest("/suppliers", supplier_routes())
        .nest("/import-orders", import_routes())
}

/// Order routes
fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_orders).post(handlers::create_order))
        .route("/board", get(handlers::get_order_board))
        .route("/export", get(handlers::export_orders))
        .route("/import-pipeline", get(handlers::get_import_pipeline))
        .route(
            "/:order_id",
            get(handlers::get_order)
                .put(handlers::update_order)
                .delete(handlers::delete_order),
        )
        .route("/:order_id/status", put(handlers::change_order_status))
        .route(
            "/:order_id/production-status",
            put(handlers::change_production_status),
        )
        .route("/:order_id/payment", put(handlers::record_payment))
        .route("/:order_id/move", post(handlers::move_order))
        .route(
            "/:order_id/comments",
            get(handlers::list_order_comments).post(handlers::add_order_comment),
        )
        .route("/:order_id/activity", get(handlers::get_order_activity))
}

/// Local production floor
fn production_routes() -> Router<AppState> {
    Router::new()
        .route("/board", get(handlers::get_production_board))
        .route("/:order_id/move", post(handlers::move_production_order))
}

/// Customer routes
fn customer_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route(
            "/:customer_id",
            get(handlers::get_customer)
                .put(handlers::update_customer)
                .delete(handlers::delete_customer),
        )
        .route(
            "/:customer_id/deactivate",
            post(handlers::deactivate_customer),
        )
        .route("/:customer_id/stats", get(handlers::get_customer_stats))
        .route("/:customer_id/orders", get(handlers::list_customer_orders))
}

/// Lead pipeline routes
fn lead_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_leads).post(handlers::create_lead))
        .route("/board", get(handlers::get_lead_board))
        .route(
            "/:lead_id",
            get(handlers::get_lead)
                .put(handlers::update_lead)
                .delete(handlers::delete_lead),
        )
        .route("/:lead_id/status", put(handlers::change_lead_status))
        .route(
            "/:lead_id/convert",
            get(handlers::get_conversion_prefill).post(handlers::convert_lead),
        )
        .route(
            "/:lead_id/comments",
            get(handlers::list_lead_comments).post(handlers::add_lead_comment),
        )
        .route("/:lead_id/activity", get(handlers::get_lead_activity))
}

/// Product catalog routes
fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route("/low-stock", get(handlers::list_low_stock_products))
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route("/:product_id/stock", post(handlers::adjust_product_stock))
}

/// Stock item routes
fn stock_item_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_stock_items).post(handlers::create_stock_item),
        )
        .route("/low-stock", get(handlers::list_low_stock_items))
        .route("/summary", get(handlers::get_inventory_summary))
        .route(
            "/:item_id",
            get(handlers::get_stock_item)
                .put(handlers::update_stock_item)
                .delete(handlers::delete_stock_item),
        )
        .route("/:item_id/adjust", post(handlers::adjust_stock_item))
}

/// Expense routes
fn expense_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_expenses).post(handlers::create_expense),
        )
        .route(
            "/:expense_id",
            get(handlers::get_expense)
                .put(handlers::update_expense)
                .delete(handlers::delete_expense),
        )
}

/// Finance report routes
fn finance_routes() -> Router<AppState> {
    Router::new()
        .route("/summary", get(handlers::get_finance_summary))
        .route("/monthly-revenue", get(handlers::get_monthly_revenue))
        .route("/export", get(handlers::export_finances))
}

/// Task routes
fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_tasks).post(handlers::create_task))
        .route("/board", get(handlers::get_task_board))
        .route(
            "/:task_id",
            get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route("/:task_id/status", put(handlers::change_task_status))
}

/// Supplier routes
fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_suppliers).post(handlers::create_supplier),
        )
        .route(
            "/:supplier_id",
            get(handlers::get_supplier)
                .put(handlers::update_supplier)
                .delete(handlers::delete_supplier),
        )
}

/// Import shipment routes
fn import_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_import_orders).post(handlers::create_import_order),
        )
        .route("/board", get(handlers::get_import_board))
        .route("/arriving", get(handlers::list_arriving_imports))
        .route(
            "/:import_order_id",
            get(handlers::get_import_order)
                .put(handlers::update_import_order)
                .delete(handlers::delete_import_order),
        )
        .route(
            "/:import_order_id/status",
            put(handlers::change_import_status),
        )
}
