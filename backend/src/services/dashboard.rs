//! Dashboard service: headline numbers, charts and alerts

use chrono::Datelike;
use serde::Serialize;

use shared::aggregation::{
    alerts, monthly_revenue, orders_by_status, Alert, DashboardStats, MonthlyAmount, StatusCount,
};
use shared::Order;

use super::today;
use crate::config::BusinessConfig;
use crate::error::AppResult;
use crate::store::Stores;

const MAX_ALERTS: usize = 5;
const RECENT_ORDERS: usize = 4;

#[derive(Clone)]
pub struct DashboardService {
    stores: Stores,
    business: BusinessConfig,
}

/// An alert with its rendered messages
#[derive(Debug, Clone, Serialize)]
pub struct AlertView {
    #[serde(flatten)]
    pub alert: Alert,
    pub message_he: String,
    pub message_en: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub monthly_revenue: Vec<MonthlyAmount>,
    pub orders_by_status: Vec<StatusCount>,
    pub alerts: Vec<AlertView>,
    pub recent_orders: Vec<Order>,
}

impl DashboardService {
    /// Create a new DashboardService instance
    pub fn new(stores: Stores, business: BusinessConfig) -> Self {
        Self { stores, business }
    }

    pub async fn overview(&self) -> AppResult<Dashboard> {
        let today = today();
        let orders = self.stores.orders.get_all().await?;
        let leads = self.stores.leads.get_all().await?;
        let tasks = self.stores.tasks.get_all().await?;
        let products = self.stores.products.get_all().await?;

        let alerts = alerts(
            &orders,
            &tasks,
            &products,
            today,
            self.business.deadline_alert_days,
            MAX_ALERTS,
        )
        .into_iter()
        .map(|alert| AlertView {
            message_he: alert.message_he(),
            message_en: alert.message_en(),
            alert,
        })
        .collect();

        Ok(Dashboard {
            stats: DashboardStats::compute(
                &orders,
                &leads,
                today,
                self.business.new_lead_window_days,
            ),
            monthly_revenue: monthly_revenue(&orders, today.year()),
            orders_by_status: orders_by_status(&orders),
            alerts,
            recent_orders: orders.iter().take(RECENT_ORDERS).cloned().collect(),
        })
    }
}
