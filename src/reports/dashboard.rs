//! Dashboard sections assembled from the individual reports.

use serde::Serialize;

use crate::db::DbConn;
use crate::error::ReportResult;
use crate::models::{
    CategoryOrders, CategoryRevenue, CustomerTotal, ProductRevenue, Ranked, StatusCount,
    WindowCount,
};
use crate::reports::{analytics, rankings, summary};

/// Products shown in the revenue section.
pub const TOP_PRODUCTS_BY_REVENUE: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrdersOverview {
    pub total_orders: i64,
    pub average_basket_size: Option<f64>,
    pub by_status: Vec<StatusCount>,
    pub by_category: Vec<CategoryOrders>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueAnalysis {
    /// `None` when there are no orders.
    pub total_revenue: Option<f64>,
    pub by_category: Vec<CategoryRevenue>,
    pub top_products: Vec<Ranked<ProductRevenue>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerInsights {
    pub total_customers: i64,
    pub repeat_rate_pct: f64,
    pub top_spenders: Vec<Ranked<CustomerTotal>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryPerformance {
    pub by_status: Vec<StatusCount>,
    pub by_window: Vec<WindowCount>,
}

pub fn orders_overview(conn: &DbConn) -> ReportResult<OrdersOverview> {
    Ok(OrdersOverview {
        total_orders: summary::order_summary_stats(conn)?.total_orders,
        average_basket_size: summary::average_items_per_order(conn)?,
        by_status: summary::orders_by_status(conn)?,
        by_category: rankings::orders_per_category(conn)?,
    })
}

pub fn revenue_analysis(conn: &DbConn) -> ReportResult<RevenueAnalysis> {
    let total_revenue =
        conn.query_row("SELECT SUM(order_total) FROM orders", [], |row| row.get(0))?;
    Ok(RevenueAnalysis {
        total_revenue,
        by_category: rankings::revenue_per_category(conn)?,
        top_products: rankings::top_products_by_revenue(conn, TOP_PRODUCTS_BY_REVENUE)?,
    })
}

pub fn customer_insights(conn: &DbConn) -> ReportResult<CustomerInsights> {
    Ok(CustomerInsights {
        total_customers: summary::total_customers(conn)?,
        repeat_rate_pct: analytics::repeat_purchase_rate(conn)?.rate_pct,
        top_spenders: rankings::top_customers_by_spend(conn, rankings::DEFAULT_TOP_CUSTOMERS)?,
    })
}

pub fn delivery_performance(conn: &DbConn) -> ReportResult<DeliveryPerformance> {
    Ok(DeliveryPerformance {
        by_status: summary::deliveries_by_status(conn)?,
        by_window: rankings::orders_per_delivery_window(conn)?,
    })
}
