//! Section 4: rankings, threshold filters, and category/product leaderboards.

use rusqlite::params;
use tracing::debug;

use super::query_all;
use crate::db::DbConn;
use crate::error::ReportResult;
use crate::models::{
    CategoryOrders, CategoryRevenue, CustomerAverage, CustomerTotal, DriverDeliveries,
    HighValueOrder, ProductQuantity, ProductRevenue, Ranked, WindowCount,
};
use crate::reports::key_stats::driver_workload;

pub const DEFAULT_TOP_CUSTOMERS: usize = 5;
pub const DEFAULT_TOP_AVERAGE: usize = 10;
pub const DEFAULT_TOP_PRODUCTS: usize = 10;

/// Customers with at least one order, ranked by total spend.
pub fn top_customers_by_spend(
    conn: &DbConn,
    limit: usize,
) -> ReportResult<Vec<Ranked<CustomerTotal>>> {
    debug!(limit, "top_customers_by_spend");
    let rows = query_all(
        conn,
        r#"
        SELECT
            c.customer_id,
            c.customer_name,
            SUM(o.order_total) AS total_spend
        FROM customers c
        JOIN orders o ON c.customer_id = o.customer_id
        GROUP BY c.customer_id
        ORDER BY total_spend DESC, c.customer_id
        LIMIT ?1
        "#,
        params![limit as i64],
        |row| {
            Ok(CustomerTotal {
                customer_id: row.get("customer_id")?,
                customer_name: row.get("customer_name")?,
                total_spent: row.get("total_spend")?,
            })
        },
    )?;
    Ok(Ranked::assign(rows))
}

/// Every driver ranked by deliveries, idle drivers included.
pub fn rank_drivers_by_deliveries(conn: &DbConn) -> ReportResult<Vec<Ranked<DriverDeliveries>>> {
    Ok(Ranked::assign(driver_workload(conn)?))
}

/// Orders strictly above `threshold`, largest first. Empty when none qualify.
pub fn high_value_orders(conn: &DbConn, threshold: f64) -> ReportResult<Vec<HighValueOrder>> {
    debug!(threshold, "high_value_orders");
    query_all(
        conn,
        r#"
        SELECT
            o.order_id,
            c.customer_name,
            o.order_total,
            o.order_date
        FROM orders o
        JOIN customers c ON o.customer_id = c.customer_id
        WHERE o.order_total > ?1
        ORDER BY o.order_total DESC, o.order_id
        "#,
        params![threshold],
        |row| {
            Ok(HighValueOrder {
                order_id: row.get("order_id")?,
                customer_name: row.get("customer_name")?,
                order_total: row.get("order_total")?,
                order_date: row.get("order_date")?,
            })
        },
    )
}

pub fn top_customers_by_average_order(
    conn: &DbConn,
    limit: usize,
) -> ReportResult<Vec<Ranked<CustomerAverage>>> {
    debug!(limit, "top_customers_by_average_order");
    let rows = query_all(
        conn,
        r#"
        SELECT
            c.customer_id,
            c.customer_name,
            c.email,
            AVG(o.order_total) AS avg_order_value,
            COUNT(o.order_id) AS order_count
        FROM customers c
        JOIN orders o ON c.customer_id = o.customer_id
        GROUP BY c.customer_id
        ORDER BY avg_order_value DESC, c.customer_id
        LIMIT ?1
        "#,
        params![limit as i64],
        |row| {
            Ok(CustomerAverage {
                customer_id: row.get("customer_id")?,
                customer_name: row.get("customer_name")?,
                email: row.get("email")?,
                average_order_value: row.get("avg_order_value")?,
                order_count: row.get("order_count")?,
            })
        },
    )?;
    Ok(Ranked::assign(rows))
}

/// Products ranked by units sold.
pub fn top_products_by_quantity(
    conn: &DbConn,
    limit: usize,
) -> ReportResult<Vec<Ranked<ProductQuantity>>> {
    debug!(limit, "top_products_by_quantity");
    let rows = query_all(
        conn,
        r#"
        SELECT p.product_id, p.name, p.category, SUM(oi.quantity) AS total_sold
        FROM products p
        JOIN order_items oi ON p.product_id = oi.product_id
        GROUP BY p.product_id
        ORDER BY total_sold DESC, p.product_id
        LIMIT ?1
        "#,
        params![limit as i64],
        |row| {
            Ok(ProductQuantity {
                product_id: row.get("product_id")?,
                name: row.get("name")?,
                category: row.get("category")?,
                total_sold: row.get("total_sold")?,
            })
        },
    )?;
    Ok(Ranked::assign(rows))
}

/// Products ranked by line-item revenue (quantity x unit price).
pub fn top_products_by_revenue(
    conn: &DbConn,
    limit: usize,
) -> ReportResult<Vec<Ranked<ProductRevenue>>> {
    debug!(limit, "top_products_by_revenue");
    let rows = query_all(
        conn,
        r#"
        SELECT p.product_id, p.name, p.category, SUM(oi.quantity * oi.unit_price) AS revenue
        FROM products p
        JOIN order_items oi ON p.product_id = oi.product_id
        GROUP BY p.product_id
        ORDER BY revenue DESC, p.product_id
        LIMIT ?1
        "#,
        params![limit as i64],
        |row| {
            Ok(ProductRevenue {
                product_id: row.get("product_id")?,
                name: row.get("name")?,
                category: row.get("category")?,
                revenue: row.get("revenue")?,
            })
        },
    )?;
    Ok(Ranked::assign(rows))
}

pub fn revenue_per_category(conn: &DbConn) -> ReportResult<Vec<CategoryRevenue>> {
    debug!("revenue_per_category");
    query_all(
        conn,
        r#"
        SELECT p.category, SUM(oi.quantity * oi.unit_price) AS total_revenue
        FROM products p
        JOIN order_items oi ON p.product_id = oi.product_id
        GROUP BY p.category
        ORDER BY total_revenue DESC, p.category
        "#,
        [],
        |row| {
            Ok(CategoryRevenue {
                category: row.get("category")?,
                revenue: row.get("total_revenue")?,
            })
        },
    )
}

/// Distinct orders containing each category.
pub fn orders_per_category(conn: &DbConn) -> ReportResult<Vec<CategoryOrders>> {
    debug!("orders_per_category");
    query_all(
        conn,
        r#"
        SELECT p.category, COUNT(DISTINCT oi.order_id) AS order_count
        FROM products p
        JOIN order_items oi ON p.product_id = oi.product_id
        GROUP BY p.category
        ORDER BY order_count DESC, p.category
        "#,
        [],
        |row| {
            Ok(CategoryOrders {
                category: row.get("category")?,
                order_count: row.get("order_count")?,
            })
        },
    )
}

/// Busiest delivery windows first.
pub fn orders_per_delivery_window(conn: &DbConn) -> ReportResult<Vec<WindowCount>> {
    debug!("orders_per_delivery_window");
    query_all(
        conn,
        r#"
        SELECT delivery_window, COUNT(*) AS order_count
        FROM deliveries
        GROUP BY delivery_window
        ORDER BY order_count DESC, delivery_window
        "#,
        [],
        |row| {
            Ok(WindowCount {
                delivery_window: row.get("delivery_window")?,
                count: row.get("order_count")?,
            })
        },
    )
}
