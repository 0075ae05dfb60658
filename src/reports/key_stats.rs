//! Section 2: per-customer and per-driver statistics, order lookup.

use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::query_all;
use crate::db::DbConn;
use crate::error::ReportResult;
use crate::models::{CustomerSpend, DeliveryLookup, DriverDeliveries, OrderDelivery};

/// Order count and total spend for every customer, biggest spenders first.
/// Customers without orders are included with zero.
pub fn orders_per_customer(conn: &DbConn) -> ReportResult<Vec<CustomerSpend>> {
    debug!("orders_per_customer");
    query_all(
        conn,
        r#"
        SELECT
            c.customer_id,
            c.customer_name,
            COUNT(o.order_id) AS number_of_orders,
            COALESCE(SUM(o.order_total), 0.0) AS total_spent
        FROM customers c
        LEFT JOIN orders o ON c.customer_id = o.customer_id
        GROUP BY c.customer_id
        ORDER BY total_spent DESC, c.customer_id
        "#,
        [],
        |row| {
            Ok(CustomerSpend {
                customer_id: row.get("customer_id")?,
                customer_name: row.get("customer_name")?,
                order_count: row.get("number_of_orders")?,
                total_spent: row.get("total_spent")?,
            })
        },
    )
}

/// Deliveries assigned to every driver, busiest first. Idle drivers are
/// included with zero.
pub fn driver_workload(conn: &DbConn) -> ReportResult<Vec<DriverDeliveries>> {
    debug!("driver_workload");
    query_all(
        conn,
        r#"
        SELECT
            d.driver_id,
            d.driver_name,
            COUNT(del.delivery_id) AS deliveries_completed
        FROM drivers d
        LEFT JOIN deliveries del ON d.driver_id = del.driver_id
        GROUP BY d.driver_id
        ORDER BY deliveries_completed DESC, d.driver_id
        "#,
        [],
        |row| {
            Ok(DriverDeliveries {
                driver_id: row.get("driver_id")?,
                driver_name: row.get("driver_name")?,
                deliveries: row.get("deliveries_completed")?,
            })
        },
    )
}

/// Order, customer, and (if any) delivery date and driver for one order.
pub fn delivery_lookup(conn: &DbConn, order_id: i64) -> ReportResult<DeliveryLookup> {
    debug!(order_id, "delivery_lookup");
    let found = conn
        .query_row(
            r#"
            SELECT
                o.order_id,
                c.customer_name,
                o.order_total,
                del.delivery_date,
                d.driver_name
            FROM orders o
            JOIN customers c ON o.customer_id = c.customer_id
            LEFT JOIN deliveries del ON o.order_id = del.order_id
            LEFT JOIN drivers d ON del.driver_id = d.driver_id
            WHERE o.order_id = ?1
            ORDER BY del.delivery_id
            LIMIT 1
            "#,
            params![order_id],
            |row| {
                Ok(OrderDelivery {
                    order_id: row.get("order_id")?,
                    customer_name: row.get("customer_name")?,
                    order_total: row.get("order_total")?,
                    delivery_date: row.get("delivery_date")?,
                    driver_name: row.get("driver_name")?,
                })
            },
        )
        .optional()?;

    Ok(match found {
        Some(order) => DeliveryLookup::Found(order),
        None => DeliveryLookup::NotFound { order_id },
    })
}
