//! Section 1: scalar summaries and catalogue lookups.

use rusqlite::params;
use tracing::debug;

use super::query_all;
use crate::db::DbConn;
use crate::error::ReportResult;
use crate::models::{
    CustomerOrder, DriverHire, DriverSummary, OrderStats, ProductPrice, SignupRange, StatusCount,
};

pub fn total_customers(conn: &DbConn) -> ReportResult<i64> {
    debug!("total_customers");
    let total = conn.query_row(
        "SELECT COUNT(*) AS total_customers FROM customers",
        [],
        |row| row.get("total_customers"),
    )?;
    Ok(total)
}

pub fn customer_signup_range(conn: &DbConn) -> ReportResult<SignupRange> {
    debug!("customer_signup_range");
    let range = conn.query_row(
        "SELECT MIN(signup_date) AS earliest, MAX(signup_date) AS latest FROM customers",
        [],
        |row| {
            Ok(SignupRange {
                earliest: row.get("earliest")?,
                latest: row.get("latest")?,
            })
        },
    )?;
    Ok(range)
}

/// Count plus AVG/MAX/MIN of order totals. The aggregates are `None` on an
/// empty orders table.
pub fn order_summary_stats(conn: &DbConn) -> ReportResult<OrderStats> {
    debug!("order_summary_stats");
    let stats = conn.query_row(
        r#"
        SELECT
            COUNT(*) AS total_orders,
            AVG(order_total) AS average_order_value,
            MAX(order_total) AS highest_order,
            MIN(order_total) AS lowest_order
        FROM orders
        "#,
        [],
        |row| {
            Ok(OrderStats {
                total_orders: row.get("total_orders")?,
                average_order_value: row.get("average_order_value")?,
                highest_order: row.get("highest_order")?,
                lowest_order: row.get("lowest_order")?,
            })
        },
    )?;
    Ok(stats)
}

/// Driver headcount and everyone's hire date, earliest first.
pub fn driver_summary(conn: &DbConn) -> ReportResult<DriverSummary> {
    debug!("driver_summary");
    let total = conn.query_row("SELECT COUNT(*) FROM drivers", [], |row| row.get(0))?;
    let drivers = query_all(
        conn,
        "SELECT driver_name, hire_date FROM drivers ORDER BY hire_date, driver_id",
        [],
        |row| {
            Ok(DriverHire {
                driver_name: row.get("driver_name")?,
                hire_date: row.get("hire_date")?,
            })
        },
    )?;
    Ok(DriverSummary { total, drivers })
}

pub fn list_categories(conn: &DbConn) -> ReportResult<Vec<String>> {
    debug!("list_categories");
    query_all(
        conn,
        "SELECT DISTINCT category FROM products ORDER BY category",
        [],
        |row| row.get("category"),
    )
}

/// Orders placed by the customer with `email`, newest first.
pub fn orders_for_customer(conn: &DbConn, email: &str) -> ReportResult<Vec<CustomerOrder>> {
    debug!(email, "orders_for_customer");
    query_all(
        conn,
        r#"
        SELECT o.order_id, o.order_date, o.status, o.order_total, c.customer_name
        FROM orders o
        JOIN customers c ON o.customer_id = c.customer_id
        WHERE c.email = ?1
        ORDER BY o.order_date DESC, o.order_id DESC
        "#,
        params![email],
        |row| {
            Ok(CustomerOrder {
                order_id: row.get("order_id")?,
                order_date: row.get("order_date")?,
                status: row.get("status")?,
                order_total: row.get("order_total")?,
                customer_name: row.get("customer_name")?,
            })
        },
    )
}

/// Products strictly cheaper than `price`, cheapest first.
pub fn products_below_price(conn: &DbConn, price: f64) -> ReportResult<Vec<ProductPrice>> {
    debug!(price, "products_below_price");
    query_all(
        conn,
        r#"
        SELECT name, category, price
        FROM products
        WHERE price < ?1
        ORDER BY price, product_id
        "#,
        params![price],
        |row| {
            Ok(ProductPrice {
                name: row.get("name")?,
                category: row.get("category")?,
                price: row.get("price")?,
            })
        },
    )
}

/// Mean of per-order summed item quantity. `None` with no line items.
pub fn average_items_per_order(conn: &DbConn) -> ReportResult<Option<f64>> {
    debug!("average_items_per_order");
    let avg = conn.query_row(
        r#"
        SELECT AVG(item_count) AS avg_items
        FROM (
            SELECT order_id, SUM(quantity) AS item_count
            FROM order_items
            GROUP BY order_id
        )
        "#,
        [],
        |row| row.get("avg_items"),
    )?;
    Ok(avg)
}

pub fn orders_by_status(conn: &DbConn) -> ReportResult<Vec<StatusCount>> {
    debug!("orders_by_status");
    query_all(
        conn,
        "SELECT status, COUNT(*) AS count FROM orders GROUP BY status ORDER BY status",
        [],
        |row| {
            Ok(StatusCount {
                status: row.get("status")?,
                count: row.get("count")?,
            })
        },
    )
}

pub fn deliveries_by_status(conn: &DbConn) -> ReportResult<Vec<StatusCount>> {
    debug!("deliveries_by_status");
    query_all(
        conn,
        r#"
        SELECT delivery_status AS status, COUNT(*) AS count
        FROM deliveries
        GROUP BY delivery_status
        ORDER BY delivery_status
        "#,
        [],
        |row| {
            Ok(StatusCount {
                status: row.get("status")?,
                count: row.get("count")?,
            })
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{assert_close, empty_db, seeded_db};

    #[test]
    fn test_total_customers() {
        assert_eq!(total_customers(&seeded_db()).unwrap(), 4);
        assert_eq!(total_customers(&empty_db()).unwrap(), 0);
    }

    #[test]
    fn test_signup_range() {
        let range = customer_signup_range(&seeded_db()).unwrap();
        assert_eq!(range.earliest.as_deref(), Some("2024-01-15"));
        assert_eq!(range.latest.as_deref(), Some("2024-03-10"));

        let empty = customer_signup_range(&empty_db()).unwrap();
        assert_eq!(empty.earliest, None);
        assert_eq!(empty.latest, None);
    }

    #[test]
    fn test_order_summary_stats() {
        let stats = order_summary_stats(&seeded_db()).unwrap();
        assert_eq!(stats.total_orders, 5);
        assert_close(stats.average_order_value.unwrap(), 18.5);
        assert_eq!(stats.highest_order, Some(40.0));
        assert_eq!(stats.lowest_order, Some(5.0));
    }

    #[test]
    fn test_order_summary_stats_without_orders() {
        let stats = order_summary_stats(&empty_db()).unwrap();
        assert_eq!(stats.total_orders, 0);
        assert_eq!(stats.average_order_value, None);
        assert_eq!(stats.highest_order, None);
        assert_eq!(stats.lowest_order, None);
    }

    #[test]
    fn test_driver_summary_orders_by_hire_date() {
        let summary = driver_summary(&seeded_db()).unwrap();
        assert_eq!(summary.total, 3);
        let names: Vec<&str> = summary.drivers.iter().map(|d| d.driver_name.as_str()).collect();
        assert_eq!(names, vec!["Erin Wheels", "Dave Driver", "Frank Idle"]);
    }

    #[test]
    fn test_list_categories() {
        let categories = list_categories(&seeded_db()).unwrap();
        assert_eq!(categories, vec!["Bakery", "Dairy", "Frozen", "Produce"]);
    }

    #[test]
    fn test_orders_for_customer() {
        let conn = seeded_db();
        let orders = orders_for_customer(&conn, "alice@example.com").unwrap();
        let ids: Vec<i64> = orders.iter().map(|o| o.order_id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert!(orders.iter().all(|o| o.customer_name == "Alice Smith"));

        assert!(orders_for_customer(&conn, "dan@example.com").unwrap().is_empty());
        assert!(orders_for_customer(&conn, "nobody@example.com").unwrap().is_empty());
    }

    #[test]
    fn test_products_below_price() {
        let products = products_below_price(&seeded_db(), 2.0).unwrap();
        let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Milk", "Croissant"]);
    }

    #[test]
    fn test_average_items_per_order() {
        assert_close(average_items_per_order(&seeded_db()).unwrap().unwrap(), 4.6);
        assert_eq!(average_items_per_order(&empty_db()).unwrap(), None);
    }

    #[test]
    fn test_status_counts() {
        let conn = seeded_db();
        let orders = orders_by_status(&conn).unwrap();
        assert_eq!(
            orders,
            vec![
                StatusCount { status: "cancelled".into(), count: 1 },
                StatusCount { status: "completed".into(), count: 4 },
            ]
        );

        let deliveries = deliveries_by_status(&conn).unwrap();
        let counts: Vec<(&str, i64)> =
            deliveries.iter().map(|s| (s.status.as_str(), s.count)).collect();
        assert_eq!(counts, vec![("delivered", 2), ("failed", 1), ("scheduled", 1)]);
    }
}
