//! Derived analytics: co-occurrence, status pivots, forecast, repeat rate.

use chrono::NaiveDate;
use tracing::debug;

use super::query_all;
use crate::cooccurrence::CooccurrenceMatrix;
use crate::db::DbConn;
use crate::error::ReportResult;
use crate::forecast::{HistoryWindow, RevenueForecast, LOOKBACK_DAYS};
use crate::models::{CustomerKey, CustomerOrderCount, RepeatPurchase};
use crate::pivot::PivotTable;
use crate::reports::timeline::{daily_revenue, window_start};

/// Which product categories land in the same order.
pub fn category_cooccurrence(conn: &DbConn) -> ReportResult<CooccurrenceMatrix> {
    debug!("category_cooccurrence");
    let rows = query_all(
        conn,
        r#"
        SELECT oi.order_id, p.category
        FROM order_items oi
        JOIN products p ON oi.product_id = p.product_id
        "#,
        [],
        |row| Ok((row.get::<_, i64>("order_id")?, row.get::<_, String>("category")?)),
    )?;
    Ok(CooccurrenceMatrix::from_order_categories(rows))
}

/// Delivery status counts per delivery window.
pub fn delivery_performance_by_window(conn: &DbConn) -> ReportResult<PivotTable<String>> {
    debug!("delivery_performance_by_window");
    let triples = query_all(
        conn,
        r#"
        SELECT delivery_window, delivery_status, COUNT(*) AS count
        FROM deliveries
        GROUP BY delivery_window, delivery_status
        ORDER BY delivery_window
        "#,
        [],
        |row| {
            Ok((
                row.get::<_, String>("delivery_window")?,
                row.get::<_, String>("delivery_status")?,
                row.get::<_, i64>("count")?,
            ))
        },
    )?;
    Ok(PivotTable::from_triples(triples))
}

/// Delivery status counts per customer. Customers without deliveries are
/// absent.
pub fn delivery_performance_by_customer(conn: &DbConn) -> ReportResult<PivotTable<CustomerKey>> {
    debug!("delivery_performance_by_customer");
    let triples = query_all(
        conn,
        r#"
        SELECT c.customer_id, c.customer_name, d.delivery_status, COUNT(*) AS count
        FROM customers c
        JOIN orders o ON c.customer_id = o.customer_id
        JOIN deliveries d ON o.order_id = d.order_id
        GROUP BY c.customer_id, d.delivery_status
        "#,
        [],
        |row| {
            Ok((
                CustomerKey {
                    customer_id: row.get("customer_id")?,
                    customer_name: row.get("customer_name")?,
                },
                row.get::<_, String>("delivery_status")?,
                row.get::<_, i64>("count")?,
            ))
        },
    )?;
    Ok(PivotTable::from_triples(triples))
}

/// Project the next 7 days of revenue from the trailing 30 days before
/// `today`, or from all history when that window has no orders.
pub fn forecast_revenue(conn: &DbConn, today: NaiveDate) -> ReportResult<RevenueForecast> {
    debug!(%today, "forecast_revenue");
    let recent = daily_revenue(conn, Some(window_start(today, LOOKBACK_DAYS)))?;
    if !recent.is_empty() {
        return Ok(RevenueForecast::from_daily(recent, HistoryWindow::Trailing30Days));
    }

    debug!("no orders in trailing window, falling back to all history");
    let all = daily_revenue(conn, None)?;
    Ok(RevenueForecast::from_daily(all, HistoryWindow::AllHistory))
}

/// Share of ordering customers who ordered more than once.
pub fn repeat_purchase_rate(conn: &DbConn) -> ReportResult<RepeatPurchase> {
    debug!("repeat_purchase_rate");
    let per_customer = query_all(
        conn,
        r#"
        SELECT c.customer_id, c.customer_name, c.email, COUNT(o.order_id) AS order_count
        FROM customers c
        JOIN orders o ON c.customer_id = o.customer_id
        GROUP BY c.customer_id
        ORDER BY c.customer_id
        "#,
        [],
        |row| {
            Ok(CustomerOrderCount {
                customer_id: row.get("customer_id")?,
                customer_name: row.get("customer_name")?,
                email: row.get("email")?,
                order_count: row.get("order_count")?,
            })
        },
    )?;

    let customers_with_orders = per_customer.len();
    let repeat_customers: Vec<CustomerOrderCount> = per_customer
        .into_iter()
        .filter(|c| c.order_count > 1)
        .collect();
    let rate_pct = if customers_with_orders > 0 {
        repeat_customers.len() as f64 / customers_with_orders as f64 * 100.0
    } else {
        0.0
    };

    Ok(RepeatPurchase {
        customers_with_orders,
        repeat_customers,
        rate_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{assert_close, empty_db, seeded_db};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_cooccurrence_from_orders() {
        let m = category_cooccurrence(&seeded_db()).unwrap();
        assert_eq!(m.categories(), ["Bakery", "Dairy", "Frozen", "Produce"]);

        assert_eq!(m.count("Bakery", "Bakery"), 3);
        assert_eq!(m.count("Dairy", "Dairy"), 3);
        assert_eq!(m.count("Produce", "Produce"), 2);
        assert_eq!(m.count("Frozen", "Frozen"), 1);

        assert_eq!(m.count("Bakery", "Dairy"), 2);
        assert_eq!(m.count("Dairy", "Produce"), 1);
        assert_eq!(m.count("Frozen", "Bakery"), 1);
        assert_eq!(m.count("Frozen", "Produce"), 0);

        for a in m.categories() {
            for b in m.categories() {
                assert_eq!(m.count(a, b), m.count(b, a));
            }
        }
    }

    #[test]
    fn test_window_pivot() {
        let pivot = delivery_performance_by_window(&seeded_db()).unwrap();
        assert_eq!(pivot.statuses(), vec!["delivered", "failed", "scheduled"]);

        let morning = "morning".to_string();
        assert_eq!(pivot.count(&morning, "delivered"), 1);
        assert_eq!(pivot.count(&morning, "failed"), 1);
        assert_eq!(pivot.count(&morning, "scheduled"), 0);
        assert_eq!(pivot.total(&morning), 2);
        assert_eq!(pivot.percentage(&morning, "failed"), 50.0);
    }

    #[test]
    fn test_customer_pivot() {
        let pivot = delivery_performance_by_customer(&seeded_db()).unwrap();
        let rows = pivot.rows();
        let names: Vec<&str> = rows.iter().map(|r| r.key.customer_name.as_str()).collect();
        assert_eq!(names, vec!["Alice Smith", "Bob Jones", "Carol White"]);

        let alice = &rows[0];
        assert_eq!(alice.counts, vec![2, 0, 0]);
        assert_eq!(alice.total, 2);
        assert_eq!(alice.percentages, vec![100.0, 0.0, 0.0]);

        for row in &rows {
            let sum: f64 = row.percentages.iter().sum();
            assert!((sum - 100.0).abs() < 0.05);
        }
    }

    #[test]
    fn test_forecast_uses_trailing_window() {
        let forecast = forecast_revenue(&seeded_db(), date("2024-03-10")).unwrap();
        match forecast {
            RevenueForecast::Projected {
                window,
                daily,
                daily_average,
                next_7_days,
            } => {
                assert_eq!(window, HistoryWindow::Trailing30Days);
                assert_eq!(daily.len(), 4);
                assert_close(daily_average, 23.125);
                assert_close(next_7_days, 161.875);
            }
            other => panic!("expected projection, got {other:?}"),
        }
    }

    #[test]
    fn test_forecast_falls_back_to_all_history() {
        let forecast = forecast_revenue(&seeded_db(), date("2025-01-01")).unwrap();
        match forecast {
            RevenueForecast::Projected { window, next_7_days, .. } => {
                assert_eq!(window, HistoryWindow::AllHistory);
                assert_close(next_7_days, 161.875);
            }
            other => panic!("expected projection, got {other:?}"),
        }
    }

    #[test]
    fn test_forecast_does_not_blend_windows() {
        let conn = seeded_db();
        // Only 2024-03-05 falls inside the window ending 2024-04-04.
        let forecast = forecast_revenue(&conn, date("2024-04-04")).unwrap();
        assert_eq!(
            forecast,
            RevenueForecast::Insufficient {
                days: 1,
                window: HistoryWindow::Trailing30Days
            }
        );
    }

    #[test]
    fn test_forecast_with_known_revenues() {
        let conn = empty_db();
        conn.execute_batch(
            r#"
            INSERT INTO customers VALUES (1, 'Ada', 'ada@example.com', '2024-01-01');
            INSERT INTO orders VALUES (1, 1, '2024-05-01', 'completed', 10.0);
            INSERT INTO orders VALUES (2, 1, '2024-05-02', 'completed', 20.0);
            INSERT INTO orders VALUES (3, 1, '2024-05-03', 'completed', 30.0);
            "#,
        )
        .unwrap();

        let forecast = forecast_revenue(&conn, date("2024-05-04")).unwrap();
        assert_eq!(forecast.next_7_days(), Some(140.0));
    }

    #[test]
    fn test_forecast_insufficient_data() {
        let conn = empty_db();
        assert_eq!(
            forecast_revenue(&conn, date("2024-05-04")).unwrap(),
            RevenueForecast::Insufficient {
                days: 0,
                window: HistoryWindow::AllHistory
            }
        );

        conn.execute_batch(
            r#"
            INSERT INTO customers VALUES (1, 'Ada', 'ada@example.com', '2024-01-01');
            INSERT INTO orders VALUES (1, 1, '2024-05-01', 'completed', 10.0);
            INSERT INTO orders VALUES (2, 1, '2024-05-01', 'completed', 15.0);
            "#,
        )
        .unwrap();
        let forecast = forecast_revenue(&conn, date("2024-05-04")).unwrap();
        assert_eq!(forecast.next_7_days(), None);
    }

    #[test]
    fn test_repeat_purchase_rate() {
        let repeat = repeat_purchase_rate(&seeded_db()).unwrap();
        assert_eq!(repeat.customers_with_orders, 3);
        let names: Vec<&str> = repeat
            .repeat_customers
            .iter()
            .map(|c| c.customer_name.as_str())
            .collect();
        assert_eq!(names, vec!["Alice Smith", "Bob Jones"]);
        assert!((repeat.rate_pct - 66.6667).abs() < 1e-3);
    }

    #[test]
    fn test_repeat_purchase_rate_without_orders() {
        let repeat = repeat_purchase_rate(&empty_db()).unwrap();
        assert_eq!(repeat.customers_with_orders, 0);
        assert!(repeat.repeat_customers.is_empty());
        assert_eq!(repeat.rate_pct, 0.0);
    }

    #[test]
    fn test_empty_analytics() {
        let conn = empty_db();
        assert!(category_cooccurrence(&conn).unwrap().is_empty());
        assert!(delivery_performance_by_window(&conn).unwrap().is_empty());
        assert!(delivery_performance_by_customer(&conn).unwrap().is_empty());
    }
}
