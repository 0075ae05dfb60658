//! Section 3: counts bucketed by calendar date or month, oldest first.

use chrono::{Duration, NaiveDate};
use rusqlite::params;
use tracing::debug;

use super::query_all;
use crate::db::DbConn;
use crate::error::ReportResult;
use crate::models::{DailyRevenue, DateCount, MonthCount};

pub fn orders_per_date(conn: &DbConn) -> ReportResult<Vec<DateCount>> {
    debug!("orders_per_date");
    query_all(
        conn,
        r#"
        SELECT order_date, COUNT(*) AS order_count
        FROM orders
        GROUP BY order_date
        ORDER BY order_date
        "#,
        [],
        |row| {
            Ok(DateCount {
                date: row.get("order_date")?,
                count: row.get("order_count")?,
            })
        },
    )
}

/// Deliveries per delivery date. Undated deliveries form a single `None`
/// bucket, which sorts first.
pub fn deliveries_per_date(conn: &DbConn) -> ReportResult<Vec<DateCount>> {
    debug!("deliveries_per_date");
    query_all(
        conn,
        r#"
        SELECT delivery_date, COUNT(*) AS delivery_count
        FROM deliveries
        GROUP BY delivery_date
        ORDER BY delivery_date
        "#,
        [],
        |row| {
            Ok(DateCount {
                date: row.get("delivery_date")?,
                count: row.get("delivery_count")?,
            })
        },
    )
}

pub fn signups_per_month(conn: &DbConn) -> ReportResult<Vec<MonthCount>> {
    debug!("signups_per_month");
    query_all(
        conn,
        r#"
        SELECT
            strftime('%Y-%m', signup_date) AS signup_month,
            COUNT(*) AS signup_count
        FROM customers
        GROUP BY signup_month
        ORDER BY signup_month
        "#,
        [],
        |row| {
            Ok(MonthCount {
                month: row.get("signup_month")?,
                count: row.get("signup_count")?,
            })
        },
    )
}

/// Revenue per calendar day on or after `since`; all history when `None`.
pub fn daily_revenue(conn: &DbConn, since: Option<NaiveDate>) -> ReportResult<Vec<DailyRevenue>> {
    debug!(?since, "daily_revenue");
    let map = |row: &rusqlite::Row<'_>| -> rusqlite::Result<DailyRevenue> {
        Ok(DailyRevenue {
            date: row.get("date")?,
            revenue: row.get("daily_revenue")?,
        })
    };

    match since {
        Some(since) => query_all(
            conn,
            r#"
            SELECT DATE(order_date) AS date, SUM(order_total) AS daily_revenue
            FROM orders
            WHERE DATE(order_date) >= ?1
            GROUP BY DATE(order_date)
            ORDER BY date
            "#,
            params![since.format("%Y-%m-%d").to_string()],
            map,
        ),
        None => query_all(
            conn,
            r#"
            SELECT DATE(order_date) AS date, SUM(order_total) AS daily_revenue
            FROM orders
            GROUP BY DATE(order_date)
            ORDER BY date
            "#,
            [],
            map,
        ),
    }
}

/// First day of the trailing window ending at `today`.
pub fn window_start(today: NaiveDate, days: i64) -> NaiveDate {
    today - Duration::days(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{empty_db, seeded_db};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_orders_per_date_is_chronological() {
        let rows = orders_per_date(&seeded_db()).unwrap();
        let buckets: Vec<(Option<&str>, i64)> =
            rows.iter().map(|r| (r.date.as_deref(), r.count)).collect();
        assert_eq!(
            buckets,
            vec![
                (Some("2024-03-01"), 2),
                (Some("2024-03-02"), 1),
                (Some("2024-03-03"), 1),
                (Some("2024-03-05"), 1),
            ]
        );
    }

    #[test]
    fn test_deliveries_per_date_keeps_undated_bucket() {
        let rows = deliveries_per_date(&seeded_db()).unwrap();
        let buckets: Vec<(Option<&str>, i64)> =
            rows.iter().map(|r| (r.date.as_deref(), r.count)).collect();
        assert_eq!(
            buckets,
            vec![(None, 1), (Some("2024-03-02"), 2), (Some("2024-03-03"), 1)]
        );
    }

    #[test]
    fn test_signups_per_month() {
        let rows = signups_per_month(&seeded_db()).unwrap();
        let buckets: Vec<(&str, i64)> = rows.iter().map(|r| (r.month.as_str(), r.count)).collect();
        assert_eq!(buckets, vec![("2024-01", 2), ("2024-02", 1), ("2024-03", 1)]);
    }

    #[test]
    fn test_daily_revenue_window() {
        let conn = seeded_db();
        let all = daily_revenue(&conn, None).unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].date, "2024-03-01");
        assert_eq!(all[0].revenue, 35.5);

        let recent = daily_revenue(&conn, Some(date("2024-03-03"))).unwrap();
        let dates: Vec<&str> = recent.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-03-03", "2024-03-05"]);
    }

    #[test]
    fn test_daily_revenue_truncates_timestamps() {
        let conn = empty_db();
        conn.execute_batch(
            r#"
            INSERT INTO customers VALUES (1, 'Ada', 'ada@example.com', '2024-01-01');
            INSERT INTO orders VALUES (1, 1, '2024-04-01 09:15:00', 'completed', 4.0);
            INSERT INTO orders VALUES (2, 1, '2024-04-01 18:40:00', 'completed', 6.0);
            "#,
        )
        .unwrap();

        let rows = daily_revenue(&conn, None).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, "2024-04-01");
        assert_eq!(rows[0].revenue, 10.0);
    }

    #[test]
    fn test_window_start() {
        assert_eq!(window_start(date("2024-03-31"), 30), date("2024-03-01"));
    }

    #[test]
    fn test_empty_buckets() {
        let conn = empty_db();
        assert!(orders_per_date(&conn).unwrap().is_empty());
        assert!(deliveries_per_date(&conn).unwrap().is_empty());
        assert!(signups_per_month(&conn).unwrap().is_empty());
    }
}
