//! Plain-text rendering of report records.
//!
//! Each function returns the finished text so callers decide where it goes.
//! Currency is shown to 2 dp; missing aggregates render as `N/A`.

use std::fmt::Display;

use crate::cooccurrence::CooccurrenceMatrix;
use crate::forecast::{HistoryWindow, RevenueForecast};
use crate::models::*;
use crate::pivot::PivotTable;
use crate::reports::dashboard::{
    CustomerInsights, DeliveryPerformance, OrdersOverview, RevenueAnalysis,
};

/// Placeholder for NULL aggregates.
pub const NOT_AVAILABLE: &str = "N/A";

/// Recent days listed under a forecast.
const FORECAST_TAIL_DAYS: usize = 10;

macro_rules! emit {
    ($out:expr, $($arg:tt)*) => {{
        $out.push_str(&format!($($arg)*));
        $out.push('\n');
    }};
}

pub fn section_header(title: &str) -> String {
    format!("\n{}\n  {}\n{}\n", "═".repeat(70), title, "═".repeat(70))
}

fn subsection(out: &mut String, title: &str, width: usize) {
    emit!(out, "\n{}", title);
    emit!(out, "{}", "─".repeat(width));
}

pub fn money(value: f64) -> String {
    format!("£{:.2}", value)
}

pub fn money_or_na(value: Option<f64>) -> String {
    value.map(money).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn text_or_na(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_AVAILABLE)
}

// ============================================================================
// Section 1 - Summaries
// ============================================================================

pub fn total_customers(total: i64) -> String {
    format!("Total customers: {}\n", total)
}

pub fn signup_range(range: &SignupRange) -> String {
    format!(
        "Earliest signup: {}\nLatest signup: {}\n",
        text_or_na(range.earliest.as_deref()),
        text_or_na(range.latest.as_deref())
    )
}

pub fn order_stats(stats: &OrderStats) -> String {
    let mut out = String::new();
    emit!(out, "Total orders: {}", stats.total_orders);
    emit!(out, "Average order value: {}", money_or_na(stats.average_order_value));
    emit!(out, "Highest order: {}", money_or_na(stats.highest_order));
    emit!(out, "Lowest order: {}", money_or_na(stats.lowest_order));
    out
}

pub fn driver_summary(summary: &DriverSummary) -> String {
    let mut out = String::new();
    emit!(out, "Total drivers: {}", summary.total);
    subsection(&mut out, "Driver Hire Dates", 35);
    for driver in &summary.drivers {
        emit!(out, "  {:22} {}", driver.driver_name, driver.hire_date);
    }
    out
}

pub fn categories(categories: &[String]) -> String {
    let mut out = String::new();
    if categories.is_empty() {
        emit!(out, "No product categories found.");
    }
    for category in categories {
        emit!(out, "  - {}", category);
    }
    out
}

pub fn customer_orders(email: &str, orders: &[CustomerOrder]) -> String {
    let mut out = String::new();
    emit!(out, "Orders for {}", email);
    if orders.is_empty() {
        emit!(out, "  No orders found for this customer.");
        return out;
    }
    emit!(out, "  {:>8} {:12} {:12} {:>10}", "Order", "Date", "Status", "Total");
    emit!(out, "  {}", "─".repeat(45));
    for order in orders {
        emit!(
            out,
            "  {:>8} {:12} {:12} {:>10}",
            order.order_id,
            order.order_date,
            order.status,
            money(order.order_total)
        );
    }
    out
}

pub fn products_below(price: f64, products: &[ProductPrice]) -> String {
    let mut out = String::new();
    emit!(out, "Products priced below {}", money(price));
    if products.is_empty() {
        emit!(out, "  No products below this price.");
        return out;
    }
    emit!(out, "  {:24} {:16} {:>8}", "Product", "Category", "Price");
    emit!(out, "  {}", "─".repeat(50));
    for p in products {
        emit!(out, "  {:24} {:16} {:>8}", p.name, p.category, money(p.price));
    }
    out
}

pub fn average_items(avg: Option<f64>) -> String {
    match avg {
        Some(avg) => format!("Average: {:.2} products per order\n", avg),
        None => format!("Average: {} (no order items)\n", NOT_AVAILABLE),
    }
}

pub fn status_counts(label: &str, rows: &[StatusCount]) -> String {
    let mut out = String::new();
    if rows.is_empty() {
        emit!(out, "No data.");
        return out;
    }
    let total: i64 = rows.iter().map(|r| r.count).sum();
    emit!(out, "  {:14} {:>8} {:>9}", label, "Count", "Share");
    emit!(out, "  {}", "─".repeat(33));
    for row in rows {
        let pct = row.count as f64 / total as f64 * 100.0;
        emit!(out, "  {:14} {:>8} {:>8.1}%", row.status, row.count, pct);
    }
    out
}

// ============================================================================
// Section 2 - Key statistics
// ============================================================================

pub fn customer_spend(rows: &[CustomerSpend]) -> String {
    let mut out = String::new();
    emit!(out, "{:24} {:>8} {:>12}", "Customer", "Orders", "Total Spent");
    emit!(out, "{}", "-".repeat(46));
    for row in rows {
        emit!(
            out,
            "{:24} {:>8} {:>12}",
            row.customer_name,
            row.order_count,
            money(row.total_spent)
        );
    }
    if rows.is_empty() {
        emit!(out, "No customers found.");
    }
    out
}

pub fn driver_workload(rows: &[DriverDeliveries]) -> String {
    let mut out = String::new();
    emit!(out, "{:24} {:>10}", "Driver", "Deliveries");
    emit!(out, "{}", "-".repeat(35));
    for row in rows {
        emit!(out, "{:24} {:>10}", row.driver_name, row.deliveries);
    }
    if rows.is_empty() {
        emit!(out, "No drivers found.");
    }
    out
}

pub fn delivery_lookup(lookup: &DeliveryLookup) -> String {
    let mut out = String::new();
    match lookup {
        DeliveryLookup::Found(order) => {
            emit!(out, "Order ID: {}", order.order_id);
            emit!(out, "Customer: {}", order.customer_name);
            emit!(out, "Order Total: {}", money(order.order_total));
            emit!(out, "Delivery Date: {}", order.delivery_date_or_fallback());
            emit!(out, "Driver: {}", order.driver_or_fallback());
        }
        DeliveryLookup::NotFound { order_id } => {
            emit!(out, "Order {} not found.", order_id);
        }
    }
    out
}

// ============================================================================
// Section 3 - Time-based summaries
// ============================================================================

pub fn date_counts(label: &str, rows: &[DateCount]) -> String {
    let mut out = String::new();
    emit!(out, "{:18} {:>8}", "Date", label);
    emit!(out, "{}", "-".repeat(27));
    for row in rows {
        emit!(out, "{:18} {:>8}", row.date.as_deref().unwrap_or(NOT_DELIVERED), row.count);
    }
    if rows.is_empty() {
        emit!(out, "No data.");
    }
    out
}

pub fn month_counts(rows: &[MonthCount]) -> String {
    let mut out = String::new();
    emit!(out, "{:10} {:>8}", "Month", "Signups");
    emit!(out, "{}", "-".repeat(19));
    for row in rows {
        emit!(out, "{:10} {:>8}", row.month, row.count);
    }
    if rows.is_empty() {
        emit!(out, "No data.");
    }
    out
}

// ============================================================================
// Section 4 - Rankings
// ============================================================================

pub fn top_customers(limit: usize, rows: &[Ranked<CustomerTotal>]) -> String {
    let mut out = String::new();
    emit!(out, "Top {} Customers by Spend", limit);
    emit!(out, "{}", "-".repeat(38));
    for r in rows {
        emit!(out, "{:>3}. {:24} {:>10}", r.rank, r.row.customer_name, money(r.row.total_spent));
    }
    if rows.is_empty() {
        emit!(out, "No orders yet.");
    }
    out
}

pub fn ranked_drivers(rows: &[Ranked<DriverDeliveries>]) -> String {
    let mut out = String::new();
    emit!(out, "{:>4}  {:24} {:>10}", "Rank", "Driver", "Deliveries");
    emit!(out, "{}", "-".repeat(41));
    for r in rows {
        emit!(out, "{:>4}  {:24} {:>10}", r.rank, r.row.driver_name, r.row.deliveries);
    }
    if rows.is_empty() {
        emit!(out, "No drivers found.");
    }
    out
}

pub fn high_value_orders(threshold: f64, rows: &[HighValueOrder]) -> String {
    let mut out = String::new();
    emit!(out, "Orders above {}", money(threshold));
    emit!(out, "{}", "-".repeat(60));
    emit!(out, "{:>6}  {:24} {:>10}  {}", "ID", "Customer", "Total", "Date");
    for row in rows {
        emit!(
            out,
            "{:>6}  {:24} {:>10}  {}",
            row.order_id,
            row.customer_name,
            money(row.order_total),
            row.order_date
        );
    }
    if rows.is_empty() {
        emit!(out, "No orders found above this threshold.");
    }
    out
}

pub fn top_average_order(rows: &[Ranked<CustomerAverage>]) -> String {
    let mut out = String::new();
    emit!(
        out,
        "{:>4}  {:22} {:28} {:>10} {:>7}",
        "Rank",
        "Customer",
        "Email",
        "Avg Order",
        "Orders"
    );
    emit!(out, "{}", "-".repeat(76));
    for r in rows {
        emit!(
            out,
            "{:>4}  {:22} {:28} {:>10} {:>7}",
            r.rank,
            r.row.customer_name,
            r.row.email,
            money(r.row.average_order_value),
            r.row.order_count
        );
    }
    if rows.is_empty() {
        emit!(out, "No orders yet.");
    }
    out
}

pub fn top_products_by_quantity(rows: &[Ranked<ProductQuantity>]) -> String {
    let mut out = String::new();
    emit!(out, "{:>4}  {:24} {:16} {:>10}", "Rank", "Product", "Category", "Units");
    emit!(out, "{}", "-".repeat(58));
    for r in rows {
        emit!(
            out,
            "{:>4}  {:24} {:16} {:>10}",
            r.rank,
            r.row.name,
            r.row.category,
            r.row.total_sold
        );
    }
    if rows.is_empty() {
        emit!(out, "No products sold yet.");
    }
    out
}

pub fn top_products_by_revenue(rows: &[Ranked<ProductRevenue>]) -> String {
    let mut out = String::new();
    emit!(out, "{:>4}  {:24} {:16} {:>10}", "Rank", "Product", "Category", "Revenue");
    emit!(out, "{}", "-".repeat(58));
    for r in rows {
        emit!(
            out,
            "{:>4}  {:24} {:16} {:>10}",
            r.rank,
            r.row.name,
            r.row.category,
            money(r.row.revenue)
        );
    }
    if rows.is_empty() {
        emit!(out, "No products sold yet.");
    }
    out
}

pub fn category_revenue(rows: &[CategoryRevenue]) -> String {
    let mut out = String::new();
    let total: f64 = rows.iter().map(|r| r.revenue).sum();
    emit!(out, "  {:18} {:>12} {:>9}  {}", "Category", "Revenue", "Share", "");
    emit!(out, "  {}", "─".repeat(60));
    for row in rows {
        let pct = if total > 0.0 { row.revenue / total * 100.0 } else { 0.0 };
        let bar = "█".repeat((pct / 4.0) as usize);
        emit!(out, "  {:18} {:>12} {:>8.1}%  {}", row.category, money(row.revenue), pct, bar);
    }
    if rows.is_empty() {
        emit!(out, "  No data.");
    }
    out
}

pub fn category_orders(rows: &[CategoryOrders]) -> String {
    let mut out = String::new();
    emit!(out, "  {:18} {:>8}", "Category", "Orders");
    emit!(out, "  {}", "─".repeat(27));
    for row in rows {
        emit!(out, "  {:18} {:>8}", row.category, row.order_count);
    }
    if rows.is_empty() {
        emit!(out, "  No data.");
    }
    out
}

pub fn window_counts(rows: &[WindowCount]) -> String {
    let mut out = String::new();
    let max = rows.iter().map(|r| r.count).max().unwrap_or(1).max(1) as f64;
    emit!(out, "  {:16} {:>8}  {}", "Window", "Orders", "Volume");
    emit!(out, "  {}", "─".repeat(50));
    for row in rows {
        let bar = "█".repeat((row.count as f64 / max * 20.0) as usize);
        emit!(out, "  {:16} {:>8}  {}", row.delivery_window, row.count, bar);
    }
    if rows.is_empty() {
        emit!(out, "  No data.");
    }
    out
}

// ============================================================================
// Analytics
// ============================================================================

/// Counts, row total, then one `<status>_pct` column per status.
pub fn pivot<K: Ord + Clone + Display>(key_label: &str, table: &PivotTable<K>) -> String {
    let mut out = String::new();
    if table.is_empty() {
        emit!(out, "No deliveries recorded.");
        return out;
    }

    let statuses = table.statuses();
    let mut header = format!("{:24}", key_label);
    for status in &statuses {
        header.push_str(&format!(" {:>10}", status));
    }
    header.push_str(&format!(" {:>7}", "total"));
    for status in &statuses {
        header.push_str(&format!(" {:>14}", format!("{}_pct", status)));
    }
    emit!(out, "{}", header);
    emit!(out, "{}", "─".repeat(header.chars().count()));

    for row in table.rows() {
        let mut line = format!("{:24}", row.key.to_string());
        for count in &row.counts {
            line.push_str(&format!(" {:>10}", count));
        }
        line.push_str(&format!(" {:>7}", row.total));
        for pct in &row.percentages {
            line.push_str(&format!(" {:>14.2}", pct));
        }
        emit!(out, "{}", line);
    }
    out
}

pub fn cooccurrence(matrix: &CooccurrenceMatrix) -> String {
    let mut out = String::new();
    if matrix.is_empty() {
        emit!(out, "No order items recorded.");
        return out;
    }

    let width = matrix
        .categories()
        .iter()
        .map(|c| c.chars().count())
        .max()
        .unwrap_or(0)
        .max(6);

    let mut header = " ".repeat(width);
    for category in matrix.categories() {
        header.push_str(&format!(" {:>w$}", category, w = width));
    }
    emit!(out, "{}", header);
    for (category, counts) in matrix.categories().iter().zip(matrix.rows()) {
        let mut line = format!("{:w$}", category, w = width);
        for count in counts {
            line.push_str(&format!(" {:>w$}", count, w = width));
        }
        emit!(out, "{}", line);
    }

    let top = matrix.top_pairs(5);
    if !top.is_empty() {
        subsection(&mut out, "Most frequent pairs", 40);
        for (a, b, count) in top {
            emit!(out, "  {} + {}: {}", a, b, count);
        }
    }
    out
}

pub fn repeat_purchase(repeat: &RepeatPurchase) -> String {
    let mut out = String::new();
    emit!(out, "  Total customers with orders: {}", repeat.customers_with_orders);
    emit!(out, "  Repeat customers (>1 order): {}", repeat.repeat_customers.len());
    emit!(out, "  Repeat purchase rate: {:.2}%", repeat.rate_pct);
    if !repeat.repeat_customers.is_empty() {
        subsection(&mut out, "Repeat customers", 60);
        for c in &repeat.repeat_customers {
            emit!(out, "  {:24} {:28} {:>6}", c.customer_name, c.email, c.order_count);
        }
    }
    out
}

pub fn forecast(forecast: &RevenueForecast) -> String {
    let mut out = String::new();
    match forecast {
        RevenueForecast::Insufficient { .. } => {
            emit!(out, "  Not enough data to forecast.");
        }
        RevenueForecast::Projected {
            window,
            daily,
            daily_average,
            next_7_days,
        } => {
            let basis = match window {
                HistoryWindow::Trailing30Days => "last 30 days",
                HistoryWindow::AllHistory => "all history (no orders in the last 30 days)",
            };
            emit!(out, "  Based on: {}", basis);
            emit!(out, "  Historical daily average: {}", money(*daily_average));
            emit!(out, "  Forecast for next 7 days: {}", money(*next_7_days));
            subsection(&mut out, "  Recent daily revenues", 30);
            let skip = daily.len().saturating_sub(FORECAST_TAIL_DAYS);
            for day in daily.iter().skip(skip) {
                emit!(out, "  {:12} {:>12}", day.date, money(day.revenue));
            }
        }
    }
    out
}

// ============================================================================
// Dashboard sections
// ============================================================================

pub fn orders_overview(overview: &OrdersOverview) -> String {
    let mut out = section_header("ORDERS OVERVIEW");
    emit!(out, "  Total Orders: {}", overview.total_orders);
    match overview.average_basket_size {
        Some(avg) => emit!(out, "  Average Basket Size: {:.2} items", avg),
        None => emit!(out, "  Average Basket Size: {}", NOT_AVAILABLE),
    }
    emit!(out, "\n  Orders by Status:");
    for row in &overview.by_status {
        emit!(out, "    - {}: {}", row.status, row.count);
    }
    emit!(out, "\n  Orders by Category:");
    for row in &overview.by_category {
        emit!(out, "    - {}: {}", row.category, row.order_count);
    }
    out
}

pub fn revenue_analysis(revenue: &RevenueAnalysis) -> String {
    let mut out = section_header("REVENUE ANALYSIS");
    emit!(out, "  Total Revenue: {}", money_or_na(revenue.total_revenue));
    emit!(out, "\n  Revenue by Category:");
    for row in &revenue.by_category {
        emit!(out, "    - {}: {}", row.category, money(row.revenue));
    }
    emit!(out, "\n  Top {} Products by Revenue:", revenue.top_products.len());
    out.push_str(&top_products_by_revenue(&revenue.top_products));
    out
}

pub fn customer_insights(insights: &CustomerInsights) -> String {
    let mut out = section_header("CUSTOMER INSIGHTS");
    emit!(out, "  Total Customers: {}", insights.total_customers);
    emit!(out, "  Repeat Purchase Rate: {:.2}%", insights.repeat_rate_pct);
    emit!(out, "\n  Top {} Spenders:", insights.top_spenders.len());
    for r in &insights.top_spenders {
        emit!(out, "    - {}: {}", r.row.customer_name, money(r.row.total_spent));
    }
    out
}

pub fn delivery_performance(perf: &DeliveryPerformance) -> String {
    let mut out = section_header("DELIVERY PERFORMANCE");
    emit!(out, "  Delivery Status Summary:");
    for row in &perf.by_status {
        emit!(out, "    - {}: {}", row.status, row.count);
    }
    emit!(out, "\n  Orders per Delivery Window:");
    for row in &perf.by_window {
        emit!(out, "    - {}: {}", row.delivery_window, row.count);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::HistoryWindow;

    #[test]
    fn test_missing_aggregates_render_placeholder() {
        let text = order_stats(&OrderStats {
            total_orders: 0,
            average_order_value: None,
            highest_order: None,
            lowest_order: None,
        });
        assert!(text.contains("Total orders: 0"));
        assert!(text.contains("Average order value: N/A"));
    }

    #[test]
    fn test_currency_has_two_decimals() {
        assert_eq!(money(12.5), "£12.50");
        assert_eq!(money_or_na(Some(3.14159)), "£3.14");
    }

    #[test]
    fn test_lookup_text() {
        let found = DeliveryLookup::Found(OrderDelivery {
            order_id: 4,
            customer_name: "Carol White".into(),
            order_total: 5.0,
            delivery_date: None,
            driver_name: None,
        });
        let text = delivery_lookup(&found);
        assert!(text.contains("Delivery Date: Not delivered yet"));
        assert!(text.contains("Driver: Not assigned"));

        let missing = delivery_lookup(&DeliveryLookup::NotFound { order_id: 77 });
        assert_eq!(missing, "Order 77 not found.\n");
    }

    #[test]
    fn test_empty_threshold_report() {
        let text = high_value_orders(1_000_000.0, &[]);
        assert!(text.starts_with("Orders above £1000000.00"));
        assert!(text.contains("No orders found above this threshold."));
    }

    #[test]
    fn test_insufficient_forecast_text() {
        let text = forecast(&RevenueForecast::Insufficient {
            days: 1,
            window: HistoryWindow::AllHistory,
        });
        assert!(text.contains("Not enough data to forecast."));
        assert!(!text.contains('£'));
    }

    #[test]
    fn test_pivot_text_has_pct_columns() {
        let table = PivotTable::from_triples(vec![
            ("morning".to_string(), "delivered".to_string(), 3),
            ("morning".to_string(), "failed".to_string(), 1),
        ]);
        let text = pivot("Window", &table);
        assert!(text.contains("delivered_pct"));
        assert!(text.contains("failed_pct"));
        assert!(text.contains("75.00"));
        assert!(text.contains("25.00"));
    }

    #[test]
    fn test_undated_delivery_bucket_label() {
        let text = date_counts(
            "Deliveries",
            &[DateCount { date: None, count: 2 }],
        );
        assert!(text.contains("Not delivered yet"));
    }
}
