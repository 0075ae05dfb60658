use serde::{Deserialize, Serialize};

/// Fallback shown when an order has no delivery date yet.
pub const NOT_DELIVERED: &str = "Not delivered yet";

/// Fallback shown when a delivery has no driver.
pub const NOT_ASSIGNED: &str = "Not assigned";

// ============================================================================
// Source rows (CSV ingestion and synthetic generation)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: i64,
    pub customer_name: String,
    pub email: String,
    pub signup_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub driver_id: i64,
    pub driver_name: String,
    pub hire_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: i64,
    pub customer_id: i64,
    pub order_date: String,
    pub status: String,
    pub order_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub order_item_id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    pub delivery_id: i64,
    pub order_id: i64,
    pub driver_id: Option<i64>,
    pub delivery_date: Option<String>,
    pub delivery_status: String,
    pub delivery_window: String,
}

// ============================================================================
// Summary reports
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignupRange {
    pub earliest: Option<String>,
    pub latest: Option<String>,
}

/// Aggregates over all orders. MIN/AVG/MAX are NULL when there are none.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderStats {
    pub total_orders: i64,
    pub average_order_value: Option<f64>,
    pub highest_order: Option<f64>,
    pub lowest_order: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverHire {
    pub driver_name: String,
    pub hire_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverSummary {
    pub total: i64,
    pub drivers: Vec<DriverHire>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerOrder {
    pub order_id: i64,
    pub order_date: String,
    pub status: String,
    pub order_total: f64,
    pub customer_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPrice {
    pub name: String,
    pub category: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

// ============================================================================
// Grouped and ranked reports
// ============================================================================

/// A row with its 1-based position in a ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked<T> {
    pub rank: usize,
    #[serde(flatten)]
    pub row: T,
}

impl<T> Ranked<T> {
    pub fn assign(rows: Vec<T>) -> Vec<Ranked<T>> {
        rows.into_iter()
            .enumerate()
            .map(|(i, row)| Ranked { rank: i + 1, row })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerSpend {
    pub customer_id: i64,
    pub customer_name: String,
    pub order_count: i64,
    pub total_spent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverDeliveries {
    pub driver_id: i64,
    pub driver_name: String,
    pub deliveries: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerTotal {
    pub customer_id: i64,
    pub customer_name: String,
    pub total_spent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerAverage {
    pub customer_id: i64,
    pub customer_name: String,
    pub email: String,
    pub average_order_value: f64,
    pub order_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductQuantity {
    pub product_id: i64,
    pub name: String,
    pub category: String,
    pub total_sold: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRevenue {
    pub product_id: i64,
    pub name: String,
    pub category: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRevenue {
    pub category: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryOrders {
    pub category: String,
    pub order_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowCount {
    pub delivery_window: String,
    pub count: i64,
}

// ============================================================================
// Point lookup
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDelivery {
    pub order_id: i64,
    pub customer_name: String,
    pub order_total: f64,
    pub delivery_date: Option<String>,
    pub driver_name: Option<String>,
}

impl OrderDelivery {
    pub fn delivery_date_or_fallback(&self) -> &str {
        self.delivery_date.as_deref().unwrap_or(NOT_DELIVERED)
    }

    pub fn driver_or_fallback(&self) -> &str {
        self.driver_name.as_deref().unwrap_or(NOT_ASSIGNED)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum DeliveryLookup {
    Found(OrderDelivery),
    NotFound { order_id: i64 },
}

// ============================================================================
// Time buckets and thresholds
// ============================================================================

/// Count for one calendar date. `date` is `None` for rows with no date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateCount {
    pub date: Option<String>,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthCount {
    pub month: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighValueOrder {
    pub order_id: i64,
    pub customer_name: String,
    pub order_total: f64,
    pub order_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRevenue {
    pub date: String,
    pub revenue: f64,
}

// ============================================================================
// Customer analytics
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerOrderCount {
    pub customer_id: i64,
    pub customer_name: String,
    pub email: String,
    pub order_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepeatPurchase {
    pub customers_with_orders: usize,
    pub repeat_customers: Vec<CustomerOrderCount>,
    /// Percentage of ordering customers with more than one order.
    pub rate_pct: f64,
}

/// Pivot row key for per-customer delivery performance.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CustomerKey {
    pub customer_id: i64,
    pub customer_name: String,
}

impl std::fmt::Display for CustomerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.customer_name, self.customer_id)
    }
}
