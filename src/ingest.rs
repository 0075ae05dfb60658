//! CSV dataset loading and writing.
//!
//! A dataset is a directory holding one CSV per table, headers matching the
//! column names. Loading happens inside one transaction: rows that fail to
//! deserialize or violate a constraint are skipped, anything else aborts.

use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use rusqlite::{params, ErrorCode, Transaction};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use crate::db::{self, DbConn};
use crate::error::ReportResult;
use crate::models::{Customer, Delivery, Driver, Order, OrderItem, Product};

pub const CUSTOMERS_CSV: &str = "customers.csv";
pub const DRIVERS_CSV: &str = "drivers.csv";
pub const PRODUCTS_CSV: &str = "products.csv";
pub const ORDERS_CSV: &str = "orders.csv";
pub const ORDER_ITEMS_CSV: &str = "order_items.csv";
pub const DELIVERIES_CSV: &str = "deliveries.csv";

/// Skipped rows logged individually per file before going quiet.
const MAX_ROW_WARNINGS: usize = 5;

/// All six tables in memory, in foreign-key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub customers: Vec<Customer>,
    pub drivers: Vec<Driver>,
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    pub order_items: Vec<OrderItem>,
    pub deliveries: Vec<Delivery>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCount {
    pub loaded: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub customers: TableCount,
    pub drivers: TableCount,
    pub products: TableCount,
    pub orders: TableCount,
    pub order_items: TableCount,
    pub deliveries: TableCount,
}

impl IngestSummary {
    pub fn total_loaded(&self) -> usize {
        self.tables().iter().map(|(_, c)| c.loaded).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.tables().iter().map(|(_, c)| c.skipped).sum()
    }

    pub fn tables(&self) -> [(&'static str, TableCount); 6] {
        [
            ("customers", self.customers),
            ("drivers", self.drivers),
            ("products", self.products),
            ("orders", self.orders),
            ("order_items", self.order_items),
            ("deliveries", self.deliveries),
        ]
    }
}

/// Create the schema if needed and load every CSV under `dir`.
pub fn load_dataset(conn: &mut DbConn, dir: &Path) -> ReportResult<IngestSummary> {
    db::init_schema(conn)?;
    let tx = conn.transaction()?;

    let summary = IngestSummary {
        customers: load_table(&tx, &dir.join(CUSTOMERS_CSV), |tx, c: &Customer| {
            tx.execute(
                r#"
                INSERT INTO customers (customer_id, customer_name, email, signup_date)
                VALUES (?1, ?2, ?3, ?4)
                "#,
                params![c.customer_id, c.customer_name, c.email, c.signup_date],
            )
        })?,
        drivers: load_table(&tx, &dir.join(DRIVERS_CSV), |tx, d: &Driver| {
            tx.execute(
                "INSERT INTO drivers (driver_id, driver_name, hire_date) VALUES (?1, ?2, ?3)",
                params![d.driver_id, d.driver_name, d.hire_date],
            )
        })?,
        products: load_table(&tx, &dir.join(PRODUCTS_CSV), |tx, p: &Product| {
            tx.execute(
                "INSERT INTO products (product_id, name, category, price) VALUES (?1, ?2, ?3, ?4)",
                params![p.product_id, p.name, p.category, p.price],
            )
        })?,
        orders: load_table(&tx, &dir.join(ORDERS_CSV), |tx, o: &Order| {
            tx.execute(
                r#"
                INSERT INTO orders (order_id, customer_id, order_date, status, order_total)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![o.order_id, o.customer_id, o.order_date, o.status, o.order_total],
            )
        })?,
        order_items: load_table(&tx, &dir.join(ORDER_ITEMS_CSV), |tx, i: &OrderItem| {
            tx.execute(
                r#"
                INSERT INTO order_items (order_item_id, order_id, product_id, quantity, unit_price)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![i.order_item_id, i.order_id, i.product_id, i.quantity, i.unit_price],
            )
        })?,
        deliveries: load_table(&tx, &dir.join(DELIVERIES_CSV), |tx, d: &Delivery| {
            tx.execute(
                r#"
                INSERT INTO deliveries (
                    delivery_id, order_id, driver_id,
                    delivery_date, delivery_status, delivery_window
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    d.delivery_id,
                    d.order_id,
                    d.driver_id,
                    d.delivery_date,
                    d.delivery_status,
                    d.delivery_window
                ],
            )
        })?,
    };

    tx.commit()?;
    info!(
        loaded = summary.total_loaded(),
        skipped = summary.total_skipped(),
        "dataset committed"
    );
    Ok(summary)
}

fn load_table<T, F>(tx: &Transaction<'_>, path: &Path, mut insert: F) -> ReportResult<TableCount>
where
    T: DeserializeOwned,
    F: FnMut(&Transaction<'_>, &T) -> rusqlite::Result<usize>,
{
    info!("Reading {:?}", path);
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut count = TableCount::default();
    for (i, record) in reader.deserialize::<T>().enumerate() {
        // Header is line 1.
        let line = i + 2;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                skip_row(&mut count, path, line, &e.to_string());
                continue;
            }
        };
        match insert(tx, &record) {
            Ok(_) => count.loaded += 1,
            Err(rusqlite::Error::SqliteFailure(err, msg))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                let reason = msg.unwrap_or_else(|| err.to_string());
                skip_row(&mut count, path, line, &reason);
            }
            Err(e) => return Err(e.into()),
        }
    }

    if count.skipped > MAX_ROW_WARNINGS {
        warn!("{:?}: {} more rows skipped", path, count.skipped - MAX_ROW_WARNINGS);
    }
    info!(loaded = count.loaded, skipped = count.skipped, "Loaded {:?}", path);
    Ok(count)
}

fn skip_row(count: &mut TableCount, path: &Path, line: usize, reason: &str) {
    count.skipped += 1;
    if count.skipped <= MAX_ROW_WARNINGS {
        warn!("{:?} line {}: skipping row: {}", path, line, reason);
    }
}

/// Write `dataset` as the six CSVs under `dir`, creating it if needed.
pub fn write_dataset(dir: &Path, dataset: &Dataset) -> ReportResult<()> {
    std::fs::create_dir_all(dir)?;
    write_table(&dir.join(CUSTOMERS_CSV), &dataset.customers)?;
    write_table(&dir.join(DRIVERS_CSV), &dataset.drivers)?;
    write_table(&dir.join(PRODUCTS_CSV), &dataset.products)?;
    write_table(&dir.join(ORDERS_CSV), &dataset.orders)?;
    write_table(&dir.join(ORDER_ITEMS_CSV), &dataset.order_items)?;
    write_table(&dir.join(DELIVERIES_CSV), &dataset.deliveries)?;
    Ok(())
}

fn write_table<T: Serialize>(path: &Path, rows: &[T]) -> ReportResult<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!("Wrote {} rows to {:?}", rows.len(), path);
    Ok(())
}
