use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use crate::error::ReportResult;

pub type DbConn = Connection;

/// Open the reporting database read-only.
///
/// Reports never write, so the CLI refuses to create a missing file rather
/// than silently reporting over an empty database.
pub fn connect(path: impl AsRef<Path>) -> ReportResult<DbConn> {
    let conn = Connection::open_with_flags(
        path.as_ref(),
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    Ok(conn)
}

/// Open (or create) a database for loading data.
pub fn connect_writable(path: impl AsRef<Path>) -> ReportResult<DbConn> {
    let conn = Connection::open(path.as_ref())?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(conn)
}

/// In-memory database with the schema applied. Used by the test fixtures.
pub fn connect_in_memory() -> ReportResult<DbConn> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

/// Tables the reporting engine reads from.
pub const SCHEMA: &str = r#"
    -- Customers
    CREATE TABLE IF NOT EXISTS customers (
        customer_id   INTEGER PRIMARY KEY,
        customer_name TEXT NOT NULL,
        email         TEXT NOT NULL UNIQUE,
        signup_date   TEXT NOT NULL
    );

    -- Drivers
    CREATE TABLE IF NOT EXISTS drivers (
        driver_id   INTEGER PRIMARY KEY,
        driver_name TEXT NOT NULL,
        hire_date   TEXT NOT NULL
    );

    -- Products (category is free text)
    CREATE TABLE IF NOT EXISTS products (
        product_id INTEGER PRIMARY KEY,
        name       TEXT NOT NULL,
        category   TEXT NOT NULL,
        price      REAL NOT NULL
    );

    -- Orders
    CREATE TABLE IF NOT EXISTS orders (
        order_id    INTEGER PRIMARY KEY,
        customer_id INTEGER NOT NULL REFERENCES customers (customer_id),
        order_date  TEXT NOT NULL,
        status      TEXT NOT NULL,
        order_total REAL NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_orders_customer ON orders (customer_id);
    CREATE INDEX IF NOT EXISTS idx_orders_date ON orders (order_date);

    -- Line items
    CREATE TABLE IF NOT EXISTS order_items (
        order_item_id INTEGER PRIMARY KEY,
        order_id      INTEGER NOT NULL REFERENCES orders (order_id),
        product_id    INTEGER NOT NULL REFERENCES products (product_id),
        quantity      INTEGER NOT NULL,
        unit_price    REAL NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_order_items_order ON order_items (order_id);

    -- Deliveries (at most one per order; driver and date are optional)
    CREATE TABLE IF NOT EXISTS deliveries (
        delivery_id     INTEGER PRIMARY KEY,
        order_id        INTEGER NOT NULL REFERENCES orders (order_id),
        driver_id       INTEGER REFERENCES drivers (driver_id),
        delivery_date   TEXT,
        delivery_status TEXT NOT NULL,
        delivery_window TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_deliveries_order ON deliveries (order_id);
    CREATE INDEX IF NOT EXISTS idx_deliveries_driver ON deliveries (driver_id);
"#;

/// Initialize database schema
pub fn init_schema(conn: &DbConn) -> ReportResult<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}
