//! Shared in-memory fixtures for report tests.
//!
//! Dataset at a glance:
//! - Dan (customer 4) has no orders; Frank (driver 3) has no deliveries.
//! - Order 4 has a delivery with no driver and no date.
//! - Order 5 has no delivery at all.

use crate::db::{self, DbConn};

const SEED: &str = r#"
    INSERT INTO customers (customer_id, customer_name, email, signup_date) VALUES
        (1, 'Alice Smith', 'alice@example.com', '2024-01-15'),
        (2, 'Bob Jones',   'bob@example.com',   '2024-01-20'),
        (3, 'Carol White', 'carol@example.com', '2024-02-03'),
        (4, 'Dan Brown',   'dan@example.com',   '2024-03-10');

    INSERT INTO drivers (driver_id, driver_name, hire_date) VALUES
        (1, 'Dave Driver', '2023-05-01'),
        (2, 'Erin Wheels', '2022-11-15'),
        (3, 'Frank Idle',  '2024-01-01');

    INSERT INTO products (product_id, name, category, price) VALUES
        (1, 'Sourdough', 'Bakery',  3.50),
        (2, 'Croissant', 'Bakery',  1.20),
        (3, 'Milk',      'Dairy',   1.10),
        (4, 'Cheddar',   'Dairy',   4.00),
        (5, 'Apples',    'Produce', 2.00),
        (6, 'Ice Cream', 'Frozen',  5.00);

    INSERT INTO orders (order_id, customer_id, order_date, status, order_total) VALUES
        (1, 1, '2024-03-01', 'completed', 10.00),
        (2, 1, '2024-03-01', 'completed', 25.50),
        (3, 2, '2024-03-02', 'completed', 40.00),
        (4, 3, '2024-03-03', 'cancelled',  5.00),
        (5, 2, '2024-03-05', 'completed', 12.00);

    INSERT INTO order_items (order_item_id, order_id, product_id, quantity, unit_price) VALUES
        (1, 1, 1, 2, 3.50),
        (2, 1, 3, 1, 1.10),
        (3, 2, 4, 3, 4.00),
        (4, 2, 5, 2, 2.00),
        (5, 3, 6, 4, 5.00),
        (6, 3, 2, 5, 1.20),
        (7, 3, 3, 2, 1.10),
        (8, 4, 5, 1, 2.00),
        (9, 5, 1, 1, 3.50),
        (10, 5, 2, 2, 1.20);

    INSERT INTO deliveries
        (delivery_id, order_id, driver_id, delivery_date, delivery_status, delivery_window) VALUES
        (1, 1, 1,    '2024-03-02', 'delivered', 'morning'),
        (2, 2, 1,    '2024-03-02', 'delivered', 'evening'),
        (3, 3, 2,    '2024-03-03', 'failed',    'morning'),
        (4, 4, NULL, NULL,         'scheduled', 'afternoon');
"#;

/// Schema only, no rows.
pub(crate) fn empty_db() -> DbConn {
    db::connect_in_memory().expect("in-memory database")
}

/// Schema plus the fixture dataset above.
pub(crate) fn seeded_db() -> DbConn {
    let conn = empty_db();
    conn.execute_batch(SEED).expect("seed fixture");
    conn
}

pub(crate) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
