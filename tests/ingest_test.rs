use delivery_dashboard::db;
use delivery_dashboard::ingest::{self, Dataset, TableCount};
use delivery_dashboard::models::{
    Customer, Delivery, DeliveryLookup, Driver, Order, OrderItem, Product,
};
use delivery_dashboard::reports::{key_stats, rankings, summary};

fn fixture() -> Dataset {
    Dataset {
        customers: vec![
            Customer {
                customer_id: 1,
                customer_name: "Ada Lovelace".into(),
                email: "ada@example.com".into(),
                signup_date: "2024-01-02".into(),
            },
            Customer {
                customer_id: 2,
                customer_name: "Alan Turing".into(),
                email: "alan@example.com".into(),
                signup_date: "2024-02-14".into(),
            },
        ],
        drivers: vec![Driver {
            driver_id: 1,
            driver_name: "Grace Hopper".into(),
            hire_date: "2023-06-01".into(),
        }],
        products: vec![
            Product {
                product_id: 1,
                name: "Bagel".into(),
                category: "Bakery".into(),
                price: 1.25,
            },
            Product {
                product_id: 2,
                name: "Coffee".into(),
                category: "Beverages".into(),
                price: 3.75,
            },
        ],
        orders: vec![
            Order {
                order_id: 10,
                customer_id: 1,
                order_date: "2024-03-01".into(),
                status: "completed".into(),
                order_total: 6.25,
            },
            Order {
                order_id: 11,
                customer_id: 1,
                order_date: "2024-03-04".into(),
                status: "pending".into(),
                order_total: 3.75,
            },
        ],
        order_items: vec![
            OrderItem {
                order_item_id: 1,
                order_id: 10,
                product_id: 1,
                quantity: 2,
                unit_price: 1.25,
            },
            OrderItem {
                order_item_id: 2,
                order_id: 10,
                product_id: 2,
                quantity: 1,
                unit_price: 3.75,
            },
            OrderItem {
                order_item_id: 3,
                order_id: 11,
                product_id: 2,
                quantity: 1,
                unit_price: 3.75,
            },
        ],
        deliveries: vec![
            Delivery {
                delivery_id: 1,
                order_id: 10,
                driver_id: Some(1),
                delivery_date: Some("2024-03-01".into()),
                delivery_status: "delivered".into(),
                delivery_window: "evening".into(),
            },
            Delivery {
                delivery_id: 2,
                order_id: 11,
                driver_id: None,
                delivery_date: None,
                delivery_status: "scheduled".into(),
                delivery_window: "morning".into(),
            },
        ],
    }
}

#[test]
fn test_written_dataset_loads_and_reports() {
    let data_dir = tempfile::tempdir().unwrap();
    ingest::write_dataset(data_dir.path(), &fixture()).unwrap();

    let db_dir = tempfile::tempdir().unwrap();
    let db_path = db_dir.path().join("food_delivery.db");
    let mut conn = db::connect_writable(&db_path).unwrap();
    let loaded = ingest::load_dataset(&mut conn, data_dir.path()).unwrap();
    drop(conn);

    assert_eq!(loaded.customers, TableCount { loaded: 2, skipped: 0 });
    assert_eq!(loaded.order_items.loaded, 3);
    assert_eq!(loaded.total_loaded(), 12);
    assert_eq!(loaded.total_skipped(), 0);

    let conn = db::connect(&db_path).unwrap();
    assert_eq!(summary::total_customers(&conn).unwrap(), 2);

    let spend = key_stats::orders_per_customer(&conn).unwrap();
    assert_eq!(spend[0].customer_name, "Ada Lovelace");
    assert_eq!(spend[0].order_count, 2);
    assert_eq!(spend[0].total_spent, 10.0);
    assert_eq!(spend[1].order_count, 0);

    match key_stats::delivery_lookup(&conn, 11).unwrap() {
        DeliveryLookup::Found(order) => {
            assert_eq!(order.delivery_date_or_fallback(), "Not delivered yet");
            assert_eq!(order.driver_or_fallback(), "Not assigned");
        }
        other => panic!("expected order 11, got {other:?}"),
    }

    let top = rankings::top_products_by_revenue(&conn, 1).unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].row.name, "Coffee");
}

#[test]
fn test_foreign_key_violations_are_skipped() {
    let mut data = fixture();
    data.orders.push(Order {
        order_id: 12,
        customer_id: 99,
        order_date: "2024-03-05".into(),
        status: "completed".into(),
        order_total: 1.0,
    });

    let data_dir = tempfile::tempdir().unwrap();
    ingest::write_dataset(data_dir.path(), &data).unwrap();

    let db_dir = tempfile::tempdir().unwrap();
    let mut conn = db::connect_writable(db_dir.path().join("fk.db")).unwrap();
    let loaded = ingest::load_dataset(&mut conn, data_dir.path()).unwrap();

    assert_eq!(loaded.orders, TableCount { loaded: 2, skipped: 1 });
}
