//! Synthetic data generator for the food-delivery dataset
//!
//! Writes customers, drivers, products, orders, order items and deliveries
//! as CSVs that `ingest` can load.
//!
//! Usage:
//!   cargo run --release --bin generate_synthetic -- [OPTIONS]
//!
//! Options:
//!   --customers <N>      Customers to create (default: 200)
//!   --drivers <N>        Drivers to create (default: 15)
//!   --products <N>       Catalogue size (default: 40)
//!   --orders <N>         Orders to create (default: 1500)
//!   --days <N>           Days of order history (default: 90)
//!   --end-date <DATE>    Last order date, YYYY-MM-DD (default: today)
//!   --seed <N>           Random seed for reproducibility (optional)
//!   --output <DIR>       Output directory (default: data)

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::{Duration, NaiveDate};
use clap::Parser;
use delivery_dashboard::config;
use delivery_dashboard::ingest::{self, Dataset};
use delivery_dashboard::models::{Customer, Delivery, Driver, Order, OrderItem, Product};
use rand::prelude::*;
use rand::rngs::StdRng;
use tracing::info;

/// Synthetic data generator for the delivery dataset
#[derive(Parser, Debug)]
#[command(name = "generate_synthetic")]
#[command(about = "Generate a synthetic food-delivery dataset as CSV")]
struct Args {
    #[arg(long, default_value = "200")]
    customers: usize,

    #[arg(long, default_value = "15")]
    drivers: usize,

    #[arg(long, default_value = "40")]
    products: usize,

    #[arg(long, default_value = "1500")]
    orders: usize,

    /// Days of order history ending at --end-date
    #[arg(long, default_value = "90")]
    days: i64,

    /// Last order date (YYYY-MM-DD)
    #[arg(long)]
    end_date: Option<NaiveDate>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Output directory
    #[arg(long, default_value = "data")]
    output: PathBuf,
}

const FIRST_NAMES: &[&str] = &[
    "Alice", "Ben", "Chloe", "Daniel", "Ella", "Finn", "Grace", "Harry", "Isla", "Jack",
    "Katie", "Liam", "Maya", "Noah", "Olivia", "Priya", "Quinn", "Ruby", "Sam", "Tom",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Jones", "Taylor", "Brown", "Williams", "Wilson", "Johnson", "Davies", "Patel",
    "Wright", "Evans", "Thomas", "Roberts", "Walker", "Khan", "Green",
];

/// (category, product names, price range)
const CATALOGUE: &[(&str, &[&str], (f64, f64))] = &[
    ("Bakery", &["Sourdough", "Croissant", "Bagel", "Baguette", "Muffin"], (0.80, 4.50)),
    ("Dairy", &["Milk", "Cheddar", "Yoghurt", "Butter", "Cream"], (0.90, 5.00)),
    ("Produce", &["Apples", "Bananas", "Spinach", "Carrots", "Avocado"], (0.50, 3.50)),
    ("Meat", &["Chicken Breast", "Beef Mince", "Bacon", "Sausages"], (3.00, 9.00)),
    ("Frozen", &["Ice Cream", "Peas", "Pizza", "Fish Fingers"], (1.50, 6.00)),
    ("Pantry", &["Pasta", "Rice", "Olive Oil", "Tinned Tomatoes", "Cereal"], (0.70, 6.50)),
    ("Beverages", &["Orange Juice", "Coffee", "Tea", "Sparkling Water"], (1.00, 7.00)),
    ("Snacks", &["Crisps", "Chocolate", "Nuts", "Biscuits"], (0.60, 3.50)),
];

const DELIVERY_WINDOWS: &[&str] = &["morning", "afternoon", "evening"];

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn random_name(rng: &mut impl Rng) -> String {
    let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
    let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
    format!("{} {}", first, last)
}

fn generate_customers(count: usize, first_order: NaiveDate, rng: &mut impl Rng) -> Vec<Customer> {
    (1..=count)
        .map(|id| {
            let name = random_name(rng);
            // Emails are unique through the id suffix.
            let email = format!("{}.{}@example.com", name.to_lowercase().replace(' ', "."), id);
            let signup = first_order - Duration::days(rng.gen_range(0..365));
            Customer {
                customer_id: id as i64,
                customer_name: name,
                email,
                signup_date: format_date(signup),
            }
        })
        .collect()
}

fn generate_drivers(count: usize, first_order: NaiveDate, rng: &mut impl Rng) -> Vec<Driver> {
    (1..=count)
        .map(|id| Driver {
            driver_id: id as i64,
            driver_name: random_name(rng),
            hire_date: format_date(first_order - Duration::days(rng.gen_range(30..1500))),
        })
        .collect()
}

fn generate_products(count: usize, rng: &mut impl Rng) -> Vec<Product> {
    let mut seen: HashSet<String> = HashSet::new();
    (1..=count)
        .map(|id| {
            let (category, names, (low, high)) = CATALOGUE[(id - 1) % CATALOGUE.len()];
            let base = names[rng.gen_range(0..names.len())];
            let mut name = base.to_string();
            let mut variant = 2;
            while !seen.insert(name.clone()) {
                name = format!("{} #{}", base, variant);
                variant += 1;
            }
            Product {
                product_id: id as i64,
                name,
                category: category.to_string(),
                price: round2(rng.gen_range(low..high)),
            }
        })
        .collect()
}

fn order_status(rng: &mut impl Rng) -> &'static str {
    let roll: f64 = rng.gen();
    if roll < 0.85 {
        "completed"
    } else if roll < 0.92 {
        "pending"
    } else {
        "cancelled"
    }
}

/// Outcome for a dispatched delivery.
fn delivery_outcome(rng: &mut impl Rng) -> &'static str {
    if rng.gen_bool(0.93) {
        "delivered"
    } else {
        "failed"
    }
}

fn generate_orders(
    args: &Args,
    start: NaiveDate,
    customers: &[Customer],
    drivers: &[Driver],
    products: &[Product],
    rng: &mut impl Rng,
) -> (Vec<Order>, Vec<OrderItem>, Vec<Delivery>) {
    let mut orders = Vec::with_capacity(args.orders);
    let mut items = Vec::new();
    let mut deliveries = Vec::new();

    for order_id in 1..=args.orders as i64 {
        // Skew towards low ids so some customers are regulars and some never order.
        let pick = (rng.gen::<f64>().powi(2) * customers.len() as f64) as usize;
        let customer = &customers[pick.min(customers.len() - 1)];
        let order_date = start + Duration::days(rng.gen_range(0..=args.days));
        let status = order_status(rng);

        let lines = rng.gen_range(1..=5usize.min(products.len()));
        let mut total = 0.0;
        for product in products.choose_multiple(rng, lines) {
            let quantity: i64 = rng.gen_range(1..=3);
            total += product.price * quantity as f64;
            items.push(OrderItem {
                order_item_id: items.len() as i64 + 1,
                order_id,
                product_id: product.product_id,
                quantity,
                unit_price: product.price,
            });
        }

        orders.push(Order {
            order_id,
            customer_id: customer.customer_id,
            order_date: format_date(order_date),
            status: status.to_string(),
            order_total: round2(total),
        });

        // Cancelled orders and a few stragglers never get a delivery row.
        if status == "cancelled" || rng.gen_bool(0.03) {
            continue;
        }
        let window = DELIVERY_WINDOWS[rng.gen_range(0..DELIVERY_WINDOWS.len())];
        let delivery = if status == "pending" {
            Delivery {
                delivery_id: deliveries.len() as i64 + 1,
                order_id,
                driver_id: if rng.gen_bool(0.5) {
                    drivers.choose(rng).map(|d| d.driver_id)
                } else {
                    None
                },
                delivery_date: None,
                delivery_status: "scheduled".to_string(),
                delivery_window: window.to_string(),
            }
        } else {
            Delivery {
                delivery_id: deliveries.len() as i64 + 1,
                order_id,
                driver_id: drivers.choose(rng).map(|d| d.driver_id),
                delivery_date: Some(format_date(order_date + Duration::days(rng.gen_range(0..=1)))),
                delivery_status: delivery_outcome(rng).to_string(),
                delivery_window: window.to_string(),
            }
        };
        deliveries.push(delivery);
    }

    (orders, items, deliveries)
}

fn generate(args: &Args, end_date: NaiveDate, rng: &mut impl Rng) -> Dataset {
    let start = end_date - Duration::days(args.days);
    let customers = generate_customers(args.customers, start, rng);
    let drivers = generate_drivers(args.drivers, start, rng);
    let products = generate_products(args.products, rng);
    let (orders, order_items, deliveries) =
        generate_orders(args, start, &customers, &drivers, &products, rng);

    Dataset {
        customers,
        drivers,
        products,
        orders,
        order_items,
        deliveries,
    }
}

fn main() -> Result<()> {
    config::init_tracing(config::TOOL_LOG_FILTER);
    let args = Args::parse();

    if args.customers == 0 || args.products == 0 {
        bail!("--customers and --products must be at least 1");
    }
    if args.days < 0 {
        bail!("--days must not be negative");
    }

    let end_date = args.end_date.unwrap_or_else(|| chrono::Local::now().date_naive());
    info!(
        customers = args.customers,
        drivers = args.drivers,
        products = args.products,
        orders = args.orders,
        days = args.days,
        end_date = %end_date,
        seed = ?args.seed,
        "Generating synthetic dataset"
    );

    let mut rng: StdRng = match args.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let dataset = generate(&args, end_date, &mut rng);
    ingest::write_dataset(&args.output, &dataset)?;

    info!(
        "Wrote {} orders, {} items and {} deliveries to {}",
        dataset.orders.len(),
        dataset.order_items.len(),
        dataset.deliveries.len(),
        args.output.display()
    );
    Ok(())
}
