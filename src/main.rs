//! Food-delivery reporting CLI.
//!
//! Usage:
//!   delivery_dashboard [--db <PATH>] [--format text|json] <COMMAND>
//!
//! Run `delivery_dashboard --help` for the command list.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::debug;

use delivery_dashboard::config::{self, OutputFormat, Settings};
use delivery_dashboard::db::{self, DbConn};
use delivery_dashboard::error::{parse_order_id, parse_price, parse_threshold, ReportError};
use delivery_dashboard::render;
use delivery_dashboard::reports::rankings::{
    DEFAULT_TOP_AVERAGE, DEFAULT_TOP_CUSTOMERS, DEFAULT_TOP_PRODUCTS,
};
use delivery_dashboard::reports::{analytics, dashboard, key_stats, rankings, summary, timeline};

#[derive(Parser, Debug)]
#[command(name = "delivery_dashboard")]
#[command(about = "Reports over a food-delivery SQLite database")]
struct Cli {
    /// SQLite database file (falls back to DELIVERY_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Total number of customers
    Customers,
    /// Earliest and latest signup dates
    SignupRange,
    /// Order count and min/avg/max order value
    OrderStats,
    /// Driver count and hire dates
    Drivers,
    /// Distinct product categories
    Categories,
    /// Orders placed by one customer
    CustomerOrders {
        #[arg(long)]
        email: String,
    },
    /// Products priced below a threshold
    CheapProducts {
        #[arg(long, default_value = "5.00")]
        below: String,
    },
    /// Order count and total spend per customer
    OrdersPerCustomer,
    /// Deliveries handled per driver
    DriverWorkload,
    /// Delivery details for one order
    Lookup {
        #[arg(allow_hyphen_values = true)]
        order_id: String,
    },
    /// Orders per calendar date
    OrdersPerDate,
    /// Deliveries per delivery date
    DeliveriesPerDate,
    /// Customer signups per month
    SignupsPerMonth,
    /// Top customers by total spend
    TopCustomers {
        #[arg(long, default_value_t = DEFAULT_TOP_CUSTOMERS)]
        limit: usize,
    },
    /// Drivers ranked by deliveries
    RankDrivers,
    /// Orders above a total
    HighValue {
        #[arg(allow_hyphen_values = true)]
        threshold: String,
    },
    /// Top customers by average order value
    TopAvgOrder {
        #[arg(long, default_value_t = DEFAULT_TOP_AVERAGE)]
        limit: usize,
    },
    /// Best-selling products
    TopProducts {
        #[arg(long, default_value_t = DEFAULT_TOP_PRODUCTS)]
        limit: usize,
        #[arg(long, value_enum, default_value_t = ProductRanking::Quantity)]
        by: ProductRanking,
    },
    /// Revenue per product category
    CategoryRevenue,
    /// Orders per product category
    CategoryOrders,
    /// Orders per delivery window
    WindowOrders,
    /// Orders and deliveries by status
    DeliveryStatus,
    /// Delivery status breakdown per delivery window
    WindowPerformance,
    /// Delivery status breakdown per customer
    CustomerPerformance,
    /// Category co-occurrence within orders
    Cooccurrence,
    /// Share of customers ordering more than once
    RepeatRate,
    /// Next-7-days revenue projection
    Forecast,
    /// Composite dashboard sections
    Dashboard {
        #[arg(value_enum, default_value_t = DashboardSection::All)]
        section: DashboardSection,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProductRanking {
    Quantity,
    Revenue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DashboardSection {
    Orders,
    Revenue,
    Customers,
    Deliveries,
    All,
}

fn main() -> Result<()> {
    config::init_tracing(config::CLI_LOG_FILTER);

    let cli = Cli::parse();
    let settings = Settings::resolve(cli.db, cli.format);
    debug!(db = %settings.db_path.display(), format = ?settings.format, "starting");

    let conn = db::connect(&settings.db_path)
        .with_context(|| format!("opening {}", settings.db_path.display()))?;

    report_outcome(run(&conn, &cli.command, settings.format))
}

/// Bad user input skips the report and prints why; it is not a failure.
fn report_outcome(result: Result<()>) -> Result<()> {
    if let Err(e) = result {
        if let Some(report_err) = e.downcast_ref::<ReportError>() {
            if report_err.is_user_input() {
                println!("{}", report_err);
                return Ok(());
            }
        }
        return Err(e);
    }
    Ok(())
}

/// Print `value` as JSON, or as a titled text section.
fn emit<T: Serialize>(
    format: OutputFormat,
    title: &str,
    value: &T,
    text: impl FnOnce(&T) -> String,
) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => {
            print!("{}", render::section_header(title));
            print!("{}", text(value));
        }
    }
    Ok(())
}

fn run(conn: &DbConn, command: &Command, format: OutputFormat) -> Result<()> {
    match command {
        Command::Customers => {
            let total = summary::total_customers(conn)?;
            emit(format, "CUSTOMERS", &total, |t| render::total_customers(*t))
        }
        Command::SignupRange => {
            let range = summary::customer_signup_range(conn)?;
            emit(format, "SIGNUP RANGE", &range, render::signup_range)
        }
        Command::OrderStats => {
            let stats = summary::order_summary_stats(conn)?;
            emit(format, "ORDER STATISTICS", &stats, render::order_stats)
        }
        Command::Drivers => {
            let drivers = summary::driver_summary(conn)?;
            emit(format, "DRIVERS", &drivers, render::driver_summary)
        }
        Command::Categories => {
            let categories = summary::list_categories(conn)?;
            emit(format, "PRODUCT CATEGORIES", &categories, |c| render::categories(c))
        }
        Command::CustomerOrders { email } => {
            let orders = summary::orders_for_customer(conn, email)?;
            emit(format, "CUSTOMER ORDERS", &orders, |o| render::customer_orders(email, o))
        }
        Command::CheapProducts { below } => {
            let price = parse_price(below)?;
            let products = summary::products_below_price(conn, price)?;
            emit(format, "PRODUCTS BELOW PRICE", &products, |p| render::products_below(price, p))
        }
        Command::OrdersPerCustomer => {
            let rows = key_stats::orders_per_customer(conn)?;
            emit(format, "ORDERS PER CUSTOMER", &rows, |r| render::customer_spend(r))
        }
        Command::DriverWorkload => {
            let rows = key_stats::driver_workload(conn)?;
            emit(format, "DELIVERIES PER DRIVER", &rows, |r| render::driver_workload(r))
        }
        Command::Lookup { order_id } => {
            let order_id = parse_order_id(order_id)?;
            let lookup = key_stats::delivery_lookup(conn, order_id)?;
            emit(format, "ORDER DELIVERY", &lookup, render::delivery_lookup)
        }
        Command::OrdersPerDate => {
            let rows = timeline::orders_per_date(conn)?;
            emit(format, "ORDERS PER DATE", &rows, |r| render::date_counts("Orders", r))
        }
        Command::DeliveriesPerDate => {
            let rows = timeline::deliveries_per_date(conn)?;
            emit(format, "DELIVERIES PER DATE", &rows, |r| render::date_counts("Deliveries", r))
        }
        Command::SignupsPerMonth => {
            let rows = timeline::signups_per_month(conn)?;
            emit(format, "SIGNUPS PER MONTH", &rows, |r| render::month_counts(r))
        }
        Command::TopCustomers { limit } => {
            let rows = rankings::top_customers_by_spend(conn, *limit)?;
            emit(format, "TOP CUSTOMERS", &rows, |r| render::top_customers(*limit, r))
        }
        Command::RankDrivers => {
            let rows = rankings::rank_drivers_by_deliveries(conn)?;
            emit(format, "DRIVER RANKING", &rows, |r| render::ranked_drivers(r))
        }
        Command::HighValue { threshold } => {
            let threshold = parse_threshold(threshold)?;
            let rows = rankings::high_value_orders(conn, threshold)?;
            emit(format, "HIGH-VALUE ORDERS", &rows, |r| render::high_value_orders(threshold, r))
        }
        Command::TopAvgOrder { limit } => {
            let rows = rankings::top_customers_by_average_order(conn, *limit)?;
            emit(format, "TOP CUSTOMERS BY AVERAGE ORDER", &rows, |r| render::top_average_order(r))
        }
        Command::TopProducts { limit, by } => match by {
            ProductRanking::Quantity => {
                let rows = rankings::top_products_by_quantity(conn, *limit)?;
                emit(format, "TOP PRODUCTS BY UNITS SOLD", &rows, |r| {
                    render::top_products_by_quantity(r)
                })
            }
            ProductRanking::Revenue => {
                let rows = rankings::top_products_by_revenue(conn, *limit)?;
                emit(format, "TOP PRODUCTS BY REVENUE", &rows, |r| {
                    render::top_products_by_revenue(r)
                })
            }
        },
        Command::CategoryRevenue => {
            let rows = rankings::revenue_per_category(conn)?;
            emit(format, "REVENUE PER CATEGORY", &rows, |r| render::category_revenue(r))
        }
        Command::CategoryOrders => {
            let rows = rankings::orders_per_category(conn)?;
            emit(format, "ORDERS PER CATEGORY", &rows, |r| render::category_orders(r))
        }
        Command::WindowOrders => {
            let rows = rankings::orders_per_delivery_window(conn)?;
            emit(format, "ORDERS PER DELIVERY WINDOW", &rows, |r| render::window_counts(r))
        }
        Command::DeliveryStatus => {
            let orders = summary::orders_by_status(conn)?;
            emit(format, "ORDER STATUS", &orders, |r| render::status_counts("Status", r))?;
            let deliveries = summary::deliveries_by_status(conn)?;
            emit(format, "DELIVERY STATUS", &deliveries, |r| render::status_counts("Status", r))
        }
        Command::WindowPerformance => {
            let pivot = analytics::delivery_performance_by_window(conn)?;
            emit(format, "DELIVERY PERFORMANCE BY WINDOW", &pivot, |p| render::pivot("Window", p))
        }
        Command::CustomerPerformance => {
            let pivot = analytics::delivery_performance_by_customer(conn)?;
            emit(format, "DELIVERY PERFORMANCE BY CUSTOMER", &pivot, |p| {
                render::pivot("Customer", p)
            })
        }
        Command::Cooccurrence => {
            let matrix = analytics::category_cooccurrence(conn)?;
            emit(format, "CATEGORY CO-OCCURRENCE", &matrix, render::cooccurrence)
        }
        Command::RepeatRate => {
            let repeat = analytics::repeat_purchase_rate(conn)?;
            emit(format, "REPEAT PURCHASE RATE", &repeat, render::repeat_purchase)
        }
        Command::Forecast => {
            let today = chrono::Local::now().date_naive();
            let forecast = analytics::forecast_revenue(conn, today)?;
            emit(format, "REVENUE FORECAST", &forecast, render::forecast)
        }
        Command::Dashboard { section } => run_dashboard(conn, *section, format),
    }
}

fn run_dashboard(conn: &DbConn, section: DashboardSection, format: OutputFormat) -> Result<()> {
    let all = section == DashboardSection::All;

    if all || section == DashboardSection::Orders {
        print_section(format, &dashboard::orders_overview(conn)?, render::orders_overview)?;
    }
    if all || section == DashboardSection::Revenue {
        print_section(format, &dashboard::revenue_analysis(conn)?, render::revenue_analysis)?;
    }
    if all || section == DashboardSection::Customers {
        print_section(format, &dashboard::customer_insights(conn)?, render::customer_insights)?;
    }
    if all || section == DashboardSection::Deliveries {
        let deliveries = dashboard::delivery_performance(conn)?;
        print_section(format, &deliveries, render::delivery_performance)?;
    }
    Ok(())
}

/// Dashboard renderers carry their own section header.
fn print_section<T: Serialize>(
    format: OutputFormat,
    value: &T,
    text: fn(&T) -> String,
) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => print!("{}", text(value)),
    }
    Ok(())
}
