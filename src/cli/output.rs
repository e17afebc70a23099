//! Shared CLI output helpers and board rendering.

use std::fmt::Display;

use chrono::{DateTime, Local, Utc};
use owo_colors::OwoColorize;
use serde_json::{json, Value};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::domain::{Order, OrderStatus, OverdueClassifier, Projection, SortMode};

/// Print a section header.
pub fn section(title: &str) {
    println!();
    println!("{}", title.bold());
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    println!("  {:<14} {}", label.dimmed(), value);
}

/// Print a success line.
pub fn success(message: &str) {
    println!("  {} {}", "✓".green(), message);
}

/// Print a warning line.
pub fn warning(message: &str) {
    println!("  {} {}", "⚠".yellow(), message);
}

/// Print an error line.
pub fn error(message: &str) {
    eprintln!("  {} {}", "×".red(), message);
}

/// Print a single-line note.
pub fn note(message: &str) {
    println!("  {}", message.dimmed());
}

/// Queue heading for a status.
#[must_use]
pub const fn queue_title(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "New Food Orders",
        OrderStatus::Preparing => "Food Orders In Progress",
        OrderStatus::ReadyForPickup => "Food Orders Ready for Pickup",
    }
}

#[derive(Tabled)]
struct OrderRow {
    #[tabled(rename = "Table")]
    table: String,
    #[tabled(rename = "Order")]
    order: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Placed")]
    placed: String,
    #[tabled(rename = "Waiting")]
    waiting: String,
    #[tabled(rename = "ETA")]
    eta: String,
    #[tabled(rename = "Items")]
    items: String,
    #[tabled(rename = "Notes")]
    notes: String,
    #[tabled(rename = "Progress")]
    progress: String,
}

impl OrderRow {
    fn new(order: &Order, now: DateTime<Utc>, overdue: &OverdueClassifier) -> Self {
        let mut waiting = format!("{}m", order.elapsed_minutes(now));
        if overdue.is_overdue(order, now) {
            waiting.push_str(" OVERDUE");
        }
        let mut id = order.short_id().to_string();
        if order.is_unseen() {
            id.push_str(" *");
        }
        Self {
            table: order.table_number.clone().unwrap_or_else(|| "-".into()),
            order: id,
            status: order.status.label(),
            placed: order
                .timestamp
                .with_timezone(&Local)
                .format("%H:%M")
                .to_string(),
            waiting,
            eta: order
                .kitchen_estimated_time
                .map_or_else(|| "-".into(), |m| format!("{m} min")),
            items: order
                .order_items
                .iter()
                .map(|item| format!("{}x {}", item.quantity, item.name))
                .collect::<Vec<_>>()
                .join(", "),
            notes: order.notes.clone().unwrap_or_default(),
            progress: format!("{}%", order.progress_percent()),
        }
    }
}

/// Render one queue as a table, or a placeholder line when empty.
#[must_use]
pub fn render_queue(
    orders: &[Order],
    now: DateTime<Utc>,
    overdue: &OverdueClassifier,
) -> String {
    if orders.is_empty() {
        return "  (no orders)".to_string();
    }
    let rows: Vec<OrderRow> = orders
        .iter()
        .map(|order| OrderRow::new(order, now, overdue))
        .collect();
    Table::new(rows)
        .with(Style::rounded())
        .to_string()
        .lines()
        .map(|line| format!("  {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print all three queues.
pub fn board(
    projection: &Projection,
    now: DateTime<Utc>,
    overdue: &OverdueClassifier,
    sort: SortMode,
) {
    for status in OrderStatus::ALL {
        let orders = projection.queue(status);
        section(&format!("{} ({})", queue_title(status), orders.len()));
        println!("{}", render_queue(orders, now, overdue));
    }
    println!();
    note(&format!(
        "sorted by {sort}; * = not yet seen; overdue after {} min",
        overdue.threshold().num_minutes()
    ));
}

fn local_time(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(
        || "N/A".to_string(),
        |at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}

/// Labeled lines for the details view of one order.
#[must_use]
pub fn order_detail_fields(
    order: &Order,
    now: DateTime<Utc>,
    overdue: &OverdueClassifier,
) -> Vec<(&'static str, String)> {
    let mut waiting = format!("{} min", order.elapsed_minutes(now));
    if overdue.is_overdue(order, now) {
        waiting.push_str(" (overdue)");
    }
    vec![
        ("Order ID", order.id.to_string()),
        (
            "Table",
            order.table_number.clone().unwrap_or_else(|| "N/A".into()),
        ),
        ("Status", order.status.label().to_string()),
        ("Progress", format!("{}%", order.progress_percent())),
        (
            "Placed by",
            order
                .order_taker_name
                .clone()
                .unwrap_or_else(|| "N/A".into()),
        ),
        ("Time placed", local_time(Some(order.timestamp))),
        ("Waiting", waiting),
        ("Prep started", local_time(order.time_started_preparing)),
        ("Ready time", local_time(order.time_ready)),
        (
            "Kitchen ETA",
            order
                .kitchen_estimated_time
                .filter(|m| *m > 0)
                .map_or_else(|| "N/A".into(), |m| format!("{m} minutes")),
        ),
        ("Total", format!("{:.2}", order.total_amount)),
        ("Notes", order.notes.clone().unwrap_or_else(|| "None".into())),
    ]
}

/// Print everything known about one order, items included.
pub fn order_details(order: &Order, now: DateTime<Utc>, overdue: &OverdueClassifier) {
    section(&format!("Order {}", order.short_id()));
    for (label, value) in order_detail_fields(order, now, overdue) {
        field(label, value);
    }
    section("Items");
    if order.order_items.is_empty() {
        note("No items listed.");
    }
    for item in &order.order_items {
        println!(
            "  {}x {:<24} {:>8.2} each",
            item.quantity, item.name, item.unit_price
        );
    }
}

/// Machine-readable form of the board.
#[must_use]
pub fn board_json(
    projection: &Projection,
    now: DateTime<Utc>,
    overdue: &OverdueClassifier,
) -> Value {
    let queue = |status: OrderStatus| -> Vec<Value> {
        projection
            .queue(status)
            .iter()
            .map(|order| {
                json!({
                    "order": order,
                    "overdue": overdue.is_overdue(order, now),
                    "elapsedMinutes": order.elapsed_minutes(now),
                })
            })
            .collect()
    };
    json!({
        "generatedAt": now,
        "new": queue(OrderStatus::Pending),
        "inProgress": queue(OrderStatus::Preparing),
        "ready": queue(OrderStatus::ReadyForPickup),
    })
}
