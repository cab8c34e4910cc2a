use std::error::Error;

use chrono::Utc;
use processing::{
    analytics::summarize,
    executable_utils::{initialize_executable, open_store},
    format::{currency, time_ago},
    storage::OrderStorage,
};

const RECENT_ORDERS: usize = 10;

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = initialize_executable()?;
    let orders = OrderStorage::new(open_store(&config.common)?).get_all();
    let snapshot = summarize(&orders);

    println!("Orders:        {}", snapshot.total);
    println!(
        "Risk tiers:    high {} / medium {} / low {}",
        snapshot.high, snapshot.medium, snapshot.low
    );
    println!(
        "Review status: pending {} / approved {} / blocked {}",
        snapshot.pending, snapshot.approved, snapshot.blocked
    );
    println!("Average risk:  {:.1}", snapshot.avg_risk);
    println!("Blocked value: {}", currency(snapshot.blocked_value));

    if !orders.is_empty() {
        println!();
        let now = Utc::now();
        for order in orders.iter().take(RECENT_ORDERS) {
            println!(
                "{:<16} {:>10} {:>3} {:<6} {:<8} {}",
                order.id,
                currency(order.amount()),
                order.risk_score(),
                order.risk_level(),
                order.status,
                time_ago(order.created_at, now)
            );
        }
    }

    Ok(())
}
