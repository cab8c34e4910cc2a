use crate::model::{AnalyticsSnapshot, OrderRecord, OrderStatus, RiskLevel};

/// Summarizes the given orders. An empty collection yields all zeroes.
pub fn summarize(orders: &[OrderRecord]) -> AnalyticsSnapshot {
    let mut snapshot = AnalyticsSnapshot {
        total: orders.len(),
        ..Default::default()
    };
    let mut risk_sum: u64 = 0;

    for order in orders {
        match order.risk_level() {
            RiskLevel::High => snapshot.high += 1,
            RiskLevel::Medium => snapshot.medium += 1,
            RiskLevel::Low => snapshot.low += 1,
        }
        match order.status {
            OrderStatus::Blocked => {
                snapshot.blocked += 1;
                snapshot.blocked_value += order.amount();
            }
            OrderStatus::Approved => snapshot.approved += 1,
            OrderStatus::Pending => snapshot.pending += 1,
        }
        risk_sum += u64::from(order.risk_score());
    }

    if !orders.is_empty() {
        snapshot.avg_risk = risk_sum as f64 / orders.len() as f64;
    }

    snapshot
}
