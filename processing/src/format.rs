//! Human-readable rendering for reports.

use chrono::{DateTime, Utc};

/// `$1234.50` style, always two decimals.
pub fn currency(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Coarse relative time: `Just now`, `5m ago`, `3h ago`, `2d ago`.
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    match seconds {
        s if s < 60 => "Just now".to_string(),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s => format!("{}d ago", s / 86_400),
    }
}
