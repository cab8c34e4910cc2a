use lazy_static::lazy_static;
use regex::Regex;

use crate::model::{Order, RiskScore};

lazy_static! {
    static ref DIGIT_RUN: Regex = Regex::new(r"[0-9]{5,}").expect("digit run pattern is valid");
}

/// Hours of the day (inclusive) treated as late night.
pub const LATE_NIGHT_HOURS: std::ops::RangeInclusive<u32> = 2..=5;
pub const LATE_NIGHT_ADJUSTMENT: RiskScore = 10;
pub const ROUND_AMOUNT_ADJUSTMENT: RiskScore = 5;
pub const LARGE_AMOUNT_LIMIT: f64 = 1000.0;
pub const LARGE_AMOUNT_ADJUSTMENT: RiskScore = 10;
pub const DIGIT_RUN_ADJUSTMENT: RiskScore = 10;

/// Fixed pattern-based score adjustments layered over rule scoring.
///
/// These apply regardless of the rule configuration and are not clamped here.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicAdjuster;

impl HeuristicAdjuster {
    pub fn new() -> Self {
        Self
    }

    pub fn adjust(&self, order: &Order, base_score: RiskScore, hour: u32) -> RiskScore {
        base_score.saturating_add(self.adjustment(order, hour))
    }

    pub fn adjustment(&self, order: &Order, hour: u32) -> RiskScore {
        let mut adjustment = 0;

        if LATE_NIGHT_HOURS.contains(&hour) {
            adjustment += LATE_NIGHT_ADJUSTMENT;
        }
        if order.amount % 100.0 == 0.0 {
            adjustment += ROUND_AMOUNT_ADJUSTMENT;
        }
        if order.amount > LARGE_AMOUNT_LIMIT {
            adjustment += LARGE_AMOUNT_ADJUSTMENT;
        }
        if order.email.as_deref().is_some_and(|e| DIGIT_RUN.is_match(e)) {
            adjustment += DIGIT_RUN_ADJUSTMENT;
        }

        adjustment
    }
}
