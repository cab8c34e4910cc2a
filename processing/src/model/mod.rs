use serde::{Deserialize, Serialize};
use strum_macros::Display as EnumDisplay;

use crate::error::ShieldError;

mod analytics;
mod order;
mod rule;

pub use analytics::AnalyticsSnapshot;
pub use order::{Order, OrderRecord, OrderRequest, RESERVED_ATTRIBUTES, ScoredOrder};
pub use rule::{Rule, RuleId};

pub type RiskScore = u32;

/// Upper bound of every final risk score.
pub const MAX_RISK_SCORE: RiskScore = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumDisplay)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const HIGH_THRESHOLD: RiskScore = 70;
    pub const MEDIUM_THRESHOLD: RiskScore = 40;

    pub fn from_score(score: RiskScore) -> Self {
        match score {
            s if s >= Self::HIGH_THRESHOLD => RiskLevel::High,
            s if s >= Self::MEDIUM_THRESHOLD => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }
}

/// Review state of an order. `Pending` is the only state that may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumDisplay)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Approved,
    Blocked,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }

    pub fn transition_to(self, target: OrderStatus) -> Result<OrderStatus, ShieldError> {
        match (self, target) {
            (OrderStatus::Pending, OrderStatus::Approved | OrderStatus::Blocked) => Ok(target),
            (from, to) => Err(ShieldError::InvalidStatusTransition { from, to }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries() {
        assert_eq!(RiskLevel::from_score(100), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(70), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(69), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(40), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(39), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
    }

    #[test]
    fn pending_moves_to_either_terminal_state() {
        assert_eq!(
            OrderStatus::Pending.transition_to(OrderStatus::Approved).unwrap(),
            OrderStatus::Approved
        );
        assert_eq!(
            OrderStatus::Pending.transition_to(OrderStatus::Blocked).unwrap(),
            OrderStatus::Blocked
        );
    }

    #[test]
    fn terminal_states_never_change() {
        for from in [OrderStatus::Approved, OrderStatus::Blocked] {
            assert!(from.is_terminal());
            for to in [OrderStatus::Pending, OrderStatus::Approved, OrderStatus::Blocked] {
                assert!(matches!(
                    from.transition_to(to),
                    Err(ShieldError::InvalidStatusTransition { .. })
                ));
            }
        }
        assert!(OrderStatus::Pending.transition_to(OrderStatus::Pending).is_err());
    }

    #[test]
    fn enums_use_lowercase_names() {
        assert_eq!(RiskLevel::Medium.to_string(), "medium");
        assert_eq!(serde_json::to_string(&OrderStatus::Blocked).unwrap(), "\"blocked\"");
        let level: RiskLevel = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(level, RiskLevel::High);
    }
}
