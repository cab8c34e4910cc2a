use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{OrderStatus, RiskLevel, RiskScore, RuleId};
use crate::error::ShieldError;

/// Keys owned by the stored record. Client attributes with these names are dropped.
pub const RESERVED_ATTRIBUTES: [&str; 7] = [
    "id",
    "status",
    "createdAt",
    "reviewedAt",
    "riskScore",
    "riskLevel",
    "triggeredRules",
];

/// An order as submitted by a client, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub is_new_customer: Option<bool>,
    #[serde(default)]
    pub billing_mismatch: Option<bool>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl OrderRequest {
    /// Checks the request carries a usable amount and turns it into a scoreable [`Order`].
    pub fn validate(self) -> Result<Order, ShieldError> {
        let amount = self
            .amount
            .ok_or_else(|| ShieldError::MalformedOrder("order has no amount".to_string()))?;
        if !amount.is_finite() || amount < 0.0 {
            return Err(ShieldError::MalformedOrder(format!(
                "amount must be a non-negative number, got {amount}"
            )));
        }

        let mut attributes = self.attributes;
        for key in RESERVED_ATTRIBUTES {
            if attributes.remove(key).is_some() {
                tracing::debug!(key, "Dropping reserved attribute from order request");
            }
        }

        Ok(Order {
            amount,
            email: self.email,
            country: self.country,
            is_new_customer: self.is_new_customer,
            billing_mismatch: self.billing_mismatch,
            attributes,
        })
    }
}

/// A validated order. Unknown attributes are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default)]
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_new_customer: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_mismatch: Option<bool>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Order {
    pub fn new(amount: f64) -> Self {
        Self {
            amount,
            ..Default::default()
        }
    }

    pub fn is_new_customer(&self) -> bool {
        self.is_new_customer.unwrap_or(false)
    }

    pub fn has_billing_mismatch(&self) -> bool {
        self.billing_mismatch.unwrap_or(false)
    }
}

/// An order together with the outcome of risk classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredOrder {
    #[serde(flatten)]
    pub order: Order,
    pub risk_score: RiskScore,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub triggered_rules: Vec<RuleId>,
}

/// A scored order as persisted in the order collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: String,
    #[serde(default)]
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub scored: ScoredOrder,
}

impl OrderRecord {
    pub fn amount(&self) -> f64 {
        self.scored.order.amount
    }

    pub fn risk_score(&self) -> RiskScore {
        self.scored.risk_score
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.scored.risk_level
    }
}
