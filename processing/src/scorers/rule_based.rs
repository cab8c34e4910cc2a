use tracing::debug;

use crate::{
    model::{Order, Rule, RuleId},
    rules::{
        DEFAULT_HIGH_AMOUNT_THRESHOLD, EMAIL_MISMATCH, HIGH_AMOUNT, HIGH_RISK_COUNTRY,
        NEW_CUSTOMER, PAYMENT_MISMATCH, RuleSet,
    },
};

/// Substrings that mark an email address as disposable. Matched case-insensitively.
pub const DISPOSABLE_EMAIL_MARKERS: [&str; 5] = ["tempmail", "throwaway", "fake", "temp", "10minute"];

/// Countries flagged as high risk. Matched exactly.
pub const HIGH_RISK_COUNTRIES: [&str; 4] = ["Nigeria", "Ghana", "Indonesia", "Vietnam"];

/// Sum of the weights of every rule that fired, and which rules those were.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleEvaluation {
    pub total_weight: u32,
    pub triggered: Vec<RuleId>,
}

/// The conditions that have an implementation. Any other rule id is inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleCondition {
    NewCustomer,
    HighAmount,
    DisposableEmail,
    HighRiskCountry,
    PaymentMismatch,
}

impl RuleCondition {
    fn for_rule(id: &str) -> Option<Self> {
        match id {
            NEW_CUSTOMER => Some(Self::NewCustomer),
            HIGH_AMOUNT => Some(Self::HighAmount),
            EMAIL_MISMATCH => Some(Self::DisposableEmail),
            HIGH_RISK_COUNTRY => Some(Self::HighRiskCountry),
            PAYMENT_MISMATCH => Some(Self::PaymentMismatch),
            _ => None,
        }
    }

    fn holds(self, rule: &Rule, order: &Order) -> bool {
        match self {
            Self::NewCustomer => order.is_new_customer(),
            Self::HighAmount => {
                // an unset or zero threshold falls back to the default
                let threshold = rule
                    .threshold
                    .filter(|t| *t != 0.0)
                    .unwrap_or(DEFAULT_HIGH_AMOUNT_THRESHOLD);
                order.amount >= threshold
            }
            Self::DisposableEmail => order.email.as_deref().is_some_and(is_disposable_email),
            Self::HighRiskCountry => order
                .country
                .as_deref()
                .is_some_and(|c| HIGH_RISK_COUNTRIES.contains(&c)),
            Self::PaymentMismatch => order.has_billing_mismatch(),
        }
    }
}

fn is_disposable_email(email: &str) -> bool {
    let email = email.to_lowercase();
    DISPOSABLE_EMAIL_MARKERS.iter().any(|marker| email.contains(marker))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEvaluator;

impl RuleEvaluator {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(&self, order: &Order, rules: &RuleSet) -> RuleEvaluation {
        let mut evaluation = RuleEvaluation::default();

        for rule in rules.iter().filter(|r| r.enabled) {
            let Some(condition) = RuleCondition::for_rule(&rule.id) else {
                continue;
            };
            if condition.holds(rule, order) {
                debug!(rule_id = %rule.id, weight = rule.weight, "Rule triggered");
                evaluation.total_weight = evaluation.total_weight.saturating_add(rule.weight);
                evaluation.triggered.push(rule.id.clone());
            }
        }

        evaluation
    }
}
