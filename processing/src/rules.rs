//! The ordered, id-indexed collection of scoring rules.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use crate::{
    error::ShieldError,
    model::{Rule, RuleId},
};

pub const NEW_CUSTOMER: &str = "new_customer";
pub const HIGH_AMOUNT: &str = "high_amount";
pub const EMAIL_MISMATCH: &str = "email_mismatch";
pub const HIGH_RISK_COUNTRY: &str = "high_risk_country";
pub const VELOCITY: &str = "velocity";
pub const PAYMENT_MISMATCH: &str = "payment_mismatch";
pub const PROXY_VPN: &str = "proxy_vpn";

pub const DEFAULT_HIGH_AMOUNT_THRESHOLD: f64 = 500.0;

/// Rules in insertion order plus an id index for constant-time lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    rules: Vec<Rule>,
    index: HashMap<RuleId, usize>,
}

impl RuleSet {
    /// Builds a rule set, keeping the first occurrence of any repeated id.
    pub fn new(rules: Vec<Rule>) -> Self {
        let mut set = Self {
            rules: Vec::with_capacity(rules.len()),
            index: HashMap::with_capacity(rules.len()),
        };
        for rule in rules {
            if set.index.contains_key(&rule.id) {
                warn!(rule_id = %rule.id, "Ignoring duplicate rule id");
                continue;
            }
            set.push(rule);
        }
        set
    }

    /// The built-in rule configuration.
    pub fn defaults() -> Self {
        Self::new(vec![
            Rule::new(NEW_CUSTOMER, "New Customer", "First-time buyer", 15),
            Rule::new(HIGH_AMOUNT, "High Order Value", "Order over $500", 20)
                .with_threshold(DEFAULT_HIGH_AMOUNT_THRESHOLD),
            Rule::new(EMAIL_MISMATCH, "Suspicious Email", "Disposable or suspicious email", 25),
            Rule::new(HIGH_RISK_COUNTRY, "High-Risk Country", "Order from flagged region", 30),
            Rule::new(VELOCITY, "Order Velocity", "Multiple orders in short time", 25),
            Rule::new(PAYMENT_MISMATCH, "Payment Mismatch", "Billing/shipping mismatch", 20),
            Rule::new(PROXY_VPN, "Proxy/VPN Detected", "Connection via proxy or VPN", 35),
        ])
    }

    pub fn all(&self) -> &[Rule] {
        &self.rules
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.index.get(id).map(|&i| &self.rules[i])
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Rule> {
        let i = *self.index.get(id)?;
        Some(&mut self.rules[i])
    }

    /// Flips the enabled flag. `None` when no rule has this id.
    pub fn toggle(&mut self, id: &str) -> Option<&Rule> {
        let rule = self.get_mut(id)?;
        rule.enabled = !rule.enabled;
        Some(&*rule)
    }

    /// Replaces the weight. `None` when no rule has this id.
    pub fn update_weight(&mut self, id: &str, weight: u32) -> Option<&Rule> {
        let rule = self.get_mut(id)?;
        rule.weight = weight;
        Some(&*rule)
    }

    pub fn add(&mut self, rule: Rule) -> Result<&Rule, ShieldError> {
        if self.index.contains_key(&rule.id) {
            return Err(ShieldError::DuplicateRule(rule.id));
        }
        let i = self.push(rule);
        Ok(&self.rules[i])
    }

    fn push(&mut self, rule: Rule) -> usize {
        let i = self.rules.len();
        self.index.insert(rule.id.clone(), i);
        self.rules.push(rule);
        i
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Serialize for RuleSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.rules.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RuleSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Rule>::deserialize(deserializer).map(RuleSet::new)
    }
}
