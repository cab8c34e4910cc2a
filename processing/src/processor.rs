use metrics::{counter, histogram};
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    analytics,
    clock::{Clock, IdGenerator},
    error::ShieldError,
    model::{AnalyticsSnapshot, OrderRecord, OrderRequest, OrderStatus, Rule},
    rules::RuleSet,
    scorers::Scorer,
    storage::{KeyValueStore, OrderStorage, RuleStorage},
};

/// Scores incoming orders, records reviews and serves rule and analytics reads.
///
/// Every method runs one read-modify-write cycle against the store; callers
/// sharing an instance between clients must serialize calls.
pub struct FraudShield<S: Scorer> {
    scorer: S,
    orders: OrderStorage,
    rules: RuleStorage,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl<S: Scorer> FraudShield<S> {
    pub fn new(
        scorer: S,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        info!("Initializing FraudShield");
        Self {
            scorer,
            orders: OrderStorage::new(store.clone()),
            rules: RuleStorage::new(store),
            clock,
            ids,
        }
    }

    /// Validates, scores and stores a new order as pending.
    pub fn submit_order(&self, request: OrderRequest) -> Result<OrderRecord, ShieldError> {
        let order = request.validate()?;
        let rules = self.rules.get_all();
        let hour = self.clock.hour();

        debug!(amount = order.amount, hour, rules = rules.len(), "Scoring order");
        let scored = self.scorer.score(order, &rules, hour);

        let record = OrderRecord {
            id: self.ids.next_id(),
            status: OrderStatus::Pending,
            created_at: self.clock.now(),
            reviewed_at: None,
            scored,
        };
        let record = self.orders.add(record)?;

        counter!("shield_orders_scored_total", "risk_level" => record.risk_level().to_string())
            .increment(1);
        histogram!("shield_risk_score").record(f64::from(record.risk_score()));
        info!(
            order_id = %record.id,
            risk_score = record.risk_score(),
            risk_level = %record.risk_level(),
            triggered = ?record.scored.triggered_rules,
            "Order scored"
        );

        Ok(record)
    }

    pub fn orders(&self) -> Vec<OrderRecord> {
        self.orders.get_all()
    }

    pub fn approve_order(&self, id: &str) -> Result<Option<OrderRecord>, ShieldError> {
        self.review(id, OrderStatus::Approved)
    }

    pub fn block_order(&self, id: &str) -> Result<Option<OrderRecord>, ShieldError> {
        self.review(id, OrderStatus::Blocked)
    }

    fn review(&self, id: &str, status: OrderStatus) -> Result<Option<OrderRecord>, ShieldError> {
        let reviewed = self.orders.update_status(id, status, self.clock.now())?;
        if reviewed.is_some() {
            counter!("shield_orders_reviewed_total", "status" => status.to_string()).increment(1);
        }
        Ok(reviewed)
    }

    pub fn rules(&self) -> RuleSet {
        self.rules.get_all()
    }

    pub fn toggle_rule(&self, id: &str) -> Result<Option<Rule>, ShieldError> {
        self.rules.toggle(id)
    }

    pub fn update_rule_weight(&self, id: &str, weight: u32) -> Result<Option<Rule>, ShieldError> {
        self.rules.update_weight(id, weight)
    }

    pub fn add_rule(&self, rule: Rule) -> Result<Rule, ShieldError> {
        self.rules.add(rule)
    }

    pub fn analytics(&self) -> AnalyticsSnapshot {
        analytics::summarize(&self.orders.get_all())
    }
}
