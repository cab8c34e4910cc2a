use crate::{
    model::{MAX_RISK_SCORE, Order, RiskLevel, ScoredOrder},
    rules::RuleSet,
    scorers::{HeuristicAdjuster, RuleEvaluator, Scorer},
};

/// Combines rule weights and heuristic adjustments into a capped score and tier.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskClassifier {
    evaluator: RuleEvaluator,
    adjuster: HeuristicAdjuster,
}

impl RiskClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classify(&self, order: Order, rules: &RuleSet, hour: u32) -> ScoredOrder {
        let evaluation = self.evaluator.evaluate(&order, rules);
        let adjusted = self.adjuster.adjust(&order, evaluation.total_weight, hour);
        let risk_score = adjusted.min(MAX_RISK_SCORE);

        ScoredOrder {
            order,
            risk_score,
            risk_level: RiskLevel::from_score(risk_score),
            triggered_rules: evaluation.triggered,
        }
    }
}

impl Scorer for RiskClassifier {
    fn score(&self, order: Order, rules: &RuleSet, hour: u32) -> ScoredOrder {
        self.classify(order, rules, hour)
    }
}
