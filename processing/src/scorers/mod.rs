pub mod classifier;
pub mod heuristic;
pub mod rule_based;

pub use classifier::*;
pub use heuristic::*;
pub use rule_based::*;

use crate::{
    model::{Order, ScoredOrder},
    rules::RuleSet,
};

/// Turns a validated order into a scored one.
///
/// `hour` is the local hour of day (0-23) at scoring time, supplied by the caller
/// so that scoring stays a pure function of its inputs.
pub trait Scorer: Send + Sync {
    fn score(&self, order: Order, rules: &RuleSet, hour: u32) -> ScoredOrder;
}
