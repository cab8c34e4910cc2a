//! FraudShield scoring engine.
//!
//! Orders are scored by summing the weights of the enabled rules that fire,
//! adding fixed heuristic adjustments, capping at 100 and mapping the result
//! to a risk tier. Orders and rules persist through an injected key-value
//! store; analytics are recomputed from the stored orders on every read.

pub mod analytics;
pub mod clock;
pub mod error;
pub mod executable_utils;
pub mod format;
pub mod model;
pub mod processor;
pub mod rules;
pub mod scorers;
pub mod storage;
