// Storage collaborators: the raw key-value store and the typed collections on top of it
pub mod kv;
pub mod orders;
pub mod rules;

pub use kv::*;
pub use orders::*;
pub use rules::*;

/// Key of the persisted order collection.
pub const ORDERS_KEY: &str = "shield_orders";
/// Key of the persisted rule collection.
pub const RULES_KEY: &str = "shield_rules";
