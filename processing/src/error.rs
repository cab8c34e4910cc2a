use crate::model::OrderStatus;

/// Failures of the key-value store collaborator.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

#[derive(Debug, thiserror::Error)]
pub enum ShieldError {
    /// The order cannot be scored, e.g. it carries no `amount`.
    #[error("malformed order: {0}")]
    MalformedOrder(String),

    #[error("order cannot move from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    #[error("rule {0} already exists")]
    DuplicateRule(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
