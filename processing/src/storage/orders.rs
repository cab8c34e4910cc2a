use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

use super::{KeyValueStore, ORDERS_KEY, load_or_default, persist};
use crate::{
    error::ShieldError,
    model::{OrderRecord, OrderStatus},
};

/// The persisted order collection, newest first.
#[derive(Clone)]
pub struct OrderStorage {
    store: Arc<dyn KeyValueStore>,
}

impl OrderStorage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn get_all(&self) -> Vec<OrderRecord> {
        load_or_default(self.store.as_ref(), ORDERS_KEY, Vec::new)
    }

    pub fn get(&self, id: &str) -> Option<OrderRecord> {
        self.get_all().into_iter().find(|o| o.id == id)
    }

    pub fn save(&self, orders: &[OrderRecord]) -> Result<(), ShieldError> {
        persist(self.store.as_ref(), ORDERS_KEY, orders)?;
        Ok(())
    }

    pub fn add(&self, record: OrderRecord) -> Result<OrderRecord, ShieldError> {
        let mut orders = self.get_all();
        orders.insert(0, record.clone());
        self.save(&orders)?;
        Ok(record)
    }

    pub fn approve(&self, id: &str, at: DateTime<Utc>) -> Result<Option<OrderRecord>, ShieldError> {
        self.update_status(id, OrderStatus::Approved, at)
    }

    pub fn block(&self, id: &str, at: DateTime<Utc>) -> Result<Option<OrderRecord>, ShieldError> {
        self.update_status(id, OrderStatus::Blocked, at)
    }

    /// Moves a pending order to `status`, stamping the review time.
    ///
    /// `Ok(None)` when no order has this id.
    pub fn update_status(
        &self,
        id: &str,
        status: OrderStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<OrderRecord>, ShieldError> {
        let mut orders = self.get_all();
        let Some(order) = orders.iter_mut().find(|o| o.id == id) else {
            return Ok(None);
        };

        order.status = order.status.transition_to(status)?;
        order.reviewed_at = Some(at);
        let updated = order.clone();

        self.save(&orders)?;
        info!(order_id = %id, status = %status, "Order reviewed");
        Ok(Some(updated))
    }
}
