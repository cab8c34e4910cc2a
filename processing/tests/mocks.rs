#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use mockall::mock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use processing::{
    clock::{Clock, IdGenerator},
    error::StoreError,
    processor::FraudShield,
    scorers::RiskClassifier,
    storage::{InMemoryStore, KeyValueStore},
};

mock! {
    pub Store {}
    impl KeyValueStore for Store {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
        fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
    }
}

mock! {
    pub Clock {}
    impl Clock for Clock {
        fn now(&self) -> DateTime<Utc>;
        fn hour(&self) -> u32;
    }
}

mock! {
    pub Ids {}
    impl IdGenerator for Ids {
        fn next_id(&self) -> String;
    }
}

pub fn test_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 3, 0, 0).unwrap()
}

/// A clock stuck at `test_time()` that reports `hour`.
pub fn clock_at(hour: u32) -> MockClock {
    let mut clock = MockClock::new();
    clock.expect_now().returning(test_time);
    clock.expect_hour().return_const(hour);
    clock
}

/// Ids `ORD-1`, `ORD-2`, ...
pub fn sequential_ids() -> MockIds {
    let counter = AtomicU32::new(0);
    let mut ids = MockIds::new();
    ids.expect_next_id()
        .returning(move || format!("ORD-{}", counter.fetch_add(1, Ordering::SeqCst) + 1));
    ids
}

pub fn shield_with_store(store: Arc<dyn KeyValueStore>, hour: u32) -> FraudShield<RiskClassifier> {
    FraudShield::new(
        RiskClassifier::new(),
        store,
        Arc::new(clock_at(hour)),
        Arc::new(sequential_ids()),
    )
}

pub fn in_memory_shield(hour: u32) -> FraudShield<RiskClassifier> {
    shield_with_store(Arc::new(InMemoryStore::new()), hour)
}
