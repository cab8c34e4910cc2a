//! Time and identity services injected into the order flow.

use chrono::{DateTime, Local, Timelike, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Local hour of day, 0-23.
    fn hour(&self) -> u32;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn hour(&self) -> u32 {
        Local::now().hour()
    }
}

/// A clock frozen at one instant, reporting a fixed hour.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub now: DateTime<Utc>,
    pub hour: u32,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>, hour: u32) -> Self {
        Self { now, hour }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn hour(&self) -> u32 {
        self.hour
    }
}

pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

pub const ORDER_ID_PREFIX: &str = "ORD-";

/// Issues `ORD-<base36 millis>` ids, bumping the timestamp so ids never repeat.
#[derive(Debug, Default)]
pub struct TimestampIdGenerator {
    last: AtomicU64,
}

impl TimestampIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_stamp(&self, now_ms: u64) -> u64 {
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now_ms.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now_ms.max(previous + 1)
    }
}

impl IdGenerator for TimestampIdGenerator {
    fn next_id(&self) -> String {
        let now_ms = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        format!("{}{}", ORDER_ID_PREFIX, to_base36(self.next_stamp(now_ms)))
    }
}

pub fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
