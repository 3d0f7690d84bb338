use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use serde_json::{Map, Value};

/// Hands out `sl_no` values for bulk-imported records.
pub trait SerialSource: Send + Sync {
    /// `position` is the record's index within the current batch.
    fn next_serial(&self, position: usize) -> i64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialStrategy {
    Monotonic,
    Jittered,
}

impl SerialStrategy {
    pub fn build(self) -> Arc<dyn SerialSource> {
        match self {
            SerialStrategy::Monotonic => Arc::new(MonotonicSerials::from_clock()),
            SerialStrategy::Jittered => Arc::new(JitteredSerials),
        }
    }
}

impl FromStr for SerialStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monotonic" => Ok(SerialStrategy::Monotonic),
            "jittered" => Ok(SerialStrategy::Jittered),
            other => anyhow::bail!("unknown serial strategy `{}`", other),
        }
    }
}

/// Process-wide counter seeded from the Unix clock (seconds). Never repeats a
/// value for the life of the process.
#[derive(Debug)]
pub struct MonotonicSerials {
    next: AtomicI64,
}

impl MonotonicSerials {
    pub fn starting_at(first: i64) -> Self {
        Self {
            next: AtomicI64::new(first),
        }
    }

    pub fn from_clock() -> Self {
        Self::starting_at(Utc::now().timestamp())
    }
}

impl SerialSource for MonotonicSerials {
    fn next_serial(&self, _position: usize) -> i64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

/// `unix_seconds + position + random(1..=100)`. Best-effort: two imports in
/// the same second can collide.
#[derive(Debug, Default)]
pub struct JitteredSerials;

impl SerialSource for JitteredSerials {
    fn next_serial(&self, position: usize) -> i64 {
        let jitter: i64 = rand::thread_rng().gen_range(1..=100);
        Utc::now().timestamp() + position as i64 + jitter
    }
}

const MAX_DRAWS: usize = 8;

/// Overwrite `sl_no` in a raw record with a fresh serial that differs from
/// whatever the record carried. Returns the written value.
pub fn assign_serial(
    record: &mut Map<String, Value>,
    position: usize,
    source: &dyn SerialSource,
) -> i64 {
    let original = record.get("sl_no").and_then(Value::as_i64);

    let mut serial = source.next_serial(position);
    for _ in 1..MAX_DRAWS {
        if Some(serial) != original {
            break;
        }
        serial = source.next_serial(position);
    }
    if Some(serial) == original {
        serial = serial.wrapping_add(1);
    }

    record.insert("sl_no".to_string(), Value::from(serial));
    serial
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    struct Fixed(i64);

    impl SerialSource for Fixed {
        fn next_serial(&self, _position: usize) -> i64 {
            self.0
        }
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn monotonic_counts_up() {
        let serials = MonotonicSerials::starting_at(500);
        assert_eq!(serials.next_serial(0), 500);
        assert_eq!(serials.next_serial(0), 501);
        assert_eq!(serials.next_serial(9), 502);
    }

    #[test]
    fn monotonic_unique_across_threads() {
        let serials = Arc::new(MonotonicSerials::starting_at(0));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let serials = Arc::clone(&serials);
                std::thread::spawn(move || (0..1_000).map(|i| serials.next_serial(i)).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for serial in handle.join().unwrap() {
                assert!(seen.insert(serial), "serial {} handed out twice", serial);
            }
        }
        assert_eq!(seen.len(), 8_000);
    }

    #[test]
    fn jittered_within_window() {
        let before = Utc::now().timestamp();
        let serial = JitteredSerials.next_serial(10);
        let after = Utc::now().timestamp();
        assert!(serial >= before + 10 + 1);
        assert!(serial <= after + 10 + 100);
    }

    #[test]
    fn assign_overwrites_source_value() {
        let mut record = object(json!({ "sl_no": 1, "product_name": "Tee" }));
        let serial = assign_serial(&mut record, 0, &MonotonicSerials::starting_at(40));
        assert_eq!(serial, 40);
        assert_eq!(record["sl_no"], 40);
    }

    #[test]
    fn assign_inserts_when_absent() {
        let mut record = object(json!({ "product_name": "Tee" }));
        let serial = assign_serial(&mut record, 3, &MonotonicSerials::starting_at(7));
        assert_eq!(record["sl_no"], serial);
    }

    #[test]
    fn assign_redraws_on_collision_with_original() {
        let mut record = object(json!({ "sl_no": 40 }));
        let serial = assign_serial(&mut record, 0, &MonotonicSerials::starting_at(40));
        assert_eq!(serial, 41);
    }

    #[test]
    fn assign_never_keeps_original_even_from_stuck_source() {
        let mut record = object(json!({ "sl_no": 5 }));
        let serial = assign_serial(&mut record, 0, &Fixed(5));
        assert_ne!(serial, 5);
        assert_eq!(record["sl_no"], serial);
    }

    #[test]
    fn strategy_parsing() {
        assert_eq!("monotonic".parse::<SerialStrategy>().unwrap(), SerialStrategy::Monotonic);
        assert_eq!(" JITTERED ".parse::<SerialStrategy>().unwrap(), SerialStrategy::Jittered);
        assert!("random".parse::<SerialStrategy>().is_err());
    }
}
