use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

use crate::dates::parse_key;
use crate::settings::Settings;

/// Word counters for one calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCounters {
    #[serde(default)]
    pub typed: u64,
    #[serde(default)]
    pub pasted: u64,
}

impl DayCounters {
    // Lenient read of one stored day: missing or non-integer counters are 0
    fn from_value(value: &Map<String, Value>) -> Self {
        let counter = |name: &str| value.get(name).and_then(Value::as_u64).unwrap_or(0);
        DayCounters {
            typed: counter("typed"),
            pasted: counter("pasted"),
        }
    }
}

/// Day key -> counters.
///
/// Buckets are created lazily on the first edit of a day and only ever
/// grow. A BTreeMap keeps canonical keys in date order for free.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatsStore {
    days: BTreeMap<String, DayCounters>,
}

impl StatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds to a day's counters, creating the bucket if needed.
    pub fn increment(&mut self, day_key: &str, typed: u64, pasted: u64) {
        // entry() looks up the key once and hands back a mutable slot
        let day = self.days.entry(day_key.to_string()).or_default();
        day.typed = day.typed.saturating_add(typed);
        day.pasted = day.pasted.saturating_add(pasted);
    }

    /// Counters for a day; an unseen day reads as all zeros.
    pub fn get(&self, day_key: &str) -> DayCounters {
        self.days.get(day_key).copied().unwrap_or_default()
    }

    pub fn contains(&self, day_key: &str) -> bool {
        self.days.contains_key(day_key)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Days in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DayCounters)> {
        self.days.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Reads the stored `days` object.
    ///
    /// Entries whose key is not a real `YYYY-MM-DD` date, or whose value is
    /// not an object, are dropped. A non-object `days` gives an empty store.
    pub fn from_value(value: &Value) -> Self {
        let mut store = StatsStore::new();
        let Some(days) = value.as_object() else {
            if !value.is_null() {
                log::warn!("stored days are not an object, starting empty");
            }
            return store;
        };

        for (key, entry) in days {
            if parse_key(key).is_none() {
                log::warn!("dropping stats for malformed day key '{}'", key);
                continue;
            }
            match entry.as_object() {
                Some(obj) => {
                    store.days.insert(key.clone(), DayCounters::from_value(obj));
                }
                None => log::warn!("dropping stats for {}: not an object", key),
            }
        }

        store
    }
}

/// The single persisted blob: `{ days: {...}, settings: {...} }`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub days: StatsStore,
    pub settings: Settings,
}

impl Record {
    /// Merges a loaded blob over the defaults. Never fails; anything
    /// unreadable is replaced by its default.
    pub fn from_value(value: &Value) -> Self {
        let field = |name: &str| value.get(name).unwrap_or(&Value::Null);
        Record {
            days: StatsStore::from_value(field("days")),
            settings: Settings::from_value(field("settings")),
        }
    }

    pub fn to_value(&self) -> Value {
        json!({
            "days": self.days,
            "settings": self.settings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_creates_and_adds() {
        let mut store = StatsStore::new();
        assert!(!store.contains("2024-03-07"));
        store.increment("2024-03-07", 3, 0);
        store.increment("2024-03-07", 0, 2);
        assert_eq!(store.get("2024-03-07"), DayCounters { typed: 3, pasted: 2 });
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn increment_order_does_not_matter() {
        let mut a = StatsStore::new();
        a.increment("2024-03-07", 3, 0);
        a.increment("2024-03-07", 0, 2);

        let mut b = StatsStore::new();
        b.increment("2024-03-07", 0, 2);
        b.increment("2024-03-07", 3, 0);

        let mut c = StatsStore::new();
        c.increment("2024-03-07", 3, 2);

        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn missing_day_reads_as_zero() {
        let store = StatsStore::new();
        assert_eq!(store.get("2024-01-01"), DayCounters::default());
        assert!(store.is_empty());
    }

    #[test]
    fn iter_is_chronological() {
        let mut store = StatsStore::new();
        store.increment("2024-03-10", 1, 0);
        store.increment("2023-12-31", 1, 0);
        store.increment("2024-01-05", 1, 0);
        let keys: Vec<&str> = store.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["2023-12-31", "2024-01-05", "2024-03-10"]);
    }

    #[test]
    fn record_round_trips() {
        let mut record = Record::default();
        record.days.increment("2024-03-07", 120, 30);
        record.days.increment("2024-03-08", 5, 0);
        record.settings.daily_goal = 800;
        record.settings.count_pastes = false;
        record.settings.exclude_folders = "Archive, Templates".to_string();

        let text = serde_json::to_string(&record.to_value()).unwrap();
        let reloaded = Record::from_value(&serde_json::from_str(&text).unwrap());
        assert_eq!(reloaded, record);
    }

    #[test]
    fn malformed_blob_merges_over_defaults() {
        let value = json!({
            "days": {
                "2024-03-07": { "typed": 10 },
                "2024-03-08": { "typed": -4, "pasted": "x" },
                "yesterday": { "typed": 99, "pasted": 0 },
                "2024-02-30": { "typed": 1, "pasted": 1 },
                "2024-03-09": 12
            },
            "settings": "broken"
        });
        let record = Record::from_value(&value);
        assert_eq!(record.days.len(), 2);
        assert_eq!(record.days.get("2024-03-07"), DayCounters { typed: 10, pasted: 0 });
        assert_eq!(record.days.get("2024-03-08"), DayCounters::default());
        assert_eq!(record.settings, Settings::default());
    }

    #[test]
    fn non_object_days_and_empty_blob_give_defaults() {
        assert_eq!(Record::from_value(&json!({ "days": [1, 2] })), Record::default());
        assert_eq!(Record::from_value(&json!({})), Record::default());
        assert_eq!(Record::from_value(&Value::Null), Record::default());
    }
}
