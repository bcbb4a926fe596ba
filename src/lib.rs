//! Writing activity tracker.
//!
//! Turns a stream of editor change events into per-day typed/pasted word
//! counts, and derives daily totals, goal progress, streaks and rolling
//! chart windows from them.

pub mod classify;
pub mod config;
pub mod dates;
pub mod debounce;
pub mod error;
pub mod filter;
pub mod persist;
pub mod render;
pub mod settings;
pub mod stats;
pub mod store;
pub mod tracker;
pub mod words;

pub use classify::{classify, Change, ChangeKind, EditCounts, Transaction};
pub use config::Config;
pub use dates::{date_key_offset, short_label, today_key, Clock, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use filter::is_allowed;
pub use persist::{JsonFileStorage, MemoryStorage, Storage};
pub use render::Dashboard;
pub use settings::Settings;
pub use stats::{daily_total, goal_percent, rolling_window, streak, Summary, WindowPoint};
pub use store::{DayCounters, Record, StatsStore};
pub use tracker::{DebouncePeriods, Effect, Tracker};
pub use words::count_words;
