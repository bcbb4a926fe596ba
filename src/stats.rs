use crate::dates::{date_key_offset, short_label, today_key, Clock};
use crate::settings::Settings;
use crate::store::{DayCounters, StatsStore};

// How far back the streak walk looks
pub const STREAK_LOOKBACK_DAYS: u64 = 365;

/// One bar / point of a rolling window chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowPoint {
    pub key: String,
    pub label: String,
    pub value: u64,
}

/// Words that count toward the goal for one day.
pub fn counted_words(counters: DayCounters, settings: &Settings) -> u64 {
    let pasted = if settings.count_pastes { counters.pasted } else { 0 };
    counters.typed.saturating_add(pasted)
}

pub fn daily_total(store: &StatsStore, day_key: &str, settings: &Settings) -> u64 {
    counted_words(store.get(day_key), settings)
}

/// Percent of the goal reached, rounded and capped at 100.
/// `goal` is always positive because settings refuse a zero goal.
pub fn goal_percent(total: u64, goal: u64) -> u64 {
    let pct = (total as f64 / goal.max(1) as f64 * 100.0).round() as u64;
    pct.min(100)
}

/// The last `days` days ending today, oldest first.
pub fn rolling_window(
    store: &StatsStore,
    clock: &impl Clock,
    days: u64,
    settings: &Settings,
) -> Vec<WindowPoint> {
    // (0..days).rev() walks from `days-1` days ago down to today
    (0..days)
        .rev()
        .map(|days_ago| {
            let key = date_key_offset(clock, days_ago);
            WindowPoint {
                label: short_label(&key),
                value: daily_total(store, &key, settings),
                key,
            }
        })
        .collect()
}

// A day keeps the streak alive on any activity at all. With pastes
// counted, pasted words alone are enough.
fn has_activity(counters: DayCounters, settings: &Settings) -> bool {
    counters.typed > 0 || (settings.count_pastes && counters.pasted > 0)
}

/// Consecutive days with writing, counting back from today.
///
/// An empty today doesn't break the streak; the count then starts at
/// yesterday. Any other empty day ends it.
pub fn streak(store: &StatsStore, clock: &impl Clock, settings: &Settings) -> u64 {
    let mut streak = 0;
    for days_ago in 0..STREAK_LOOKBACK_DAYS {
        let key = date_key_offset(clock, days_ago);
        if has_activity(store.get(&key), settings) {
            streak += 1;
        } else if days_ago > 0 {
            break;
        }
    }
    streak
}

/// Today's headline numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub today: DayCounters,
    pub total: u64,
    pub goal: u64,
    pub percent: u64,
    pub streak: u64,
}

impl Summary {
    pub fn compute(store: &StatsStore, clock: &impl Clock, settings: &Settings) -> Self {
        let today = store.get(&today_key(clock));
        let total = counted_words(today, settings);
        Summary {
            today,
            total,
            goal: settings.daily_goal,
            percent: goal_percent(total, settings.daily_goal),
            streak: streak(store, clock, settings),
        }
    }

    /// The status line text, e.g. "312 words | 4 day streak".
    pub fn status_line(&self) -> String {
        format!("{} words | {} day streak", self.total, self.streak)
    }
}
