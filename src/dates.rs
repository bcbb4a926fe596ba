use chrono::{Datelike, Days, Local, NaiveDate};
use std::cell::Cell;
use std::time::{Duration, Instant};

// Canonical day key format, zero-padded: 2024-03-07
pub const KEY_FORMAT: &str = "%Y-%m-%d";

/// Source of "now" for everything that depends on the wall clock.
///
/// `today` drives the day keys; `instant` drives the debounce timers.
/// Both are injected so tests can move time by hand.
pub trait Clock {
    fn today(&self) -> NaiveDate;
    fn instant(&self) -> Instant;
}

/// The real clock: local timezone date and the monotonic clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn instant(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    // Cell gives interior mutability so `&self` methods can advance time
    today: Cell<NaiveDate>,
    instant: Cell<Instant>,
}

impl ManualClock {
    pub fn new(today: NaiveDate) -> Self {
        ManualClock {
            today: Cell::new(today),
            instant: Cell::new(Instant::now()),
        }
    }

    pub fn set_today(&self, today: NaiveDate) {
        self.today.set(today);
    }

    pub fn advance(&self, by: Duration) {
        self.instant.set(self.instant.get() + by);
    }
}

impl Clock for ManualClock {
    fn today(&self) -> NaiveDate {
        self.today.get()
    }

    fn instant(&self) -> Instant {
        self.instant.get()
    }
}

// References to a clock are clocks too, so a test can keep its ManualClock
// and hand the tracker a borrow of it.
impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }

    fn instant(&self) -> Instant {
        (**self).instant()
    }
}

pub fn date_key(date: NaiveDate) -> String {
    date.format(KEY_FORMAT).to_string()
}

/// Parses a canonical day key. Unpadded forms like "2024-3-7" are refused
/// so every stored key has exactly one spelling.
pub fn parse_key(key: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(key, KEY_FORMAT).ok()?;
    (date_key(date) == key).then_some(date)
}

pub fn today_key(clock: &impl Clock) -> String {
    date_key(clock.today())
}

/// Key for the calendar day `days_ago` days before today.
///
/// The subtraction happens on a plain calendar date, so month and year
/// rollovers are handled by chrono and DST never shifts the result.
pub fn date_key_offset(clock: &impl Clock, days_ago: u64) -> String {
    let today = clock.today();
    let date = today
        .checked_sub_days(Days::new(days_ago))
        .unwrap_or(NaiveDate::MIN);
    date_key(date)
}

/// Chart label for a day key, `month/day` without padding ("3/7").
/// Keys that don't parse are returned unchanged.
pub fn short_label(key: &str) -> String {
    match parse_key(key) {
        Some(date) => format!("{}/{}", date.month(), date.day()),
        None => key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(y: i32, m: u32, d: u32) -> ManualClock {
        ManualClock::new(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn today_key_is_zero_padded() {
        assert_eq!(today_key(&clock(2024, 3, 7)), "2024-03-07");
    }

    #[test]
    fn offset_rolls_over_month_and_year() {
        let c = clock(2024, 1, 1);
        assert_eq!(date_key_offset(&c, 0), "2024-01-01");
        assert_eq!(date_key_offset(&c, 1), "2023-12-31");
        assert_eq!(date_key_offset(&c, 31), "2023-12-01");
    }

    #[test]
    fn offset_handles_leap_day() {
        let c = clock(2024, 3, 1);
        assert_eq!(date_key_offset(&c, 1), "2024-02-29");
        let c = clock(2023, 3, 1);
        assert_eq!(date_key_offset(&c, 1), "2023-02-28");
    }

    #[test]
    fn short_label_drops_padding() {
        assert_eq!(short_label("2024-03-07"), "3/7");
        assert_eq!(short_label("2024-12-25"), "12/25");
        assert_eq!(short_label("garbage"), "garbage");
    }

    #[test]
    fn parse_key_rejects_impossible_dates() {
        assert!(parse_key("2024-02-30").is_none());
        assert!(parse_key("2024-13-01").is_none());
        assert!(parse_key("2024-3-7").is_none());
        assert_eq!(parse_key("2024-02-29"), NaiveDate::from_ymd_opt(2024, 2, 29));
    }

    #[test]
    fn manual_clock_moves_only_when_told() {
        let c = clock(2024, 5, 5);
        let start = c.instant();
        c.advance(Duration::from_millis(250));
        assert_eq!(c.instant() - start, Duration::from_millis(250));
        c.set_today(NaiveDate::from_ymd_opt(2024, 5, 6).unwrap());
        assert_eq!(today_key(&c), "2024-05-06");
    }
}
