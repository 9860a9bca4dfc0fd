//! Chair capacity rules: one chair on weekdays, two on weekends.

use chrono::{Datelike, NaiveDate, Weekday};

pub const WEEKDAY_CAPACITY: u8 = 1;
pub const WEEKEND_CAPACITY: u8 = 2;

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Number of distinct chairs that may be reserved on `date`.
pub fn capacity(date: NaiveDate) -> u8 {
    if is_weekend(date) {
        WEEKEND_CAPACITY
    } else {
        WEEKDAY_CAPACITY
    }
}

/// Chair ids offered on `date`, ascending.
pub fn chairs_for(date: NaiveDate) -> impl Iterator<Item = u8> {
    1..=capacity(date)
}

pub fn is_valid_chair(date: NaiveDate, chair_id: u8) -> bool {
    (1..=capacity(date)).contains(&chair_id)
}

/// First chair on `date` that is not in `reserved`, or `None` when the day is full.
pub fn suggest_chair(date: NaiveDate, reserved: &[u8]) -> Option<u8> {
    chairs_for(date).find(|id| !reserved.contains(id))
}
