//! Eligibility resolution
//!
//! Decides which habits are due on a calendar day. Pure functions over a
//! catalog snapshot; storage is never consulted here.

use crate::calendar::weekday_of;
use crate::database::Habit;
use chrono::NaiveDate;

/// A habit is due on `day` when it already existed that day (inclusive)
/// and recurs on that day's weekday.
pub fn is_eligible(habit: &Habit, day: NaiveDate) -> bool {
    habit.created_at <= day && habit.week_days.contains(weekday_of(day))
}

/// Habits from `catalog` that are due on `day`, in catalog order
pub fn resolve(catalog: &[Habit], day: NaiveDate) -> Vec<&Habit> {
    catalog
        .iter()
        .filter(|habit| is_eligible(habit, day))
        .collect()
}

/// Number of habits from `catalog` due on `day`
pub fn count_eligible(catalog: &[Habit], day: NaiveDate) -> usize {
    catalog.iter().filter(|habit| is_eligible(habit, day)).count()
}
