//! Database models
//!
//! Rust structs representing stored entities and the values derived from
//! them. Serialized field names are camelCase to match the HTTP contract.

use crate::config::{MAX_WEEK_DAY, MIN_WEEK_DAY};
use crate::error::{AppError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Set of weekday indices (0 = Sunday .. 6 = Saturday), stored as a bitmask.
///
/// Membership only: insertion order and duplicates are irrelevant.
/// Serializes as an ascending list of indices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct WeekDaySet(u8);

impl WeekDaySet {
    pub fn empty() -> Self {
        Self(0)
    }

    /// Build a set from client-supplied indices, rejecting anything outside 0..6
    pub fn from_indices<I>(indices: I) -> Result<Self>
    where
        I: IntoIterator<Item = i64>,
    {
        let mut set = Self::empty();

        for index in indices {
            let day = u8::try_from(index)
                .ok()
                .filter(|day| (MIN_WEEK_DAY..=MAX_WEEK_DAY).contains(day))
                .ok_or_else(|| {
                    AppError::validation(
                        "weekDays",
                        format!(
                            "weekday {} is outside {}..{}",
                            index, MIN_WEEK_DAY, MAX_WEEK_DAY
                        ),
                    )
                })?;
            set.0 |= 1 << day;
        }

        Ok(set)
    }

    pub fn contains(&self, day: u8) -> bool {
        day <= MAX_WEEK_DAY && self.0 & (1 << day) != 0
    }

    pub fn insert(&mut self, day: u8) {
        if day <= MAX_WEEK_DAY {
            self.0 |= 1 << day;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Member indices in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (MIN_WEEK_DAY..=MAX_WEEK_DAY).filter(move |day| self.contains(*day))
    }
}

impl TryFrom<Vec<u8>> for WeekDaySet {
    type Error = AppError;

    fn try_from(days: Vec<u8>) -> Result<Self> {
        Self::from_indices(days.into_iter().map(i64::from))
    }
}

impl From<WeekDaySet> for Vec<u8> {
    fn from(set: WeekDaySet) -> Self {
        set.iter().collect()
    }
}

/// A recurring habit with the weekdays it is due on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub title: String,
    /// Calendar day the habit was created; never eligible before it
    pub created_at: NaiveDate,
    pub week_days: WeekDaySet,
}

/// Row shape of the `habits` table, before weekdays are attached
#[derive(Debug, Clone, FromRow)]
pub struct HabitRow {
    pub id: String,
    pub title: String,
    pub created_at: NaiveDate,
}

impl HabitRow {
    pub fn into_habit(self, week_days: WeekDaySet) -> Habit {
        Habit {
            id: self.id,
            title: self.title,
            created_at: self.created_at,
            week_days,
        }
    }
}

/// Create habit request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHabitRequest {
    pub title: String,
    pub week_days: WeekDaySet,
    pub created_at: NaiveDate,
}

/// A calendar day that has had at least one toggle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Day {
    pub id: String,
    pub date: NaiveDate,
}

/// Composite key of one habit on one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompletionKey {
    pub date: NaiveDate,
    pub habit_id: String,
}

impl CompletionKey {
    pub fn new(date: NaiveDate, habit_id: impl Into<String>) -> Self {
        Self {
            date,
            habit_id: habit_id.into(),
        }
    }
}

/// Completion state of a (day, habit) pair.
///
/// `Completed` is backed by exactly one `day_habits` row; `Incomplete`
/// by none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionState {
    Incomplete,
    Completed,
}

impl CompletionState {
    pub fn toggled(self) -> Self {
        match self {
            CompletionState::Incomplete => CompletionState::Completed,
            CompletionState::Completed => CompletionState::Incomplete,
        }
    }

    pub fn is_completed(self) -> bool {
        self == CompletionState::Completed
    }
}

/// Completion count of one stored day, as read from the ledger
#[derive(Debug, Clone, FromRow)]
pub struct DayCompletionCount {
    pub id: String,
    pub date: NaiveDate,
    pub completed: i64,
}

/// Habits due on a day and the ones already done
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayDetail {
    pub possible_habits: Vec<Habit>,
    pub completed_habits: Vec<String>,
}

/// Per-day completion ratio shown in the summary view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryEntry {
    /// Id of the stored day
    pub id: String,
    pub date: NaiveDate,
    pub completed: i64,
    /// Habits eligible that day
    #[serde(rename = "amount", alias = "possible")]
    pub possible: i64,
    /// Rounded completion percentage, 0 when nothing was possible
    pub progress: u8,
}

impl SummaryEntry {
    pub fn new(id: String, date: NaiveDate, completed: i64, possible: i64) -> Self {
        Self {
            id,
            date,
            completed,
            possible,
            progress: progress_percentage(completed, possible),
        }
    }
}

/// `round(completed / possible * 100)`, clamped to 0..=100
pub fn progress_percentage(completed: i64, possible: i64) -> u8 {
    if possible <= 0 || completed <= 0 {
        return 0;
    }

    let percent = (completed as f64 / possible as f64 * 100.0).round();
    percent.min(100.0) as u8
}

/// One square of the year calendar; `summary` is absent on days without completions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub summary: Option<SummaryEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_day_set_is_a_set() {
        let set = WeekDaySet::from_indices([5, 1, 3, 1]).unwrap();

        assert_eq!(set.len(), 3);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![1, 3, 5]);
        assert!(set.contains(3));
        assert!(!set.contains(0));
    }

    #[test]
    fn test_week_day_set_rejects_out_of_range() {
        for bad in [7, -1, 255] {
            let err = WeekDaySet::from_indices([1, bad]).unwrap_err();
            assert_eq!(err.field(), Some("weekDays"));
        }
    }

    #[test]
    fn test_week_day_set_serializes_as_sorted_list() {
        let set = WeekDaySet::from_indices([6, 0]).unwrap();
        assert_eq!(serde_json::to_string(&set).unwrap(), "[0,6]");

        let parsed: WeekDaySet = serde_json::from_str("[3,3,2]").unwrap();
        assert_eq!(parsed.iter().collect::<Vec<_>>(), vec![2, 3]);

        assert!(serde_json::from_str::<WeekDaySet>("[9]").is_err());
    }

    #[test]
    fn test_completion_state_toggles() {
        let state = CompletionState::Incomplete;
        assert_eq!(state.toggled(), CompletionState::Completed);
        assert_eq!(state.toggled().toggled(), state);
    }

    #[test]
    fn test_progress_percentage() {
        assert_eq!(progress_percentage(0, 3), 0);
        assert_eq!(progress_percentage(1, 3), 33);
        assert_eq!(progress_percentage(2, 3), 67);
        assert_eq!(progress_percentage(3, 3), 100);
        assert_eq!(progress_percentage(2, 0), 0);
    }

    #[test]
    fn test_summary_entry_wire_names() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 9).unwrap();
        let entry = SummaryEntry::new("d1".to_string(), date, 1, 2);
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["date"], "2023-01-09");
        assert_eq!(json["completed"], 1);
        assert_eq!(json["amount"], 2);
        assert_eq!(json["progress"], 50);
    }
}
