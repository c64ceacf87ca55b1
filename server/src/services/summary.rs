//! Summary service
//!
//! Aggregates the completion ledger into one (completed, possible) entry per
//! day. `possible` is computed by the same eligibility rules the day view
//! uses, on the stored calendar day, never on a raw timestamp.

use super::eligibility;
use crate::calendar::{self, Calendar};
use crate::database::{CalendarCell, Repository, SummaryEntry};
use crate::error::Result;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Service producing the per-day summary
#[derive(Clone)]
pub struct SummaryService {
    repo: Repository,
    calendar: Calendar,
}

impl SummaryService {
    pub fn new(repo: Repository, calendar: Calendar) -> Self {
        Self { repo, calendar }
    }

    /// One entry per day with at least one completion, by date ascending
    pub async fn summarize(&self) -> Result<Vec<SummaryEntry>> {
        let counts = self.repo.day_completion_counts().await?;
        if counts.is_empty() {
            return Ok(Vec::new());
        }

        let catalog = self.repo.list_habits().await?;

        let entries: Vec<SummaryEntry> = counts
            .into_iter()
            .map(|day| {
                let possible = eligibility::count_eligible(&catalog, day.date) as i64;
                SummaryEntry::new(day.id, day.date, day.completed, possible)
            })
            .collect();

        tracing::debug!("Summarized {} days", entries.len());

        Ok(entries)
    }

    /// Every day from January 1st through `today`, with its summary entry if any
    pub async fn calendar_until(&self, today: NaiveDate) -> Result<Vec<CalendarCell>> {
        let mut by_date: HashMap<NaiveDate, SummaryEntry> = self
            .summarize()
            .await?
            .into_iter()
            .map(|entry| (entry.date, entry))
            .collect();

        let cells = calendar::dates_from_year_start(today)
            .into_iter()
            .map(|date| CalendarCell {
                date,
                summary: by_date.remove(&date),
            })
            .collect();

        Ok(cells)
    }

    /// The calendar grid up to today
    pub async fn calendar(&self) -> Result<Vec<CalendarCell>> {
        self.calendar_until(self.calendar.today()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory_pool;
    use crate::services::{HabitsService, LedgerService};

    struct Fixture {
        habits: HabitsService,
        ledger: LedgerService,
        summary: SummaryService,
    }

    async fn create_fixture() -> Fixture {
        let repo = Repository::new(memory_pool().await);
        let calendar = Calendar::utc();
        Fixture {
            habits: HabitsService::new(repo.clone(), calendar),
            ledger: LedgerService::new(repo.clone(), calendar),
            summary: SummaryService::new(repo, calendar),
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_empty_ledger_has_empty_summary() {
        let f = create_fixture().await;
        f.habits
            .create_habit_as_of("Unused", &[1], day(2023, 1, 2))
            .await
            .unwrap();

        assert!(f.summary.summarize().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_summary_counts_overlapping_habits() {
        let f = create_fixture().await;
        let start = day(2023, 1, 2); // Monday

        // Mon/Wed/Fri, Mon/Tue, every weekday
        let a = f.habits.create_habit_as_of("A", &[1, 3, 5], start).await.unwrap();
        let b = f.habits.create_habit_as_of("B", &[1, 2], start).await.unwrap();
        let c = f
            .habits
            .create_habit_as_of("C", &[1, 2, 3, 4, 5], start)
            .await
            .unwrap();

        let monday = day(2023, 1, 9);
        let tuesday = day(2023, 1, 10);
        let wednesday = day(2023, 1, 11);

        f.ledger.toggle(monday, &a.id).await.unwrap();
        f.ledger.toggle(monday, &b.id).await.unwrap();
        f.ledger.toggle(tuesday, &c.id).await.unwrap();
        f.ledger.toggle(wednesday, &a.id).await.unwrap();
        f.ledger.toggle(wednesday, &c.id).await.unwrap();

        let entries = f.summary.summarize().await.unwrap();
        let shape: Vec<(NaiveDate, i64, i64)> = entries
            .iter()
            .map(|e| (e.date, e.completed, e.possible))
            .collect();

        assert_eq!(
            shape,
            vec![(monday, 2, 3), (tuesday, 1, 2), (wednesday, 2, 2)]
        );
        assert_eq!(entries[0].progress, 67);
        assert_eq!(entries[2].progress, 100);
    }

    #[tokio::test]
    async fn test_summary_possible_respects_creation_cutoff() {
        let f = create_fixture().await;
        let monday = day(2023, 1, 9);

        let early = f.habits.create_habit_as_of("Early", &[1], monday).await.unwrap();
        // Created a week later on the same weekday: not possible on `monday`
        f.habits
            .create_habit_as_of("Late", &[1], day(2023, 1, 16))
            .await
            .unwrap();

        f.ledger.toggle(monday, &early.id).await.unwrap();

        let entries = f.summary.summarize().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].possible, 1);
    }

    #[tokio::test]
    async fn test_untoggled_day_drops_out_of_summary() {
        let f = create_fixture().await;
        let monday = day(2023, 1, 9);
        let habit = f.habits.create_habit_as_of("Read", &[1], monday).await.unwrap();

        f.ledger.toggle(monday, &habit.id).await.unwrap();
        assert_eq!(f.summary.summarize().await.unwrap().len(), 1);

        f.ledger.toggle(monday, &habit.id).await.unwrap();
        assert!(f.summary.summarize().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_calendar_fills_the_year() {
        let f = create_fixture().await;
        let monday = day(2023, 1, 9);
        let habit = f.habits.create_habit_as_of("Read", &[1], monday).await.unwrap();
        f.ledger.toggle(monday, &habit.id).await.unwrap();

        let cells = f.summary.calendar_until(day(2023, 1, 20)).await.unwrap();
        assert_eq!(cells.len(), 20);

        let filled: Vec<&CalendarCell> = cells.iter().filter(|c| c.summary.is_some()).collect();
        assert_eq!(filled.len(), 1);
        assert_eq!(filled[0].date, monday);
    }
}
