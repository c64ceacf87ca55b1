//! Habits service
//!
//! The habit catalog: creation with validation, lookup, and the list of
//! habits due on a given day.

use super::eligibility;
use crate::calendar::Calendar;
use crate::config::MAX_HABIT_TITLE_LENGTH;
use crate::database::{CreateHabitRequest, Habit, Repository, WeekDaySet};
use crate::error::{AppError, Result};
use chrono::NaiveDate;

/// Service for managing the habit catalog
#[derive(Clone)]
pub struct HabitsService {
    repo: Repository,
    calendar: Calendar,
}

fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();

    if title.is_empty() {
        return Err(AppError::validation("title", "title is required"));
    }

    if title.chars().count() > MAX_HABIT_TITLE_LENGTH {
        return Err(AppError::validation(
            "title",
            format!("title exceeds {} characters", MAX_HABIT_TITLE_LENGTH),
        ));
    }

    Ok(title.to_string())
}

impl HabitsService {
    pub fn new(repo: Repository, calendar: Calendar) -> Self {
        Self { repo, calendar }
    }

    /// Create a habit starting today
    pub async fn create_habit(&self, title: &str, week_days: &[i64]) -> Result<Habit> {
        self.create_habit_as_of(title, week_days, self.calendar.today())
            .await
    }

    /// Create a habit with an explicit creation day
    pub async fn create_habit_as_of(
        &self,
        title: &str,
        week_days: &[i64],
        created_at: NaiveDate,
    ) -> Result<Habit> {
        let title = validate_title(title)?;
        let week_days = WeekDaySet::from_indices(week_days.iter().copied())?;

        tracing::info!("Creating habit: {}", title);

        let habit = self
            .repo
            .create_habit(CreateHabitRequest {
                title,
                week_days,
                created_at,
            })
            .await?;

        tracing::info!(
            "Habit created successfully: {} ({} days a week)",
            habit.id,
            habit.week_days.len()
        );

        Ok(habit)
    }

    /// Get a habit by ID
    pub async fn get_habit(&self, id: &str) -> Result<Habit> {
        self.repo.get_habit(id).await
    }

    /// List all habits
    pub async fn list_habits(&self) -> Result<Vec<Habit>> {
        self.repo.list_habits().await
    }

    /// Habits due on `day`
    pub async fn list_habits_eligible_on(&self, day: NaiveDate) -> Result<Vec<Habit>> {
        let catalog = self.list_habits().await?;

        Ok(eligibility::resolve(&catalog, day)
            .into_iter()
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory_pool;

    async fn create_test_service() -> HabitsService {
        HabitsService::new(Repository::new(memory_pool().await), Calendar::utc())
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_create_habit_uses_today() {
        let service = create_test_service().await;

        let habit = service.create_habit("  Read  ", &[0, 6]).await.unwrap();

        assert_eq!(habit.title, "Read");
        assert_eq!(habit.created_at, Calendar::utc().today());
        assert_eq!(service.get_habit(&habit.id).await.unwrap(), habit);
    }

    #[tokio::test]
    async fn test_create_habit_rejects_blank_title() {
        let service = create_test_service().await;

        let err = service.create_habit("   ", &[1]).await.unwrap_err();
        assert_eq!(err.field(), Some("title"));

        let long = "x".repeat(MAX_HABIT_TITLE_LENGTH + 1);
        let err = service.create_habit(&long, &[1]).await.unwrap_err();
        assert_eq!(err.field(), Some("title"));

        assert!(service.list_habits().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_habit_rejects_bad_week_day() {
        let service = create_test_service().await;

        let err = service.create_habit("Swim", &[1, 7]).await.unwrap_err();
        assert_eq!(err.field(), Some("weekDays"));

        assert!(service.list_habits().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_titles_need_not_be_unique() {
        let service = create_test_service().await;

        let first = service.create_habit("Walk", &[1]).await.unwrap();
        let second = service.create_habit("Walk", &[1]).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(service.list_habits().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_habits_eligible_on() {
        let service = create_test_service().await;
        let monday = day(2023, 1, 9);

        let water = service
            .create_habit_as_of("Drink water", &[1, 3, 5], monday)
            .await
            .unwrap();
        service
            .create_habit_as_of("Weekend run", &[0, 6], monday)
            .await
            .unwrap();

        let due = service.list_habits_eligible_on(monday).await.unwrap();
        assert_eq!(due, vec![water]);

        let sunday = day(2023, 1, 15);
        let due = service.list_habits_eligible_on(sunday).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].title, "Weekend run");

        // Nothing exists yet the week before
        assert!(service
            .list_habits_eligible_on(day(2023, 1, 2))
            .await
            .unwrap()
            .is_empty());
    }
}
