//! Repository layer for database operations
//!
//! Query interface over the habit catalog and the completion ledger.
//! Multi-statement writes run inside transactions.

use super::models::*;
use crate::error::{AppError, Result};
use chrono::NaiveDate;
use sqlx::SqlitePool;
use std::collections::HashMap;
use uuid::Uuid;

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

fn week_day_set(days: impl IntoIterator<Item = i64>) -> WeekDaySet {
    let mut set = WeekDaySet::empty();
    for day in days {
        if let Ok(day) = u8::try_from(day) {
            set.insert(day);
        }
    }
    set
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // ===== Habit Catalog =====

    /// Create a habit and its weekday memberships in one transaction
    pub async fn create_habit(&self, req: CreateHabitRequest) -> Result<Habit> {
        let id = Uuid::new_v4().to_string();

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, HabitRow>(
            r#"
            INSERT INTO habits (id, title, created_at)
            VALUES (?, ?, ?)
            RETURNING id, title, created_at
            "#,
        )
        .bind(&id)
        .bind(&req.title)
        .bind(req.created_at)
        .fetch_one(&mut *tx)
        .await?;

        for week_day in req.week_days.iter() {
            sqlx::query("INSERT INTO habit_week_days (id, habit_id, week_day) VALUES (?, ?, ?)")
                .bind(Uuid::new_v4().to_string())
                .bind(&id)
                .bind(i64::from(week_day))
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::debug!("Created habit: {} on {}", id, req.created_at);
        Ok(row.into_habit(req.week_days))
    }

    /// Get a habit by ID
    pub async fn get_habit(&self, id: &str) -> Result<Habit> {
        let row = sqlx::query_as::<_, HabitRow>(
            "SELECT id, title, created_at FROM habits WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::HabitNotFound(id.to_string()))?;

        let week_days: Vec<i64> =
            sqlx::query_scalar("SELECT week_day FROM habit_week_days WHERE habit_id = ?")
                .bind(id)
                .fetch_all(&self.pool)
                .await?;

        Ok(row.into_habit(week_day_set(week_days)))
    }

    /// List the whole catalog, oldest first
    pub async fn list_habits(&self) -> Result<Vec<Habit>> {
        let rows = sqlx::query_as::<_, HabitRow>(
            r#"
            SELECT id, title, created_at FROM habits
            ORDER BY created_at ASC, title ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let memberships: Vec<(String, i64)> =
            sqlx::query_as("SELECT habit_id, week_day FROM habit_week_days")
                .fetch_all(&self.pool)
                .await?;

        let mut week_days: HashMap<String, Vec<i64>> = HashMap::new();
        for (habit_id, week_day) in memberships {
            week_days.entry(habit_id).or_default().push(week_day);
        }

        let habits = rows
            .into_iter()
            .map(|row| {
                let days = week_days.remove(&row.id).unwrap_or_default();
                row.into_habit(week_day_set(days))
            })
            .collect();

        Ok(habits)
    }

    // ===== Completion Ledger =====

    /// Get the stored day for a date, if any toggle ever happened on it
    pub async fn find_day(&self, date: NaiveDate) -> Result<Option<Day>> {
        let day = sqlx::query_as::<_, Day>("SELECT id, date FROM days WHERE date = ?")
            .bind(date)
            .fetch_optional(&self.pool)
            .await?;

        Ok(day)
    }

    /// IDs of the habits completed on a stored day
    pub async fn completed_habit_ids(&self, day_id: &str) -> Result<Vec<String>> {
        let ids: Vec<String> = sqlx::query_scalar(
            "SELECT habit_id FROM day_habits WHERE day_id = ? ORDER BY habit_id ASC",
        )
        .bind(day_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    /// Current state of one (day, habit) pair
    pub async fn completion_state(&self, key: &CompletionKey) -> Result<CompletionState> {
        let records: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM day_habits dh
            JOIN days d ON d.id = dh.day_id
            WHERE d.date = ? AND dh.habit_id = ?
            "#,
        )
        .bind(key.date)
        .bind(&key.habit_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(if records > 0 {
            CompletionState::Completed
        } else {
            CompletionState::Incomplete
        })
    }

    /// Flip a (day, habit) pair and return its new state.
    ///
    /// The day row is upserted first: that write makes SQLite take the
    /// write lock at the start of the transaction, so the existence check
    /// below can never read a snapshot another writer has moved past.
    /// Callers serialize toggles of the same key in-process as well.
    pub async fn toggle_completion(&self, key: &CompletionKey) -> Result<CompletionState> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO days (id, date) VALUES (?, ?) ON CONFLICT(date) DO NOTHING")
            .bind(Uuid::new_v4().to_string())
            .bind(key.date)
            .execute(&mut *tx)
            .await?;

        let day_id: String = sqlx::query_scalar("SELECT id FROM days WHERE date = ?")
            .bind(key.date)
            .fetch_one(&mut *tx)
            .await?;

        let existing: Option<String> =
            sqlx::query_scalar("SELECT id FROM day_habits WHERE day_id = ? AND habit_id = ?")
                .bind(&day_id)
                .bind(&key.habit_id)
                .fetch_optional(&mut *tx)
                .await?;

        let previous = match existing {
            Some(record_id) => {
                sqlx::query("DELETE FROM day_habits WHERE id = ?")
                    .bind(&record_id)
                    .execute(&mut *tx)
                    .await?;
                CompletionState::Completed
            }
            None => {
                sqlx::query("INSERT INTO day_habits (id, day_id, habit_id) VALUES (?, ?, ?)")
                    .bind(Uuid::new_v4().to_string())
                    .bind(&day_id)
                    .bind(&key.habit_id)
                    .execute(&mut *tx)
                    .await?;
                CompletionState::Incomplete
            }
        };
        let state = previous.toggled();

        tx.commit().await?;

        tracing::debug!(
            "Toggled habit {} on {}: {:?}",
            key.habit_id,
            key.date,
            state
        );
        Ok(state)
    }

    /// Completion counts for every day with at least one record
    pub async fn day_completion_counts(&self) -> Result<Vec<DayCompletionCount>> {
        let counts = sqlx::query_as::<_, DayCompletionCount>(
            r#"
            SELECT d.id AS id, d.date AS date, COUNT(dh.id) AS completed
            FROM days d
            JOIN day_habits dh ON dh.day_id = d.id
            GROUP BY d.id, d.date
            ORDER BY d.date ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }
}
