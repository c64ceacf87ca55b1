//! Completion ledger service
//!
//! Toggles the completion state of a habit on a day and answers what was
//! done on a day. Toggles of the same (day, habit) key are serialized
//! in-process; toggles of different keys never wait on each other.

use super::eligibility;
use crate::calendar::Calendar;
use crate::database::{CompletionKey, CompletionState, DayDetail, Repository};
use crate::error::{AppError, Result};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Per-key async locks, dropped from the map once nobody holds or awaits them
#[derive(Clone, Default)]
struct KeyedLocks {
    locks: Arc<Mutex<HashMap<CompletionKey, Arc<AsyncMutex<()>>>>>,
}

/// RAII guard for one key; releases the lock and prunes the map on drop
struct KeyGuard {
    key: CompletionKey,
    locks: KeyedLocks,
    guard: Option<OwnedMutexGuard<()>>,
}

impl KeyedLocks {
    async fn lock(&self, key: &CompletionKey) -> KeyGuard {
        let slot = {
            let mut map = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            map.entry(key.clone()).or_default().clone()
        };

        let guard = slot.lock_owned().await;

        KeyGuard {
            key: key.clone(),
            locks: self.clone(),
            guard: Some(guard),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        drop(self.guard.take());

        let mut map = self.locks.locks.lock().unwrap_or_else(|e| e.into_inner());
        // Only the map's own handle left: no holder, no waiter
        if map
            .get(&self.key)
            .is_some_and(|slot| Arc::strong_count(slot) == 1)
        {
            map.remove(&self.key);
        }
    }
}

/// Service for recording daily completions
#[derive(Clone)]
pub struct LedgerService {
    repo: Repository,
    calendar: Calendar,
    locks: KeyedLocks,
}

impl LedgerService {
    pub fn new(repo: Repository, calendar: Calendar) -> Self {
        Self {
            repo,
            calendar,
            locks: KeyedLocks::default(),
        }
    }

    /// Toggle a habit for today
    pub async fn toggle_today(&self, habit_id: &str) -> Result<CompletionState> {
        self.toggle(self.calendar.today(), habit_id).await
    }

    /// Flip the completion state of `habit_id` on `day`.
    ///
    /// Fails with `HabitNotFound` for an unknown habit and `NotEligible`
    /// when the habit is not due that day.
    pub async fn toggle(&self, day: NaiveDate, habit_id: &str) -> Result<CompletionState> {
        let habit = self.repo.get_habit(habit_id).await?;

        if !eligibility::is_eligible(&habit, day) {
            tracing::warn!("Rejected toggle of habit {} on {}: not due", habit_id, day);
            return Err(AppError::NotEligible {
                habit_id: habit.id,
                date: day,
            });
        }

        let key = CompletionKey::new(day, habit.id);

        let state = {
            let _guard = self.locks.lock(&key).await;
            self.repo.toggle_completion(&key).await?
        };

        tracing::info!("Habit {} on {} is now {:?}", key.habit_id, day, state);

        Ok(state)
    }

    /// Current state of a habit on a day
    pub async fn state(&self, day: NaiveDate, habit_id: &str) -> Result<CompletionState> {
        self.repo
            .completion_state(&CompletionKey::new(day, habit_id))
            .await
    }

    /// IDs of habits completed on `day`; empty for days never toggled
    pub async fn completed_on(&self, day: NaiveDate) -> Result<Vec<String>> {
        match self.repo.find_day(day).await? {
            Some(stored) => self.repo.completed_habit_ids(&stored.id).await,
            None => Ok(Vec::new()),
        }
    }

    /// Habits due on `day` together with the ones completed
    pub async fn day_detail(&self, day: NaiveDate) -> Result<DayDetail> {
        let catalog = self.repo.list_habits().await?;
        let possible_habits = eligibility::resolve(&catalog, day)
            .into_iter()
            .cloned()
            .collect();

        let completed_habits = self.completed_on(day).await?;

        Ok(DayDetail {
            possible_habits,
            completed_habits,
        })
    }

    /// Number of keys with a live lock entry
    #[cfg(test)]
    fn active_locks(&self) -> usize {
        self.locks.len()
    }
}
