//! Habit handlers
//!
//! Creation, lookup, listing and the completion toggle.

use crate::app::AppState;
use crate::database::Habit;
use crate::error::{AppError, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

/// Body of POST /habits
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHabitBody {
    pub title: Option<String>,
    pub week_days: Option<Vec<i64>>,
}

/// POST /habits
pub async fn create_habit(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateHabitBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Habit>)> {
    let Json(body) = payload.map_err(|e| AppError::validation("body", e.body_text()))?;

    let title = body
        .title
        .ok_or_else(|| AppError::validation("title", "title is required"))?;
    let week_days = body
        .week_days
        .ok_or_else(|| AppError::validation("weekDays", "weekDays is required"))?;

    let habit = state
        .habits_service
        .create_habit(&title, &week_days)
        .await?;

    Ok((StatusCode::CREATED, Json(habit)))
}

/// GET /habits
pub async fn list_habits(State(state): State<AppState>) -> Result<Json<Vec<Habit>>> {
    Ok(Json(state.habits_service.list_habits().await?))
}

/// GET /habits/:id
pub async fn get_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Habit>> {
    Ok(Json(state.habits_service.get_habit(&id).await?))
}

/// Optional day override for the toggle; defaults to today
#[derive(Debug, Deserialize)]
pub struct ToggleQuery {
    pub date: Option<String>,
}

/// PATCH /habits/:id/toggle
pub async fn toggle_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ToggleQuery>,
) -> Result<StatusCode> {
    let day = match query.date {
        Some(date) => state.calendar.parse_day(&date)?,
        None => state.calendar.today(),
    };

    state.ledger_service.toggle(day, &id).await?;

    Ok(StatusCode::NO_CONTENT)
}
