//! Summary handlers

use crate::app::AppState;
use crate::database::{CalendarCell, SummaryEntry};
use crate::error::Result;
use axum::extract::State;
use axum::Json;

/// GET /summary
pub async fn get_summary(State(state): State<AppState>) -> Result<Json<Vec<SummaryEntry>>> {
    Ok(Json(state.summary_service.summarize().await?))
}

/// GET /summary/calendar
pub async fn get_calendar(State(state): State<AppState>) -> Result<Json<Vec<CalendarCell>>> {
    Ok(Json(state.summary_service.calendar().await?))
}
