//! Day handler

use crate::app::AppState;
use crate::database::DayDetail;
use crate::error::{AppError, Result};
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub date: Option<String>,
}

/// GET /day?date=2023-01-09 (or an RFC 3339 timestamp)
pub async fn get_day(
    State(state): State<AppState>,
    Query(query): Query<DayQuery>,
) -> Result<Json<DayDetail>> {
    let date = query
        .date
        .ok_or_else(|| AppError::validation("date", "date is required"))?;
    let day = state.calendar.parse_day(&date)?;

    Ok(Json(state.ledger_service.day_detail(day).await?))
}
