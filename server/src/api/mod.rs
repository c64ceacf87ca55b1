//! HTTP adapter exposed to clients
//!
//! This module organizes handlers into logical submodules:
//! - `habits`: habit creation, lookup, listing and the daily toggle
//! - `days`: what is due and done on one day
//! - `summary`: per-day completion ratios and the year calendar
//!
//! Handlers parse input, call one service and shape the response; all
//! domain decisions live in `services`.

pub mod days;
pub mod habits;
pub mod summary;

use crate::app::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Serialize;

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/habits", post(habits::create_habit).get(habits::list_habits))
        .route("/habits/:id", get(habits::get_habit))
        .route("/habits/:id/toggle", patch(habits::toggle_habit))
        .route("/day", get(days::get_day))
        .route("/summary", get(summary::get_summary))
        .route("/summary/calendar", get(summary::get_calendar))
        .route("/info", get(get_app_info))
        .route("/health", get(health))
        .with_state(state)
}

// ===== General Handlers =====

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    "OK"
}

/// Application information structure
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfo {
    pub version: String,
    pub data_dir: String,
    pub utc_offset: String,
    pub today: chrono::NaiveDate,
}

/// GET /info
pub async fn get_app_info(State(state): State<AppState>) -> Json<AppInfo> {
    Json(AppInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        data_dir: state.data_dir.to_string_lossy().to_string(),
        utc_offset: state.calendar.offset().to_string(),
        today: state.calendar.today(),
    })
}
