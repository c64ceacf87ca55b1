//! Application state and initialization
//!
//! This module manages the central application state and lifecycle.
//! All services are initialized here and made available through AppState.

use crate::calendar::Calendar;
use crate::config;
use crate::database::{create_pool, Repository};
use crate::error::Result;
use crate::services::{AppSettings, HabitsService, LedgerService, SummaryService};
use std::path::{Path, PathBuf};

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub data_dir: PathBuf,
    pub calendar: Calendar,
    pub habits_service: HabitsService,
    pub ledger_service: LedgerService,
    pub summary_service: SummaryService,
}

impl AppState {
    pub fn new(repo: Repository, calendar: Calendar, data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            calendar,
            habits_service: HabitsService::new(repo.clone(), calendar),
            ledger_service: LedgerService::new(repo.clone(), calendar),
            summary_service: SummaryService::new(repo, calendar),
        }
    }
}

/// Application setup - opens the database under `data_dir` and wires services
pub async fn setup(data_dir: &Path, settings: &AppSettings) -> Result<AppState> {
    tracing::info!("Initializing application");
    tracing::info!("Data directory: {:?}", data_dir);

    std::fs::create_dir_all(data_dir)?;

    let calendar = settings.calendar()?;
    tracing::info!("Calendar days use UTC offset {}", calendar.offset());

    let pool = create_pool(&data_dir.join(config::DATABASE_FILE_NAME)).await?;
    let state = AppState::new(Repository::new(pool), calendar, data_dir.to_path_buf());

    tracing::info!("Application initialized successfully");

    Ok(state)
}
