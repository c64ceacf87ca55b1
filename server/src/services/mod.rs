//! Services module
//!
//! Business logic services that coordinate between the HTTP adapter and
//! the repository.

pub mod eligibility;
pub mod habits;
pub mod ledger;
pub mod settings;
pub mod summary;

pub use habits::HabitsService;
pub use ledger::LedgerService;
pub use settings::{AppSettings, SettingsService};
pub use summary::SummaryService;
