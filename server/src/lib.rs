//! Habits server library
//!
//! Habit scheduling and completion engine behind a small HTTP API.
//! Exposed as a library for integration tests.

pub mod api;
pub mod app;
pub mod calendar;
pub mod config;
pub mod database;
pub mod error;
pub mod services;
