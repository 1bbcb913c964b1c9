pub mod api;
pub mod calendar;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod reminders;

pub use error::{CalendarError, Result};
