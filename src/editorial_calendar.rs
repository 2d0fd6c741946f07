//! Editorial calendar: publication metadata for city, stadium and article pages.
//!
//! The process-wide instance is built from the environment on first use. Hosts call
//! [`start`] once at startup; pages call [`lookup`] at render time and get `None` until
//! the first fetch has landed.

pub mod api;
pub mod cache;
pub mod dto;
pub mod error;
pub mod model;

use crate::config::env_loader::load_config;
use cache::EditorialCalendar;
use lazy_static::lazy_static;
use model::{CalendarData, CalendarEntry, CalendarKind};
use std::sync::Arc;
use tokio::task::JoinHandle;

lazy_static! {
    static ref CALENDAR: EditorialCalendar = EditorialCalendar::from_config(&load_config());
}

pub fn global() -> &'static EditorialCalendar {
    &CALENDAR
}

/// Starts warming the process-wide calendar in the background.
///
/// Must be called from within a tokio runtime.
pub fn start() -> JoinHandle<()> {
    tokio::spawn(global().initialize())
}

pub fn lookup(kind: CalendarKind, key: &str) -> Option<CalendarEntry> {
    global().lookup(kind, key)
}

pub fn snapshot() -> Arc<CalendarData> {
    global().snapshot()
}
