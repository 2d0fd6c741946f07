pub mod config;
pub mod editorial_calendar;
pub mod seo;
pub mod tracing;
