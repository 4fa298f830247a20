//! Shared utilities: logging setup and time helpers.

pub mod logger;
pub mod time;
