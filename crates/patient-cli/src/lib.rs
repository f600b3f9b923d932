//! CLI library components for the patient registry.

pub mod commands;
pub mod config;
pub mod logging;
pub mod summary;
