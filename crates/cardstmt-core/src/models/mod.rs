//! Data models for statement processing.

pub mod config;
pub mod expense;
