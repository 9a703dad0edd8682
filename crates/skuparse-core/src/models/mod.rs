//! Configuration data models.

pub mod config;
