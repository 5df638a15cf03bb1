//! Shared errors and configuration for Fiscus.
//!
//! This crate provides the common pieces used by all other crates:
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
