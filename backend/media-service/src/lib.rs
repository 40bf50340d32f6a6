//! Media Service
//!
//! Read side of the video catalog: serves the video list over HTTP from
//! PostgreSQL.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;

// Public re-exports
pub use config::Config;
pub use error::{AppError, Result};
