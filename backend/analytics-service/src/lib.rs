//! Analytics service: landing-page user-action counters on ClickHouse

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod services;

pub use config::Config;
pub use error::{AnalyticsError, Result};
