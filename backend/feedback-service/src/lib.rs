//! Feedback service: contact-form messages and newsletter subscribers on Postgres

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod routes;

pub use config::Config;
pub use error::{FeedbackError, Result};
