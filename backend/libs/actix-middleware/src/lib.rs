//! # Actix Middleware Library
//!
//! Shared middleware components for the Actix services
//!
//! ## Modules
//! - `correlation_id`: request correlation IDs and access logging
//! - `metrics`: Prometheus request metrics and the `/metrics` handler
//! - `timeout`: bounded per-request processing time
//! - `cors`: CORS policy builder

pub mod correlation_id;
pub mod cors;
pub mod metrics;
pub mod timeout;

pub use correlation_id::{get_correlation_id, CorrelationIdMiddleware, CORRELATION_ID_HEADER};
pub use cors::build_cors;
pub use metrics::{metrics_handler, MetricsMiddleware};
pub use timeout::RequestTimeout;
