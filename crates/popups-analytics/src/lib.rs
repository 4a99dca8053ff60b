//! Popup analytics: event counters, top-N rankings and per-variant rates

pub mod error;
pub mod handlers;
pub mod services;

pub use error::AnalyticsError;
pub use handlers::{configure_routes, create_analytics_app_state, AnalyticsApiDoc, AppState};
pub use services::*;
