pub mod service;
pub mod types;

pub use service::AnalyticsService;
pub use types::*;
