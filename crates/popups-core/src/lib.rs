//! Core utilities and types shared across all Popups crates

pub mod config;
pub mod error;
pub mod error_builder;
pub mod identity;
pub mod openapi;
pub mod problemdetails;
pub use problemdetails::ProblemDetails;
pub mod types;

// Re-export commonly used types
pub use config::*;
pub use error::*;
pub use error_builder::*;
pub use identity::{CallerIdentity, OWNER_ID_HEADER};
pub use types::*;

// Re-export external dependencies
pub use anyhow;
pub use chrono;
pub use serde;
pub use serde_json;
pub use thiserror;
pub use tracing;
