//! popups-management: popup CRUD and strategy-selected retrieval
//!
//! Services own all database access; `handlers` exposes them over HTTP.

pub mod error;
pub mod handlers;
pub mod services;

pub use error::PopupError;
pub use handlers::{configure_routes, create_management_app_state, AppState, ManagementApiDoc};
pub use services::*;
