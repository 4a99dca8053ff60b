//! Error types for popup management

use axum::http::StatusCode;
use popups_core::error_builder::internal_server_error;
use popups_core::problemdetails::{self, Problem};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum PopupError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unsupported retrieval strategy: {0}")]
    UnsupportedStrategy(String),

    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i32 },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl PopupError {
    pub fn validation(message: impl Into<String>) -> Self {
        PopupError::Validation(message.into())
    }

    pub fn not_found(resource: &'static str, id: i32) -> Self {
        PopupError::NotFound { resource, id }
    }
}

impl From<sea_orm::TransactionError<PopupError>> for PopupError {
    fn from(error: sea_orm::TransactionError<PopupError>) -> Self {
        match error {
            sea_orm::TransactionError::Transaction(e) => e,
            sea_orm::TransactionError::Connection(e) => PopupError::Database(e),
        }
    }
}

impl From<PopupError> for Problem {
    fn from(error: PopupError) -> Self {
        match error {
            PopupError::Validation(msg) => problemdetails::new(StatusCode::BAD_REQUEST)
                .with_title("Validation Error")
                .with_detail(msg),

            PopupError::UnsupportedStrategy(name) => problemdetails::new(StatusCode::BAD_REQUEST)
                .with_title("Unsupported Strategy")
                .with_detail(format!(
                    "Unknown retrieval strategy '{}', expected owner, page or filter",
                    name
                )),

            PopupError::NotFound { resource, id } => problemdetails::new(StatusCode::NOT_FOUND)
                .with_title(format!("{} Not Found", resource))
                .with_detail(format!("{} {} does not exist", resource, id)),

            PopupError::Conflict(msg) => problemdetails::new(StatusCode::CONFLICT)
                .with_title("Conflict")
                .with_detail(msg),

            PopupError::Database(e) => {
                error!("Database error in popup management: {}", e);
                internal_server_error()
                    .title("Database Error")
                    .detail(e.to_string())
                    .build()
            }
        }
    }
}
