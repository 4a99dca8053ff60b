//! Error types for popup analytics

use axum::http::StatusCode;
use popups_core::error_builder::internal_server_error;
use popups_core::problemdetails::{self, Problem};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unsupported analytics dimension: {0}")]
    UnsupportedDimension(String),

    #[error("Unsupported analytics event: {0}")]
    UnsupportedEvent(String),

    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i32 },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl AnalyticsError {
    pub fn validation(message: impl Into<String>) -> Self {
        AnalyticsError::Validation(message.into())
    }
}

impl From<AnalyticsError> for Problem {
    fn from(error: AnalyticsError) -> Self {
        match error {
            AnalyticsError::Validation(msg) => problemdetails::new(StatusCode::BAD_REQUEST)
                .with_title("Validation Error")
                .with_detail(msg),

            AnalyticsError::UnsupportedDimension(name) => {
                problemdetails::new(StatusCode::BAD_REQUEST)
                    .with_title("Unsupported Dimension")
                    .with_detail(format!(
                        "Unknown analytics dimension '{}', expected devices, pages or variants",
                        name
                    ))
            }

            AnalyticsError::UnsupportedEvent(name) => problemdetails::new(StatusCode::BAD_REQUEST)
                .with_title("Unsupported Event")
                .with_detail(format!(
                    "Unknown analytics event '{}', expected view, click or conversion",
                    name
                )),

            AnalyticsError::NotFound { resource, id } => problemdetails::new(StatusCode::NOT_FOUND)
                .with_title(format!("{} Not Found", resource))
                .with_detail(format!("{} {} not found", resource, id)),

            AnalyticsError::Database(e) => {
                error!("Database error in popup analytics: {}", e);
                internal_server_error()
                    .title("Database Error")
                    .detail(e.to_string())
                    .build()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_dimension_is_bad_request() {
        let problem: Problem = AnalyticsError::UnsupportedDimension("browsers".into()).into();
        assert_eq!(problem.status_code, StatusCode::BAD_REQUEST);
        assert!(problem.detail().unwrap().contains("browsers"));
    }

    #[test]
    fn test_not_found_is_404() {
        let problem: Problem = AnalyticsError::NotFound {
            resource: "Popup",
            id: 3,
        }
        .into();
        assert_eq!(problem.status_code, StatusCode::NOT_FOUND);
        assert_eq!(problem.title(), Some("Popup Not Found"));
    }

    #[test]
    fn test_database_error_is_500() {
        let problem: Problem =
            AnalyticsError::Database(sea_orm::DbErr::Custom("boom".into())).into();
        assert_eq!(problem.status_code, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
