use crate::problemdetails;
use axum::http::StatusCode;
use serde::Serialize;
use std::collections::BTreeMap;

const PROBLEM_BASE_URL: &str = "https://popups.dev/probs";

pub struct ErrorBuilder {
    status: StatusCode,
    type_: String,
    title: String,
    detail: String,
    instance: String,
    values: BTreeMap<String, serde_json::Value>,
}

impl ErrorBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            type_: String::new(),
            title: String::new(),
            detail: String::new(),
            instance: String::new(),
            values: BTreeMap::new(),
        }
    }

    pub fn type_(mut self, type_: impl Into<String>) -> Self {
        self.type_ = type_.into();
        self
    }

    /// Shorthand for a problem type under the Popups problem namespace
    pub fn kind(self, slug: &str) -> Self {
        self.type_(format!("{}/{}", PROBLEM_BASE_URL, slug))
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    pub fn instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = instance.into();
        self
    }

    pub fn value<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(value) = serde_json::to_value(value) {
            self.values.insert(key.to_string(), value);
        }
        self
    }

    pub fn build(self) -> problemdetails::Problem {
        let mut problem = problemdetails::new(self.status)
            .with_type(self.type_)
            .with_title(self.title)
            .with_detail(self.detail)
            .with_instance(self.instance)
            .with_value("timestamp", chrono::Utc::now().to_rfc3339());

        for (key, value) in self.values {
            problem = problem.with_value(&key, value);
        }

        problem
    }
}

// Common error builders
pub fn internal_server_error() -> ErrorBuilder {
    ErrorBuilder::new(StatusCode::INTERNAL_SERVER_ERROR)
        .kind("internal-server-error")
        .title("Internal Server Error")
        .detail("An unexpected error occurred while processing your request")
        .value("error_code", "INTERNAL_SERVER_ERROR")
}

pub fn unauthorized() -> ErrorBuilder {
    ErrorBuilder::new(StatusCode::UNAUTHORIZED)
        .kind("unauthorized")
        .title("Unauthorized")
        .detail("A caller identity is required to access this resource")
        .value("error_code", "UNAUTHORIZED")
}
