//! Caller identity resolved from the upstream identity provider
//!
//! Authentication happens in front of this service; the gateway forwards the
//! authenticated owner id in the `X-Owner-Id` header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error_builder::unauthorized;
use crate::problemdetails::Problem;

pub const OWNER_ID_HEADER: &str = "x-owner-id";

/// Owner id of the caller making the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerIdentity(pub i32);

impl CallerIdentity {
    pub fn owner_id(&self) -> i32 {
        self.0
    }

    fn from_parts(parts: &Parts) -> Result<Self, Problem> {
        let raw = parts.headers.get(OWNER_ID_HEADER).ok_or_else(|| {
            unauthorized()
                .detail(format!("Missing {} header", OWNER_ID_HEADER))
                .build()
        })?;

        raw.to_str()
            .ok()
            .and_then(|value| value.trim().parse::<i32>().ok())
            .filter(|id| *id > 0)
            .map(CallerIdentity)
            .ok_or_else(|| {
                unauthorized()
                    .detail(format!("{} must be a positive integer", OWNER_ID_HEADER))
                    .build()
            })
    }
}

impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_parts(parts)
    }
}

/// Optional variant: handlers that work with or without a caller
impl<S> axum::extract::OptionalFromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        if parts.headers.contains_key(OWNER_ID_HEADER) {
            Self::from_parts(parts).map(Some)
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};

    fn parts_with(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/popups");
        if let Some(value) = value {
            builder = builder.header(OWNER_ID_HEADER, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_extracts_owner_id() {
        let mut parts = parts_with(Some("7"));
        let identity = <CallerIdentity as FromRequestParts<()>>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(identity.owner_id(), 7);
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let mut parts = parts_with(None);
        let err = <CallerIdentity as FromRequestParts<()>>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.status_code, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_rejects_non_positive_ids() {
        for raw in ["0", "-3", "abc"] {
            let mut parts = parts_with(Some(raw));
            let result =
                <CallerIdentity as FromRequestParts<()>>::from_request_parts(&mut parts, &()).await;
            assert!(result.is_err(), "accepted {}", raw);
        }
    }

    #[tokio::test]
    async fn test_optional_extraction_without_header() {
        let mut parts = parts_with(None);
        let identity = <CallerIdentity as axum::extract::OptionalFromRequestParts<()>>::from_request_parts(
            &mut parts,
            &(),
        )
        .await
        .unwrap();
        assert!(identity.is_none());
    }
}
