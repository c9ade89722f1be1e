use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

/// Header set by the upstream gateway once it has authenticated the caller.
pub const CALLER_HEADER: &str = "x-authenticated-user";

/// Identity of the caller, when one was established upstream.
///
/// Resolution order:
/// 1. a `CallerIdentity` placed in request extensions by an auth layer
/// 2. the [`CALLER_HEADER`] header
///
/// Extraction never fails; anonymous requests yield `CallerIdentity(None)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerIdentity(pub Option<String>);

impl CallerIdentity {
    pub fn user(id: impl Into<String>) -> Self {
        Self(Some(id.into()))
    }

    pub fn id(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<CallerIdentity>() {
            return Ok(identity.clone());
        }

        let from_header = parts
            .headers
            .get(CALLER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(CallerIdentity(from_header))
    }
}
