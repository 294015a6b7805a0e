//! Identity resolution.
//!
//! Authentication is out of scope for this demo, but identity is still an
//! injected capability instead of a hardcoded constant: handlers ask the
//! resolver, and deployments choose between the header-based resolver and a
//! fixed demo identity.

use async_trait::async_trait;
use axum::http::HeaderMap;
use mentora_core::models::UserId;
use mentora_core::AppError;

/// Resolves the caller identity of a request, if any.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// `Ok(None)` means no identity was presented; handlers turn that into
    /// `Unauthenticated`.
    async fn resolve(&self, headers: &HeaderMap) -> Result<Option<UserId>, AppError>;
}

/// Reads the identity from a request header (demo-grade verification: the
/// value must parse as a valid user id).
pub struct HeaderIdentityResolver {
    header_name: String,
}

impl HeaderIdentityResolver {
    pub fn new(header_name: impl Into<String>) -> Self {
        Self {
            header_name: header_name.into(),
        }
    }
}

#[async_trait]
impl IdentityResolver for HeaderIdentityResolver {
    async fn resolve(&self, headers: &HeaderMap) -> Result<Option<UserId>, AppError> {
        let Some(value) = headers.get(self.header_name.as_str()) else {
            return Ok(None);
        };
        let value = value.to_str().map_err(|_| {
            AppError::Unauthenticated("identity header is not valid UTF-8".to_string())
        })?;
        UserId::new(value).map(Some)
    }
}

/// Attributes every request to one fixed identity (demo deployments, tests).
pub struct StaticIdentityResolver {
    user: UserId,
}

impl StaticIdentityResolver {
    pub fn new(user: UserId) -> Self {
        Self { user }
    }
}

#[async_trait]
impl IdentityResolver for StaticIdentityResolver {
    async fn resolve(&self, _headers: &HeaderMap) -> Result<Option<UserId>, AppError> {
        Ok(Some(self.user.clone()))
    }
}
