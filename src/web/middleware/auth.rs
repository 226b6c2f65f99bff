//! Bearer token authentication.
//!
//! [`jwt_auth`] places the shared [`TokenIssuer`] into the request
//! extensions; the [`AuthUser`] and [`OptionalAuthUser`] extractors read it
//! back to verify the `Authorization: Bearer` header. Claims are trusted
//! for the token's lifetime; handlers that need the current account state
//! load it themselves.

use axum::{
    async_trait,
    body::Body,
    extract::FromRequestParts,
    http::{request::Parts, Request},
    middleware::Next,
    response::Response,
    RequestPartsExt,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeaderRejection,
    TypedHeader,
};
use std::sync::Arc;

use crate::auth::{Caller, Claims, TokenIssuer};
use crate::web::error::ApiError;

/// Extractor for authenticated requests.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Identity behind the request.
    pub fn caller(&self) -> Caller {
        Caller::from(&self.0)
    }
}

/// Like [`AuthUser`] but yields `None` when no `Authorization` header is
/// sent. A header that is present must still carry a valid token.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<Claims>);

impl OptionalAuthUser {
    /// Identity behind the request, if any.
    pub fn caller(&self) -> Option<Caller> {
        self.0.as_ref().map(Caller::from)
    }
}

fn issuer(parts: &Parts) -> Result<Arc<TokenIssuer>, ApiError> {
    parts
        .extensions
        .get::<Arc<TokenIssuer>>()
        .cloned()
        .ok_or_else(|| {
            tracing::error!("Token issuer missing from request extensions");
            ApiError::internal("An internal error occurred")
        })
}

fn verify(parts: &Parts, token: &str) -> Result<Claims, ApiError> {
    let issuer = issuer(parts)?;
    issuer.verify(token).map_err(|e| {
        tracing::debug!(error = %e, "Bearer token rejected");
        ApiError::from(crate::LeclatError::from(e))
    })
}

fn header_rejection(rejection: TypedHeaderRejection) -> ApiError {
    if rejection.is_missing() {
        ApiError::unauthenticated("Missing bearer token")
    } else {
        ApiError::unauthenticated("Authorization header must use the Bearer scheme")
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(header_rejection)?;

        let claims = verify(parts, bearer.token())?;
        Ok(AuthUser(claims))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extract::<TypedHeader<Authorization<Bearer>>>().await {
            Ok(TypedHeader(Authorization(bearer))) => {
                let claims = verify(parts, bearer.token())?;
                Ok(OptionalAuthUser(Some(claims)))
            }
            Err(rejection) if rejection.is_missing() => Ok(OptionalAuthUser(None)),
            Err(rejection) => Err(header_rejection(rejection)),
        }
    }
}

/// Middleware function to inject the token issuer into request extensions.
pub async fn jwt_auth(issuer: Arc<TokenIssuer>, mut request: Request<Body>, next: Next) -> Response {
    request.extensions_mut().insert(issuer);
    next.run(request).await
}
