use std::sync::Arc;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{HeaderValue, StatusCode, header::AUTHORIZATION, header::WWW_AUTHENTICATE, request::Parts},
    response::{IntoResponse, Response},
};

use super::helpers::{TokenValidationError, extract_bearer_token, validate_token};
use crate::server::AppState;
use crate::server::response::ApiResponse;
use crate::types::{Token, User};

const BEARER_CHALLENGE: &str = "Bearer realm=\"skillswap\"";

/// Any valid token, admin or user.
pub struct RequireAuth(pub Token);

/// An admin token. Admin tokens belong to no user.
pub struct RequireAdmin(pub Token);

/// A user token together with the user it is bound to.
///
/// Every profile, skill, swap and feedback route takes this extractor, so
/// handlers act on `user.id` and never on an id from the request body.
pub struct RequireUser {
    pub token: Token,
    pub user: User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingAuth,
    InvalidScheme,
    InvalidToken,
    TokenExpired,
    NotAdmin,
    NotUser,
    InternalError,
}

impl AuthError {
    fn status(self) -> StatusCode {
        match self {
            Self::MissingAuth | Self::InvalidScheme | Self::InvalidToken | Self::TokenExpired => {
                StatusCode::UNAUTHORIZED
            }
            Self::NotAdmin | Self::NotUser => StatusCode::FORBIDDEN,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(self) -> &'static str {
        match self {
            Self::MissingAuth => "Authentication required",
            Self::InvalidScheme => "Invalid authorization scheme",
            Self::InvalidToken => "Invalid token",
            Self::TokenExpired => "Token expired",
            Self::NotAdmin => "Admin access required",
            Self::NotUser => "A user token is required; admin tokens cannot act as a member",
            Self::InternalError => "Internal server error",
        }
    }
}

impl From<TokenValidationError> for AuthError {
    fn from(e: TokenValidationError) -> Self {
        match e {
            TokenValidationError::InvalidScheme => Self::InvalidScheme,
            TokenValidationError::InvalidToken => Self::InvalidToken,
            TokenValidationError::TokenExpired => Self::TokenExpired,
            TokenValidationError::InternalError => Self::InternalError,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = (status, Json(ApiResponse::<()>::error(self.message()))).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static(BEARER_CHALLENGE));
        }

        response
    }
}

fn authenticate(parts: &Parts, state: &AppState) -> Result<Token, AuthError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let raw = extract_bearer_token(header)?.ok_or(AuthError::MissingAuth)?;

    Ok(validate_token(state.store.as_ref(), raw)?)
}

impl FromRequestParts<Arc<AppState>> for RequireAuth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state).map(Self)
    }
}

impl FromRequestParts<Arc<AppState>> for RequireAdmin {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = authenticate(parts, state)?;
        if token.is_admin {
            Ok(Self(token))
        } else {
            Err(AuthError::NotAdmin)
        }
    }
}

impl FromRequestParts<Arc<AppState>> for RequireUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = authenticate(parts, state)?;

        let Some(user_id) = token.user_id.as_deref().filter(|_| !token.is_admin) else {
            return Err(AuthError::NotUser);
        };

        // Tokens cascade with their user, so a missing user means a stale token.
        let user = state
            .store
            .get_user(user_id)
            .map_err(|e| {
                tracing::error!(error = %e, user_id, "failed to load token owner");
                AuthError::InternalError
            })?
            .ok_or(AuthError::InvalidToken)?;

        Ok(Self { token, user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AuthError::MissingAuth.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::TokenExpired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::NotUser.status(), StatusCode::FORBIDDEN);
        assert_eq!(AuthError::NotAdmin.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_challenge_only_on_unauthorized() {
        let resp = AuthError::InvalidToken.into_response();
        assert_eq!(
            resp.headers().get(WWW_AUTHENTICATE).unwrap(),
            BEARER_CHALLENGE
        );

        let resp = AuthError::NotAdmin.into_response();
        assert!(resp.headers().get(WWW_AUTHENTICATE).is_none());
    }

    #[test]
    fn test_validation_errors_convert() {
        assert_eq!(
            AuthError::from(TokenValidationError::TokenExpired),
            AuthError::TokenExpired
        );
        assert_eq!(
            AuthError::from(TokenValidationError::InvalidScheme),
            AuthError::InvalidScheme
        );
    }
}
