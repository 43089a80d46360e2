use axum::{Json, response::IntoResponse};

use crate::auth::{RequireAuth, RequireUser};
use crate::server::dto::TokenResponse;
use crate::server::response::{ApiError, ApiResponse};

pub async fn get_me(auth: RequireUser) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(ApiResponse::success(auth.user)))
}

/// Metadata for the presenting token. Works for admin and user tokens alike.
pub async fn get_current_token(auth: RequireAuth) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(ApiResponse::success(TokenResponse::from(auth.0))))
}
