use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::auth::{RequireAdmin, issue_token};
use crate::server::AppState;
use crate::server::dto::{
    CreateTokenResponse, CreateUserRequest, CreateUserTokenRequest, PaginationParams, TokenResponse,
};
use crate::server::response::{
    ApiError, ApiResponse, DEFAULT_PAGE_SIZE, PaginatedResponse, StoreOptionExt, StoreResultExt,
    paginate,
};
use crate::server::validation::validate_username;
use crate::types::User;

fn load_user(state: &AppState, id: &str) -> Result<User, ApiError> {
    state
        .store
        .get_user(id)
        .api_err("Failed to get user")?
        .or_not_found("User not found")
}

/// Turns a requested lifetime into an absolute expiry. `None` never expires.
fn expiry_from_seconds(seconds: Option<i64>) -> Result<Option<DateTime<Utc>>, ApiError> {
    let Some(seconds) = seconds else {
        return Ok(None);
    };
    if seconds < 0 {
        return Err(ApiError::bad_request("expires_in_seconds cannot be negative"));
    }
    Duration::try_seconds(seconds)
        .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
        .map(Some)
        .ok_or_else(|| ApiError::bad_request("expires_in_seconds is too large"))
}

pub async fn create_user(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_username(&req.username).map_err(ApiError::bad_request)?;

    let existing = state
        .store
        .get_user_by_username(&req.username)
        .api_err("Failed to check existing user")?;

    if existing.is_some() {
        return Err(ApiError::conflict("Username already taken"));
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        username: req.username,
        created_at: Utc::now(),
    };

    state
        .store
        .create_user(&user)
        .api_err("Failed to create user")?;

    tracing::info!(user_id = %user.id, username = %user.username, "user created");

    Ok((StatusCode::CREATED, Json(ApiResponse::success(user))))
}

pub async fn list_users(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let cursor = params.cursor.as_deref().unwrap_or("");

    let users = state
        .store
        .list_users(cursor, DEFAULT_PAGE_SIZE + 1)
        .api_err("Failed to list users")?;

    let (users, next_cursor, has_more) =
        paginate(users, DEFAULT_PAGE_SIZE as usize, |u| u.id.clone());

    Ok(Json(PaginatedResponse::new(users, next_cursor, has_more)))
}

pub async fn get_user(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user = load_user(&state, &id)?;

    Ok(Json(ApiResponse::success(user)))
}

pub async fn delete_user(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user = load_user(&state, &id)?;

    state
        .store
        .delete_user(&user.id)
        .api_err("Failed to delete user")?;

    tracing::info!(user_id = %user.id, "user deleted");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_user_tokens(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user = load_user(&state, &id)?;

    let tokens = state
        .store
        .list_user_tokens(&user.id)
        .api_err("Failed to list user tokens")?;

    let responses: Vec<TokenResponse> = tokens.into_iter().map(TokenResponse::from).collect();

    Ok(Json(ApiResponse::success(responses)))
}

pub async fn create_user_token(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<CreateUserTokenRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = load_user(&state, &id)?;

    let expires_at = expiry_from_seconds(req.expires_in_seconds)?;

    let (raw_token, token) = issue_token(state.store.as_ref(), Some(&user.id), expires_at)
        .api_err("Failed to create token")?;

    tracing::info!(
        user_id = %user.id,
        token_id = %token.id,
        expires_at = ?token.expires_at,
        "token issued"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CreateTokenResponse {
            token: raw_token,
            metadata: TokenResponse::from(token),
        })),
    ))
}
