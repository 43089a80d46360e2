use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::dto::SetAvailabilityRequest;
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::types::Availability;

pub async fn get_availability(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let availability = state
        .store
        .get_availability(&auth.user.id)
        .api_err("Failed to get availability")?
        .or_not_found("Availability not set")?;

    Ok(Json(ApiResponse::success(availability)))
}

pub async fn set_availability(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<SetAvailabilityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let now = Utc::now();
    let availability = Availability {
        id: Uuid::new_v4().to_string(),
        user_id: auth.user.id.clone(),
        days: req.days,
        time_slots: req.time_slots,
        created_at: now,
        updated_at: now,
    };

    let saved = state
        .store
        .upsert_availability(&availability)
        .api_err("Failed to save availability")?;

    Ok(Json(ApiResponse::success(saved)))
}
