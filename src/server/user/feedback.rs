use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use uuid::Uuid;

use super::profile::visible_profile;
use super::requests::participant_request;
use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::dto::CreateFeedbackRequest;
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::server::validation::{validate_comment, validate_rating};
use crate::types::{Feedback, ReceivedFeedback, SwapStatus};

pub async fn create_feedback(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<CreateFeedbackRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let request = participant_request(&state, &id, &auth.user.id)?;

    if request.status != SwapStatus::Completed {
        return Err(ApiError::conflict(format!(
            "Feedback can only be left on completed swaps; this one is {}",
            request.status
        )));
    }

    let rating = validate_rating(req.rating)?;
    let comment = validate_comment(req.comment.as_deref())?;

    let reviewee_id = request
        .counterpart(&auth.user.id)
        .or_not_found("Swap request not found")?
        .to_string();

    let feedback = Feedback {
        id: Uuid::new_v4().to_string(),
        swap_request_id: request.id.clone(),
        reviewer_id: auth.user.id.clone(),
        reviewee_id,
        rating,
        comment,
        would_swap_again: req.would_swap_again,
        created_at: Utc::now(),
    };

    state
        .store
        .create_feedback(&feedback)
        .api_err("Feedback already left for this swap")?;

    tracing::info!(
        request_id = %feedback.swap_request_id,
        reviewer_id = %feedback.reviewer_id,
        reviewee_id = %feedback.reviewee_id,
        rating = feedback.rating,
        "feedback left"
    );

    Ok((StatusCode::CREATED, Json(ApiResponse::success(feedback))))
}

pub async fn list_swap_feedback(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let request = participant_request(&state, &id, &auth.user.id)?;

    let feedback = state
        .store
        .list_swap_feedback(&request.id)
        .api_err("Failed to list feedback")?;

    Ok(Json(ApiResponse::success(feedback)))
}

pub async fn list_received_feedback(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = visible_profile(&state, &user_id, &auth.user.id)?;

    let summary = state
        .store
        .rating_summary(&profile.user_id)
        .api_err("Failed to load rating")?;

    let feedback = state
        .store
        .list_received_feedback(&profile.user_id)
        .api_err("Failed to list feedback")?;

    Ok(Json(ApiResponse::success(ReceivedFeedback {
        summary,
        feedback,
    })))
}
