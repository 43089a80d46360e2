use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::dto::CreateSwapRequest;
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::server::validation::validate_message;
use crate::types::{
    Direction, ProfileSummary, RequestsOverview, SkillSummary, SkillType, SwapAction, SwapRequest,
    SwapRequestDetail, SwapStatus, TransitionError,
};

/// Loads a request the viewer takes part in.
pub(super) fn participant_request(
    state: &AppState,
    id: &str,
    viewer_id: &str,
) -> Result<SwapRequest, ApiError> {
    let request = state
        .store
        .get_swap_request(id)
        .api_err("Failed to get swap request")?
        .or_not_found("Swap request not found")?;

    if request.role_of(viewer_id).is_none() {
        return Err(TransitionError::NotParticipant.into());
    }

    Ok(request)
}

/// Decorates a request with the counterpart's profile and both skill summaries,
/// as seen by `viewer_id`.
fn request_detail(
    state: &AppState,
    request: SwapRequest,
    viewer_id: &str,
) -> Result<SwapRequestDetail, ApiError> {
    let role = request
        .role_of(viewer_id)
        .ok_or_else(|| ApiError::from(TransitionError::NotParticipant))?;

    let counterpart = match request.counterpart(viewer_id) {
        Some(other) => state
            .store
            .get_profile_by_user(other)
            .api_err("Failed to get profile")?
            .as_ref()
            .map(ProfileSummary::from),
        None => None,
    };

    let offered_skill = state
        .store
        .get_skill(&request.offered_skill_id)
        .api_err("Failed to get skill")?
        .as_ref()
        .map(SkillSummary::from);

    let wanted_skill = state
        .store
        .get_skill(&request.wanted_skill_id)
        .api_err("Failed to get skill")?
        .as_ref()
        .map(SkillSummary::from);

    Ok(SwapRequestDetail {
        request,
        direction: Direction::from(role),
        counterpart,
        offered_skill,
        wanted_skill,
    })
}

pub async fn list_requests(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let requests = state
        .store
        .list_user_swap_requests(&auth.user.id)
        .api_err("Failed to list swap requests")?;

    let details = requests
        .into_iter()
        .filter(|r| r.status != SwapStatus::Rejected)
        .map(|r| request_detail(&state, r, &auth.user.id))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(ApiResponse::success(RequestsOverview::from_details(
        details,
    ))))
}

pub async fn create_request(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSwapRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.requested_user_id == auth.user.id {
        return Err(ApiError::bad_request(
            "Cannot send a swap request to yourself",
        ));
    }

    let message = validate_message(req.message.as_deref())?;

    state
        .store
        .get_profile_by_user(&req.requested_user_id)
        .api_err("Failed to get profile")?
        .filter(|p| p.is_public)
        .or_not_found("Profile not found")?;

    let offered = state
        .store
        .get_skill(&req.offered_skill_id)
        .api_err("Failed to get skill")?
        .filter(|s| s.user_id == auth.user.id && s.skill_type == SkillType::Offering)
        .ok_or_else(|| ApiError::bad_request("Offered skill must be one of your offering skills"))?;

    let wanted = state
        .store
        .get_skill(&req.wanted_skill_id)
        .api_err("Failed to get skill")?
        .filter(|s| s.user_id == req.requested_user_id && s.skill_type == SkillType::Offering)
        .ok_or_else(|| {
            ApiError::bad_request("Wanted skill must be one the other user offers")
        })?;

    let now = Utc::now();
    let request = SwapRequest {
        id: Uuid::new_v4().to_string(),
        requester_id: auth.user.id.clone(),
        requested_user_id: req.requested_user_id,
        offered_skill_id: offered.id,
        wanted_skill_id: wanted.id,
        message,
        status: SwapStatus::Pending,
        created_at: now,
        updated_at: now,
    };

    state
        .store
        .create_swap_request(&request)
        .api_err("Failed to create swap request")?;

    tracing::info!(
        request_id = %request.id,
        requester_id = %request.requester_id,
        requested_user_id = %request.requested_user_id,
        "swap request sent"
    );

    let detail = request_detail(&state, request, &auth.user.id)?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(detail))))
}

pub async fn get_request(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let request = participant_request(&state, &id, &auth.user.id)?;
    let detail = request_detail(&state, request, &auth.user.id)?;

    Ok(Json(ApiResponse::success(detail)))
}

fn transition(
    state: &AppState,
    id: &str,
    actor_id: &str,
    action: SwapAction,
) -> Result<SwapRequestDetail, ApiError> {
    let request = state
        .store
        .get_swap_request(id)
        .api_err("Failed to get swap request")?
        .or_not_found("Swap request not found")?;

    let next = request.apply(action, actor_id)?;

    state
        .store
        .update_swap_status(&request.id, request.status, next)
        .api_err("Swap request changed concurrently")?;

    tracing::info!(
        request_id = %request.id,
        actor_id = %actor_id,
        from = %request.status,
        to = %next,
        "swap request {}",
        next
    );

    let updated = state
        .store
        .get_swap_request(&request.id)
        .api_err("Failed to get swap request")?
        .or_not_found("Swap request not found")?;

    request_detail(state, updated, actor_id)
}

pub async fn accept_request(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = transition(&state, &id, &auth.user.id, SwapAction::Accept)?;
    Ok(Json(ApiResponse::success(detail)))
}

pub async fn reject_request(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = transition(&state, &id, &auth.user.id, SwapAction::Reject)?;
    Ok(Json(ApiResponse::success(detail)))
}

pub async fn complete_request(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = transition(&state, &id, &auth.user.id, SwapAction::Complete)?;
    Ok(Json(ApiResponse::success(detail)))
}
