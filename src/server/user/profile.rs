use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::dto::UpsertProfileRequest;
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::server::validation::{
    validate_bio, validate_full_name, validate_location, validate_photo_url,
};
use crate::types::{Profile, ProfileWithSkills, SkillType};

/// Loads a profile's skills and availability, and its rating summary if asked.
pub(super) fn profile_view(
    state: &AppState,
    profile: Profile,
    with_rating: bool,
) -> Result<ProfileWithSkills, ApiError> {
    let skills = state
        .store
        .list_user_skills(&profile.user_id, None)
        .api_err("Failed to list skills")?;

    let availability = state
        .store
        .get_availability(&profile.user_id)
        .api_err("Failed to get availability")?;

    let rating = if with_rating {
        Some(
            state
                .store
                .rating_summary(&profile.user_id)
                .api_err("Failed to load rating")?,
        )
    } else {
        None
    };

    Ok(ProfileWithSkills {
        profile,
        skills,
        availability,
        rating,
    })
}

/// Returns the profile if the viewer may see it. Private profiles read as missing.
pub(super) fn visible_profile(
    state: &AppState,
    user_id: &str,
    viewer_id: &str,
) -> Result<Profile, ApiError> {
    state
        .store
        .get_profile_by_user(user_id)
        .api_err("Failed to get profile")?
        .filter(|p| p.is_public || p.user_id == viewer_id)
        .or_not_found("Profile not found")
}

pub async fn get_own_profile(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state
        .store
        .get_profile_by_user(&auth.user.id)
        .api_err("Failed to get profile")?
        .or_not_found("Profile not found")?;

    let view = profile_view(&state, profile, true)?;

    Ok(Json(ApiResponse::success(view)))
}

pub async fn upsert_profile(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpsertProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let full_name = validate_full_name(&req.full_name)?;
    let location = validate_location(req.location.as_deref())?;
    let bio = validate_bio(req.bio.as_deref())?;
    let profile_photo = validate_photo_url(req.profile_photo.as_deref())?;

    let offering = state
        .store
        .list_user_skills(&auth.user.id, Some(SkillType::Offering))
        .api_err("Failed to list skills")?;

    if offering.is_empty() {
        return Err(ApiError::bad_request(
            "Add at least one skill you can offer before saving your profile",
        ));
    }

    let now = Utc::now();
    let profile = Profile {
        id: Uuid::new_v4().to_string(),
        user_id: auth.user.id.clone(),
        full_name,
        location,
        bio,
        is_public: req.is_public,
        profile_photo,
        created_at: now,
        updated_at: now,
    };

    let saved = state
        .store
        .upsert_profile(&profile)
        .api_err("Failed to save profile")?;

    tracing::info!(user_id = %saved.user_id, is_public = saved.is_public, "profile saved");

    let view = profile_view(&state, saved, false)?;

    Ok(Json(ApiResponse::success(view)))
}

pub async fn get_profile(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = visible_profile(&state, &user_id, &auth.user.id)?;
    let view = profile_view(&state, profile, true)?;

    Ok(Json(ApiResponse::success(view)))
}
