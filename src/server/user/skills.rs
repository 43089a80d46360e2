use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::dto::{CreateSkillRequest, ListSkillsParams, UpdateSkillRequest};
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::server::validation::{validate_description, validate_skill_name};
use crate::types::{Skill, SkillType, User};

/// Loads a skill owned by `user`. Other users' skills read as missing.
fn own_skill(state: &AppState, user: &User, id: &str) -> Result<Skill, ApiError> {
    state
        .store
        .get_skill(id)
        .api_err("Failed to get skill")?
        .filter(|s| s.user_id == user.id)
        .or_not_found("Skill not found")
}

fn ensure_unique_name(
    state: &AppState,
    user: &User,
    name: &str,
    skill_type: SkillType,
    except_id: Option<&str>,
) -> Result<(), ApiError> {
    let existing = state
        .store
        .list_user_skills(&user.id, Some(skill_type))
        .api_err("Failed to list skills")?;

    let duplicate = existing
        .iter()
        .filter(|s| Some(s.id.as_str()) != except_id)
        .any(|s| s.skill_name.to_lowercase() == name.to_lowercase());

    if duplicate {
        return Err(ApiError::conflict(format!(
            "You already have \"{name}\" as a {skill_type} skill"
        )));
    }
    Ok(())
}

pub async fn list_skills(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListSkillsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let skills = state
        .store
        .list_user_skills(&auth.user.id, params.skill_type)
        .api_err("Failed to list skills")?;

    Ok(Json(ApiResponse::success(skills)))
}

pub async fn create_skill(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSkillRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let skill_name = validate_skill_name(&req.skill_name)?;
    let description = validate_description(req.description.as_deref())?;

    ensure_unique_name(&state, &auth.user, &skill_name, req.skill_type, None)?;

    let skill = Skill {
        id: Uuid::new_v4().to_string(),
        user_id: auth.user.id.clone(),
        skill_name,
        description,
        experience_level: req.experience_level,
        skill_type: req.skill_type,
        is_priority: req.is_priority,
        created_at: Utc::now(),
    };

    state
        .store
        .create_skill(&skill)
        .api_err("Failed to create skill")?;

    tracing::info!(user_id = %skill.user_id, skill_id = %skill.id, skill_type = %skill.skill_type, "skill added");

    Ok((StatusCode::CREATED, Json(ApiResponse::success(skill))))
}

pub async fn update_skill(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateSkillRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut skill = own_skill(&state, &auth.user, &id)?;

    if let Some(name) = req.skill_name {
        let name = validate_skill_name(&name)?;
        ensure_unique_name(&state, &auth.user, &name, skill.skill_type, Some(&skill.id))?;
        skill.skill_name = name;
    }
    if req.description.is_some() {
        skill.description = validate_description(req.description.as_deref())?;
    }
    if let Some(level) = req.experience_level {
        skill.experience_level = level;
    }
    if let Some(priority) = req.is_priority {
        skill.is_priority = priority;
    }

    state
        .store
        .update_skill(&skill)
        .api_err("Failed to update skill")?;

    Ok(Json(ApiResponse::success(skill)))
}

pub async fn delete_skill(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let skill = own_skill(&state, &auth.user, &id)?;

    state
        .store
        .delete_skill(&skill.id)
        .api_err("Cannot delete skill")?;

    tracing::info!(user_id = %skill.user_id, skill_id = %skill.id, "skill removed");

    Ok(StatusCode::NO_CONTENT)
}
