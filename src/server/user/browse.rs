use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};

use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::dto::BrowseParams;
use crate::server::response::{
    ApiError, DEFAULT_PAGE_SIZE, PaginatedResponse, StoreResultExt, paginate,
};
use crate::types::{ExperienceLevel, ProfileWithSkills};

/// Browse filters. Empty strings are treated as absent.
#[derive(Debug, Clone, Default)]
pub struct BrowseFilter {
    pub q: Option<String>,
    pub location: Option<String>,
    pub experience: Option<ExperienceLevel>,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn normalized(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

impl BrowseFilter {
    #[must_use]
    pub fn new(q: Option<&str>, location: Option<&str>, experience: Option<ExperienceLevel>) -> Self {
        Self {
            q: normalized(q),
            location: normalized(location),
            experience,
        }
    }

    /// `q` hits name, location or any skill name; `location` and `experience` narrow further.
    #[must_use]
    pub fn matches(&self, entry: &ProfileWithSkills) -> bool {
        let profile = &entry.profile;

        if let Some(q) = &self.q {
            let hit = contains_ci(&profile.full_name, q)
                || profile
                    .location
                    .as_deref()
                    .is_some_and(|l| contains_ci(l, q))
                || entry.skills.iter().any(|s| contains_ci(&s.skill_name, q));
            if !hit {
                return false;
            }
        }

        if let Some(location) = &self.location {
            if !profile
                .location
                .as_deref()
                .is_some_and(|l| contains_ci(l, location))
            {
                return false;
            }
        }

        if let Some(level) = self.experience {
            if !entry.skills.iter().any(|s| s.experience_level == level) {
                return false;
            }
        }

        true
    }
}

#[must_use]
pub fn filter_profiles(
    profiles: Vec<ProfileWithSkills>,
    filter: &BrowseFilter,
) -> Vec<ProfileWithSkills> {
    profiles.into_iter().filter(|p| filter.matches(p)).collect()
}

/// Walks public profiles in user-id order, filtering batch by batch, until a page
/// plus one lookahead entry is collected or the table is exhausted.
pub async fn browse_profiles(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<BrowseParams>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = BrowseFilter::new(
        params.q.as_deref(),
        params.location.as_deref(),
        params.experience,
    );
    let page_size = DEFAULT_PAGE_SIZE as usize;

    let mut cursor = params.cursor.unwrap_or_default();
    let mut matched: Vec<ProfileWithSkills> = Vec::new();

    while matched.len() <= page_size {
        let batch = state
            .store
            .list_public_profiles(&auth.user.id, &cursor, DEFAULT_PAGE_SIZE)
            .api_err("Failed to list profiles")?;

        let Some(last) = batch.last() else {
            break;
        };
        cursor = last.user_id.clone();
        let exhausted = batch.len() < page_size;

        let user_ids: Vec<String> = batch.iter().map(|p| p.user_id.clone()).collect();
        let mut skills_by_user: HashMap<String, Vec<_>> = HashMap::new();
        for skill in state
            .store
            .list_skills_for_users(&user_ids)
            .api_err("Failed to list skills")?
        {
            skills_by_user
                .entry(skill.user_id.clone())
                .or_default()
                .push(skill);
        }

        let entries = batch
            .into_iter()
            .map(|profile| ProfileWithSkills {
                skills: skills_by_user.remove(&profile.user_id).unwrap_or_default(),
                profile,
                availability: None,
                rating: None,
            })
            .collect();

        matched.extend(filter_profiles(entries, &filter));

        if exhausted {
            break;
        }
    }

    let (profiles, next_cursor, has_more) =
        paginate(matched, page_size, |p| p.profile.user_id.clone());

    Ok(Json(PaginatedResponse::new(profiles, next_cursor, has_more)))
}
