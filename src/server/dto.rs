use serde::{Deserialize, Serialize};

use crate::types::{ExperienceLevel, SkillType, TimeSlot, Token, Weekday};

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateUserTokenRequest {
    #[serde(default)]
    pub expires_in_seconds: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub id: String,
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTokenResponse {
    pub token: String,
    pub metadata: TokenResponse,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PaginationParams {
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpsertProfileRequest {
    pub full_name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default = "default_true")]
    pub is_public: bool,
    #[serde(default)]
    pub profile_photo: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BrowseParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub experience: Option<ExperienceLevel>,
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListSkillsParams {
    #[serde(default)]
    pub skill_type: Option<SkillType>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSkillRequest {
    pub skill_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub experience_level: ExperienceLevel,
    pub skill_type: SkillType,
    #[serde(default)]
    pub is_priority: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateSkillRequest {
    #[serde(default)]
    pub skill_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default)]
    pub is_priority: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetAvailabilityRequest {
    #[serde(default)]
    pub days: Vec<Weekday>,
    #[serde(default)]
    pub time_slots: Vec<TimeSlot>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSwapRequest {
    pub requested_user_id: String,
    pub offered_skill_id: String,
    pub wanted_skill_id: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateFeedbackRequest {
    pub rating: i64,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default = "default_true")]
    pub would_swap_again: bool,
}

fn default_true() -> bool {
    true
}

impl From<Token> for TokenResponse {
    fn from(token: Token) -> Self {
        Self {
            id: token.id,
            is_admin: token.is_admin,
            user_id: token.user_id,
            created_at: token.created_at,
            expires_at: token.expires_at,
            last_used_at: token.last_used_at,
        }
    }
}
