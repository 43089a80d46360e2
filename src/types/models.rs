use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ExperienceLevel, SkillType, SwapRole, SwapStatus, TimeSlot, Weekday};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub id: String,
    #[serde(skip)]
    pub token_hash: String,
    #[serde(skip)]
    pub token_lookup: String,
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub user_id: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub is_public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub user_id: String,
    pub skill_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub experience_level: ExperienceLevel,
    pub skill_type: SkillType,
    pub is_priority: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Availability {
    pub id: String,
    pub user_id: String,
    pub days: Vec<Weekday>,
    pub time_slots: Vec<TimeSlot>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapRequest {
    pub id: String,
    pub requester_id: String,
    pub requested_user_id: String,
    pub offered_skill_id: String,
    pub wanted_skill_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub status: SwapStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: String,
    pub swap_request_id: String,
    pub reviewer_id: String,
    pub reviewee_id: String,
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub would_swap_again: bool,
    pub created_at: DateTime<Utc>,
}

/// Aggregate of the feedback a user has received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
    pub count: i64,
    pub average: f64,
    pub would_swap_again: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileWithSkills {
    #[serde(flatten)]
    pub profile: Profile,
    pub skills: Vec<Skill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<Availability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<RatingSummary>,
}

impl ProfileWithSkills {
    pub fn skills_of(&self, skill_type: SkillType) -> impl Iterator<Item = &Skill> {
        self.skills.iter().filter(move |s| s.skill_type == skill_type)
    }
}

/// The parts of a counterpart's profile shown next to a swap request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub user_id: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
}

impl From<&Profile> for ProfileSummary {
    fn from(profile: &Profile) -> Self {
        Self {
            user_id: profile.user_id.clone(),
            full_name: profile.full_name.clone(),
            location: profile.location.clone(),
            profile_photo: profile.profile_photo.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillSummary {
    pub id: String,
    pub skill_name: String,
    pub experience_level: ExperienceLevel,
}

impl From<&Skill> for SkillSummary {
    fn from(skill: &Skill) -> Self {
        Self {
            id: skill.id.clone(),
            skill_name: skill.skill_name.clone(),
            experience_level: skill.experience_level,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Incoming,
    Outgoing,
}

impl From<SwapRole> for Direction {
    fn from(role: SwapRole) -> Self {
        match role {
            SwapRole::Requester => Self::Outgoing,
            SwapRole::Requested => Self::Incoming,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapRequestDetail {
    #[serde(flatten)]
    pub request: SwapRequest,
    pub direction: Direction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterpart: Option<ProfileSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offered_skill: Option<SkillSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wanted_skill: Option<SkillSummary>,
}

/// A user's requests grouped the way the requests page shows them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestsOverview {
    pub incoming: Vec<SwapRequestDetail>,
    pub outgoing: Vec<SwapRequestDetail>,
    pub active: Vec<SwapRequestDetail>,
    pub completed: Vec<SwapRequestDetail>,
}

impl RequestsOverview {
    /// Buckets details by status. Rejected requests are dropped; input order is kept.
    #[must_use]
    pub fn from_details(details: Vec<SwapRequestDetail>) -> Self {
        let mut overview = Self::default();
        for detail in details {
            match (detail.request.status, detail.direction) {
                (SwapStatus::Pending, Direction::Incoming) => overview.incoming.push(detail),
                (SwapStatus::Pending, Direction::Outgoing) => overview.outgoing.push(detail),
                (SwapStatus::Accepted, _) => overview.active.push(detail),
                (SwapStatus::Completed, _) => overview.completed.push(detail),
                (SwapStatus::Rejected, _) => {}
            }
        }
        overview
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceivedFeedback {
    pub summary: RatingSummary,
    pub feedback: Vec<Feedback>,
}
