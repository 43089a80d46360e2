mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Row counts reported by `skillswap admin info`.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct StoreCounts {
    pub users: i64,
    pub tokens: i64,
    pub profiles: i64,
    pub public_profiles: i64,
    pub skills: i64,
    pub requests_pending: i64,
    pub requests_accepted: i64,
    pub requests_rejected: i64,
    pub requests_completed: i64,
    pub feedback: i64,
}

/// Store defines the database interface.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // User operations
    fn create_user(&self, user: &User) -> Result<()>;
    fn get_user(&self, id: &str) -> Result<Option<User>>;
    fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    fn list_users(&self, cursor: &str, limit: i32) -> Result<Vec<User>>;
    fn delete_user(&self, id: &str) -> Result<bool>;

    // Token operations
    fn create_token(&self, token: &Token) -> Result<()>;
    fn get_token_by_id(&self, id: &str) -> Result<Option<Token>>;
    fn get_token_by_lookup(&self, lookup: &str) -> Result<Option<Token>>;
    fn list_tokens(&self, cursor: &str, limit: i32) -> Result<Vec<Token>>;
    fn list_user_tokens(&self, user_id: &str) -> Result<Vec<Token>>;
    fn delete_token(&self, id: &str) -> Result<bool>;
    fn update_token_last_used(&self, id: &str) -> Result<()>;
    fn has_admin_token(&self) -> Result<bool>;

    // Profile operations (one per user)
    fn upsert_profile(&self, profile: &Profile) -> Result<Profile>;
    fn get_profile_by_user(&self, user_id: &str) -> Result<Option<Profile>>;
    /// Public profiles ordered by user id, excluding `exclude_user_id`.
    fn list_public_profiles(
        &self,
        exclude_user_id: &str,
        cursor: &str,
        limit: i32,
    ) -> Result<Vec<Profile>>;

    // Skill operations
    fn create_skill(&self, skill: &Skill) -> Result<()>;
    fn get_skill(&self, id: &str) -> Result<Option<Skill>>;
    fn list_user_skills(&self, user_id: &str, skill_type: Option<SkillType>) -> Result<Vec<Skill>>;
    fn list_skills_for_users(&self, user_ids: &[String]) -> Result<Vec<Skill>>;
    fn update_skill(&self, skill: &Skill) -> Result<()>;
    /// Fails with `Conflict` while a swap request references the skill.
    fn delete_skill(&self, id: &str) -> Result<bool>;

    // Availability operations (one per user)
    fn upsert_availability(&self, availability: &Availability) -> Result<Availability>;
    fn get_availability(&self, user_id: &str) -> Result<Option<Availability>>;

    // Swap request operations
    fn create_swap_request(&self, request: &SwapRequest) -> Result<()>;
    fn get_swap_request(&self, id: &str) -> Result<Option<SwapRequest>>;
    /// Requests where the user is either side, newest first.
    fn list_user_swap_requests(&self, user_id: &str) -> Result<Vec<SwapRequest>>;
    /// Compare-and-set on status. Returns `Conflict` if the stored status is not `from`.
    fn update_swap_status(&self, id: &str, from: SwapStatus, to: SwapStatus) -> Result<()>;

    // Feedback operations
    fn create_feedback(&self, feedback: &Feedback) -> Result<()>;
    fn list_swap_feedback(&self, swap_request_id: &str) -> Result<Vec<Feedback>>;
    fn list_received_feedback(&self, user_id: &str) -> Result<Vec<Feedback>>;
    fn rating_summary(&self, user_id: &str) -> Result<RatingSummary>;

    fn counts(&self) -> Result<StoreCounts>;
}
