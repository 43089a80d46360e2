mod auth;
mod availability;
mod browse;
mod commands;
pub mod credentials;
mod feedback;
pub mod http_client;
mod info;
pub mod pickers;
mod profile;
mod request;
mod skill;
mod token;
mod user;

pub use auth::{run_auth_login, run_auth_logout};
pub use availability::{run_availability_set, run_availability_show};
pub use browse::run_browse;
pub use commands::{
    AdminCommands, AuthCommands, AvailabilityCommands, FeedbackCommands, LevelArg,
    ProfileCommands, RequestCommands, SkillCommands, SkillTypeArg, TokenCommands, UserCommands,
};
pub use feedback::{run_feedback_leave, run_feedback_list};
pub use info::run_info;
pub use profile::{ProfileEdits, run_profile_set, run_profile_show};
pub use request::{
    run_request_accept, run_request_complete, run_request_list, run_request_reject,
    run_request_send,
};
pub use skill::{run_skill_add, run_skill_list, run_skill_remove};
pub use token::{run_token_create, run_token_revoke};
pub use user::{run_user_add, run_user_remove};

use crate::config::DB_FILE_NAME;
use crate::store::SqliteStore;

use credentials::load_credentials;
use http_client::ApiClient;

/// Initialize store from data directory, checking it exists
pub fn init_store(data_dir: &str) -> anyhow::Result<SqliteStore> {
    let data_path: std::path::PathBuf = data_dir.into();
    let db_path = data_path.join(DB_FILE_NAME);

    if !db_path.exists() {
        anyhow::bail!(
            "Database not found at {}. Run 'skillswap admin init' first.",
            db_path.display()
        );
    }

    SqliteStore::new(&db_path).map_err(Into::into)
}

/// Client for the server saved by `skillswap auth login`.
pub(crate) fn api_client() -> anyhow::Result<ApiClient> {
    let creds = load_credentials()?;
    ApiClient::new(&creds)
}
