mod availability;
mod browse;
mod feedback;
mod me;
mod profile;
mod requests;
mod skills;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::server::AppState;

pub use browse::{BrowseFilter, filter_profiles};

pub fn user_router() -> Router<Arc<AppState>> {
    Router::new()
        // Identity
        .route("/me", get(me::get_me))
        .route("/token", get(me::get_current_token))
        // Profile (one per user)
        .route("/profile", get(profile::get_own_profile).put(profile::upsert_profile))
        .route("/profiles", get(browse::browse_profiles))
        .route("/profiles/{user_id}", get(profile::get_profile))
        // Skills
        .route("/skills", get(skills::list_skills).post(skills::create_skill))
        .route(
            "/skills/{id}",
            patch(skills::update_skill).delete(skills::delete_skill),
        )
        // Availability (one per user)
        .route(
            "/availability",
            get(availability::get_availability).put(availability::set_availability),
        )
        // Swap requests
        .route(
            "/requests",
            get(requests::list_requests).post(requests::create_request),
        )
        .route("/requests/{id}", get(requests::get_request))
        .route("/requests/{id}/accept", post(requests::accept_request))
        .route("/requests/{id}/reject", post(requests::reject_request))
        .route("/requests/{id}/complete", post(requests::complete_request))
        // Feedback
        .route(
            "/requests/{id}/feedback",
            get(feedback::list_swap_feedback).post(feedback::create_feedback),
        )
        .route("/users/{user_id}/feedback", get(feedback::list_received_feedback))
}
