use serde::Serialize;

use crate::store::{Store, StoreCounts};

use super::init_store;
use super::pickers::list_tokens;
use super::token::TokenOutput;

#[derive(Serialize)]
struct UserOutput {
    id: String,
    username: String,
    created_at: String,
}

#[derive(Serialize)]
struct DetailedServerInfo {
    counts: StoreCounts,
    users: Vec<UserOutput>,
    tokens: Vec<TokenOutput>,
}

pub fn run_info(data_dir: String, json: bool) -> anyhow::Result<()> {
    let store = init_store(&data_dir)?;
    let counts = store.counts()?;

    if json {
        let users = store
            .list_users("", 10000)?
            .into_iter()
            .map(|u| UserOutput {
                id: u.id,
                username: u.username,
                created_at: u.created_at.to_rfc3339(),
            })
            .collect();

        let tokens = list_tokens(&store)?.iter().map(TokenOutput::from).collect();

        let info = DetailedServerInfo {
            counts,
            users,
            tokens,
        };

        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        let requests = counts.requests_pending
            + counts.requests_accepted
            + counts.requests_rejected
            + counts.requests_completed;

        println!();
        println!("Skillswap Server Status");
        println!("{}", "─".repeat(23));
        println!("Users:       {}", counts.users);
        println!("Tokens:      {}", counts.tokens);
        println!(
            "Profiles:    {} ({} public)",
            counts.profiles, counts.public_profiles
        );
        println!("Skills:      {}", counts.skills);
        println!(
            "Requests:    {} ({} pending, {} accepted, {} rejected, {} completed)",
            requests,
            counts.requests_pending,
            counts.requests_accepted,
            counts.requests_rejected,
            counts.requests_completed
        );
        println!("Feedback:    {}", counts.feedback);
        println!();
    }

    Ok(())
}
