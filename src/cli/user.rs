use chrono::Utc;
use inquire::{Confirm, Text};
use uuid::Uuid;

use crate::auth::issue_token;
use crate::server::validation::validate_username;
use crate::store::Store;
use crate::types::User;

use super::init_store;
use super::pickers::{confirm_action, get_or_pick_user, pick_expiration};

pub fn run_user_add(
    data_dir: String,
    username: Option<String>,
    create_token_flag: bool,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let store = init_store(&data_dir)?;

    let username = if let Some(name) = username {
        validate_username(&name).map_err(anyhow::Error::msg)?;
        name
    } else if non_interactive {
        anyhow::bail!("--username is required in non-interactive mode");
    } else {
        Text::new("Username:")
            .with_validator(|input: &str| {
                Ok(validate_username(input)
                    .map(|()| inquire::validator::Validation::Valid)
                    .unwrap_or_else(|e| inquire::validator::Validation::Invalid(e.into())))
            })
            .prompt()?
    };

    if store.get_user_by_username(&username)?.is_some() {
        anyhow::bail!("User '{}' already exists", username);
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        username: username.clone(),
        created_at: Utc::now(),
    };

    store.create_user(&user)?;

    println!();
    println!("Created user \"{}\" ({})", username, user.id);

    let should_create_token = if create_token_flag {
        true
    } else if non_interactive {
        false
    } else {
        Confirm::new("Create access token?")
            .with_default(true)
            .prompt()?
    };

    if should_create_token {
        let expires_in = if non_interactive || create_token_flag {
            None
        } else {
            match pick_expiration()? {
                Some(exp) => exp,
                None => {
                    println!("Token creation cancelled.");
                    return Ok(());
                }
            }
        };

        let (raw_token, _) = issue_token(&store, Some(&user.id), expires_in)?;

        println!();
        println!("Token created: {raw_token}");
        println!("  Save this now - it cannot be retrieved later.");
        println!();
        println!("{username} can now sign in with:");
        println!("  skillswap auth login --server <url> --token {raw_token}");
        println!("and set up a profile with 'skillswap skill add' and 'skillswap profile set'.");
    }

    println!();

    Ok(())
}

pub fn run_user_remove(
    data_dir: String,
    user_id: Option<String>,
    non_interactive: bool,
    yes: bool,
) -> anyhow::Result<()> {
    let store = init_store(&data_dir)?;

    let Some(user) = get_or_pick_user(&store, user_id, non_interactive)? else {
        return Ok(());
    };

    let skills = store.list_user_skills(&user.id, None)?.len();
    let swaps = store.list_user_swap_requests(&user.id)?.len();

    let confirmed = confirm_action(
        &format!(
            "Delete user '{}' with {} skill(s) and {} swap request(s)? Their feedback goes too.",
            user.username, skills, swaps
        ),
        yes,
        non_interactive,
    )?;

    if !confirmed {
        println!("Cancelled.");
        return Ok(());
    }

    store.delete_user(&user.id)?;

    tracing::info!(user_id = %user.id, skills, swaps, "user deleted");

    println!();
    println!("Deleted user '{}'", user.username);
    println!();

    Ok(())
}
