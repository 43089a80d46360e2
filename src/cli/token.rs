use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::issue_token;
use crate::store::{SqliteStore, Store};
use crate::types::Token;

use super::init_store;
use super::pickers::{
    TokenDisplay, confirm_action, expiry_after_days, get_or_pick_user, list_tokens,
    pick_expiration, pick_token,
    resolve_token_username,
};

/// JSON shape of a token in `admin token create --list --json` and `admin info --json`.
#[derive(Serialize)]
pub(super) struct TokenOutput {
    id: String,
    lookup: String,
    user_id: Option<String>,
    username: Option<String>,
    is_admin: bool,
    expired: bool,
    created_at: String,
    expires_at: Option<String>,
    last_used_at: Option<String>,
}

impl From<&TokenDisplay> for TokenOutput {
    fn from(display: &TokenDisplay) -> Self {
        let token = &display.token;
        Self {
            id: token.id.clone(),
            lookup: token.token_lookup.clone(),
            user_id: token.user_id.clone(),
            username: display.username.clone(),
            is_admin: token.is_admin,
            expired: token.expires_at.is_some_and(|at| at <= Utc::now()),
            created_at: token.created_at.to_rfc3339(),
            expires_at: token.expires_at.map(|dt| dt.to_rfc3339()),
            last_used_at: token.last_used_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

fn print_tokens(tokens: &[TokenDisplay], json: bool) -> anyhow::Result<()> {
    if json {
        let output: Vec<TokenOutput> = tokens.iter().map(TokenOutput::from).collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if tokens.is_empty() {
        println!("No tokens found.");
        return Ok(());
    }
    println!();
    for token in tokens {
        println!("  {token}");
    }
    println!();
    Ok(())
}

/// Expiry from the flag, or the interactive picker. `Ok(None)` means cancelled.
fn resolve_expiry(
    expires_days: Option<i64>,
    non_interactive: bool,
) -> anyhow::Result<Option<Option<DateTime<Utc>>>> {
    match expires_days {
        Some(days) => Ok(Some(Some(expiry_after_days(days)?))),
        None if non_interactive => Ok(Some(None)),
        None => pick_expiration(),
    }
}

pub fn run_token_create(
    data_dir: String,
    user_id: Option<String>,
    expires_days: Option<i64>,
    non_interactive: bool,
    list: bool,
    json: bool,
) -> anyhow::Result<()> {
    let store = init_store(&data_dir)?;

    if list {
        return print_tokens(&list_tokens(&store)?, json);
    }

    let Some(user) = get_or_pick_user(&store, user_id, non_interactive)? else {
        return Ok(());
    };

    let Some(expires_at) = resolve_expiry(expires_days, non_interactive)? else {
        println!("Cancelled.");
        return Ok(());
    };

    let (raw_token, token) = issue_token(&store, Some(&user.id), expires_at)?;

    println!();
    println!("Token created for '{}': {}", user.username, raw_token);
    println!("  Token ID: {}", token.id);
    match expires_at {
        Some(at) => println!("  Expires:  {}", at.format("%Y-%m-%d %H:%M UTC")),
        None => println!("  Expires:  never"),
    }
    println!("  Save this now - it cannot be retrieved later.");
    println!();

    Ok(())
}

/// The server refuses to start without an admin token, so the last one stays.
fn ensure_not_last_admin(store: &SqliteStore, token: &Token) -> anyhow::Result<()> {
    if !token.is_admin {
        return Ok(());
    }
    let admins = store
        .list_tokens("", i32::MAX)?
        .into_iter()
        .filter(|t| t.is_admin)
        .count();
    if admins <= 1 {
        anyhow::bail!("Refusing to revoke the only admin token");
    }
    Ok(())
}

pub fn run_token_revoke(
    data_dir: String,
    token_id: Option<String>,
    non_interactive: bool,
    yes: bool,
) -> anyhow::Result<()> {
    let store = init_store(&data_dir)?;

    let token = match token_id {
        Some(id) => store
            .get_token_by_id(&id)?
            .ok_or_else(|| anyhow::anyhow!("Token not found: {}", id))?,
        None if non_interactive => {
            anyhow::bail!("--token-id is required in non-interactive mode")
        }
        None => match pick_token(&store)? {
            Some(token) => token,
            None => return Ok(()),
        },
    };

    ensure_not_last_admin(&store, &token)?;

    let owner = resolve_token_username(&store, &token)?;
    let prompt = format!(
        "Revoke token skillswap_{}... ({})?",
        token.token_lookup,
        owner.as_deref().unwrap_or("admin")
    );

    if !confirm_action(&prompt, yes, non_interactive)? {
        println!("Cancelled.");
        return Ok(());
    }

    store.delete_token(&token.id)?;

    println!();
    println!("Token revoked.");
    println!();

    Ok(())
}
