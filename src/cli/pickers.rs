use std::fmt;

use chrono::{DateTime, Duration, Utc};
use inquire::{InquireError, Select};

use crate::store::Store;
use crate::types::{Token, User};

/// User for display in pickers and lists
pub struct UserDisplay {
    pub user: User,
}

impl fmt::Display for UserDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}...)", self.user.username, short_id(&self.user.id))
    }
}

/// Token with resolved username for display
pub struct TokenDisplay {
    pub token: Token,
    pub username: Option<String>,
}

impl fmt::Display for TokenDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let user = self.username.as_deref().unwrap_or("admin");
        let created = format_relative_time(&self.token.created_at);
        let last_used = match &self.token.last_used_at {
            Some(dt) => format_relative_time(dt),
            None => "never used".to_string(),
        };
        write!(
            f,
            "skillswap_{}...  {}  created {}  {}",
            &self.token.token_lookup, user, created, last_used
        )
    }
}

/// Token expiration option for display
#[derive(Clone)]
pub struct ExpirationOption {
    pub label: &'static str,
    pub days: Option<i64>,
}

impl fmt::Display for ExpirationOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// First eight characters of an id, for compact listings.
#[must_use]
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Format a datetime as relative time (e.g., "2 days ago")
#[must_use]
pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let now = Utc::now();
    let diff = now.signed_duration_since(*dt);

    if diff.num_seconds() < 0 {
        return "in the future".to_string();
    }

    if diff.num_seconds() < 60 {
        return "just now".to_string();
    }

    let (count, unit) = if diff.num_minutes() < 60 {
        (diff.num_minutes(), "minute")
    } else if diff.num_hours() < 24 {
        (diff.num_hours(), "hour")
    } else if diff.num_days() < 30 {
        (diff.num_days(), "day")
    } else if diff.num_days() < 365 {
        (diff.num_days() / 30, "month")
    } else {
        (diff.num_days() / 365, "year")
    };

    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

/// Runs a `Select` prompt; cancellation yields `None`.
pub fn select<T: fmt::Display>(message: &str, options: Vec<T>) -> anyhow::Result<Option<T>> {
    let selection = Select::new(message, options)
        .with_page_size(15)
        .with_help_message("Type to filter, Enter to select")
        .with_vim_mode(true)
        .prompt();

    match selection {
        Ok(choice) => Ok(Some(choice)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn load_users(store: &impl Store) -> anyhow::Result<Vec<UserDisplay>> {
    Ok(store
        .list_users("", 10000)?
        .into_iter()
        .map(|user| UserDisplay { user })
        .collect())
}

fn load_tokens_with_users(store: &impl Store) -> anyhow::Result<Vec<TokenDisplay>> {
    let tokens = store.list_tokens("", 10000)?;
    let mut displays = Vec::with_capacity(tokens.len());
    for token in tokens {
        let username = resolve_token_username(store, &token)?;
        displays.push(TokenDisplay { token, username });
    }
    Ok(displays)
}

/// Pick a user from the list
pub fn pick_user(store: &impl Store) -> anyhow::Result<Option<User>> {
    let users = load_users(store)?;

    if users.is_empty() {
        println!("No users found.");
        return Ok(None);
    }

    Ok(select("Select user:", users)?.map(|display| display.user))
}

/// Pick a token from the list
pub fn pick_token(store: &impl Store) -> anyhow::Result<Option<Token>> {
    let tokens = load_tokens_with_users(store)?;

    if tokens.is_empty() {
        println!("No tokens found.");
        return Ok(None);
    }

    Ok(select("Select token:", tokens)?.map(|display| display.token))
}

/// Pick token expiration. The outer `None` means the prompt was cancelled.
/// Absolute expiry `days` from now. Rejects non-positive and out-of-range values.
pub fn expiry_after_days(days: i64) -> anyhow::Result<DateTime<Utc>> {
    if days <= 0 {
        anyhow::bail!("Expiration must be at least 1 day (omit it for a token that never expires)");
    }
    Duration::try_days(days)
        .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
        .ok_or_else(|| anyhow::anyhow!("Expiration of {days} days is too far in the future"))
}

/// `Ok(None)` means cancelled; `Some(None)` means never expires.
pub fn pick_expiration() -> anyhow::Result<Option<Option<DateTime<Utc>>>> {
    let options = vec![
        ExpirationOption {
            label: "30 days",
            days: Some(30),
        },
        ExpirationOption {
            label: "90 days",
            days: Some(90),
        },
        ExpirationOption {
            label: "1 year",
            days: Some(365),
        },
        ExpirationOption {
            label: "Never",
            days: None,
        },
    ];

    match select("Token expiration:", options)? {
        Some(opt) => Ok(Some(opt.days.map(expiry_after_days).transpose()?)),
        None => Ok(None),
    }
}

/// Get all tokens for listing
pub fn list_tokens(store: &impl Store) -> anyhow::Result<Vec<TokenDisplay>> {
    load_tokens_with_users(store)
}

/// Get a user by ID or interactively pick one
pub fn get_or_pick_user(
    store: &impl Store,
    user_id: Option<String>,
    non_interactive: bool,
) -> anyhow::Result<Option<User>> {
    if let Some(id) = user_id {
        let user = store
            .get_user(&id)?
            .ok_or_else(|| anyhow::anyhow!("User not found: {}", id))?;
        Ok(Some(user))
    } else if non_interactive {
        anyhow::bail!("--user-id is required in non-interactive mode");
    } else {
        pick_user(store)
    }
}

/// Resolve a token's username from its user_id
pub fn resolve_token_username(store: &impl Store, token: &Token) -> anyhow::Result<Option<String>> {
    match &token.user_id {
        Some(uid) => Ok(store.get_user(uid)?.map(|u| u.username)),
        None => Ok(None),
    }
}

/// Request confirmation for a destructive operation
pub fn confirm_action(message: &str, yes: bool, non_interactive: bool) -> anyhow::Result<bool> {
    if yes {
        Ok(true)
    } else if non_interactive {
        anyhow::bail!("--yes is required for destructive operations in non-interactive mode");
    } else {
        Ok(inquire::Confirm::new(message)
            .with_default(false)
            .prompt()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_relative_time() {
        let now = Utc::now();
        assert_eq!(format_relative_time(&now), "just now");
        assert_eq!(format_relative_time(&(now - Duration::minutes(1))), "1 minute ago");
        assert_eq!(format_relative_time(&(now - Duration::hours(5))), "5 hours ago");
        assert_eq!(format_relative_time(&(now - Duration::days(45))), "1 month ago");
        assert_eq!(format_relative_time(&(now - Duration::days(800))), "2 years ago");
        assert_eq!(format_relative_time(&(now + Duration::days(1))), "in the future");
    }

    #[test]
    fn test_expiry_after_days_bounds() {
        let at = expiry_after_days(30).unwrap();
        let days = (at - Utc::now()).num_days();
        assert!((29..=30).contains(&days));

        assert!(expiry_after_days(0).is_err());
        assert!(expiry_after_days(-7).is_err());
        assert!(expiry_after_days(i64::MAX).is_err());
        assert!(expiry_after_days(1_000_000_000).is_err());
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn test_confirm_action_flags() {
        assert!(confirm_action("Delete?", true, true).unwrap());
        assert!(confirm_action("Delete?", false, true).is_err());
    }
}
