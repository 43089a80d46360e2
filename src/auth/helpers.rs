use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{TokenGenerator, parse_token};
use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::Token;

const MAX_ISSUE_RETRIES: u32 = 3;

#[derive(Debug, PartialEq, Eq)]
pub enum TokenValidationError {
    InvalidScheme,
    InvalidToken,
    TokenExpired,
    InternalError,
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
/// Returns `Ok(None)` when no header is present.
pub fn extract_bearer_token(
    auth_header: Option<&str>,
) -> std::result::Result<Option<&str>, TokenValidationError> {
    match auth_header {
        Some(header) => header
            .strip_prefix("Bearer ")
            .map(|token| Some(token.trim()))
            .ok_or(TokenValidationError::InvalidScheme),
        None => Ok(None),
    }
}

/// Mints and stores a token, retrying on lookup collisions.
/// Returns the raw token (shown once) and the stored record.
pub fn issue_token(
    store: &dyn Store,
    user_id: Option<&str>,
    expires_at: Option<DateTime<Utc>>,
) -> Result<(String, Token)> {
    let generator = TokenGenerator::new();

    for _ in 0..MAX_ISSUE_RETRIES {
        let generated = generator.generate()?;

        let token = Token {
            id: Uuid::new_v4().to_string(),
            token_hash: generated.hash,
            token_lookup: generated.lookup,
            is_admin: user_id.is_none(),
            user_id: user_id.map(str::to_string),
            created_at: Utc::now(),
            expires_at,
            last_used_at: None,
        };

        match store.create_token(&token) {
            Ok(()) => return Ok((generated.raw, token)),
            Err(Error::TokenLookupCollision) => continue,
            Err(e) => return Err(e),
        }
    }

    Err(Error::TokenLookupCollision)
}

/// Validates a raw token string against the store.
pub fn validate_token(
    store: &dyn Store,
    raw_token: &str,
) -> std::result::Result<Token, TokenValidationError> {
    let (lookup, _secret) = parse_token(raw_token).map_err(|_| TokenValidationError::InvalidToken)?;

    let token = store
        .get_token_by_lookup(&lookup)
        .map_err(|e| {
            tracing::error!("Token lookup failed: {e}");
            TokenValidationError::InternalError
        })?
        .ok_or(TokenValidationError::InvalidToken)?;

    let generator = TokenGenerator::new();
    if !generator
        .verify(raw_token, &token.token_hash)
        .map_err(|_| TokenValidationError::InternalError)?
    {
        return Err(TokenValidationError::InvalidToken);
    }

    if let Some(expires_at) = &token.expires_at {
        if expires_at < &Utc::now() {
            return Err(TokenValidationError::TokenExpired);
        }
    }

    if let Err(e) = store.update_token_last_used(&token.id) {
        tracing::warn!("Failed to update token last_used_at: {e}");
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;
    use crate::types::User;
    use tempfile::TempDir;

    fn open_store() -> (TempDir, SqliteStore) {
        let temp = TempDir::new().unwrap();
        let store = SqliteStore::new(temp.path().join("auth.db")).unwrap();
        store.initialize().unwrap();
        (temp, store)
    }

    #[test]
    fn test_issue_and_validate_user_token() {
        let (_temp, store) = open_store();
        store
            .create_user(&User {
                id: "u1".to_string(),
                username: "alice".to_string(),
                created_at: Utc::now(),
            })
            .unwrap();

        let (raw, token) = issue_token(&store, Some("u1"), None).unwrap();
        assert!(!token.is_admin);

        let validated = validate_token(&store, &raw).unwrap();
        assert_eq!(validated.id, token.id);
        assert_eq!(validated.user_id.as_deref(), Some("u1"));

        let touched = store.get_token_by_id(&token.id).unwrap().unwrap();
        assert!(touched.last_used_at.is_some());
    }

    #[test]
    fn test_validate_rejects_unknown_and_expired() {
        let (_temp, store) = open_store();

        assert_eq!(
            validate_token(&store, "skillswap_12345678_123456789012345678901234").unwrap_err(),
            TokenValidationError::InvalidToken
        );
        assert_eq!(
            validate_token(&store, "garbage").unwrap_err(),
            TokenValidationError::InvalidToken
        );

        let expired = Utc::now() - chrono::Duration::seconds(5);
        let (raw, _) = issue_token(&store, None, Some(expired)).unwrap();
        assert_eq!(
            validate_token(&store, &raw).unwrap_err(),
            TokenValidationError::TokenExpired
        );
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token(None), Ok(None));
        assert_eq!(
            extract_bearer_token(Some("Bearer skillswap_abc")),
            Ok(Some("skillswap_abc"))
        );
        assert_eq!(
            extract_bearer_token(Some("Basic eC10b2tlbjpzZWNyZXQ=")),
            Err(TokenValidationError::InvalidScheme)
        );
    }
}
