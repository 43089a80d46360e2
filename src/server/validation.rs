use crate::server::response::ApiError;

const MAX_USERNAME_LEN: usize = 64;
const MAX_FULL_NAME_LEN: usize = 100;
const MAX_SKILL_NAME_LEN: usize = 100;
const MAX_LOCATION_LEN: usize = 100;
const MAX_BIO_LEN: usize = 1000;
const MAX_DESCRIPTION_LEN: usize = 1000;
const MAX_MESSAGE_LEN: usize = 1000;
const MAX_COMMENT_LEN: usize = 1000;
const MAX_URL_LEN: usize = 2048;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

fn is_valid_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

pub fn validate_username(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Username cannot be empty".to_string());
    }
    if name.len() > MAX_USERNAME_LEN {
        return Err(format!(
            "Username cannot exceed {MAX_USERNAME_LEN} characters"
        ));
    }
    if !name.chars().all(is_valid_name_char) {
        return Err(
            "Username can only contain alphanumeric characters, hyphens, and underscores"
                .to_string(),
        );
    }
    if name.starts_with('-') || name.starts_with('_') {
        return Err("Username cannot start with a hyphen or underscore".to_string());
    }
    Ok(())
}

/// Trims `value` and checks it is non-empty and within `max_len` characters.
fn required_text(value: &str, field: &str, max_len: usize) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::bad_request(format!("{field} is required")));
    }
    if trimmed.chars().count() > max_len {
        return Err(ApiError::bad_request(format!(
            "{field} cannot exceed {max_len} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trims `value`; blank input becomes `None`.
fn optional_text(
    value: Option<&str>,
    field: &str,
    max_len: usize,
) -> Result<Option<String>, ApiError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if v.chars().count() > max_len => Err(ApiError::bad_request(format!(
            "{field} cannot exceed {max_len} characters"
        ))),
        Some(v) => Ok(Some(v.to_string())),
    }
}

pub fn validate_full_name(name: &str) -> Result<String, ApiError> {
    required_text(name, "Full name", MAX_FULL_NAME_LEN)
}

pub fn validate_skill_name(name: &str) -> Result<String, ApiError> {
    required_text(name, "Skill name", MAX_SKILL_NAME_LEN)
}

pub fn validate_location(location: Option<&str>) -> Result<Option<String>, ApiError> {
    optional_text(location, "Location", MAX_LOCATION_LEN)
}

pub fn validate_bio(bio: Option<&str>) -> Result<Option<String>, ApiError> {
    optional_text(bio, "Bio", MAX_BIO_LEN)
}

pub fn validate_description(description: Option<&str>) -> Result<Option<String>, ApiError> {
    optional_text(description, "Description", MAX_DESCRIPTION_LEN)
}

pub fn validate_message(message: Option<&str>) -> Result<Option<String>, ApiError> {
    optional_text(message, "Message", MAX_MESSAGE_LEN)
}

pub fn validate_comment(comment: Option<&str>) -> Result<Option<String>, ApiError> {
    optional_text(comment, "Comment", MAX_COMMENT_LEN)
}

pub fn validate_photo_url(url: Option<&str>) -> Result<Option<String>, ApiError> {
    let Some(url) = optional_text(url, "Profile photo URL", MAX_URL_LEN)? else {
        return Ok(None);
    };
    let has_host = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .is_some_and(|rest| !rest.is_empty() && !rest.starts_with('/'));
    if !has_host || url.chars().any(char::is_whitespace) {
        return Err(ApiError::bad_request(
            "Profile photo must be an http or https URL",
        ));
    }
    Ok(Some(url))
}

pub fn validate_rating(rating: i64) -> Result<u8, ApiError> {
    u8::try_from(rating)
        .ok()
        .filter(|r| (MIN_RATING..=MAX_RATING).contains(r))
        .ok_or_else(|| {
            ApiError::bad_request(format!(
                "Rating must be between {MIN_RATING} and {MAX_RATING}"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("alice-b_2").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("-alice").is_err());
        assert!(validate_username("_alice").is_err());
        assert!(validate_username("alice smith").is_err());
        assert!(validate_username(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_full_name_is_trimmed_and_required() {
        assert_eq!(validate_full_name("  Marc Demo ").unwrap(), "Marc Demo");
        assert!(validate_full_name("   ").is_err());
        assert!(validate_full_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_optional_text_blank_is_none() {
        assert_eq!(validate_bio(Some("   ")).unwrap(), None);
        assert_eq!(validate_bio(None).unwrap(), None);
        assert_eq!(
            validate_location(Some(" Austin ")).unwrap().as_deref(),
            Some("Austin")
        );
        assert!(validate_bio(Some(&"b".repeat(1001))).is_err());
    }

    #[test]
    fn test_photo_url() {
        assert!(validate_photo_url(Some("https://example.com/me.png")).is_ok());
        assert!(validate_photo_url(Some("http://cdn.example.com/a")).is_ok());
        assert_eq!(validate_photo_url(Some("")).unwrap(), None);
        assert!(validate_photo_url(Some("ftp://example.com/me.png")).is_err());
        assert!(validate_photo_url(Some("https://")).is_err());
        assert!(validate_photo_url(Some("https://exa mple.com")).is_err());
    }

    #[test]
    fn test_rating_bounds() {
        assert_eq!(validate_rating(1).unwrap(), 1);
        assert_eq!(validate_rating(5).unwrap(), 5);
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
        assert!(validate_rating(-3).is_err());
        assert!(validate_rating(300).is_err());
    }
}
