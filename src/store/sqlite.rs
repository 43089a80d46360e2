use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, ffi, params, params_from_iter};

use super::schema::SCHEMA;
use super::{Store, StoreCounts};
use crate::error::{Error, Result};
use crate::types::*;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

/// Fixed-width so that TEXT ordering matches chronological ordering.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_column<T: FromStr<Err = String>>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e: String| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into()))
}

fn parse_json_column<T: serde::de::DeserializeOwned>(
    row: &Row<'_>,
    idx: usize,
) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Extended result code of a constraint violation, if `err` is one.
fn constraint_code(err: &rusqlite::Error) -> Option<i32> {
    match err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            Some(failure.extended_code)
        }
        _ => None,
    }
}

/// Maps unique-key violations to `AlreadyExists` and missing references to `Conflict`.
fn map_insert_error(err: rusqlite::Error) -> Error {
    match constraint_code(&err) {
        Some(ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY) => {
            Error::AlreadyExists
        }
        Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => {
            Error::Conflict("referenced record does not exist".to_string())
        }
        Some(ffi::SQLITE_CONSTRAINT_CHECK) => {
            Error::BadRequest("value violates a column constraint".to_string())
        }
        _ => Error::Database(err),
    }
}

const USER_COLUMNS: &str = "id, username, created_at";

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        created_at: parse_datetime(&row.get::<_, String>(2)?),
    })
}

const TOKEN_COLUMNS: &str =
    "id, token_hash, token_lookup, is_admin, user_id, created_at, expires_at, last_used_at";

fn row_to_token(row: &Row<'_>) -> rusqlite::Result<Token> {
    Ok(Token {
        id: row.get(0)?,
        token_hash: row.get(1)?,
        token_lookup: row.get(2)?,
        is_admin: row.get(3)?,
        user_id: row.get(4)?,
        created_at: parse_datetime(&row.get::<_, String>(5)?),
        expires_at: row.get::<_, Option<String>>(6)?.map(|s| parse_datetime(&s)),
        last_used_at: row.get::<_, Option<String>>(7)?.map(|s| parse_datetime(&s)),
    })
}

const PROFILE_COLUMNS: &str =
    "id, user_id, full_name, location, bio, is_public, profile_photo, created_at, updated_at";

fn row_to_profile(row: &Row<'_>) -> rusqlite::Result<Profile> {
    Ok(Profile {
        id: row.get(0)?,
        user_id: row.get(1)?,
        full_name: row.get(2)?,
        location: row.get(3)?,
        bio: row.get(4)?,
        is_public: row.get(5)?,
        profile_photo: row.get(6)?,
        created_at: parse_datetime(&row.get::<_, String>(7)?),
        updated_at: parse_datetime(&row.get::<_, String>(8)?),
    })
}

const SKILL_COLUMNS: &str =
    "id, user_id, skill_name, description, experience_level, skill_type, is_priority, created_at";

fn row_to_skill(row: &Row<'_>) -> rusqlite::Result<Skill> {
    Ok(Skill {
        id: row.get(0)?,
        user_id: row.get(1)?,
        skill_name: row.get(2)?,
        description: row.get(3)?,
        experience_level: parse_column(row, 4)?,
        skill_type: parse_column(row, 5)?,
        is_priority: row.get(6)?,
        created_at: parse_datetime(&row.get::<_, String>(7)?),
    })
}

const AVAILABILITY_COLUMNS: &str = "id, user_id, days, time_slots, created_at, updated_at";

fn row_to_availability(row: &Row<'_>) -> rusqlite::Result<Availability> {
    Ok(Availability {
        id: row.get(0)?,
        user_id: row.get(1)?,
        days: parse_json_column(row, 2)?,
        time_slots: parse_json_column(row, 3)?,
        created_at: parse_datetime(&row.get::<_, String>(4)?),
        updated_at: parse_datetime(&row.get::<_, String>(5)?),
    })
}

const SWAP_COLUMNS: &str = "id, requester_id, requested_user_id, offered_skill_id, wanted_skill_id, message, status, created_at, updated_at";

fn row_to_swap(row: &Row<'_>) -> rusqlite::Result<SwapRequest> {
    Ok(SwapRequest {
        id: row.get(0)?,
        requester_id: row.get(1)?,
        requested_user_id: row.get(2)?,
        offered_skill_id: row.get(3)?,
        wanted_skill_id: row.get(4)?,
        message: row.get(5)?,
        status: parse_column(row, 6)?,
        created_at: parse_datetime(&row.get::<_, String>(7)?),
        updated_at: parse_datetime(&row.get::<_, String>(8)?),
    })
}

const FEEDBACK_COLUMNS: &str = "id, swap_request_id, reviewer_id, reviewee_id, rating, comment, would_swap_again, created_at";

fn row_to_feedback(row: &Row<'_>) -> rusqlite::Result<Feedback> {
    Ok(Feedback {
        id: row.get(0)?,
        swap_request_id: row.get(1)?,
        reviewer_id: row.get(2)?,
        reviewee_id: row.get(3)?,
        rating: row.get(4)?,
        comment: row.get(5)?,
        would_swap_again: row.get(6)?,
        created_at: parse_datetime(&row.get::<_, String>(7)?),
    })
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // User operations

    fn create_user(&self, user: &User) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO users (id, username, created_at) VALUES (?1, ?2, ?3)",
                params![user.id, user.username, format_datetime(&user.created_at)],
            )
            .map_err(map_insert_error)?;
        Ok(())
    }

    fn get_user(&self, id: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            row_to_user,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
            params![username],
            row_to_user,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_users(&self, cursor: &str, limit: i32) -> Result<Vec<User>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id > ?1 ORDER BY id LIMIT ?2"
        ))?;

        let rows = stmt.query_map(params![cursor, limit], row_to_user)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn delete_user(&self, id: &str) -> Result<bool> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        // Requests on either side cascade with the user, but the skills they reference
        // belong to both participants, so clear the requests before the skills go.
        tx.execute(
            "DELETE FROM swap_requests WHERE requester_id = ?1 OR requested_user_id = ?1
             OR offered_skill_id IN (SELECT id FROM skills WHERE user_id = ?1)
             OR wanted_skill_id IN (SELECT id FROM skills WHERE user_id = ?1)",
            params![id],
        )?;
        let rows = tx.execute("DELETE FROM users WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(rows > 0)
    }

    // Token operations

    fn create_token(&self, token: &Token) -> Result<()> {
        let result = self.conn().execute(
            "INSERT INTO tokens (id, token_hash, token_lookup, is_admin, user_id, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                token.id,
                token.token_hash,
                token.token_lookup,
                token.is_admin,
                token.user_id,
                format_datetime(&token.created_at),
                token.expires_at.as_ref().map(format_datetime),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) if constraint_code(&e) == Some(ffi::SQLITE_CONSTRAINT_UNIQUE) => {
                Err(Error::TokenLookupCollision)
            }
            Err(e) => Err(map_insert_error(e)),
        }
    }

    fn get_token_by_id(&self, id: &str) -> Result<Option<Token>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {TOKEN_COLUMNS} FROM tokens WHERE id = ?1"),
            params![id],
            row_to_token,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_token_by_lookup(&self, lookup: &str) -> Result<Option<Token>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {TOKEN_COLUMNS} FROM tokens WHERE token_lookup = ?1"),
            params![lookup],
            row_to_token,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_tokens(&self, cursor: &str, limit: i32) -> Result<Vec<Token>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {TOKEN_COLUMNS} FROM tokens WHERE id > ?1 ORDER BY id LIMIT ?2"
        ))?;

        let rows = stmt.query_map(params![cursor, limit], row_to_token)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_user_tokens(&self, user_id: &str) -> Result<Vec<Token>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {TOKEN_COLUMNS} FROM tokens WHERE user_id = ?1 ORDER BY created_at DESC"
        ))?;

        let rows = stmt.query_map(params![user_id], row_to_token)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn delete_token(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM tokens WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn update_token_last_used(&self, id: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE tokens SET last_used_at = ?1 WHERE id = ?2",
            params![format_datetime(&Utc::now()), id],
        )?;
        Ok(())
    }

    fn has_admin_token(&self) -> Result<bool> {
        let conn = self.conn();
        let count: i32 = conn.query_row(
            "SELECT COUNT(*) FROM tokens WHERE is_admin = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    // Profile operations

    fn upsert_profile(&self, profile: &Profile) -> Result<Profile> {
        self.conn()
            .execute(
                "INSERT INTO profiles (id, user_id, full_name, location, bio, is_public, profile_photo, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 ON CONFLICT(user_id) DO UPDATE SET
                    full_name = excluded.full_name,
                    location = excluded.location,
                    bio = excluded.bio,
                    is_public = excluded.is_public,
                    profile_photo = excluded.profile_photo,
                    updated_at = excluded.updated_at",
                params![
                    profile.id,
                    profile.user_id,
                    profile.full_name,
                    profile.location,
                    profile.bio,
                    profile.is_public,
                    profile.profile_photo,
                    format_datetime(&profile.created_at),
                    format_datetime(&profile.updated_at),
                ],
            )
            .map_err(map_insert_error)?;

        self.get_profile_by_user(&profile.user_id)?
            .ok_or(Error::NotFound)
    }

    fn get_profile_by_user(&self, user_id: &str) -> Result<Option<Profile>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = ?1"),
            params![user_id],
            row_to_profile,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_public_profiles(
        &self,
        exclude_user_id: &str,
        cursor: &str,
        limit: i32,
    ) -> Result<Vec<Profile>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles
             WHERE is_public = 1 AND user_id != ?1 AND user_id > ?2
             ORDER BY user_id LIMIT ?3"
        ))?;

        let rows = stmt.query_map(params![exclude_user_id, cursor, limit], row_to_profile)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Skill operations

    fn create_skill(&self, skill: &Skill) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO skills (id, user_id, skill_name, description, experience_level, skill_type, is_priority, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    skill.id,
                    skill.user_id,
                    skill.skill_name,
                    skill.description,
                    skill.experience_level.as_str(),
                    skill.skill_type.as_str(),
                    skill.is_priority,
                    format_datetime(&skill.created_at),
                ],
            )
            .map_err(map_insert_error)?;
        Ok(())
    }

    fn get_skill(&self, id: &str) -> Result<Option<Skill>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {SKILL_COLUMNS} FROM skills WHERE id = ?1"),
            params![id],
            row_to_skill,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_user_skills(&self, user_id: &str, skill_type: Option<SkillType>) -> Result<Vec<Skill>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {SKILL_COLUMNS} FROM skills
             WHERE user_id = ?1 AND (?2 IS NULL OR skill_type = ?2)
             ORDER BY created_at, id"
        ))?;

        let rows = stmt.query_map(
            params![user_id, skill_type.map(SkillType::as_str)],
            row_to_skill,
        )?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_skills_for_users(&self, user_ids: &[String]) -> Result<Vec<Skill>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; user_ids.len()].join(", ");
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {SKILL_COLUMNS} FROM skills WHERE user_id IN ({placeholders}) ORDER BY created_at, id"
        ))?;

        let rows = stmt.query_map(params_from_iter(user_ids.iter()), row_to_skill)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_skill(&self, skill: &Skill) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE skills SET skill_name = ?1, description = ?2, experience_level = ?3, is_priority = ?4
             WHERE id = ?5",
            params![
                skill.skill_name,
                skill.description,
                skill.experience_level.as_str(),
                skill.is_priority,
                skill.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_skill(&self, id: &str) -> Result<bool> {
        let result = self
            .conn()
            .execute("DELETE FROM skills WHERE id = ?1", params![id]);

        match result {
            Ok(rows) => Ok(rows > 0),
            Err(e) if constraint_code(&e) == Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => Err(
                Error::Conflict("skill is referenced by a swap request".to_string()),
            ),
            Err(e) => Err(Error::from(e)),
        }
    }

    // Availability operations

    fn upsert_availability(&self, availability: &Availability) -> Result<Availability> {
        let days = serde_json::to_string(&canonical_set(availability.days.clone()))?;
        let time_slots = serde_json::to_string(&canonical_set(availability.time_slots.clone()))?;

        self.conn()
            .execute(
                "INSERT INTO availability (id, user_id, days, time_slots, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(user_id) DO UPDATE SET
                    days = excluded.days,
                    time_slots = excluded.time_slots,
                    updated_at = excluded.updated_at",
                params![
                    availability.id,
                    availability.user_id,
                    days,
                    time_slots,
                    format_datetime(&availability.created_at),
                    format_datetime(&availability.updated_at),
                ],
            )
            .map_err(map_insert_error)?;

        self.get_availability(&availability.user_id)?
            .ok_or(Error::NotFound)
    }

    fn get_availability(&self, user_id: &str) -> Result<Option<Availability>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {AVAILABILITY_COLUMNS} FROM availability WHERE user_id = ?1"),
            params![user_id],
            row_to_availability,
        )
        .optional()
        .map_err(Error::from)
    }

    // Swap request operations

    fn create_swap_request(&self, request: &SwapRequest) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO swap_requests (id, requester_id, requested_user_id, offered_skill_id, wanted_skill_id, message, status, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    request.id,
                    request.requester_id,
                    request.requested_user_id,
                    request.offered_skill_id,
                    request.wanted_skill_id,
                    request.message,
                    request.status.as_str(),
                    format_datetime(&request.created_at),
                    format_datetime(&request.updated_at),
                ],
            )
            .map_err(map_insert_error)?;
        Ok(())
    }

    fn get_swap_request(&self, id: &str) -> Result<Option<SwapRequest>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {SWAP_COLUMNS} FROM swap_requests WHERE id = ?1"),
            params![id],
            row_to_swap,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_user_swap_requests(&self, user_id: &str) -> Result<Vec<SwapRequest>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {SWAP_COLUMNS} FROM swap_requests
             WHERE requester_id = ?1 OR requested_user_id = ?1
             ORDER BY created_at DESC, id DESC"
        ))?;

        let rows = stmt.query_map(params![user_id], row_to_swap)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_swap_status(&self, id: &str, from: SwapStatus, to: SwapStatus) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE swap_requests SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4",
            params![to.as_str(), format_datetime(&Utc::now()), id, from.as_str()],
        )?;

        if rows == 0 {
            return match self.get_swap_request(id)? {
                Some(current) => Err(Error::Conflict(format!(
                    "swap request is {}, expected {}",
                    current.status, from
                ))),
                None => Err(Error::NotFound),
            };
        }
        Ok(())
    }

    // Feedback operations

    fn create_feedback(&self, feedback: &Feedback) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO feedback (id, swap_request_id, reviewer_id, reviewee_id, rating, comment, would_swap_again, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    feedback.id,
                    feedback.swap_request_id,
                    feedback.reviewer_id,
                    feedback.reviewee_id,
                    feedback.rating,
                    feedback.comment,
                    feedback.would_swap_again,
                    format_datetime(&feedback.created_at),
                ],
            )
            .map_err(map_insert_error)?;
        Ok(())
    }

    fn list_swap_feedback(&self, swap_request_id: &str) -> Result<Vec<Feedback>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE swap_request_id = ?1 ORDER BY created_at"
        ))?;

        let rows = stmt.query_map(params![swap_request_id], row_to_feedback)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_received_feedback(&self, user_id: &str) -> Result<Vec<Feedback>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE reviewee_id = ?1 ORDER BY created_at DESC"
        ))?;

        let rows = stmt.query_map(params![user_id], row_to_feedback)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn rating_summary(&self, user_id: &str) -> Result<RatingSummary> {
        let conn = self.conn();
        conn.query_row(
            "SELECT COUNT(*), COALESCE(AVG(rating), 0.0), COALESCE(SUM(would_swap_again), 0)
             FROM feedback WHERE reviewee_id = ?1",
            params![user_id],
            |row| {
                Ok(RatingSummary {
                    count: row.get(0)?,
                    average: row.get(1)?,
                    would_swap_again: row.get(2)?,
                })
            },
        )
        .map_err(Error::from)
    }

    fn counts(&self) -> Result<StoreCounts> {
        let conn = self.conn();
        let count = |sql: &str| -> Result<i64> {
            conn.query_row(sql, [], |row| row.get(0)).map_err(Error::from)
        };

        let mut counts = StoreCounts {
            users: count("SELECT COUNT(*) FROM users")?,
            tokens: count("SELECT COUNT(*) FROM tokens")?,
            profiles: count("SELECT COUNT(*) FROM profiles")?,
            public_profiles: count("SELECT COUNT(*) FROM profiles WHERE is_public = 1")?,
            skills: count("SELECT COUNT(*) FROM skills")?,
            feedback: count("SELECT COUNT(*) FROM feedback")?,
            ..StoreCounts::default()
        };

        let mut stmt = conn.prepare("SELECT status, COUNT(*) FROM swap_requests GROUP BY status")?;
        let rows = stmt.query_map([], |row| {
            Ok((parse_column::<SwapStatus>(row, 0)?, row.get::<_, i64>(1)?))
        })?;
        for row in rows {
            let (status, n) = row?;
            match status {
                SwapStatus::Pending => counts.requests_pending = n,
                SwapStatus::Accepted => counts.requests_accepted = n,
                SwapStatus::Rejected => counts.requests_rejected = n,
                SwapStatus::Completed => counts.requests_completed = n,
            }
        }

        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_store() -> (TempDir, SqliteStore) {
        let temp = TempDir::new().unwrap();
        let store = SqliteStore::new(temp.path().join("test.db")).unwrap();
        store.initialize().unwrap();
        (temp, store)
    }

    fn user(store: &SqliteStore, id: &str) -> User {
        let user = User {
            id: id.to_string(),
            username: format!("user-{id}"),
            created_at: Utc::now(),
        };
        store.create_user(&user).unwrap();
        user
    }

    fn profile(user_id: &str, name: &str, is_public: bool) -> Profile {
        Profile {
            id: format!("profile-{user_id}"),
            user_id: user_id.to_string(),
            full_name: name.to_string(),
            location: Some("Austin".to_string()),
            bio: None,
            is_public,
            profile_photo: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn skill(store: &SqliteStore, id: &str, user_id: &str, skill_type: SkillType) -> Skill {
        let skill = Skill {
            id: id.to_string(),
            user_id: user_id.to_string(),
            skill_name: format!("Skill {id}"),
            description: None,
            experience_level: ExperienceLevel::Intermediate,
            skill_type,
            is_priority: false,
            created_at: Utc::now(),
        };
        store.create_skill(&skill).unwrap();
        skill
    }

    fn swap(store: &SqliteStore, id: &str, from: &str, to: &str, offer: &str, want: &str) -> SwapRequest {
        let request = SwapRequest {
            id: id.to_string(),
            requester_id: from.to_string(),
            requested_user_id: to.to_string(),
            offered_skill_id: offer.to_string(),
            wanted_skill_id: want.to_string(),
            message: Some("hello".to_string()),
            status: SwapStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        store.create_swap_request(&request).unwrap();
        request
    }

    #[test]
    fn test_initialize_creates_tables() {
        let (_temp, store) = open_store();

        let conn = store.conn();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();

        for table in [
            "users",
            "tokens",
            "profiles",
            "skills",
            "availability",
            "swap_requests",
            "feedback",
        ] {
            assert!(tables.contains(&table.to_string()), "missing {table}");
        }
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let (_temp, store) = open_store();
        store.initialize().unwrap();
    }

    #[test]
    fn test_duplicate_username() {
        let (_temp, store) = open_store();
        user(&store, "u1");

        let dup = User {
            id: "u2".to_string(),
            username: "user-u1".to_string(),
            created_at: Utc::now(),
        };
        assert!(matches!(store.create_user(&dup), Err(Error::AlreadyExists)));
    }

    #[test]
    fn test_token_lookup_collision() {
        let (_temp, store) = open_store();

        let token1 = Token {
            id: "token-1".to_string(),
            token_hash: "hash1".to_string(),
            token_lookup: "lookup12".to_string(),
            is_admin: true,
            user_id: None,
            created_at: Utc::now(),
            expires_at: None,
            last_used_at: None,
        };
        store.create_token(&token1).unwrap();
        assert!(store.has_admin_token().unwrap());

        let token2 = Token {
            id: "token-2".to_string(),
            token_hash: "hash2".to_string(),
            ..token1.clone()
        };

        let result = store.create_token(&token2);
        assert!(matches!(result, Err(Error::TokenLookupCollision)));
    }

    #[test]
    fn test_profile_upsert_keeps_one_row_per_user() {
        let (_temp, store) = open_store();
        user(&store, "u1");

        let first = store.upsert_profile(&profile("u1", "Marc", true)).unwrap();

        let mut changed = profile("u1", "Marc Demo", false);
        changed.id = "another-id".to_string();
        changed.bio = Some("Web developer".to_string());
        let second = store.upsert_profile(&changed).unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.full_name, "Marc Demo");
        assert!(!second.is_public);
        assert_eq!(second.bio.as_deref(), Some("Web developer"));

        let count: i64 = store
            .conn()
            .query_row("SELECT COUNT(*) FROM profiles", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_list_public_profiles_excludes_private_and_caller() {
        let (_temp, store) = open_store();
        for id in ["a", "b", "c", "d"] {
            user(&store, id);
        }
        store.upsert_profile(&profile("a", "Alice", true)).unwrap();
        store.upsert_profile(&profile("b", "Bob", true)).unwrap();
        store.upsert_profile(&profile("c", "Carol", false)).unwrap();
        store.upsert_profile(&profile("d", "Dave", true)).unwrap();

        let listed = store.list_public_profiles("a", "", 10).unwrap();
        let ids: Vec<_> = listed.iter().map(|p| p.user_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d"]);

        let page = store.list_public_profiles("a", "b", 10).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].user_id, "d");
    }

    #[test]
    fn test_skills_filter_and_batch() {
        let (_temp, store) = open_store();
        user(&store, "a");
        user(&store, "b");
        skill(&store, "s1", "a", SkillType::Offering);
        skill(&store, "s2", "a", SkillType::Wanted);
        skill(&store, "s3", "b", SkillType::Offering);

        let offering = store.list_user_skills("a", Some(SkillType::Offering)).unwrap();
        assert_eq!(offering.len(), 1);
        assert_eq!(offering[0].id, "s1");
        assert_eq!(store.list_user_skills("a", None).unwrap().len(), 2);

        let batch = store
            .list_skills_for_users(&["a".to_string(), "b".to_string()])
            .unwrap();
        assert_eq!(batch.len(), 3);
        assert!(store.list_skills_for_users(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_delete_referenced_skill_conflicts() {
        let (_temp, store) = open_store();
        user(&store, "a");
        user(&store, "b");
        skill(&store, "s1", "a", SkillType::Offering);
        skill(&store, "s2", "b", SkillType::Offering);
        skill(&store, "s3", "a", SkillType::Wanted);
        swap(&store, "r1", "a", "b", "s1", "s2");

        assert!(matches!(store.delete_skill("s1"), Err(Error::Conflict(_))));
        assert!(store.delete_skill("s3").unwrap());
        assert!(!store.delete_skill("s3").unwrap());
    }

    #[test]
    fn test_availability_is_canonicalized() {
        let (_temp, store) = open_store();
        user(&store, "a");

        let saved = store
            .upsert_availability(&Availability {
                id: "av-1".to_string(),
                user_id: "a".to_string(),
                days: vec![Weekday::Friday, Weekday::Monday, Weekday::Friday],
                time_slots: vec![TimeSlot::Evening, TimeSlot::Morning],
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .unwrap();

        assert_eq!(saved.days, vec![Weekday::Monday, Weekday::Friday]);
        assert_eq!(saved.time_slots, vec![TimeSlot::Morning, TimeSlot::Evening]);
    }

    #[test]
    fn test_swap_status_compare_and_set() {
        let (_temp, store) = open_store();
        user(&store, "a");
        user(&store, "b");
        skill(&store, "s1", "a", SkillType::Offering);
        skill(&store, "s2", "b", SkillType::Offering);
        swap(&store, "r1", "a", "b", "s1", "s2");

        store
            .update_swap_status("r1", SwapStatus::Pending, SwapStatus::Accepted)
            .unwrap();

        let lost = store.update_swap_status("r1", SwapStatus::Pending, SwapStatus::Rejected);
        assert!(matches!(lost, Err(Error::Conflict(_))));

        let missing = store.update_swap_status("nope", SwapStatus::Pending, SwapStatus::Accepted);
        assert!(matches!(missing, Err(Error::NotFound)));

        let stored = store.get_swap_request("r1").unwrap().unwrap();
        assert_eq!(stored.status, SwapStatus::Accepted);
    }

    #[test]
    fn test_feedback_unique_per_reviewer_and_summary() {
        let (_temp, store) = open_store();
        user(&store, "a");
        user(&store, "b");
        skill(&store, "s1", "a", SkillType::Offering);
        skill(&store, "s2", "b", SkillType::Offering);
        swap(&store, "r1", "a", "b", "s1", "s2");

        let feedback = Feedback {
            id: "f1".to_string(),
            swap_request_id: "r1".to_string(),
            reviewer_id: "a".to_string(),
            reviewee_id: "b".to_string(),
            rating: 4,
            comment: None,
            would_swap_again: true,
            created_at: Utc::now(),
        };
        store.create_feedback(&feedback).unwrap();

        let dup = Feedback {
            id: "f2".to_string(),
            ..feedback.clone()
        };
        assert!(matches!(store.create_feedback(&dup), Err(Error::AlreadyExists)));

        let out_of_range = Feedback {
            id: "f3".to_string(),
            reviewer_id: "b".to_string(),
            reviewee_id: "a".to_string(),
            rating: 9,
            ..feedback.clone()
        };
        assert!(matches!(
            store.create_feedback(&out_of_range),
            Err(Error::BadRequest(_))
        ));

        let summary = store.rating_summary("b").unwrap();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.average, 4.0);
        assert_eq!(summary.would_swap_again, 1);

        assert_eq!(store.rating_summary("a").unwrap(), RatingSummary::default());
    }

    #[test]
    fn test_delete_user_cascades() {
        let (_temp, store) = open_store();
        user(&store, "a");
        user(&store, "b");
        store.upsert_profile(&profile("a", "Alice", true)).unwrap();
        skill(&store, "s1", "a", SkillType::Offering);
        skill(&store, "s2", "b", SkillType::Offering);
        swap(&store, "r1", "b", "a", "s2", "s1");

        assert!(store.delete_user("a").unwrap());

        assert!(store.get_profile_by_user("a").unwrap().is_none());
        assert!(store.get_skill("s1").unwrap().is_none());
        assert!(store.get_swap_request("r1").unwrap().is_none());
        assert!(store.get_skill("s2").unwrap().is_some());

        let counts = store.counts().unwrap();
        assert_eq!(counts.users, 1);
        assert_eq!(counts.requests_pending, 0);
    }
}
