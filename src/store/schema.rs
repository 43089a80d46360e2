pub const SCHEMA: &str = r#"
-- Identities that tokens bind to
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    created_at TEXT DEFAULT (datetime('now'))
);

-- Tokens are auth credentials; non-admin tokens must belong to a user
CREATE TABLE IF NOT EXISTS tokens (
    id TEXT PRIMARY KEY,
    token_hash TEXT NOT NULL,          -- argon2id hash with embedded salt
    token_lookup TEXT NOT NULL,        -- first 8 chars of a UUID for fast lookup
    is_admin INTEGER NOT NULL DEFAULT 0,
    user_id TEXT REFERENCES users(id) ON DELETE CASCADE,
    created_at TEXT DEFAULT (datetime('now')),
    expires_at TEXT,            -- NULL = never
    last_used_at TEXT
);

-- One profile per user
CREATE TABLE IF NOT EXISTS profiles (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    full_name TEXT NOT NULL,
    location TEXT,
    bio TEXT,
    is_public INTEGER NOT NULL DEFAULT 1,
    profile_photo TEXT,
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS skills (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    skill_name TEXT NOT NULL,
    description TEXT,
    experience_level TEXT NOT NULL CHECK (experience_level IN ('Beginner', 'Intermediate', 'Expert')),
    skill_type TEXT NOT NULL CHECK (skill_type IN ('offering', 'wanted')),
    is_priority INTEGER NOT NULL DEFAULT 0,
    created_at TEXT DEFAULT (datetime('now'))
);

-- One availability row per user; days and slots are JSON arrays
CREATE TABLE IF NOT EXISTS availability (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    days TEXT NOT NULL DEFAULT '[]',
    time_slots TEXT NOT NULL DEFAULT '[]',
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

-- Skills referenced here cannot be deleted (no ON DELETE action)
CREATE TABLE IF NOT EXISTS swap_requests (
    id TEXT PRIMARY KEY,
    requester_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    requested_user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    offered_skill_id TEXT NOT NULL REFERENCES skills(id),
    wanted_skill_id TEXT NOT NULL REFERENCES skills(id),
    message TEXT,
    status TEXT NOT NULL DEFAULT 'pending' CHECK (status IN ('pending', 'accepted', 'rejected', 'completed')),
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS feedback (
    id TEXT PRIMARY KEY,
    swap_request_id TEXT NOT NULL REFERENCES swap_requests(id) ON DELETE CASCADE,
    reviewer_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    reviewee_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
    comment TEXT,
    would_swap_again INTEGER NOT NULL DEFAULT 1,
    created_at TEXT DEFAULT (datetime('now')),

    UNIQUE(swap_request_id, reviewer_id)
);

-- Create indexes
CREATE UNIQUE INDEX IF NOT EXISTS idx_tokens_lookup ON tokens(token_lookup);
CREATE INDEX IF NOT EXISTS idx_tokens_user ON tokens(user_id);
CREATE INDEX IF NOT EXISTS idx_profiles_public ON profiles(is_public);
CREATE INDEX IF NOT EXISTS idx_skills_user ON skills(user_id);
CREATE INDEX IF NOT EXISTS idx_swap_requests_requester ON swap_requests(requester_id);
CREATE INDEX IF NOT EXISTS idx_swap_requests_requested ON swap_requests(requested_user_id);
CREATE INDEX IF NOT EXISTS idx_swap_requests_offered ON swap_requests(offered_skill_id);
CREATE INDEX IF NOT EXISTS idx_swap_requests_wanted ON swap_requests(wanted_skill_id);
CREATE INDEX IF NOT EXISTS idx_feedback_reviewee ON feedback(reviewee_id);
"#;
