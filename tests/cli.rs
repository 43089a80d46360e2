//! Drives the `skillswap` binary's admin commands against a temp data dir.
//!
//! Every test gets its own directory, so they run in parallel safely.

#![allow(deprecated)] // Command::cargo_bin deprecation only affects custom build dirs

use std::path::Path;

use assert_cmd::Command;
use assert_cmd::assert::Assert;
use assert_fs::TempDir;
use chrono::Utc;
use predicates::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use skillswap::store::{SqliteStore, Store};
use skillswap::types::{ExperienceLevel, Profile, Skill, SkillType};

struct Site {
    dir: TempDir,
}

impl Site {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// A site that has already run `admin init`.
    fn initialized() -> Self {
        let site = Self::new();
        site.init().success();
        site
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn data_dir(&self) -> String {
        self.path().to_string_lossy().into_owned()
    }

    fn bin() -> Command {
        let mut cmd = Command::cargo_bin("skillswap").expect("failed to find binary");
        cmd.env("NO_COLOR", "1");
        cmd
    }

    /// `skillswap admin <args> --data-dir <dir>`
    fn admin(&self, args: &[&str]) -> Assert {
        Self::bin()
            .arg("admin")
            .args(args)
            .args(["--data-dir", &self.data_dir()])
            .assert()
    }

    fn init(&self) -> Assert {
        self.admin(&["init", "--non-interactive"])
    }

    fn info(&self) -> Value {
        let assert = self.admin(&["info", "--json"]).success();
        serde_json::from_slice(&assert.get_output().stdout).expect("info is not JSON")
    }

    fn tokens(&self) -> Vec<Value> {
        let assert = self
            .admin(&["token", "create", "--list", "--json"])
            .success();
        serde_json::from_slice(&assert.get_output().stdout).expect("token list is not JSON")
    }

    fn users(&self) -> Vec<Value> {
        self.info()["users"]
            .as_array()
            .expect("users not an array")
            .clone()
    }

    fn add_user(&self, username: &str) -> Assert {
        self.admin(&["user", "add", "--username", username, "--non-interactive"])
    }

    /// Adds a user and returns their id.
    fn member(&self, username: &str) -> String {
        self.add_user(username).success();
        self.users()
            .iter()
            .find(|u| u["username"] == username)
            .and_then(|u| u["id"].as_str())
            .expect("user not listed")
            .to_string()
    }

    fn issue(&self, user_id: &str) -> Assert {
        self.admin(&["token", "create", "--user-id", user_id, "--non-interactive"])
    }

    fn revoke(&self, token_id: &str) -> Assert {
        self.admin(&["token", "revoke", "--token-id", token_id, "--non-interactive", "--yes"])
    }

    fn remove(&self, user_id: &str) -> Assert {
        self.admin(&["user", "remove", "--user-id", user_id, "--non-interactive", "--yes"])
    }

    /// Writes an offering skill and a profile straight into the database.
    fn seed_profile(&self, user_id: &str, is_public: bool) {
        let store = SqliteStore::new(self.path().join("skillswap.db")).expect("open store");
        let now = Utc::now();
        store
            .create_skill(&Skill {
                id: Uuid::new_v4().to_string(),
                user_id: user_id.to_string(),
                skill_name: "Python".to_string(),
                description: None,
                experience_level: ExperienceLevel::Expert,
                skill_type: SkillType::Offering,
                is_priority: false,
                created_at: now,
            })
            .expect("create skill");
        store
            .upsert_profile(&Profile {
                id: Uuid::new_v4().to_string(),
                user_id: user_id.to_string(),
                full_name: "Test Person".to_string(),
                location: None,
                bio: None,
                is_public,
                profile_photo: None,
                created_at: now,
                updated_at: now,
            })
            .expect("create profile");
    }
}

fn tokens_of<'a>(tokens: &'a [Value], user_id: &str) -> Vec<&'a Value> {
    tokens
        .iter()
        .filter(|t| t["user_id"].as_str() == Some(user_id))
        .collect()
}

// ----------------------------------------------------------------------------
// admin init / serve
// ----------------------------------------------------------------------------

#[test]
fn init_writes_database_and_admin_token() {
    let site = Site::new();
    site.init().success();

    assert!(site.path().join("skillswap.db").exists());

    let token = std::fs::read_to_string(site.path().join(".admin_token"))
        .expect("failed to read token file");
    assert!(token.starts_with("skillswap_"));
}

#[test]
fn init_twice_is_rejected_and_keeps_data() {
    let site = Site::initialized();
    site.member("testuser");

    site.init()
        .failure()
        .stderr(predicate::str::contains("already initialized"));

    assert!(site.users().iter().any(|u| u["username"] == "testuser"));
}

#[test]
fn admin_commands_need_an_initialized_site() {
    let site = Site::new();

    site.add_user("alice")
        .failure()
        .stderr(predicate::str::contains("skillswap admin init"));
}

#[test]
fn serve_refuses_to_start_before_init() {
    let site = Site::new();

    Site::bin()
        .args(["serve", "--data-dir", &site.data_dir(), "--port", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

// ----------------------------------------------------------------------------
// admin user
// ----------------------------------------------------------------------------

#[test]
fn usernames_are_unique_and_validated() {
    let site = Site::initialized();

    site.add_user("alice").success();
    site.add_user("alice")
        .failure()
        .stderr(predicate::str::contains("already exists"));
    site.add_user("-bob").failure();
    site.add_user("bob smith").failure();

    assert_eq!(site.users().len(), 1);
}

#[test]
fn user_add_can_issue_a_token() {
    let site = Site::initialized();

    site.admin(&[
        "user",
        "add",
        "--username",
        "bob",
        "--create-token",
        "--non-interactive",
    ])
    .success()
    .stdout(predicate::str::contains("Token created: skillswap_"))
    .stdout(predicate::str::contains("skillswap auth login"));

    let bob = site.users()[0]["id"].as_str().expect("id").to_string();
    assert_eq!(tokens_of(&site.tokens(), &bob).len(), 1);
}

#[test]
fn user_remove_needs_yes_when_non_interactive() {
    let site = Site::initialized();
    let alice = site.member("alice");

    site.admin(&["user", "remove", "--user-id", &alice, "--non-interactive"])
        .failure()
        .stderr(predicate::str::contains("--yes"));

    assert_eq!(site.users().len(), 1);
}

#[test]
fn user_remove_takes_tokens_profile_and_skills_along() {
    let site = Site::initialized();
    let alice = site.member("alice");
    site.issue(&alice).success();
    site.issue(&alice).success();
    site.seed_profile(&alice, true);

    assert_eq!(tokens_of(&site.tokens(), &alice).len(), 2);
    assert_eq!(site.info()["counts"]["profiles"], 1);

    site.remove(&alice).success();

    assert!(tokens_of(&site.tokens(), &alice).is_empty());
    let counts = &site.info()["counts"];
    assert_eq!(counts["users"], 0);
    assert_eq!(counts["profiles"], 0);
    assert_eq!(counts["skills"], 0);
}

// ----------------------------------------------------------------------------
// admin token
// ----------------------------------------------------------------------------

#[test]
fn fresh_site_lists_only_the_admin_token() {
    let site = Site::initialized();

    let tokens = site.tokens();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0]["is_admin"], true);
    assert_eq!(tokens[0]["expired"], false);
}

#[test]
fn token_create_for_unknown_user_fails() {
    let site = Site::initialized();

    site.issue("no-such-user")
        .failure()
        .stderr(predicate::str::contains("User not found"));
}

#[test]
fn token_create_prints_token_and_expiry() {
    let site = Site::initialized();
    let alice = site.member("alice");

    site.admin(&[
        "token",
        "create",
        "--user-id",
        &alice,
        "--expires-days",
        "7",
        "--non-interactive",
    ])
    .success()
    .stdout(predicate::str::contains("skillswap_"))
    .stdout(predicate::str::contains("Expires:"));

    let tokens = site.tokens();
    let mine = tokens_of(&tokens, &alice);
    assert_eq!(mine.len(), 1);
    assert!(mine[0]["expires_at"].is_string());
}

#[test]
fn token_create_rejects_bad_expiry() {
    let site = Site::initialized();
    let alice = site.member("alice");

    for days in ["--expires-days=0", "--expires-days=-3"] {
        site.admin(&["token", "create", "--user-id", &alice, days, "--non-interactive"])
            .failure()
            .stderr(predicate::str::contains("at least 1 day"));
    }

    site.admin(&[
        "token",
        "create",
        "--user-id",
        &alice,
        "--expires-days",
        "9223372036854775807",
        "--non-interactive",
    ])
    .failure()
    .stderr(predicate::str::contains("too far in the future"));

    assert!(tokens_of(&site.tokens(), &alice).is_empty());
}

#[test]
fn token_revoke_removes_a_user_token() {
    let site = Site::initialized();
    let alice = site.member("alice");
    site.issue(&alice).success();

    let tokens = site.tokens();
    let token_id = tokens_of(&tokens, &alice)[0]["id"]
        .as_str()
        .expect("id not a string")
        .to_string();

    site.revoke(&token_id)
        .success()
        .stdout(predicate::str::contains("Token revoked"));

    assert_eq!(site.tokens().len(), 1);
}

#[test]
fn token_revoke_keeps_the_only_admin_token() {
    let site = Site::initialized();
    let admin_id = site.tokens()[0]["id"]
        .as_str()
        .expect("id not a string")
        .to_string();

    site.revoke(&admin_id)
        .failure()
        .stderr(predicate::str::contains("only admin token"));

    assert_eq!(site.tokens().len(), 1);
}

// ----------------------------------------------------------------------------
// admin info
// ----------------------------------------------------------------------------

#[test]
fn info_reports_counts() {
    let site = Site::initialized();
    let alice = site.member("alice");
    let bob = site.member("bob");
    site.seed_profile(&alice, true);
    site.seed_profile(&bob, false);

    let counts = &site.info()["counts"];
    assert_eq!(counts["users"], 2);
    assert_eq!(counts["tokens"], 1);
    assert_eq!(counts["profiles"], 2);
    assert_eq!(counts["public_profiles"], 1);
    assert_eq!(counts["skills"], 2);
    assert_eq!(counts["requests_pending"], 0);
    assert_eq!(counts["feedback"], 0);

    site.admin(&["info"])
        .success()
        .stdout(predicate::str::contains("Profiles:    2 (1 public)"));
}
