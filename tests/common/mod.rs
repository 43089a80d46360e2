//! In-process harness: a temp SQLite store behind the real router, driven
//! with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use chrono::Utc;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use skillswap::auth::issue_token;
use skillswap::server::{AppState, create_router};
use skillswap::store::{SqliteStore, Store};
use skillswap::types::{ExperienceLevel, Profile, Skill, SkillType, User};

pub struct TestApp {
    _temp_dir: TempDir,
    pub store: Arc<SqliteStore>,
    router: Router,
    pub admin_token: String,
}

/// A user with a token, as seen by the API.
pub struct TestUser {
    pub id: String,
    pub token: String,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

impl TestApp {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let store = Arc::new(
            SqliteStore::new(temp_dir.path().join("skillswap.db")).expect("failed to open store"),
        );
        store.initialize().expect("failed to initialize store");

        let (admin_token, _) = issue_token(store.as_ref(), None, None).expect("admin token");

        let state = Arc::new(AppState {
            store: store.clone(),
        });

        Self {
            _temp_dir: temp_dir,
            store,
            router: create_router(state),
            admin_token,
        }
    }

    /// Creates a user directly in the store and issues them a token.
    pub fn user(&self, username: &str) -> TestUser {
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            created_at: Utc::now(),
        };
        self.store.create_user(&user).expect("create user");
        let (token, _) = issue_token(self.store.as_ref(), Some(&user.id), None).expect("token");
        TestUser { id: user.id, token }
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("build request"))
            .await
            .expect("router error");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, path: &str, token: &str) -> TestResponse {
        self.request(Method::GET, path, Some(token), None).await
    }

    pub async fn post(&self, path: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::POST, path, Some(token), Some(body)).await
    }

    pub async fn put(&self, path: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, path, Some(token), Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, path, Some(token), None).await
    }

    /// Writes a user, one offering skill and a profile straight to the store,
    /// skipping token issuance. For seeding large browse fixtures.
    pub fn seed_member(&self, full_name: &str, skill_name: &str, is_public: bool) -> String {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: full_name.to_lowercase().replace(' ', "-"),
            created_at: now,
        };
        self.store.create_user(&user).expect("create user");
        self.store
            .create_skill(&Skill {
                id: Uuid::new_v4().to_string(),
                user_id: user.id.clone(),
                skill_name: skill_name.to_string(),
                description: None,
                experience_level: ExperienceLevel::Intermediate,
                skill_type: SkillType::Offering,
                is_priority: false,
                created_at: now,
            })
            .expect("create skill");
        self.store
            .upsert_profile(&Profile {
                id: Uuid::new_v4().to_string(),
                user_id: user.id.clone(),
                full_name: full_name.to_string(),
                location: None,
                bio: None,
                is_public,
                profile_photo: None,
                created_at: now,
                updated_at: now,
            })
            .expect("upsert profile");
        user.id
    }

    /// Follows `next_cursor` from the first browse page to the last and
    /// returns every full name seen, in order, plus the page sizes.
    pub async fn browse_all(&self, viewer: &TestUser, query: &str) -> (Vec<String>, Vec<usize>) {
        let mut names = Vec::new();
        let mut page_sizes = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut path = format!("/api/v1/profiles?{query}");
            if let Some(cursor) = &cursor {
                path.push_str(&format!("&cursor={cursor}"));
            }
            let resp = self.get(&path, &viewer.token).await;
            assert_eq!(resp.status, StatusCode::OK, "{:?}", resp.body);

            let page = resp.body["data"].as_array().expect("page data");
            page_sizes.push(page.len());
            names.extend(
                page.iter()
                    .map(|p| p["full_name"].as_str().expect("full name").to_string()),
            );

            let has_more = resp.body["has_more"].as_bool().expect("has_more");
            let next = resp.body["next_cursor"].as_str().map(str::to_string);
            assert_eq!(has_more, next.is_some(), "cursor present iff has_more");
            if !has_more {
                break;
            }
            assert!(page_sizes.len() < 10, "browse did not terminate");
            cursor = next;
        }

        (names, page_sizes)
    }

    /// Adds a skill and returns its id.
    pub async fn skill(&self, user: &TestUser, name: &str, level: &str, skill_type: &str) -> String {
        let resp = self
            .post(
                "/api/v1/skills",
                &user.token,
                json!({
                    "skill_name": name,
                    "experience_level": level,
                    "skill_type": skill_type,
                }),
            )
            .await;
        assert_eq!(resp.status, StatusCode::CREATED, "{:?}", resp.body);
        resp.data()["id"].as_str().expect("skill id").to_string()
    }

    pub async fn profile(&self, user: &TestUser, full_name: &str, is_public: bool) {
        let resp = self
            .put(
                "/api/v1/profile",
                &user.token,
                json!({ "full_name": full_name, "is_public": is_public }),
            )
            .await;
        assert_eq!(resp.status, StatusCode::OK, "{:?}", resp.body);
    }

    /// A user with a public profile offering `skill`; returns the user and skill id.
    pub async fn member(&self, username: &str, full_name: &str, skill: &str) -> (TestUser, String) {
        let user = self.user(username);
        let skill_id = self.skill(&user, skill, "Intermediate", "offering").await;
        self.profile(&user, full_name, true).await;
        (user, skill_id)
    }

    /// Sends a swap request and returns its id.
    pub async fn swap(&self, from: &TestUser, to: &TestUser, offer: &str, want: &str) -> String {
        let resp = self
            .post(
                "/api/v1/requests",
                &from.token,
                json!({
                    "requested_user_id": to.id,
                    "offered_skill_id": offer,
                    "wanted_skill_id": want,
                    "message": "Want to trade?",
                }),
            )
            .await;
        assert_eq!(resp.status, StatusCode::CREATED, "{:?}", resp.body);
        resp.data()["id"]
            .as_str()
            .expect("request id")
            .to_string()
    }
}
