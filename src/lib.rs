//! # Skillswap
//!
//! A self-hostable skill exchange server. Users publish a profile with the
//! skills they offer and want, browse each other, propose swaps and rate the
//! swaps they complete. Usable both as a standalone binary and as a library.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! skillswap = { version = "0.0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::path::PathBuf;
//! use skillswap::server::{AppState, create_router};
//! use skillswap::store::SqliteStore;
//!
//! let store = SqliteStore::new(&PathBuf::from("./data/skillswap.db")).unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState {
//!     store: Arc::new(store),
//! });
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes CLI module. Disable with `default-features = false`.

pub mod auth;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod server;
pub mod store;
pub mod types;
