//! Shared helpers for Toolcrib integration tests.
//!
//! Store-level tests run against the in-memory repository and need nothing
//! external. Live-backend tests are `#[ignore]`d and read their target from
//! `TOOLCRIB_API_URL`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use toolcrib_client::storage::MemoryStore;
use toolcrib_client::{AppState, ClientConfig};

/// Base URL for the live backend (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("TOOLCRIB_API_URL").unwrap_or_else(|_| "http://localhost:8080/api".to_owned())
}

/// Application state over an in-memory repository: full production wiring,
/// no filesystem, no leakage between tests.
#[must_use]
pub fn memory_app() -> AppState {
    let config =
        ClientConfig::new(&api_base_url(), "unused").expect("test configuration is valid");
    AppState::with_repository(config, Arc::new(MemoryStore::new()))
}
