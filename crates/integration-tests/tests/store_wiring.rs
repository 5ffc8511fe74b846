//! Cross-crate tests for the store wiring, run entirely in memory.
//!
//! These exercise the production `AppState` composition (session observer,
//! persistence, guard) without a backend.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use toolcrib_client::cart::CartLine;
use toolcrib_client::session::UserProfile;
use toolcrib_client::storage::{MemoryStore, StateRepository, keys};
use toolcrib_client::{AccessPolicy, AppState, ClientConfig, RouteOutcome, authorize};
use toolcrib_core::{Email, EquipmentId, Role, UserId};

use toolcrib_integration_tests::memory_app;

fn profile(role: Role) -> UserProfile {
    UserProfile {
        id: UserId::new(1),
        name: "Test User".to_owned(),
        email: Email::parse("user@test.com").unwrap(),
        role,
    }
}

fn line(id: i64, quantity: u32) -> CartLine {
    CartLine {
        equipment_id: EquipmentId::new(id),
        equipment_name: format!("Item {id}"),
        image_url: String::new(),
        quantity,
        stock: 5,
    }
}

#[test]
fn cart_merges_by_equipment_id() {
    let app = memory_app();
    app.cart().add_line(line(1, 2));
    app.cart().add_line(line(1, 1));

    let lines = app.cart().lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines.first().unwrap().quantity, 3);
}

#[test]
fn sign_in_always_empties_the_cart() {
    let app = memory_app();
    // Items left behind by a previous user of this machine.
    app.cart().add_line(line(1, 2));
    app.cart().add_line(line(2, 1));

    app.session()
        .set_auth(profile(Role::User), "access".into(), "refresh".into());

    assert!(app.cart().is_empty());
}

#[test]
fn logout_flips_authentication_and_drops_tokens() {
    let app = memory_app();
    app.session()
        .set_auth(profile(Role::User), "access".into(), "refresh".into());
    assert!(app.session().is_authenticated());

    app.session().logout();

    let session = app.session().current();
    assert!(!session.is_authenticated);
    assert!(session.access_token.is_none());
    assert!(session.refresh_token.is_none());
}

#[test]
fn guard_matrix_matches_capabilities() {
    let app = memory_app();

    // Anonymous: everything redirects to login.
    let anonymous = app.session().current();
    assert_eq!(
        authorize(&anonymous, AccessPolicy::Authenticated),
        RouteOutcome::RedirectToLogin
    );
    assert_eq!(
        authorize(&anonymous, AccessPolicy::AdminOnly),
        RouteOutcome::RedirectToLogin
    );

    // Plain user: admin surface redirects home.
    app.session()
        .set_auth(profile(Role::User), "access".into(), "refresh".into());
    let user = app.session().current();
    assert_eq!(authorize(&user, AccessPolicy::Authenticated), RouteOutcome::Allow);
    assert_eq!(
        authorize(&user, AccessPolicy::AdminOnly),
        RouteOutcome::RedirectHome
    );

    // Admin: everything allowed.
    app.session()
        .set_auth(profile(Role::Admin), "access".into(), "refresh".into());
    let admin = app.session().current();
    assert_eq!(authorize(&admin, AccessPolicy::AdminOnly), RouteOutcome::Allow);
}

#[test]
fn session_survives_a_process_restart() {
    let storage: Arc<dyn StateRepository> = Arc::new(MemoryStore::new());
    let config = ClientConfig::new("http://localhost:8080/api", "unused").unwrap();

    {
        let app = AppState::with_repository(config.clone(), Arc::clone(&storage));
        app.session()
            .set_auth(profile(Role::Admin), "access".into(), "refresh".into());
        app.cart().add_line(line(3, 1));
    }

    // Same repository, fresh stores - as after a restart.
    let app = AppState::with_repository(config, storage);
    assert!(app.session().is_authenticated());
    assert!(app.session().current().is_admin());
    assert_eq!(app.cart().lines(), vec![line(3, 1)]);
}

#[test]
fn persisted_blobs_live_under_the_expected_keys() {
    let storage = Arc::new(MemoryStore::new());
    let config = ClientConfig::new("http://localhost:8080/api", "unused").unwrap();
    let app = AppState::with_repository(config, Arc::clone(&storage) as Arc<dyn StateRepository>);

    app.session()
        .set_auth(profile(Role::User), "access".into(), "refresh".into());
    app.cart().add_line(line(1, 2));

    let auth_blob = storage.load(keys::AUTH_STORAGE).unwrap().unwrap();
    let auth: serde_json::Value = serde_json::from_str(&auth_blob).unwrap();
    assert_eq!(auth["isAuthenticated"], serde_json::Value::Bool(true));
    assert_eq!(auth["accessToken"], "access");

    let cart_blob = storage.load(keys::CART_STORAGE).unwrap().unwrap();
    let cart: serde_json::Value = serde_json::from_str(&cart_blob).unwrap();
    assert_eq!(cart[0]["equipmentId"], 1);
    assert_eq!(cart[0]["quantity"], 2);
}
