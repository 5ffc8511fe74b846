//! Application state shared across front-ends.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::cart::CartStore;
use crate::config::ClientConfig;
use crate::services::{AccountService, CatalogService, RequestService};
use crate::session::SessionStore;
use crate::storage::{FileStore, StateRepository, StorageError};

/// Application state wiring the stores, the gateway, and the flow services.
///
/// This struct is cheaply cloneable via `Arc`. It is the one place the
/// session-to-cart observer is connected, so every front-end (CLI, tests)
/// gets the same coupled behavior by construction.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ClientConfig,
    session: SessionStore,
    cart: CartStore,
    api: ApiClient,
    account: AccountService,
    catalog: CatalogService,
    requests: RequestService,
}

impl AppState {
    /// Create application state with file-backed persistence.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the state directory cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, StorageError> {
        let storage: Arc<dyn StateRepository> = Arc::new(FileStore::new(&config.state_dir)?);
        Ok(Self::with_repository(config, storage))
    }

    /// Create application state over an explicit repository.
    ///
    /// Tests pass a [`crate::storage::MemoryStore`] here and get the full
    /// production wiring with no filesystem involved.
    #[must_use]
    pub fn with_repository(config: ClientConfig, storage: Arc<dyn StateRepository>) -> Self {
        let session = SessionStore::new(Arc::clone(&storage));
        let cart = CartStore::new(Arc::clone(&storage));

        // The only Session->Cart coupling in the system: an observer, so the
        // stores stay independently testable.
        session.subscribe(Arc::new(cart.clone()));

        let api = ApiClient::new(&config, storage, session.clone());
        let account = AccountService::new(api.clone(), session.clone());
        let catalog = CatalogService::new(api.clone(), cart.clone());
        let requests = RequestService::new(api.clone(), cart.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                session,
                cart,
                api,
                account,
                catalog,
                requests,
            }),
        }
    }

    /// Get a reference to the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Get a reference to the session store.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the account flows.
    #[must_use]
    pub fn account(&self) -> &AccountService {
        &self.inner.account
    }

    /// Get a reference to the catalog flows.
    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }

    /// Get a reference to the submission flow.
    #[must_use]
    pub fn requests(&self) -> &RequestService {
        &self.inner.requests
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::CartLine;
    use crate::session::UserProfile;
    use crate::storage::MemoryStore;
    use toolcrib_core::{Email, EquipmentId, Role, UserId};

    fn app() -> AppState {
        let config = ClientConfig::new("http://localhost:8080/api", "/tmp/unused").unwrap();
        AppState::with_repository(config, Arc::new(MemoryStore::new()))
    }

    fn profile() -> UserProfile {
        UserProfile {
            id: UserId::new(1),
            name: "Test".to_owned(),
            email: Email::parse("user@test.com").unwrap(),
            role: Role::User,
        }
    }

    fn line() -> CartLine {
        CartLine {
            equipment_id: EquipmentId::new(1),
            equipment_name: "Ladder".to_owned(),
            image_url: String::new(),
            quantity: 2,
            stock: 5,
        }
    }

    #[test]
    fn test_sign_in_clears_previous_users_cart() {
        let app = app();
        app.cart().add_line(line());
        assert!(!app.cart().is_empty());

        app.session()
            .set_auth(profile(), "access".into(), "refresh".into());

        assert!(app.cart().is_empty());
    }

    #[test]
    fn test_logout_clears_cart_and_session() {
        let app = app();
        app.session()
            .set_auth(profile(), "access".into(), "refresh".into());
        app.cart().add_line(line());

        app.account().logout();

        assert!(!app.session().is_authenticated());
        assert!(app.cart().is_empty());
    }

    #[test]
    fn test_invalidate_clears_cart_too() {
        let app = app();
        app.session()
            .set_auth(profile(), "access".into(), "refresh".into());
        app.cart().add_line(line());

        app.session().invalidate();

        assert!(!app.session().is_authenticated());
        assert!(app.cart().is_empty());
    }
}
