//! Session store: the authenticated identity and its tokens.
//!
//! One process-wide container (dependency-injected, not a global) holds the
//! current identity. It has exactly two states: anonymous and authenticated.
//! `set_auth` is the only way in; `logout` and `invalidate` are the ways out.
//! Every transition persists the session blob and notifies observers, so the
//! cart can clear itself without the two stores knowing each other.
//!
//! The persisted blob (`auth-storage`) is also what the API gateway reads at
//! request time when attaching the bearer token.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use toolcrib_core::{Email, Role, UserId};

use crate::storage::{StateRepository, keys};

/// Identity fields issued by the backend at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Account ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: Email,
    /// Account role; gates the admin surface.
    pub role: Role,
}

/// The full session state, exactly as persisted.
///
/// Invariant: `is_authenticated` is true iff `user` and `access_token` are
/// both present. All fields change together under one lock.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// The signed-in user, if any.
    pub user: Option<UserProfile>,
    /// Bearer token attached to authenticated requests.
    pub access_token: Option<String>,
    /// Token used to obtain fresh access tokens.
    pub refresh_token: Option<String>,
    /// Derived flag kept in the blob for cheap checks by readers.
    pub is_authenticated: bool,
}

impl Session {
    /// Whether the session holds a consistent authenticated identity.
    #[must_use]
    pub const fn holds_identity(&self) -> bool {
        self.user.is_some() && self.access_token.is_some()
    }

    /// Whether the signed-in user (if any) is an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.role.is_admin())
    }
}

/// Why the session changed. Observers receive this with every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionChange {
    /// A user signed in, replacing whatever session existed before.
    SignedIn,
    /// The user signed out explicitly.
    SignedOut,
    /// The backend rejected the session (global 401 policy).
    Invalidated,
}

/// Observer notified after every session transition.
///
/// Notifications run synchronously, after the store's own state and
/// persistence are settled, so observers may read the store freely.
pub trait SessionObserver: Send + Sync {
    /// Called once per transition with the reason.
    fn session_changed(&self, change: SessionChange);
}

/// Process-wide session container.
///
/// Cheaply cloneable; all clones share state. Mutations are synchronous and
/// run to completion, which is all the concurrency control this layer needs.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

struct SessionStoreInner {
    state: RwLock<Session>,
    storage: Arc<dyn StateRepository>,
    observers: RwLock<Vec<Arc<dyn SessionObserver>>>,
}

impl SessionStore {
    /// Create a store backed by `storage`, restoring any persisted session.
    ///
    /// A missing or corrupt blob yields an anonymous session. A blob that
    /// violates the identity invariant (flag set without user and token) is
    /// discarded rather than trusted.
    #[must_use]
    pub fn new(storage: Arc<dyn StateRepository>) -> Self {
        let restored = restore(storage.as_ref());

        Self {
            inner: Arc::new(SessionStoreInner {
                state: RwLock::new(restored),
                storage,
                observers: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Register an observer for session transitions.
    pub fn subscribe(&self, observer: Arc<dyn SessionObserver>) {
        self.inner
            .observers
            .write()
            .expect("session observers lock poisoned")
            .push(observer);
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn current(&self) -> Session {
        self.inner
            .state
            .read()
            .expect("session lock poisoned")
            .clone()
    }

    /// Whether a user is currently signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner
            .state
            .read()
            .expect("session lock poisoned")
            .is_authenticated
    }

    /// Replace the session with a freshly authenticated identity.
    ///
    /// Observers are notified with [`SessionChange::SignedIn`]; the cart
    /// clears itself on that signal so a previous user's items never leak
    /// into the new session.
    pub fn set_auth(&self, user: UserProfile, access_token: String, refresh_token: String) {
        let next = Session {
            user: Some(user),
            access_token: Some(access_token),
            refresh_token: Some(refresh_token),
            is_authenticated: true,
        };
        self.replace(next, SessionChange::SignedIn);
    }

    /// Sign out: null every field and notify observers.
    pub fn logout(&self) {
        self.replace(Session::default(), SessionChange::SignedOut);
    }

    /// Drop the session because the backend rejected it.
    ///
    /// Same transition as [`Self::logout`]; the distinct reason lets
    /// front-ends route the user to the login entry point. Clearing happens
    /// before the caller sees the unauthorized error, so persisted stale
    /// credentials cannot be restored by a later restart.
    pub fn invalidate(&self) {
        self.replace(Session::default(), SessionChange::Invalidated);
    }

    /// Swap in a refreshed access token, leaving everything else untouched.
    pub fn update_token(&self, access_token: String) {
        let snapshot = {
            let mut state = self.inner.state.write().expect("session lock poisoned");
            state.access_token = Some(access_token);
            state.clone()
        };
        self.persist(&snapshot);
        // Token rotation is not a transition; observers are not notified.
    }

    fn replace(&self, next: Session, change: SessionChange) {
        let snapshot = {
            let mut state = self.inner.state.write().expect("session lock poisoned");
            *state = next;
            state.clone()
        };
        self.persist(&snapshot);
        self.notify(change);
    }

    fn persist(&self, session: &Session) {
        let result = match serde_json::to_string(session) {
            Ok(blob) => self.inner.storage.save(keys::AUTH_STORAGE, &blob),
            Err(e) => {
                tracing::error!("failed to serialize session: {e}");
                return;
            }
        };
        if let Err(e) = result {
            // Persistence is fire-and-forget; in-memory state stays authoritative.
            tracing::warn!("failed to persist session: {e}");
        }
    }

    fn notify(&self, change: SessionChange) {
        let observers = self
            .inner
            .observers
            .read()
            .expect("session observers lock poisoned");
        for observer in observers.iter() {
            observer.session_changed(change);
        }
    }
}

/// Load and sanity-check the persisted session.
fn restore(storage: &dyn StateRepository) -> Session {
    let blob = match storage.load(keys::AUTH_STORAGE) {
        Ok(Some(blob)) => blob,
        Ok(None) => return Session::default(),
        Err(e) => {
            tracing::warn!("failed to load persisted session: {e}");
            return Session::default();
        }
    };

    match serde_json::from_str::<Session>(&blob) {
        Ok(session) if session.is_authenticated == session.holds_identity() => session,
        Ok(_) => {
            tracing::warn!("persisted session violates identity invariant; discarding");
            Session::default()
        }
        Err(e) => {
            tracing::warn!("failed to parse persisted session: {e}");
            Session::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn profile(role: Role) -> UserProfile {
        UserProfile {
            id: UserId::new(1),
            name: "Test User".to_owned(),
            email: Email::parse("user@test.com").unwrap(),
            role,
        }
    }

    #[test]
    fn test_starts_anonymous() {
        let store = SessionStore::new(Arc::new(MemoryStore::new()));
        let session = store.current();
        assert!(!session.is_authenticated);
        assert!(session.user.is_none());
        assert!(session.access_token.is_none());
        assert!(session.refresh_token.is_none());
    }

    #[test]
    fn test_set_auth_transitions_to_authenticated() {
        let store = SessionStore::new(Arc::new(MemoryStore::new()));
        store.set_auth(profile(Role::User), "access".into(), "refresh".into());

        let session = store.current();
        assert!(session.is_authenticated);
        assert!(session.holds_identity());
        assert_eq!(session.user.unwrap().role, Role::User);
        assert_eq!(session.access_token.as_deref(), Some("access"));
        assert_eq!(session.refresh_token.as_deref(), Some("refresh"));
    }

    #[test]
    fn test_logout_clears_everything() {
        let store = SessionStore::new(Arc::new(MemoryStore::new()));
        store.set_auth(profile(Role::Admin), "access".into(), "refresh".into());
        assert!(store.is_authenticated());

        store.logout();

        let session = store.current();
        assert!(!session.is_authenticated);
        assert!(session.user.is_none());
        assert!(session.access_token.is_none());
        assert!(session.refresh_token.is_none());
    }

    #[test]
    fn test_update_token_touches_only_access_token() {
        let store = SessionStore::new(Arc::new(MemoryStore::new()));
        store.set_auth(profile(Role::User), "old".into(), "refresh".into());

        store.update_token("new".into());

        let session = store.current();
        assert!(session.is_authenticated);
        assert_eq!(session.access_token.as_deref(), Some("new"));
        assert_eq!(session.refresh_token.as_deref(), Some("refresh"));
        assert!(session.user.is_some());
    }

    #[test]
    fn test_persists_and_restores() {
        let storage = Arc::new(MemoryStore::new());
        {
            let store = SessionStore::new(Arc::clone(&storage) as Arc<dyn StateRepository>);
            store.set_auth(profile(Role::Admin), "access".into(), "refresh".into());
        }

        // A fresh store over the same storage sees the session.
        let store = SessionStore::new(storage);
        let session = store.current();
        assert!(session.is_authenticated);
        assert!(session.is_admin());
    }

    #[test]
    fn test_restore_discards_invariant_violation() {
        let storage = Arc::new(MemoryStore::new());
        // Authenticated flag without user or token: must not be trusted.
        storage
            .save(
                keys::AUTH_STORAGE,
                r#"{"user":null,"accessToken":null,"refreshToken":null,"isAuthenticated":true}"#,
            )
            .unwrap();

        let store = SessionStore::new(storage);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_restore_tolerates_corrupt_blob() {
        let storage = Arc::new(MemoryStore::new());
        storage.save(keys::AUTH_STORAGE, "{not json").unwrap();

        let store = SessionStore::new(storage);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_observers_see_every_transition() {
        use std::sync::Mutex;

        #[derive(Default)]
        struct Recorder(Mutex<Vec<SessionChange>>);
        impl SessionObserver for Recorder {
            fn session_changed(&self, change: SessionChange) {
                self.0.lock().unwrap().push(change);
            }
        }

        let store = SessionStore::new(Arc::new(MemoryStore::new()));
        let recorder = Arc::new(Recorder::default());
        store.subscribe(Arc::clone(&recorder) as Arc<dyn SessionObserver>);

        store.set_auth(profile(Role::User), "a".into(), "r".into());
        store.update_token("b".into());
        store.logout();
        store.invalidate();

        assert_eq!(
            *recorder.0.lock().unwrap(),
            vec![
                SessionChange::SignedIn,
                SessionChange::SignedOut,
                SessionChange::Invalidated,
            ]
        );
    }
}
