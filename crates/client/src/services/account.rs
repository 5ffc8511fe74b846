//! Sign-in, sign-up, and sign-out flows.

use secrecy::SecretString;
use thiserror::Error;
use toolcrib_core::{Email, EmailError};
use tracing::instrument;

use crate::api::types::SignupResponse;
use crate::api::{ApiClient, ApiError};
use crate::session::{Session, SessionStore, UserProfile};

/// Errors from the account flows.
#[derive(Debug, Error)]
pub enum AccountError {
    /// The supplied email failed structural validation; nothing was sent.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Account flows: the only code that moves identities into the session store.
#[derive(Clone)]
pub struct AccountService {
    api: ApiClient,
    session: SessionStore,
}

impl AccountService {
    /// Create the service over an API client and the session store.
    #[must_use]
    pub const fn new(api: ApiClient, session: SessionStore) -> Self {
        Self { api, session }
    }

    /// Sign in and populate the session store.
    ///
    /// On success the session transitions to authenticated and the cart
    /// clears itself through the session observer.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidEmail`] before any network traffic for
    /// a malformed email, otherwise the underlying [`ApiError`].
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<UserProfile, AccountError> {
        let email = Email::parse(email)?;
        let issued = self.api.login(&email, password).await?;

        let profile = UserProfile {
            id: issued.id,
            name: issued.name,
            email: issued.email,
            role: issued.role,
        };
        self.session
            .set_auth(profile.clone(), issued.access_token, issued.refresh_token);

        tracing::info!(user = %profile.email, role = %profile.role, "signed in");
        Ok(profile)
    }

    /// Register a new account. Does not sign in.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidEmail`] for a malformed email,
    /// otherwise the underlying [`ApiError`].
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<SignupResponse, AccountError> {
        let email = Email::parse(email)?;
        Ok(self.api.signup(name, &email, password).await?)
    }

    /// Sign out, clearing session and cart.
    pub fn logout(&self) {
        self.session.logout();
        tracing::info!("signed out");
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn current(&self) -> Session {
        self.session.current()
    }
}
