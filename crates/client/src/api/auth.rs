//! Authentication endpoints.

use secrecy::{ExposeSecret, SecretString};
use toolcrib_core::Email;
use tracing::instrument;

use super::types::{LoginBody, LoginResponse, SignupBody, SignupResponse};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Authenticate with email and password.
    ///
    /// Returns the identity and token pair issued by the backend. The caller
    /// (normally the account service) feeds these into the session store.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] when the backend rejects the
    /// credentials - the global 401 policy applies to login like any other
    /// call, so a stale persisted session is cleared on the way out.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<LoginResponse, ApiError> {
        self.post_json(
            "/auth/login",
            &LoginBody {
                email: email.as_str(),
                password: password.expose_secret(),
            },
        )
        .await
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Api`] with the backend's message when the email is
    /// already taken or the input is rejected.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn signup(
        &self,
        name: &str,
        email: &Email,
        password: &SecretString,
    ) -> Result<SignupResponse, ApiError> {
        self.post_json(
            "/auth/signup",
            &SignupBody {
                name,
                email: email.as_str(),
                password: password.expose_secret(),
            },
        )
        .await
    }
}
