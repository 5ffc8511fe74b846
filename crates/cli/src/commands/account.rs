//! Account commands: login, signup, logout, whoami.

use secrecy::SecretString;

use toolcrib_client::AppState;
use toolcrib_client::services::AccountError;

use super::GuardError;

/// Sign in and persist the session.
///
/// # Errors
///
/// Returns `AccountError` when the email is malformed or the backend
/// rejects the credentials.
pub async fn login(state: &AppState, email: &str, password: String) -> Result<(), AccountError> {
    let password = SecretString::from(password);
    let profile = state.account().login(email, &password).await?;

    tracing::info!("Signed in as {} <{}> ({})", profile.name, profile.email, profile.role);
    Ok(())
}

/// Register a new account. Does not sign in.
///
/// # Errors
///
/// Returns `AccountError` when the email is malformed or the backend
/// rejects the registration.
pub async fn signup(
    state: &AppState,
    name: &str,
    email: &str,
    password: String,
) -> Result<(), AccountError> {
    let password = SecretString::from(password);
    let created = state.account().signup(name, email, &password).await?;

    tracing::info!("Account created (id {})", created.user_id);
    tracing::info!("Sign in with `toolcrib account login -e {email}`");
    Ok(())
}

/// Sign out, clearing the persisted session and cart.
pub fn logout(state: &AppState) {
    state.account().logout();
    tracing::info!("Signed out");
}

/// Show the signed-in identity.
///
/// # Errors
///
/// Returns `GuardError::NotSignedIn` when no session exists.
pub fn whoami(state: &AppState) -> Result<(), GuardError> {
    let session = state.account().current();
    let Some(user) = session.user else {
        return Err(GuardError::NotSignedIn);
    };

    tracing::info!("{} <{}> ({})", user.name, user.email, user.role);
    Ok(())
}
