//! Command implementations.
//!
//! Each command runs the route guard first: unauthenticated users are
//! pointed at login, and non-admins are turned away from the admin surface.

pub mod account;
pub mod cart;
pub mod equipment;
pub mod requests;

use thiserror::Error;

use toolcrib_client::{AccessPolicy, AppState, RouteOutcome, authorize};

/// A command was refused by the route guard.
#[derive(Debug, Error)]
pub enum GuardError {
    /// No session: the user must sign in first.
    #[error("not signed in - run `toolcrib account login` first")]
    NotSignedIn,

    /// Signed in, but the command needs the admin capability.
    #[error("administrator capability required")]
    NotAdmin,
}

/// Check the guard before entering a command.
pub fn ensure_access(state: &AppState, policy: AccessPolicy) -> Result<(), GuardError> {
    match authorize(&state.session().current(), policy) {
        RouteOutcome::Allow => Ok(()),
        RouteOutcome::RedirectToLogin => Err(GuardError::NotSignedIn),
        RouteOutcome::RedirectHome => Err(GuardError::NotAdmin),
    }
}
