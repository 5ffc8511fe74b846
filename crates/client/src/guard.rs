//! Route guard: capability checks over session state.
//!
//! A pure function of the session; front-ends decide what a "redirect"
//! means (the CLI prints a hint, a web shell would navigate). Two capability
//! levels exist: any authenticated user, and administrators.

use crate::session::Session;

/// Capability required to enter a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessPolicy {
    /// Any signed-in user.
    #[default]
    Authenticated,
    /// Signed-in administrators only.
    AdminOnly,
}

/// Result of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Render the requested surface.
    Allow,
    /// Not signed in: go to the login entry point.
    RedirectToLogin,
    /// Signed in but lacking the admin capability: go home.
    RedirectHome,
}

impl RouteOutcome {
    /// The navigation target for redirect outcomes.
    #[must_use]
    pub const fn redirect_target(self) -> Option<&'static str> {
        match self {
            Self::Allow => None,
            Self::RedirectToLogin => Some("/login"),
            Self::RedirectHome => Some("/"),
        }
    }
}

/// Evaluate `policy` against the current session.
///
/// Unauthenticated sessions are always redirected to login, whatever the
/// policy; authenticated non-admins hitting an admin surface go home.
#[must_use]
pub fn authorize(session: &Session, policy: AccessPolicy) -> RouteOutcome {
    if !session.is_authenticated {
        return RouteOutcome::RedirectToLogin;
    }

    if matches!(policy, AccessPolicy::AdminOnly) && !session.is_admin() {
        return RouteOutcome::RedirectHome;
    }

    RouteOutcome::Allow
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::session::UserProfile;
    use toolcrib_core::{Email, Role, UserId};

    fn session_with(role: Role) -> Session {
        Session {
            user: Some(UserProfile {
                id: UserId::new(1),
                name: "Test".to_owned(),
                email: Email::parse("user@test.com").unwrap(),
                role,
            }),
            access_token: Some("token".to_owned()),
            refresh_token: Some("refresh".to_owned()),
            is_authenticated: true,
        }
    }

    #[test]
    fn test_anonymous_always_redirects_to_login() {
        let session = Session::default();
        assert_eq!(
            authorize(&session, AccessPolicy::Authenticated),
            RouteOutcome::RedirectToLogin
        );
        assert_eq!(
            authorize(&session, AccessPolicy::AdminOnly),
            RouteOutcome::RedirectToLogin
        );
    }

    #[test]
    fn test_user_allowed_on_plain_routes() {
        assert_eq!(
            authorize(&session_with(Role::User), AccessPolicy::Authenticated),
            RouteOutcome::Allow
        );
    }

    #[test]
    fn test_user_redirected_home_from_admin_routes() {
        assert_eq!(
            authorize(&session_with(Role::User), AccessPolicy::AdminOnly),
            RouteOutcome::RedirectHome
        );
    }

    #[test]
    fn test_admin_allowed_everywhere() {
        assert_eq!(
            authorize(&session_with(Role::Admin), AccessPolicy::Authenticated),
            RouteOutcome::Allow
        );
        assert_eq!(
            authorize(&session_with(Role::Admin), AccessPolicy::AdminOnly),
            RouteOutcome::Allow
        );
    }

    #[test]
    fn test_redirect_targets() {
        assert_eq!(RouteOutcome::Allow.redirect_target(), None);
        assert_eq!(
            RouteOutcome::RedirectToLogin.redirect_target(),
            Some("/login")
        );
        assert_eq!(RouteOutcome::RedirectHome.redirect_target(), Some("/"));
    }
}
