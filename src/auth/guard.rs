//! Route guards over the session state

use super::session::SessionState;
use crate::config::DeskConfig;

/// What a guarded surface should do for the current session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Credentials are still being checked; show a loading indicator
    Loading,
    Redirect(String),
    Render,
}

/// Guard for admin-only surfaces
pub fn protected(state: &SessionState, config: &DeskConfig) -> GuardDecision {
    match state {
        SessionState::Checking => GuardDecision::Loading,
        SessionState::Unauthenticated => GuardDecision::Redirect(config.login_route.clone()),
        SessionState::Authenticated { .. } => GuardDecision::Render,
    }
}

/// Guard for surfaces only anonymous users should see, like the login form
pub fn public_only(state: &SessionState, config: &DeskConfig) -> GuardDecision {
    match state {
        SessionState::Checking => GuardDecision::Loading,
        SessionState::Authenticated { .. } => {
            GuardDecision::Redirect(config.landing_route.clone())
        }
        SessionState::Unauthenticated => GuardDecision::Render,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::User;

    fn authenticated() -> SessionState {
        SessionState::Authenticated {
            user: User {
                id: 1,
                username: "admin".to_string(),
                email: None,
                role: None,
            },
            token: "tok".to_string(),
        }
    }

    #[test]
    fn test_protected() {
        let config = DeskConfig::default();
        assert_eq!(protected(&SessionState::Checking, &config), GuardDecision::Loading);
        assert_eq!(
            protected(&SessionState::Unauthenticated, &config),
            GuardDecision::Redirect("/admin/login".to_string())
        );
        assert_eq!(protected(&authenticated(), &config), GuardDecision::Render);
    }

    #[test]
    fn test_public_only() {
        let config = DeskConfig::default();
        assert_eq!(public_only(&SessionState::Checking, &config), GuardDecision::Loading);
        assert_eq!(
            public_only(&authenticated(), &config),
            GuardDecision::Redirect("/admin/dashboard".to_string())
        );
        assert_eq!(
            public_only(&SessionState::Unauthenticated, &config),
            GuardDecision::Render
        );
    }
}
