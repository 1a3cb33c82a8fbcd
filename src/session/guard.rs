use crate::routes::{Navigator, Route};
use crate::session::Session;

/// Outcome of gating one navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Render(Route),
    /// `from` is the originally requested route, kept for the post-login return
    Redirect { to: Route, from: Option<Route> },
}

/// Gates protected views on the presence of a stored token.
///
/// The token is never validated here; the first API call a view makes does that,
/// and a 401 from it forces the logout.
#[derive(Debug, Clone)]
pub struct SessionGuard {
    session: Session,
}

impl SessionGuard {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn check(&self, requested: Route) -> GuardDecision {
        let authenticated = self.session.is_authenticated();

        if requested.is_protected() && !authenticated {
            tracing::debug!(route = %requested, "No session token, redirecting to sign in");
            return GuardDecision::Redirect {
                to: Route::Auth,
                from: Some(requested),
            };
        }

        // Signed-in users skip the login view
        if requested == Route::Auth && authenticated {
            return GuardDecision::Redirect {
                to: Route::Dashboard,
                from: None,
            };
        }

        GuardDecision::Render(requested)
    }

    /// Runs `check` and applies a redirect through `navigator`
    pub fn enter(&self, requested: Route, navigator: &dyn Navigator) -> GuardDecision {
        let decision = self.check(requested);
        match &decision {
            GuardDecision::Render(route) => navigator.redirect(route.clone()),
            GuardDecision::Redirect { to, .. } => navigator.redirect(to.clone()),
        }
        decision
    }
}

/// Where to land after a successful login
pub fn post_login_destination(from: Option<Route>) -> Route {
    match from {
        Some(route) if route.is_protected() => route,
        _ => Route::Dashboard,
    }
}
