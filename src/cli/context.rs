//! Wires the library together for one CLI invocation.

use std::sync::Arc;

use crate::auth::AuthApi;
use crate::cli::config::{self, update_environment_config};
use crate::cli::utils::output_validation;
use crate::cli::OutputFormat;
use crate::config::{AppConfig, ContentConfig};
use crate::content::SanityStore;
use crate::error::AdminError;
use crate::http::Gateway;
use crate::notify::{ConsoleNotifier, Notifier};
use crate::routes::{MemoryNavigator, Navigator, Route};
use crate::session::{GuardDecision, Session, SessionGuard};

pub struct AdminContext {
    pub output: OutputFormat,
    pub session: Session,
    pub navigator: Arc<MemoryNavigator>,
    pub notifier: Arc<dyn Notifier>,
    pub auth: AuthApi,
    pub store: SanityStore,
    pub content: ContentConfig,
}

impl AdminContext {
    /// Session file in the CLI config dir, notifications on stderr
    pub fn from_config(app: &AppConfig, output: OutputFormat) -> anyhow::Result<Self> {
        let session = Session::new(config::session_store()?);
        Self::with_parts(app, session, Arc::new(ConsoleNotifier), output)
    }

    pub fn with_parts(
        app: &AppConfig,
        session: Session,
        notifier: Arc<dyn Notifier>,
        output: OutputFormat,
    ) -> anyhow::Result<Self> {
        let navigator = Arc::new(MemoryNavigator::new());
        let timeout = app.request_timeout();

        let api = Gateway::new(
            app.api.base_url.clone(),
            timeout,
            session.clone(),
            notifier.clone(),
            navigator.clone(),
        )?;
        let content = Gateway::new(
            app.content.api_base_url(),
            timeout,
            session.clone(),
            notifier.clone(),
            navigator.clone(),
        )?;

        Ok(Self {
            output,
            session,
            navigator,
            notifier,
            auth: AuthApi::new(api),
            store: SanityStore::from_config(content, &app.content),
            content: app.content.clone(),
        })
    }

    /// Runs the session guard for `route`. A redirect to sign-in is an error that
    /// remembers the route for the post-login return.
    pub fn enter(&self, route: Route) -> anyhow::Result<Route> {
        let guard = SessionGuard::new(self.session.clone());
        match guard.enter(route, self.navigator.as_ref()) {
            GuardDecision::Render(route) => Ok(route),
            GuardDecision::Redirect { to: Route::Auth, from } => {
                let from_path = from.as_ref().map(Route::path);
                if let Err(e) = update_environment_config(|env| env.return_to = from_path) {
                    tracing::warn!("Could not remember return route: {}", e);
                }
                anyhow::bail!("Not signed in. Run `fu-admin auth login <email>` first.")
            }
            GuardDecision::Redirect { to, .. } => Ok(to),
        }
    }

    /// True when a request in this invocation forced a logout
    pub fn was_logged_out(&self) -> bool {
        self.navigator.current() == Some(Route::Auth) && !self.session.is_authenticated()
    }

    /// Turns a forced logout into a clear command failure
    pub fn check_session(&self) -> anyhow::Result<()> {
        if self.was_logged_out() {
            anyhow::bail!("Session expired. Run `fu-admin auth login <email>` to sign in again.");
        }
        Ok(())
    }

    /// Converts a library result for the command line. Validation failures are
    /// printed field by field; a forced logout wins over whatever else happened.
    pub fn settle<T>(&self, result: crate::error::Result<T>) -> anyhow::Result<T> {
        match result {
            Ok(value) => {
                self.check_session()?;
                Ok(value)
            }
            Err(AdminError::Validation(errors)) => {
                output_validation(&self.output, &errors)?;
                Err(AdminError::Validation(errors).into())
            }
            Err(e) => {
                self.check_session()?;
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::MemoryNotifier;
    use crate::session::MemoryTokenStore;

    fn context(session: Session) -> AdminContext {
        let app = AppConfig::default();
        AdminContext::with_parts(&app, session, Arc::new(MemoryNotifier::new()), OutputFormat::Text).unwrap()
    }

    #[test]
    fn signed_in_users_pass_the_guard() {
        let ctx = context(Session::new(MemoryTokenStore::with_token("t")));
        assert_eq!(ctx.enter(Route::Faqs).unwrap(), Route::Faqs);
        assert_eq!(ctx.enter(Route::Auth).unwrap(), Route::Dashboard);
        assert!(!ctx.was_logged_out());
    }

    #[test]
    fn validation_failures_stay_typed_for_the_exit_report() {
        let ctx = context(Session::new(MemoryTokenStore::with_token("t")));
        let mut v = crate::validation::Validator::new();
        v.add("email", "Invalid email address");
        let result: crate::error::Result<()> = Err(AdminError::Validation(v.finish().unwrap_err()));

        let err = ctx.settle(result).unwrap_err();
        assert!(matches!(err.downcast_ref::<AdminError>(), Some(AdminError::Validation(_))));
    }

    #[test]
    fn public_routes_need_no_token() {
        let ctx = context(Session::in_memory());
        assert_eq!(ctx.enter(Route::ForgotPassword).unwrap(), Route::ForgotPassword);
    }
}
