//! Client-side routes of the admin application and the navigation seam.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    /// Unauthenticated entry view (login)
    Auth,
    ForgotPassword,
    VerifyOtp,
    ResetPassword,
    Dashboard,
    Banner,
    OurStory,
    /// Services list, or a single service when an id is present
    Services(Option<String>),
    UnitedVoices,
    RealWinners,
    Faqs,
    WayCards,
    Users,
    Contacts,
    Settings,
    NotFound(String),
}

impl Route {
    /// Whether a stored session token is required to render this view
    pub fn is_protected(&self) -> bool {
        !matches!(
            self,
            Route::Auth | Route::ForgotPassword | Route::VerifyOtp | Route::ResetPassword | Route::NotFound(_)
        )
    }

    pub fn path(&self) -> String {
        match self {
            Route::Auth => "/auth".to_string(),
            Route::ForgotPassword => "/forgot-password".to_string(),
            Route::VerifyOtp => "/otp".to_string(),
            Route::ResetPassword => "/reset-password".to_string(),
            Route::Dashboard => "/".to_string(),
            Route::Banner => "/content/banner".to_string(),
            Route::OurStory => "/content/our-story".to_string(),
            Route::Services(None) => "/content/services".to_string(),
            Route::Services(Some(id)) => format!("/content/services/{}", id),
            Route::UnitedVoices => "/content/united-voices".to_string(),
            Route::RealWinners => "/content/real-winners".to_string(),
            Route::Faqs => "/content/faqs".to_string(),
            Route::WayCards => "/content/way-cards".to_string(),
            Route::Users => "/content/users".to_string(),
            Route::Contacts => "/contacts".to_string(),
            Route::Settings => "/settings".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Sidebar label
    pub fn title(&self) -> &'static str {
        match self {
            Route::Auth => "Sign In",
            Route::ForgotPassword => "Forgot Password",
            Route::VerifyOtp => "Verify OTP",
            Route::ResetPassword => "Reset Password",
            Route::Dashboard => "Dashboard",
            Route::Banner => "Banner",
            Route::OurStory => "Our Story",
            Route::Services(_) => "Services",
            Route::UnitedVoices => "United Voices",
            Route::RealWinners => "Real Winners",
            Route::Faqs => "FAQs",
            Route::WayCards => "Way Cards",
            Route::Users => "Create a New account",
            Route::Contacts => "Contacts",
            Route::Settings => "Settings",
            Route::NotFound(_) => "Not Found",
        }
    }

    /// Protected views in sidebar order
    pub fn sidebar() -> Vec<Route> {
        vec![
            Route::Dashboard,
            Route::Banner,
            Route::OurStory,
            Route::Services(None),
            Route::UnitedVoices,
            Route::RealWinners,
            Route::Faqs,
            Route::WayCards,
            Route::Users,
            Route::Contacts,
            Route::Settings,
        ]
    }
}

impl FromStr for Route {
    type Err = std::convert::Infallible;

    /// Unknown paths parse to `Route::NotFound` rather than failing
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let path = raw.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            [] | ["dashboard"] => Route::Dashboard,
            ["auth"] => Route::Auth,
            ["forgot-password"] | ["forgotpassword"] => Route::ForgotPassword,
            ["otp"] => Route::VerifyOtp,
            ["reset-password"] => Route::ResetPassword,
            ["content", "banner"] => Route::Banner,
            ["content", "our-story"] => Route::OurStory,
            ["content", "services"] => Route::Services(None),
            ["content", "services", id] => Route::Services(Some((*id).to_string())),
            ["content", "united-voices"] => Route::UnitedVoices,
            ["content", "real-winners"] => Route::RealWinners,
            ["content", "faqs"] => Route::Faqs,
            ["content", "way-cards"] => Route::WayCards,
            ["content", "users"] => Route::Users,
            ["contacts"] => Route::Contacts,
            ["settings"] => Route::Settings,
            _ => Route::NotFound(raw.to_string()),
        };
        Ok(route)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Where navigation side effects land.
///
/// `redirect` is a full redirect that replaces the current location, used by the
/// guard and by the forced logout in the HTTP error handler.
pub trait Navigator: Send + Sync {
    fn current(&self) -> Option<Route>;
    fn redirect(&self, to: Route);
}

/// Keeps the navigation history in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryNavigator {
    history: Arc<Mutex<Vec<Route>>>,
}

impl MemoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(route: Route) -> Self {
        let navigator = Self::default();
        navigator.redirect(route);
        navigator
    }

    pub fn history(&self) -> Vec<Route> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }
}

impl Navigator for MemoryNavigator {
    fn current(&self) -> Option<Route> {
        self.history.lock().ok().and_then(|h| h.last().cloned())
    }

    fn redirect(&self, to: Route) {
        if let Ok(mut history) = self.history.lock() {
            history.push(to);
        }
    }
}
