//! Single outbound HTTP gateway.
//!
//! Every call goes through [`Gateway::send`], which attaches the bearer token,
//! applies the client-wide timeout and turns failures into notifications. A
//! failed GET resolves to `Ok(None)`; any other failed method returns the error
//! after the notification so the caller can unwind its submit state.

use reqwest::{header, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{AdminError, Result};
use crate::notify::{Notification, Notifier};
use crate::routes::{Navigator, Route};
use crate::session::Session;

pub const GENERIC_ERROR: &str = "An error occurred. Please try again.";

/// Where the `Authorization` header comes from
#[derive(Clone)]
enum Bearer {
    Session,
    /// Fixed API token; `None` sends no header at all
    Static(Option<String>),
}

#[derive(Clone)]
pub struct Gateway {
    client: reqwest::Client,
    base_url: String,
    session: Session,
    bearer: Bearer,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl Gateway {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        session: Session,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AdminError::transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
            bearer: Bearer::Session,
            notifier,
            navigator,
        })
    }

    /// Sends `token` instead of the session token, or no header when `None`.
    /// Used for the content store, which authenticates with its own API token.
    pub fn with_bearer(mut self, token: Option<String>) -> Self {
        self.bearer = Bearer::Static(token);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        self.get_query(path, &[]).await
    }

    /// GET that never fails on an HTTP or transport error: the failure is
    /// notified and the call resolves to `None`
    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>> {
        let request = self.client.get(self.url(path)).query(query);
        match self.send(Method::GET, path, request).await {
            Ok(value) => Ok(Some(value)),
            Err(AdminError::Status { status, .. }) => {
                tracing::warn!(path, status, "GET failed, resolving as empty");
                Ok(None)
            }
            Err(AdminError::Transport(msg)) => {
                tracing::warn!(path, "GET transport failure, resolving as empty: {}", msg);
                Ok(None)
            }
            Err(other) => Err(other),
        }
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.post_query(path, &[], body).await
    }

    pub async fn post_query<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> Result<T> {
        let request = self.client.post(self.url(path)).query(query).json(body);
        self.send(Method::POST, path, request).await
    }

    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let request = self.client.patch(self.url(path)).json(body);
        self.send(Method::PATCH, path, request).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.client.delete(self.url(path));
        self.send(Method::DELETE, path, request).await
    }

    /// Raw binary POST, used for asset uploads
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<T> {
        let request = self
            .client
            .post(self.url(path))
            .query(query)
            .header(header::CONTENT_TYPE, content_type)
            .body(bytes);
        self.send(Method::POST, path, request).await
    }

    async fn send<T: DeserializeOwned>(&self, method: Method, path: &str, request: RequestBuilder) -> Result<T> {
        let request = match self.bearer() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        tracing::debug!(%method, path, "outbound request");

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return Err(self.transport_failure(&method, e)),
        };

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_failure(&method, e))?;

        if !status.is_success() {
            let body: Option<Value> = serde_json::from_slice(&bytes).ok();
            return Err(self.status_failure(&method, status, body));
        }

        if bytes.is_empty() {
            return Ok(serde_json::from_value(Value::Null)?);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn bearer(&self) -> Option<String> {
        match &self.bearer {
            Bearer::Session => self.session.token(),
            Bearer::Static(token) => token.clone(),
        }
    }

    fn transport_failure(&self, method: &Method, error: reqwest::Error) -> AdminError {
        tracing::warn!(%method, "request failed without a response: {}", error);
        self.notifier.notify(Notification::error(
            "Network Error",
            "Unable to reach the server. Please check your connection.",
        ));
        AdminError::transport(error.to_string())
    }

    fn status_failure(&self, method: &Method, status: StatusCode, body: Option<Value>) -> AdminError {
        let message = body
            .as_ref()
            .and_then(|b| b.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string);

        self.notifier.notify(Notification::error(
            "Error",
            message.clone().unwrap_or_else(|| GENERIC_ERROR.to_string()),
        ));

        if status == StatusCode::UNAUTHORIZED {
            self.force_logout();
        }

        if *method != Method::GET {
            match status {
                StatusCode::UNAUTHORIZED => self.notifier.notify(Notification::error(
                    "Unauthorized",
                    "Your session has expired. Please log in again.",
                )),
                StatusCode::FORBIDDEN => self.notifier.notify(Notification::error(
                    "Forbidden",
                    "You do not have permission to access this resource.",
                )),
                StatusCode::NOT_FOUND => self.notifier.notify(Notification::error(
                    "Not Found",
                    "The requested resource was not found.",
                )),
                StatusCode::INTERNAL_SERVER_ERROR => self.notifier.notify(Notification::error(
                    "Server Error",
                    "An error occurred on the server. Please try again later.",
                )),
                _ => tracing::error!(%status, body = ?body, "request failed"),
            }
        }

        AdminError::status(status.as_u16(), message)
    }

    fn force_logout(&self) {
        tracing::warn!("Received 401, clearing session");
        self.session.sign_out();
        if self.navigator.current() != Some(Route::Auth) {
            self.navigator.redirect(Route::Auth);
        }
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::MemoryNotifier;
    use crate::routes::MemoryNavigator;

    fn gateway(base: &str) -> Gateway {
        Gateway::new(
            base,
            Duration::from_secs(1),
            Session::in_memory(),
            Arc::new(MemoryNotifier::new()),
            Arc::new(MemoryNavigator::new()),
        )
        .unwrap()
    }

    #[test]
    fn url_joins_without_double_slashes() {
        let gw = gateway("http://localhost:3000/api/");
        assert_eq!(gw.base_url(), "http://localhost:3000/api");
        assert_eq!(gw.url("/users/login"), "http://localhost:3000/api/users/login");
        assert_eq!(gw.url("users/me"), "http://localhost:3000/api/users/me");
    }

    #[test]
    fn static_bearer_never_falls_back_to_session() {
        let gw = gateway("http://localhost").with_bearer(Some("sanity-token".into()));
        gw.session().sign_in("session-token").unwrap();
        assert_eq!(gw.bearer().as_deref(), Some("sanity-token"));

        let anonymous = gw.clone().with_bearer(None);
        assert_eq!(anonymous.bearer(), None);
        assert_eq!(gateway("http://localhost").bearer(), None);
    }

    #[test]
    fn status_failure_on_write_emits_specific_notice() {
        let notifier = MemoryNotifier::new();
        let gw = Gateway::new(
            "http://localhost",
            Duration::from_secs(1),
            Session::in_memory(),
            Arc::new(notifier.clone()),
            Arc::new(MemoryNavigator::new()),
        )
        .unwrap();

        let err = gw.status_failure(&Method::POST, StatusCode::FORBIDDEN, None);
        assert_eq!(err.status_code(), Some(403));
        assert_eq!(notifier.titles(), vec!["Error", "Forbidden"]);
        assert_eq!(notifier.notifications()[0].description, GENERIC_ERROR);
    }
}
