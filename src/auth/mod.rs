//! Client for the authentication REST API: login, password recovery, identity.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AdminError, Result};
use crate::http::Gateway;
use crate::notify::Notification;
use crate::session::{CurrentUser, Session};
use crate::validation::Validator;

pub const LOGIN_PATH: &str = "/users/login";
pub const ME_PATH: &str = "/users/me";
pub const USERS_PATH: &str = "/users";
pub const FORGOT_PASSWORD_PATH: &str = "/users/forgot-password";
pub const RESEND_OTP_PATH: &str = "/auth/forgot-password";
pub const VERIFY_OTP_PATH: &str = "/auth/verify-reset-otp";
pub const RESET_PASSWORD_PATH: &str = "/auth/reset-password";

pub const MIN_LOGIN_PASSWORD: usize = 6;
pub const MIN_NEW_PASSWORD: usize = 8;

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        if v.required("email", &self.email, "Email is required") {
            v.email("email", &self.email, "Please enter a valid email address");
        }
        if v.required("password", &self.password, "Password is required") {
            v.min_chars(
                "password",
                &self.password,
                MIN_LOGIN_PASSWORD,
                "Password must be at least 6 characters",
            );
        }
        v.finish().map_err(AdminError::from)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.required("name", &self.name, "Name is required");
        if v.required("email", &self.email, "Email is required") {
            v.email("email", &self.email, "Invalid email format");
        }
        if v.required("password", &self.password, "Password is required") {
            v.min_chars(
                "password",
                &self.password,
                MIN_NEW_PASSWORD,
                "Password must be at least 8 characters",
            );
        }
        v.finish().map_err(AdminError::from)
    }
}

/// Proof that an OTP was accepted; required to set the new password
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetTicket {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AuthApi {
    gateway: Gateway,
}

impl AuthApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub fn session(&self) -> &Session {
        self.gateway.session()
    }

    /// Exchanges credentials for a bearer token and stores it
    pub async fn login(&self, credentials: &Credentials) -> Result<()> {
        credentials.validate()?;

        let response: Value = self.gateway.post(LOGIN_PATH, credentials).await?;
        let token = extract_token(&response)
            .ok_or_else(|| AdminError::unexpected("login response did not contain a token"))?;

        self.session().sign_in(token)?;
        tracing::info!(email = %credentials.email, "Signed in");
        Ok(())
    }

    pub fn logout(&self) {
        self.session().sign_out();
    }

    /// "Who am I", fetched at most once per session
    pub async fn whoami(&self) -> Result<Option<CurrentUser>> {
        let gateway = self.gateway.clone();
        self.session()
            .current_user_or_load(|| async move {
                let response: Option<Value> = gateway.get(ME_PATH).await?;
                let user = match response.and_then(|body| body.get("data").cloned()) {
                    Some(data) if !data.is_null() => Some(serde_json::from_value(data)?),
                    _ => None,
                };
                Ok(user)
            })
            .await
    }

    /// Sends the password-reset code
    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse> {
        validate_email(email)?;
        let response: MessageResponse = self
            .gateway
            .post(FORGOT_PASSWORD_PATH, &json!({ "email": email }))
            .await?;
        self.notify_ok(
            "OTP Sent",
            response
                .message
                .clone()
                .unwrap_or_else(|| format!("A verification code has been sent to {}", email)),
        );
        Ok(response)
    }

    pub async fn resend_otp(&self, email: &str) -> Result<MessageResponse> {
        validate_email(email)?;
        let response: MessageResponse = self
            .gateway
            .post(RESEND_OTP_PATH, &json!({ "email": email }))
            .await?;
        self.notify_ok("OTP Resent", format!("A new verification code has been sent to {}", email));
        Ok(response)
    }

    pub async fn verify_reset_otp(&self, email: &str, otp: &str) -> Result<ResetTicket> {
        let mut v = Validator::new();
        if v.required("email", email, "Email is required") {
            v.email("email", email, "Invalid email format");
        }
        v.otp("otp", otp, "Enter the 6-digit code");
        v.finish()?;

        let _: Value = self
            .gateway
            .post(VERIFY_OTP_PATH, &json!({ "email": email, "otp": otp }))
            .await?;
        self.notify_ok("OTP Verified", "You can now reset your password.");

        Ok(ResetTicket {
            email: email.to_string(),
            otp: otp.to_string(),
        })
    }

    pub async fn reset_password(&self, ticket: &ResetTicket, password: &str, confirm: &str) -> Result<MessageResponse> {
        let mut v = Validator::new();
        if v.required("password", password, "Password is required") {
            v.min_chars(
                "password",
                password,
                MIN_NEW_PASSWORD,
                "Password must be at least 8 characters",
            );
        }
        if password != confirm {
            v.add("confirmPassword", "Passwords do not match");
        }
        v.finish()?;

        let response: MessageResponse = self
            .gateway
            .post(
                RESET_PASSWORD_PATH,
                &json!({ "email": ticket.email, "otp": ticket.otp, "password": password }),
            )
            .await?;
        self.notify_ok("Password Reset", "Your password has been updated. Please sign in.");
        Ok(response)
    }

    /// Creates another administrator account
    pub async fn create_user(&self, user: &NewUser) -> Result<Value> {
        user.validate()?;
        let response: Value = self.gateway.post(USERS_PATH, user).await?;
        self.notify_ok("Success!", format!("Account for {} has been created.", user.email));
        Ok(response)
    }

    fn notify_ok(&self, title: &str, description: impl Into<String>) {
        self.gateway
            .notifier()
            .notify(Notification::success(title, description));
    }
}

fn validate_email(email: &str) -> Result<()> {
    let mut v = Validator::new();
    if v.required("email", email, "Email is required") {
        v.email("email", email, "Invalid email format");
    }
    v.finish().map_err(AdminError::from)
}

/// Token lives at `data.token`; a bare top-level `token` is accepted too
fn extract_token(response: &Value) -> Option<&str> {
    response
        .pointer("/data/token")
        .or_else(|| response.get("token"))
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_read_from_data_envelope() {
        let body = json!({ "data": { "token": "abc" }, "message": "ok" });
        assert_eq!(extract_token(&body), Some("abc"));
        assert_eq!(extract_token(&json!({ "token": "flat" })), Some("flat"));
        assert_eq!(extract_token(&json!({ "data": { "token": "" } })), None);
        assert_eq!(extract_token(&json!({ "data": null })), None);
    }

    #[test]
    fn credentials_validation_messages() {
        let creds = Credentials {
            email: "nope".into(),
            password: "123".into(),
        };
        let err = creds.validate().unwrap_err();
        let errors = err.validation_errors().unwrap();
        assert_eq!(errors.get("email"), Some("Please enter a valid email address"));
        assert_eq!(errors.get("password"), Some("Password must be at least 6 characters"));
    }

    #[test]
    fn new_user_requires_strong_password() {
        let user = NewUser {
            name: "Ada".into(),
            email: "ada@friendsunited.org".into(),
            password: "short".into(),
        };
        let err = user.validate().unwrap_err();
        assert!(err.validation_errors().unwrap().contains("password"));
    }
}
