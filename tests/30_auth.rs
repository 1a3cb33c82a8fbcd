mod common;

use anyhow::Result;

use fu_admin::auth::{Credentials, NewUser};
use fu_admin::routes::{Navigator, Route};
use fu_admin::session::{MemoryTokenStore, Session};

#[tokio::test]
async fn login_stores_the_returned_token() -> Result<()> {
    let session = Session::in_memory();
    let h = common::harness(session.clone()).await?;

    h.auth()
        .login(&Credentials {
            email: common::ADMIN_EMAIL.into(),
            password: common::ADMIN_PASSWORD.into(),
        })
        .await?;

    assert_eq!(session.token().as_deref(), Some(common::SESSION_TOKEN));
    assert_eq!(h.backend.calls(), vec!["POST /api/users/login"]);
    Ok(())
}

#[tokio::test]
async fn rejected_login_surfaces_server_message() -> Result<()> {
    let session = Session::in_memory();
    let h = common::harness(session.clone()).await?;

    let err = h
        .auth()
        .login(&Credentials {
            email: common::ADMIN_EMAIL.into(),
            password: "wrong-password".into(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(400));
    assert_eq!(h.notifier.notifications()[0].description, "Invalid email or password");
    assert!(!session.is_authenticated());
    assert_eq!(h.navigator.current(), Some(Route::Dashboard));
    Ok(())
}

#[tokio::test]
async fn invalid_login_form_never_reaches_the_server() -> Result<()> {
    let h = common::harness(Session::in_memory()).await?;

    let err = h
        .auth()
        .login(&Credentials {
            email: "not-an-email".into(),
            password: "123".into(),
        })
        .await
        .unwrap_err();

    let errors = err.validation_errors().expect("validation errors");
    assert!(errors.contains("email"));
    assert_eq!(errors.get("password"), Some("Password must be at least 6 characters"));
    assert!(h.backend.requests().is_empty());
    assert!(h.notifier.notifications().is_empty());
    Ok(())
}

#[tokio::test]
async fn password_recovery_flow() -> Result<()> {
    let h = common::harness(Session::in_memory()).await?;
    let auth = h.auth();
    let email = common::ADMIN_EMAIL;

    let sent = auth.forgot_password(email).await?;
    assert_eq!(sent.message.as_deref(), Some("OTP sent to ada@friendsunited.org"));

    auth.resend_otp(email).await?;

    let wrong = auth.verify_reset_otp(email, "000000").await.unwrap_err();
    assert_eq!(wrong.to_string(), "Invalid or expired OTP");

    let malformed = auth.verify_reset_otp(email, "12ab56").await.unwrap_err();
    assert!(malformed.validation_errors().expect("validation").contains("otp"));

    let ticket = auth.verify_reset_otp(email, common::VALID_OTP).await?;

    let mismatch = auth
        .reset_password(&ticket, "new-password-1", "new-password-2")
        .await
        .unwrap_err();
    assert_eq!(
        mismatch.validation_errors().expect("validation").get("confirmPassword"),
        Some("Passwords do not match")
    );

    auth.reset_password(&ticket, "new-password-1", "new-password-1").await?;

    assert_eq!(
        h.backend.calls(),
        vec![
            "POST /api/users/forgot-password",
            "POST /api/auth/forgot-password",
            "POST /api/auth/verify-reset-otp",
            "POST /api/auth/verify-reset-otp",
            "POST /api/auth/reset-password",
        ]
    );
    let titles = h.notifier.titles();
    assert!(titles.contains(&"OTP Sent".to_string()));
    assert_eq!(titles.last().map(String::as_str), Some("Password Reset"));
    Ok(())
}

#[tokio::test]
async fn create_user_uses_the_session_token() -> Result<()> {
    let h = common::harness(Session::new(MemoryTokenStore::with_token(common::SESSION_TOKEN))).await?;

    let created = h
        .auth()
        .create_user(&NewUser {
            name: "Bo Volunteer".into(),
            email: "bo@friendsunited.org".into(),
            password: "long-enough-pw".into(),
        })
        .await?;

    assert_eq!(created["data"]["email"], "bo@friendsunited.org");
    assert_eq!(
        h.backend.requests()[0].authorization.as_deref(),
        Some("Bearer good-token")
    );
    assert_eq!(h.notifier.titles(), vec!["Success!"]);
    Ok(())
}
