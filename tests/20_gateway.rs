mod common;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde_json::{json, Value};

use fu_admin::error::AdminError;
use fu_admin::http::{Gateway, GENERIC_ERROR};
use fu_admin::notify::MemoryNotifier;
use fu_admin::routes::{MemoryNavigator, Navigator, Route};
use fu_admin::session::{MemoryTokenStore, Session};

#[tokio::test]
async fn bearer_is_attached_only_when_a_token_is_stored() -> Result<()> {
    let session = Session::new(MemoryTokenStore::with_token(common::SESSION_TOKEN));
    let h = common::harness(session.clone()).await?;

    let me: Option<Value> = h.api.get("/users/me").await?;
    assert!(me.is_some());
    assert_eq!(
        h.backend.requests()[0].authorization.as_deref(),
        Some("Bearer good-token")
    );

    session.sign_out();
    let _: Option<Value> = h.api.get("/users/me").await?;
    assert_eq!(h.backend.requests()[1].authorization, None);
    Ok(())
}

#[tokio::test]
async fn failed_get_resolves_empty_with_server_message() -> Result<()> {
    let h = common::harness(Session::in_memory()).await?;

    let result: Option<Value> = h.api.get("/broken").await?;
    assert!(result.is_none());
    assert_eq!(h.notifier.titles(), vec!["Error"]);
    assert_eq!(h.notifier.notifications()[0].description, "database down");
    Ok(())
}

#[tokio::test]
async fn failed_post_rejects_after_notifying() -> Result<()> {
    let h = common::harness(Session::in_memory()).await?;

    let err = h
        .api
        .post::<_, Value>("/broken", &json!({ "ping": true }))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(500));
    assert_eq!(err.to_string(), "database down");
    assert_eq!(h.notifier.titles(), vec!["Error", "Server Error"]);
    Ok(())
}

#[tokio::test]
async fn forbidden_without_body_uses_generic_text() -> Result<()> {
    let h = common::harness(Session::in_memory()).await?;

    let err = h.api.post::<_, Value>("/admin-only", &json!({})).await.unwrap_err();
    assert_eq!(err.status_code(), Some(403));

    let notes = h.notifier.notifications();
    assert_eq!(notes[0].description, GENERIC_ERROR);
    assert_eq!(notes[1].title, "Forbidden");
    Ok(())
}

#[tokio::test]
async fn unauthorized_write_clears_token_and_redirects() -> Result<()> {
    let session = Session::new(MemoryTokenStore::with_token("stale-token"));
    let h = common::harness(session.clone()).await?;

    let err = h
        .api
        .post::<_, Value>("/users", &json!({ "name": "Bo", "email": "bo@example.org", "password": "longenough" }))
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    assert!(!session.is_authenticated());
    assert_eq!(h.navigator.history(), vec![Route::Dashboard, Route::Auth]);
    assert_eq!(h.notifier.titles(), vec!["Error", "Unauthorized"]);
    Ok(())
}

#[tokio::test]
async fn no_redirect_when_already_on_the_entry_view() -> Result<()> {
    let backend = common::spawn_backend().await?;
    let session = Session::new(MemoryTokenStore::with_token("stale-token"));
    let navigator = Arc::new(MemoryNavigator::starting_at(Route::Auth));
    let gateway = Gateway::new(
        format!("{}/api", backend.base_url),
        Duration::from_secs(5),
        session.clone(),
        Arc::new(MemoryNotifier::new()),
        navigator.clone(),
    )?;

    let me: Option<Value> = gateway.get("/users/me").await?;
    assert!(me.is_none());
    assert!(!session.is_authenticated());
    assert_eq!(navigator.history(), vec![Route::Auth]);
    assert_eq!(navigator.current(), Some(Route::Auth));
    Ok(())
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() -> Result<()> {
    let port = portpicker::pick_unused_port().expect("free port");
    let notifier = MemoryNotifier::new();
    let gateway = Gateway::new(
        format!("http://127.0.0.1:{}/api", port),
        Duration::from_secs(2),
        Session::in_memory(),
        Arc::new(notifier.clone()),
        Arc::new(MemoryNavigator::new()),
    )?;

    let read: Option<Value> = gateway.get("/users/me").await?;
    assert!(read.is_none());

    let write = gateway.post::<_, Value>("/users/login", &json!({})).await;
    assert!(matches!(write, Err(AdminError::Transport(_))));
    assert_eq!(notifier.titles(), vec!["Network Error", "Network Error"]);
    Ok(())
}
