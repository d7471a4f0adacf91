//! Authentication endpoint tests

use crate::common::TestApp;

#[tokio::test]
async fn test_login_with_bootstrap_admin() {
    let app = TestApp::new().await;

    let response = app
        .post_json(
            "/api/v1/auth/login",
            serde_json::json!({
                "email": app.state.config.auth.bootstrap_admin_email,
                "password": app.state.config.auth.bootstrap_admin_password,
            }),
        )
        .await;

    response.assert_ok();
    let json: serde_json::Value = response.json();
    assert!(json["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(json["token_type"], "Bearer");
    assert_eq!(json["user"]["role"], "admin");
    assert_eq!(
        json["user"]["email"],
        app.state.config.auth.bootstrap_admin_email.as_str()
    );
    // The password hash never leaves the server
    assert!(json["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new().await;

    // Correct email, wrong password
    let wrong_password = app
        .post_json(
            "/api/v1/auth/login",
            serde_json::json!({
                "email": app.state.config.auth.bootstrap_admin_email,
                "password": "not-the-password",
            }),
        )
        .await;

    // Non-existent email
    let unknown_email = app
        .post_json(
            "/api/v1/auth/login",
            serde_json::json!({
                "email": "nobody@example.com",
                "password": "whatever",
            }),
        )
        .await;

    wrong_password.assert_bad_request();
    unknown_email.assert_bad_request();

    // Byte-identical bodies prevent account enumeration
    assert_eq!(wrong_password.body, unknown_email.body);
}

#[tokio::test]
async fn test_login_token_works_for_protected_routes() {
    let app = TestApp::new().await;

    let login = app
        .post_json(
            "/api/v1/auth/login",
            serde_json::json!({
                "email": app.state.config.auth.bootstrap_admin_email,
                "password": app.state.config.auth.bootstrap_admin_password,
            }),
        )
        .await;
    login.assert_ok();

    let token = login.json::<serde_json::Value>()["token"]
        .as_str()
        .unwrap()
        .to_string();

    let me = app.get_auth("/api/v1/auth/me", &token).await;
    me.assert_ok();

    let json: serde_json::Value = me.json();
    assert_eq!(json["role"], "admin");
    assert_eq!(
        json["email"],
        app.state.config.auth.bootstrap_admin_email.as_str()
    );
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let app = TestApp::new().await;

    let response = app.get("/api/v1/divisions").await;
    response.assert_unauthorized();
}

#[tokio::test]
async fn test_protected_route_with_garbage_token() {
    let app = TestApp::new().await;

    let response = app.get_auth("/api/v1/divisions", "garbage-token").await;
    response.assert_unauthorized();
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;

    let response = app.get("/api/v1/health").await;
    response.assert_ok();

    let json: serde_json::Value = response.json();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["database"], "healthy");
}
