//! Grade endpoint tests

use crate::common::TestApp;

#[tokio::test]
async fn test_grade_catalogue_is_seeded() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let chef = app.chef_token().await;

    let response = app.get_auth("/api/v1/grades", &admin).await;
    response.assert_ok();
    let grades: Vec<serde_json::Value> = response.json();
    assert!(!grades.is_empty());
    assert!(grades.iter().any(|g| g["name"] == "Engineer"));

    // Chefs can read the catalogue too
    app.get_auth("/api/v1/grades", &chef).await.assert_ok();
}

#[tokio::test]
async fn test_update_grade_description() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let grades: Vec<serde_json::Value> = app.get_auth("/api/v1/grades", &token).await.json();
    let engineer = grades.iter().find(|g| g["name"] == "Engineer").unwrap();
    let id = engineer["id"].as_str().unwrap();

    let response = app
        .put_json_auth(
            &format!("/api/v1/grades/{}", id),
            serde_json::json!({ "description": "Hands-on engineering staff" }),
            &token,
        )
        .await;
    response.assert_ok();
    let updated: serde_json::Value = response.json();
    assert_eq!(updated["description"], "Hands-on engineering staff");
    assert_eq!(updated["name"], "Engineer");

    let fetched = app.get_auth(&format!("/api/v1/grades/{}", id), &token).await;
    fetched.assert_ok();
    assert_eq!(
        fetched.json::<serde_json::Value>()["description"],
        "Hands-on engineering staff"
    );
}

#[tokio::test]
async fn test_rename_grade_collision() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let grades: Vec<serde_json::Value> = app.get_auth("/api/v1/grades", &token).await.json();
    let engineer = grades.iter().find(|g| g["name"] == "Engineer").unwrap();
    let id = engineer["id"].as_str().unwrap();

    // Renaming onto another grade's name is a conflict
    app.put_json_auth(
        &format!("/api/v1/grades/{}", id),
        serde_json::json!({ "name": "Technician" }),
        &token,
    )
    .await
    .assert_bad_request();

    // Renaming to a fresh name works
    let response = app
        .put_json_auth(
            &format!("/api/v1/grades/{}", id),
            serde_json::json!({ "name": "Software Engineer" }),
            &token,
        )
        .await;
    response.assert_ok();
    assert_eq!(
        response.json::<serde_json::Value>()["name"],
        "Software Engineer"
    );
}

#[tokio::test]
async fn test_grade_update_is_admin_only() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let chef = app.chef_token().await;

    let grades: Vec<serde_json::Value> = app.get_auth("/api/v1/grades", &admin).await.json();
    let id = grades[0]["id"].as_str().unwrap();

    app.put_json_auth(
        &format!("/api/v1/grades/{}", id),
        serde_json::json!({ "description": "nope" }),
        &chef,
    )
    .await
    .assert_forbidden();
}

#[tokio::test]
async fn test_unknown_grade() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    app.get_auth(
        "/api/v1/grades/00000000-0000-4000-8000-000000000000",
        &token,
    )
    .await
    .assert_not_found();

    app.get_auth("/api/v1/grades/not-a-uuid", &token)
        .await
        .assert_bad_request();
}
