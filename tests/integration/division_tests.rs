//! Division endpoint tests
//!
//! Covers the division lifecycle, the membership and seeded-record
//! invariants, the employee search filters and role enforcement.

use crate::common::TestApp;

fn employee_json(name: &str, division_id: &str) -> serde_json::Value {
    serde_json::json!({
        "full_name": name,
        "email": format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        "division_id": division_id,
        "sex": "Male",
        "hire_date": "2020-01-15",
        "grade": "Engineer",
    })
}

async fn create_division(app: &TestApp, token: &str, name: &str) -> String {
    let response = app
        .post_json_auth(
            "/api/v1/divisions",
            serde_json::json!({ "name": name }),
            token,
        )
        .await;
    response.assert_created();
    response.json::<serde_json::Value>()["id"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn create_employee(app: &TestApp, token: &str, name: &str, division_id: &str) -> String {
    let response = app
        .post_json_auth("/api/v1/employees", employee_json(name, division_id), token)
        .await;
    response.assert_created();
    response.json::<serde_json::Value>()["id"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_division_lifecycle() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    // Create DX
    let dx = create_division(&app, &token, "DX").await;

    // A second DX is a duplicate
    app.post_json_auth(
        "/api/v1/divisions",
        serde_json::json!({ "name": "DX" }),
        &token,
    )
    .await
    .assert_bad_request();

    // Hire E1 into DX
    let e1 = create_employee(&app, &token, "E One", &dx).await;

    // Make E1 the member and manager of DX
    let response = app
        .put_json_auth(
            &format!("/api/v1/divisions/{}", dx),
            serde_json::json!({ "employee_ids": [e1], "manager_id": e1 }),
            &token,
        )
        .await;
    response.assert_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json["manager"]["id"], e1.as_str());
    assert_eq!(json["employees"].as_array().unwrap().len(), 1);

    // Non-empty divisions cannot be deleted
    app.delete_auth(&format!("/api/v1/divisions/{}", dx), &token)
        .await
        .assert_bad_request();

    // Empty it out
    let response = app
        .put_json_auth(
            &format!("/api/v1/divisions/{}", dx),
            serde_json::json!({ "employee_ids": [], "manager_id": null }),
            &token,
        )
        .await;
    response.assert_ok();
    let json: serde_json::Value = response.json();
    assert!(json["manager"].is_null());
    assert!(json["employees"].as_array().unwrap().is_empty());

    // Now deletion goes through
    app.delete_auth(&format!("/api/v1/divisions/{}", dx), &token)
        .await
        .assert_ok();

    app.get_auth(&format!("/api/v1/divisions/{}", dx), &token)
        .await
        .assert_not_found();
}

#[tokio::test]
async fn test_create_division_rejects_blank_name() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    app.post_json_auth(
        "/api/v1/divisions",
        serde_json::json!({ "name": "   " }),
        &token,
    )
    .await
    .assert_bad_request();
}

#[tokio::test]
async fn test_manager_must_be_a_member() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let dx = create_division(&app, &token, "DX").await;
    let e1 = create_employee(&app, &token, "Karim Jaziri", &dx).await;

    // Manager outside the supplied member set
    app.put_json_auth(
        &format!("/api/v1/divisions/{}", dx),
        serde_json::json!({ "employee_ids": [], "manager_id": e1 }),
        &token,
    )
    .await
    .assert_bad_request();

    // Creating a division with a manager outside its member set fails too
    app.post_json_auth(
        "/api/v1/divisions",
        serde_json::json!({ "name": "DY", "manager_id": e1 }),
        &token,
    )
    .await
    .assert_bad_request();
}

#[tokio::test]
async fn test_update_with_unknown_employee_id() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let dx = create_division(&app, &token, "DX").await;

    app.put_json_auth(
        &format!("/api/v1/divisions/{}", dx),
        serde_json::json!({ "employee_ids": ["00000000-0000-4000-8000-000000000000"] }),
        &token,
    )
    .await
    .assert_bad_request();
}

#[tokio::test]
async fn test_division_id_parsing_and_missing() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    app.get_auth("/api/v1/divisions/not-a-uuid", &token)
        .await
        .assert_bad_request();

    app.get_auth(
        "/api/v1/divisions/00000000-0000-4000-8000-000000000000",
        &token,
    )
    .await
    .assert_not_found();
}

#[tokio::test]
async fn test_seeded_division_requires_override() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    // Seeded divisions are provisioned by the migrations
    let list = app.get_auth("/api/v1/divisions", &token).await;
    list.assert_ok();
    let divisions: Vec<serde_json::Value> = list.json();
    let daec = divisions
        .iter()
        .find(|d| d["name"] == "DAEC")
        .expect("Seeded division DAEC missing");
    assert_eq!(daec["seeded"], true);
    let daec_id = daec["id"].as_str().unwrap();

    let body = serde_json::json!({ "employee_ids": [], "manager_id": null });

    // Without the override header: forbidden
    app.put_json_auth(&format!("/api/v1/divisions/{}", daec_id), body.clone(), &token)
        .await
        .assert_forbidden();

    app.delete_auth(&format!("/api/v1/divisions/{}", daec_id), &token)
        .await
        .assert_forbidden();

    // With the override header the same update succeeds
    app.put_json_auth_with_headers(
        &format!("/api/v1/divisions/{}", daec_id),
        body,
        &token,
        &[("allowSeededUpdate", "true")],
    )
    .await
    .assert_ok();
}

#[tokio::test]
async fn test_search_filters() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let dx = create_division(&app, &token, "DX").await;
    let dy = create_division(&app, &token, "DY").await;

    let ali = create_employee(&app, &token, "Ali Mansour", &dx).await;
    let alia = create_employee(&app, &token, "Alia Ben Romdhane", &dy).await;
    let _omar = create_employee(&app, &token, "Omar Sfar", &dx).await;

    // Case-insensitive substring
    let response = app
        .get_auth("/api/v1/divisions/search?query=ALI", &token)
        .await;
    response.assert_ok();
    let found: Vec<serde_json::Value> = response.json();
    assert_eq!(found.len(), 2);

    // Scoped to one division
    let response = app
        .get_auth(
            &format!("/api/v1/divisions/search?query=ali&division_id={}", dx),
            &token,
        )
        .await;
    response.assert_ok();
    let found: Vec<serde_json::Value> = response.json();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["id"], ali.as_str());

    // Excluding the current manager candidate
    let response = app
        .get_auth(
            &format!("/api/v1/divisions/search?query=ali&exclude_id={}", ali),
            &token,
        )
        .await;
    response.assert_ok();
    let found: Vec<serde_json::Value> = response.json();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["id"], alia.as_str());

    // Grade label set
    let response = app
        .get_auth("/api/v1/divisions/search?grade=Engineer,Analyst", &token)
        .await;
    response.assert_ok();
    let found: Vec<serde_json::Value> = response.json();
    assert_eq!(found.len(), 3);

    // All-employee listing
    let response = app.get_auth("/api/v1/divisions/employees", &token).await;
    response.assert_ok();
    let all: Vec<serde_json::Value> = response.json();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn test_dashboard_camelcase_payloads() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let dx = create_division(&app, &token, "DX").await;
    let e1 = create_employee(&app, &token, "Karim Jaziri", &dx).await;

    // The dashboard sends camelCase field names; aliases accept them
    let response = app
        .put_json_auth(
            &format!("/api/v1/divisions/{}", dx),
            serde_json::json!({ "employeeIds": [e1], "managerId": e1 }),
            &token,
        )
        .await;
    response.assert_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json["manager"]["id"], e1.as_str());

    let response = app
        .get_auth(&format!("/api/v1/divisions/search?divisionId={}", dx), &token)
        .await;
    response.assert_ok();
    let found: Vec<serde_json::Value> = response.json();
    assert_eq!(found.len(), 1);
}

#[tokio::test]
async fn test_role_enforcement() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let chef = app.chef_token().await;

    // Chefs can read divisions
    app.get_auth("/api/v1/divisions", &chef).await.assert_ok();
    app.get_auth("/api/v1/divisions/employees", &chef)
        .await
        .assert_ok();

    // But not mutate them
    app.post_json_auth(
        "/api/v1/divisions",
        serde_json::json!({ "name": "DZ" }),
        &chef,
    )
    .await
    .assert_forbidden();

    let dx = create_division(&app, &admin, "DX").await;
    app.put_json_auth(
        &format!("/api/v1/divisions/{}", dx),
        serde_json::json!({ "employee_ids": [] }),
        &chef,
    )
    .await
    .assert_forbidden();
    app.delete_auth(&format!("/api/v1/divisions/{}", dx), &chef)
        .await
        .assert_forbidden();

    // Employee records are admin-only
    app.get_auth("/api/v1/employees", &chef)
        .await
        .assert_forbidden();
}
