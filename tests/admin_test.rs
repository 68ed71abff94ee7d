//! Superuser administration: listing principals and role reassignment.

mod common;

use axum::http::StatusCode;
use common::{member_body, TestApp};
use roster_service::models::Role;
use roster_service::providers::Store;
use serde_json::json;

#[tokio::test]
async fn listing_users_requires_the_superuser_flag() {
    let app = TestApp::spawn();
    let (_, elder_token) = app
        .user_with_role("elder@x.com", "Eli", Role::Elder, false)
        .await;
    let (_, super_token) = app
        .user_with_role("root@x.com", "Root", Role::Pending, true)
        .await;

    // Elder is a business role, not an operational one.
    let (status, body) = app
        .request("GET", "/admin/users", Some(&elder_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["message"].as_str().unwrap().contains("superuser"));

    let (status, body) = app
        .request("GET", "/admin/users", Some(&super_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn role_reassignment_changes_capabilities_at_runtime() {
    let app = TestApp::spawn();
    let (_, super_token) = app
        .user_with_role("root@x.com", "Root", Role::Pending, true)
        .await;
    let user_id = app.register("a@x.com", "Ana").await;
    let user_token = app.login("a@x.com").await;

    // Pending: no write access.
    let (status, _) = app
        .request(
            "POST",
            "/members",
            Some(&user_token),
            Some(member_body("Carlos")),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .request(
            "PUT",
            &format!("/admin/users/{}/role", user_id),
            Some(&super_token),
            Some(json!({ "role": "elder" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "elder");

    // Same session, new capability set.
    let (status, body) = app
        .request(
            "POST",
            "/members",
            Some(&user_token),
            Some(member_body("Carlos")),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["created_by"], user_id.as_str());
}

#[tokio::test]
async fn unknown_role_is_rejected_without_persisting() {
    let app = TestApp::spawn();
    let (_, super_token) = app
        .user_with_role("root@x.com", "Root", Role::Pending, true)
        .await;
    let user_id = app.register("a@x.com", "Ana").await;

    for bad_role in ["deacon", "anciano", "ELDER", ""] {
        let (status, body) = app
            .request(
                "PUT",
                &format!("/admin/users/{}/role", user_id),
                Some(&super_token),
                Some(json!({ "role": bad_role })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "role {:?}", bad_role);
        assert_eq!(body["error"], "validation");
    }

    let rows = app.store.users_by_id(&user_id).await.unwrap();
    assert_eq!(rows[0].role, Role::Pending);
    assert!(app.notifications().await.is_empty());
}

#[tokio::test]
async fn every_enum_role_is_accepted() {
    let app = TestApp::spawn();
    let (_, super_token) = app
        .user_with_role("root@x.com", "Root", Role::Pending, true)
        .await;
    let user_id = app.register("a@x.com", "Ana").await;

    for role in ["publisher", "servant", "elder", "pending"] {
        let (status, body) = app
            .request(
                "PUT",
                &format!("/admin/users/{}/role", user_id),
                Some(&super_token),
                Some(json!({ "role": role })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "role {:?}", role);
        assert_eq!(body["user"]["role"], role);
    }
}

#[tokio::test]
async fn role_update_for_missing_user_is_not_found() {
    let app = TestApp::spawn();
    let (_, super_token) = app
        .user_with_role("root@x.com", "Root", Role::Pending, true)
        .await;

    let (status, body) = app
        .request(
            "PUT",
            "/admin/users/no-such-user/role",
            Some(&super_token),
            Some(json!({ "role": "elder" })),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn role_update_emits_an_audit_notification() {
    let app = TestApp::spawn();
    let (_, super_token) = app
        .user_with_role("root@x.com", "Root", Role::Pending, true)
        .await;
    let user_id = app.register("a@x.com", "Ana").await;

    app.request(
        "PUT",
        &format!("/admin/users/{}/role", user_id),
        Some(&super_token),
        Some(json!({ "role": "servant" })),
    )
    .await;

    let notifications = app.notifications().await;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, "role_changed");
    assert!(notifications[0].message.contains("Root"));
    assert!(notifications[0].message.contains("Ana"));
    assert!(notifications[0].message.contains("servant"));
}

#[tokio::test]
async fn role_update_can_grant_superuser_and_assign_group() {
    let app = TestApp::spawn();
    let (_, super_token) = app
        .user_with_role("root@x.com", "Root", Role::Pending, true)
        .await;
    let user_id = app.register("a@x.com", "Ana").await;

    let (status, body) = app
        .request(
            "PUT",
            &format!("/admin/users/{}/role", user_id),
            Some(&super_token),
            Some(json!({ "role": "servant", "is_superuser": true, "assigned_group": 3 })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["is_superuser"], true);
    assert_eq!(body["user"]["assigned_group"], 3);
}

#[tokio::test]
async fn non_superuser_cannot_touch_roles() {
    let app = TestApp::spawn();
    let (_, elder_token) = app
        .user_with_role("elder@x.com", "Eli", Role::Elder, false)
        .await;
    let user_id = app.register("a@x.com", "Ana").await;

    let (status, _) = app
        .request(
            "PUT",
            &format!("/admin/users/{}/role", user_id),
            Some(&elder_token),
            Some(json!({ "role": "elder" })),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    let rows = app.store.users_by_id(&user_id).await.unwrap();
    assert_eq!(rows[0].role, Role::Pending);
}
