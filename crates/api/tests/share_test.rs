//! Read-only sharing between accounts.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{app, collaborator, expense, register, send};

#[tokio::test]
async fn test_share_redeem_read_and_revoke() {
    let app = app();
    let (owner, body) = register(&app, "ana@example.com").await;
    let owner_id = body["user"]["id"].as_str().unwrap().to_string();
    let (viewer, _) = register(&app, "bia@example.com").await;
    let (stranger, _) = register(&app, "caio@example.com").await;

    let bruno = collaborator(&app, &owner, "Bruno").await;
    expense(&app, &owner, &bruno, "Rent", "50", (2025, 1), None).await;

    let (status, body) =
        send(&app, Method::POST, "/api/v1/shares/tokens", Some(&owner), None).await;
    assert_eq!(status, StatusCode::CREATED);
    let raw = body["token"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/shares/redeem",
        Some(&viewer),
        Some(json!({"token": raw})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["owner_id"], owner_id.as_str());
    let grant_id = body["id"].as_str().unwrap().to_string();

    let dashboard = format!("/api/v1/dashboard/monthly?year=2025&month=1&owner_id={owner_id}");
    let (status, body) = send(&app, Method::GET, &dashboard, Some(&viewer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totals"]["total"], "50");

    let (status, body) = send(&app, Method::GET, &dashboard, Some(&stranger), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    // Writes always land in the caller's own data.
    let (_, body) = send(&app, Method::GET, "/api/v1/expenses", Some(&viewer), None).await;
    assert!(body.as_array().unwrap().is_empty());

    let (_, body) = send(&app, Method::GET, "/api/v1/shares", Some(&owner), None).await;
    assert_eq!(body["granted"].as_array().unwrap().len(), 1);
    assert!(body["received"].as_array().unwrap().is_empty());
    let (_, body) = send(&app, Method::GET, "/api/v1/shares", Some(&viewer), None).await;
    assert_eq!(body["received"].as_array().unwrap().len(), 1);

    // Only the owner can revoke.
    let grant_uri = format!("/api/v1/shares/{grant_id}");
    let (status, _) = send(&app, Method::DELETE, &grant_uri, Some(&viewer), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, &grant_uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, &dashboard, Some(&viewer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_token_redemption_rules() {
    let app = app();
    let (owner, _) = register(&app, "ana@example.com").await;
    let (viewer, _) = register(&app, "bia@example.com").await;
    let (other, _) = register(&app, "caio@example.com").await;

    let (_, body) = send(&app, Method::POST, "/api/v1/shares/tokens", Some(&owner), None).await;
    let raw = body["token"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/shares/redeem",
        Some(&owner),
        Some(json!({"token": raw})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "business_rule_violation");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/shares/redeem",
        Some(&viewer),
        Some(json!({"token": raw})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/shares/redeem",
        Some(&other),
        Some(json!({"token": raw})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/shares/redeem",
        Some(&other),
        Some(json!({"token": "not-a-real-token"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}
