//! Integration tests for professional profiles and the user listing.

mod common;

use common::TestHarness;
use serde_json::{json, Value};

#[tokio::test]
async fn create_and_list_profile() {
    let (h, addr) = TestHarness::with_server().await;
    let user = h.create_user("ana");

    let resp = h
        .post_json(
            addr,
            "/profiles/create/",
            json!({"user_id": user.get(), "position": "Backend Developer", "seniority": "SR"}),
        )
        .await;
    assert_eq!(resp.status(), 201);

    let profiles: Vec<Value> = h.get(addr, "/profiles/").await.json().await.unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0]["username"], "ana");
    assert_eq!(profiles[0]["position"], "Backend Developer");
    assert_eq!(profiles[0]["seniority"], "SR");
}

#[tokio::test]
async fn second_profile_for_user_is_conflict() {
    let (h, addr) = TestHarness::with_server().await;
    let user = h.create_user("ana");
    let body = json!({"user_id": user.get(), "position": "Dev", "seniority": "JR"});

    assert_eq!(h.post_json(addr, "/profiles/create/", body.clone()).await.status(), 201);
    assert_eq!(h.post_json(addr, "/profiles/create/", body).await.status(), 409);
}

#[tokio::test]
async fn profile_for_unknown_user_is_404() {
    let (h, addr) = TestHarness::with_server().await;

    let resp = h
        .post_json(
            addr,
            "/profiles/create/",
            json!({"user_id": 77, "position": "Dev", "seniority": "MID"}),
        )
        .await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn unknown_seniority_is_400() {
    let (h, addr) = TestHarness::with_server().await;
    let user = h.create_user("ana");

    let resp = h
        .post_json(
            addr,
            "/profiles/create/",
            json!({"user_id": user.get(), "position": "Dev", "seniority": "Principal"}),
        )
        .await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn users_are_listed_read_only() {
    let (h, addr) = TestHarness::with_server().await;
    h.create_user("bruno");
    h.create_user("ana");

    let users: Vec<Value> = h.get(addr, "/users/").await.json().await.unwrap();
    let names: Vec<&str> = users.iter().map(|u| u["username"].as_str().unwrap()).collect();
    assert_eq!(names, ["ana", "bruno"]);

    let resp = h.post_json(addr, "/users/", json!({"username": "eve"})).await;
    assert_eq!(resp.status(), 405);
}
