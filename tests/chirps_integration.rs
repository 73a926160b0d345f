mod common;

use common::spawn_app;
use serde_json::Value;

fn ids(chirps: &Value) -> Vec<i64> {
    chirps
        .as_array()
        .expect("Expected a list of chirps")
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn create_chirp_requires_session_token() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/api/chirps"))
        .json(&serde_json::json!({ "body": "hello" }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(401, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "MISSING_HEADER");
}

#[tokio::test]
async fn create_chirp_masks_profanity() {
    let app = spawn_app().await;
    let session = app.signed_in_user("a@x.com", "secret").await;
    let token = session["token"].as_str().unwrap();

    let response = app
        .post_chirp(token, "This is a kerfuffle opinion I need to share with the world")
        .await;
    assert_eq!(201, response.status().as_u16());

    let chirp: Value = response.json().await.unwrap();
    assert_eq!(chirp["id"], 1);
    assert_eq!(chirp["author_id"], session["id"]);
    assert_eq!(chirp["body"], "This is a **** opinion I need to share with the world");
}

#[tokio::test]
async fn create_chirp_rejects_long_body() {
    let app = spawn_app().await;
    let session = app.signed_in_user("a@x.com", "secret").await;

    let response = app
        .post_chirp(session["token"].as_str().unwrap(), &"x".repeat(141))
        .await;
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn list_chirps_sorts_and_filters() {
    let app = spawn_app().await;
    let alice = app.signed_in_user("alice@x.com", "secret").await;
    let bob = app.signed_in_user("bob@x.com", "secret").await;

    app.post_chirp(alice["token"].as_str().unwrap(), "first").await;
    app.post_chirp(bob["token"].as_str().unwrap(), "second").await;
    app.post_chirp(alice["token"].as_str().unwrap(), "third").await;

    let all: Value = app.client.get(app.url("/api/chirps")).send().await.unwrap().json().await.unwrap();
    assert_eq!(ids(&all), vec![1, 2, 3]);

    let desc: Value = app
        .client
        .get(app.url("/api/chirps?sort=desc"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ids(&desc), vec![3, 2, 1]);

    let alice_desc: Value = app
        .client
        .get(app.url(&format!("/api/chirps?author_id={}&sort=desc", alice["id"])))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ids(&alice_desc), vec![3, 1]);
}

#[tokio::test]
async fn list_chirps_rejects_bad_query() {
    let app = spawn_app().await;

    for query in ["sort=sideways", "author_id=bob"] {
        let response = app
            .client
            .get(app.url(&format!("/api/chirps?{}", query)))
            .send()
            .await
            .unwrap();
        assert_eq!(400, response.status().as_u16(), "Should reject {}", query);
    }
}

#[tokio::test]
async fn get_chirp_by_id() {
    let app = spawn_app().await;
    let session = app.signed_in_user("a@x.com", "secret").await;
    app.post_chirp(session["token"].as_str().unwrap(), "hello").await;

    let found = app.client.get(app.url("/api/chirps/1")).send().await.unwrap();
    assert_eq!(200, found.status().as_u16());
    let chirp: Value = found.json().await.unwrap();
    assert_eq!(chirp["body"], "hello");

    let missing = app.client.get(app.url("/api/chirps/99")).send().await.unwrap();
    assert_eq!(404, missing.status().as_u16());

    let invalid = app.client.get(app.url("/api/chirps/abc")).send().await.unwrap();
    assert_eq!(400, invalid.status().as_u16());
}

#[tokio::test]
async fn only_author_can_delete_chirp() {
    let app = spawn_app().await;
    let alice = app.signed_in_user("alice@x.com", "secret").await;
    let bob = app.signed_in_user("bob@x.com", "secret").await;
    app.post_chirp(alice["token"].as_str().unwrap(), "mine").await;

    let forbidden = app
        .client
        .delete(app.url("/api/chirps/1"))
        .bearer_auth(bob["token"].as_str().unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(403, forbidden.status().as_u16());
    let still_there = app.client.get(app.url("/api/chirps/1")).send().await.unwrap();
    assert_eq!(200, still_there.status().as_u16());

    let missing = app
        .client
        .delete(app.url("/api/chirps/42"))
        .bearer_auth(bob["token"].as_str().unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(404, missing.status().as_u16());

    let deleted = app
        .client
        .delete(app.url("/api/chirps/1"))
        .bearer_auth(alice["token"].as_str().unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(204, deleted.status().as_u16());

    let gone = app.client.get(app.url("/api/chirps/1")).send().await.unwrap();
    assert_eq!(404, gone.status().as_u16());
}

#[tokio::test]
async fn deleted_chirp_ids_are_not_reused() {
    let app = spawn_app().await;
    let session = app.signed_in_user("a@x.com", "secret").await;
    let token = session["token"].as_str().unwrap();

    app.post_chirp(token, "one").await;
    app.post_chirp(token, "two").await;
    app.client
        .delete(app.url("/api/chirps/2"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    let chirp: Value = app.post_chirp(token, "three").await.json().await.unwrap();
    assert_eq!(chirp["id"], 3);
}
