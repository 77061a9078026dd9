//! Error translation at the HTTP boundary.

use serde_json::{json, Value};

use crate::support::spawn_app;

#[tokio::test]
async fn malformed_id_is_400() {
    let (base, _) = spawn_app().await;
    let client = reqwest::Client::new();

    let get = client
        .get(format!("{base}/persons/12345"))
        .send()
        .await
        .unwrap();
    let put = client
        .put(format!("{base}/persons/12345"))
        .json(&json!({ "number": "1" }))
        .send()
        .await
        .unwrap();
    let delete = client
        .delete(format!("{base}/persons/12345"))
        .send()
        .await
        .unwrap();

    for resp in [get, put, delete] {
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!({ "error": "malformed id" }));
    }
}

#[tokio::test]
async fn malformed_payload_is_400() {
    let (base, store) = spawn_app().await;
    let client = reqwest::Client::new();

    let bad_json = client
        .post(format!("{base}/persons"))
        .header("content-type", "application/json")
        .body("{ name: ")
        .send()
        .await
        .unwrap();
    let wrong_types = client
        .post(format!("{base}/persons"))
        .json(&json!({ "name": 5, "number": ["1"] }))
        .send()
        .await
        .unwrap();
    let no_content_type = client
        .post(format!("{base}/persons"))
        .body(r#"{ "name": "Ada", "number": "1" }"#)
        .send()
        .await
        .unwrap();

    for resp in [bad_json, wrong_types, no_content_type] {
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!({ "error": "malformed payload" }));
    }
    assert_eq!(store.count().unwrap(), 0);
}

#[tokio::test]
async fn blank_field_on_update_is_400() {
    let (base, _) = spawn_app().await;
    let client = reqwest::Client::new();

    let created: Value = client
        .post(format!("{base}/persons"))
        .json(&json!({ "name": "Ada", "number": "1" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap();

    let resp = client
        .put(format!("{base}/persons/{id}"))
        .json(&json!({ "number": " " }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "error": "number must not be empty" }));
}

#[tokio::test]
async fn rename_to_taken_name_is_400() {
    let (base, _) = spawn_app().await;
    let client = reqwest::Client::new();

    let mut ids = Vec::new();
    for (name, number) in [("Ada", "1"), ("Grace", "2")] {
        let created: Value = client
            .post(format!("{base}/persons"))
            .json(&json!({ "name": name, "number": number }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        ids.push(created["id"].as_str().unwrap().to_string());
    }

    let resp = client
        .put(format!("{base}/persons/{}", ids[1]))
        .json(&json!({ "name": "Ada" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "error": "name must be unique" }));
}

#[tokio::test]
async fn unknown_endpoint_is_404() {
    let (base, _) = spawn_app().await;
    let client = reqwest::Client::new();

    for path in ["/nope", "/persons/a/b", "/api/persons"] {
        let resp = client.get(format!("{base}{path}")).send().await.unwrap();
        assert_eq!(resp.status(), 404, "{path}");
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!({ "error": "unknown endpoint" }));
    }
}

#[tokio::test]
async fn root_banner_without_static_dir() {
    let (base, _) = spawn_app().await;

    let resp = reqwest::get(format!("{base}/")).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().contains("Phonebook API is running"));
}

#[tokio::test]
async fn wrong_method_on_known_path_is_405() {
    let (base, store) = spawn_app().await;
    let client = reqwest::Client::new();

    let post_item = client
        .post(format!("{base}/persons/6b1f1c2e-1d5a-4c8e-9a7e-2f0d3b4c5a6e"))
        .json(&json!({ "name": "Ada", "number": "1" }))
        .send()
        .await
        .unwrap();
    let patch_list = client
        .patch(format!("{base}/persons"))
        .json(&json!({ "number": "1" }))
        .send()
        .await
        .unwrap();
    let delete_info = client
        .delete(format!("{base}/info"))
        .send()
        .await
        .unwrap();

    for resp in [post_item, patch_list, delete_info] {
        assert_eq!(resp.status(), 405);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!({ "error": "method not allowed" }));
    }
    assert_eq!(store.count().unwrap(), 0);
}
